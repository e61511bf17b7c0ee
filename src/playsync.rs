// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Where a single playback currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Finished,
    Cancelled,
}

/// A cancel handle is shared between a device and the thread feeding it a buffer. The device
/// marks it finished once the buffer is drained; stop requests cancel it.
#[derive(Clone)]
pub struct CancelHandle {
    state: Arc<Mutex<PlaybackState>>,
    condvar: Arc<Condvar>,
}

impl CancelHandle {
    /// Creates a new handle in the running state.
    pub fn new() -> CancelHandle {
        CancelHandle {
            state: Arc::new(Mutex::new(PlaybackState::Running)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    /// Returns true if the playback was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.state() == PlaybackState::Cancelled
    }

    /// Marks the playback as finished. Has no effect once cancelled.
    pub fn finish(&self) {
        self.transition(PlaybackState::Finished);
    }

    /// Cancels the playback. Has no effect once finished.
    pub fn cancel(&self) {
        self.transition(PlaybackState::Cancelled);
    }

    /// Blocks until the playback finishes or is cancelled.
    pub fn wait(&self) -> PlaybackState {
        let mut state = self.state.lock();
        while *state == PlaybackState::Running {
            self.condvar.wait(&mut state);
        }
        *state
    }

    /// Blocks until the playback finishes, is cancelled, or the timeout expires. A playback
    /// still running at the timeout is marked finished.
    pub fn wait_timeout(&self, timeout: Duration) -> PlaybackState {
        let mut state = self.state.lock();
        if *state == PlaybackState::Running {
            let _ = self.condvar.wait_while_for(
                &mut state,
                |state| *state == PlaybackState::Running,
                timeout,
            );
        }
        if *state == PlaybackState::Running {
            *state = PlaybackState::Finished;
            self.condvar.notify_all();
        }
        *state
    }

    fn transition(&self, next: PlaybackState) {
        let mut state = self.state.lock();
        if *state == PlaybackState::Running {
            *state = next;
            self.condvar.notify_all();
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        CancelHandle::new()
    }
}
