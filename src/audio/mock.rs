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
use std::{
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use tracing::{info, span, Level};

use crate::playsync::CancelHandle;

/// A mock device. Doesn't actually play anything, it waits for as long as the buffer would
/// take to play or until stopped.
#[derive(Clone)]
pub struct Device {
    name: String,
    plays: Arc<AtomicUsize>,
    is_playing: Arc<AtomicBool>,
    fail_play: Arc<AtomicBool>,
    fail_stop: Arc<AtomicBool>,
    current: Arc<Mutex<Option<(CancelHandle, Duration)>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            plays: Arc::new(AtomicUsize::new(0)),
            is_playing: Arc::new(AtomicBool::new(false)),
            fail_play: Arc::new(AtomicBool::new(false)),
            fail_stop: Arc::new(AtomicBool::new(false)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns true if the device is currently playing.
    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::Relaxed)
    }

    /// The number of buffers submitted to this device.
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::Relaxed)
    }

    /// Makes subsequent play calls fail.
    pub fn fail_play(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::Relaxed);
    }

    /// Makes subsequent stop calls fail.
    pub fn fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::Relaxed);
    }
}

impl crate::audio::Device for Device {
    fn play(&self, samples: Arc<[f32]>, sample_rate: u32) -> Result<(), Box<dyn Error>> {
        let span = span!(Level::INFO, "play buffer (mock)");
        let _enter = span.enter();

        self.plays.fetch_add(1, Ordering::Relaxed);
        if self.fail_play.load(Ordering::Relaxed) {
            return Err(format!("mock device {} failed to play", self.name).into());
        }

        let duration = Duration::from_secs_f64(samples.len() as f64 / sample_rate as f64);
        info!(
            device = self.name,
            samples = samples.len(),
            duration = format!("{:?}", duration),
            "Playing buffer."
        );

        *self.current.lock() = Some((CancelHandle::new(), duration));
        self.is_playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn wait_until_done(&self) -> Result<(), Box<dyn Error>> {
        let current = self.current.lock().clone();
        if let Some((cancel_handle, duration)) = current {
            cancel_handle.wait_timeout(duration);
        }
        self.is_playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn Error>> {
        if self.fail_stop.load(Ordering::Relaxed) {
            return Err(format!("mock device {} failed to stop", self.name).into());
        }

        if let Some((cancel_handle, _)) = self.current.lock().take() {
            cancel_handle.cancel();
        }
        self.is_playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<Device>, Box<dyn Error>> {
        Ok(Arc::new(self.clone()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name,)
    }
}
