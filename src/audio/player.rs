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
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tracing::{error, info, span, warn, Level};

use super::{error::AudioError, synth::Synthesizer, Device};

/// Plays the buffer of one synthesizer through one device, one playback at a time.
pub struct Player {
    synthesizer: Arc<Mutex<Synthesizer>>,
    device: Arc<dyn Device>,
    /// The generation of the playback holding the device, zero when idle.
    playing: AtomicU64,
    generations: AtomicU64,
}

/// Releases the device when a playback ends, however it ends. A playback that was stopped
/// and superseded leaves the newer playback's claim alone.
struct PlayingGuard<'a> {
    playing: &'a AtomicU64,
    generation: u64,
}

impl Drop for PlayingGuard<'_> {
    fn drop(&mut self) {
        let _ = self.playing.compare_exchange(
            self.generation,
            0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl Player {
    /// Creates a new player bound to the given synthesizer and device.
    pub fn new(synthesizer: Arc<Mutex<Synthesizer>>, device: Arc<dyn Device>) -> Player {
        Player {
            synthesizer,
            device,
            playing: AtomicU64::new(0),
            generations: AtomicU64::new(0),
        }
    }

    /// Returns true while a playback is in progress.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire) != 0
    }

    /// Plays the synthesizer's current buffer and blocks until the device is done.
    ///
    /// The buffer is captured when playback starts; regenerating it afterwards does not
    /// affect this playback.
    pub fn play(&self) -> Result<(), AudioError> {
        let (buffer, sample_rate) = {
            let synthesizer = self.synthesizer.lock();
            (
                synthesizer.buffer().ok_or(AudioError::NoAudio)?,
                synthesizer.sample_rate(),
            )
        };

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        if self
            .playing
            .compare_exchange(0, generation, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(device = %self.device, "Playback requested while already playing.");
            return Err(AudioError::AlreadyPlaying);
        }
        let _guard = PlayingGuard {
            playing: &self.playing,
            generation,
        };

        let span = span!(Level::INFO, "play morse");
        let _enter = span.enter();

        info!(
            device = %self.device,
            samples = buffer.len(),
            sample_rate,
            "Playing audio."
        );

        self.device
            .play(buffer, sample_rate)
            .and_then(|_| self.device.wait_until_done())
            .map_err(|e| {
                error!(err = e.as_ref(), "Error while playing audio.");
                AudioError::Playback(e.to_string())
            })?;

        info!("Playback finished.");
        Ok(())
    }

    /// Halts playback. The playing flag is cleared even if the device fails to stop.
    pub fn stop(&self) -> Result<(), AudioError> {
        info!(device = %self.device, "Stopping audio.");
        let result = self.device.stop().map_err(|e| {
            error!(err = e.as_ref(), "Error while stopping audio.");
            AudioError::Stop(e.to_string())
        });
        self.playing.store(0, Ordering::Release);
        result
    }
}

#[cfg(test)]
mod test {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::audio::{get_device, mock, TimingUpdate};
    use crate::testutil::eventually;

    fn setup() -> (Arc<Mutex<Synthesizer>>, Arc<mock::Device>, Arc<Player>) {
        let synthesizer = Arc::new(Mutex::new(Synthesizer::new(800.0, 0.5, 8000).unwrap()));
        let device = get_device("mock-device").unwrap();
        let mock = device.to_mock().unwrap();
        let player = Arc::new(Player::new(synthesizer.clone(), device));
        (synthesizer, mock, player)
    }

    #[test]
    fn test_play_without_generated_audio() {
        let (_, mock, player) = setup();
        assert!(matches!(player.play(), Err(AudioError::NoAudio)));
        assert_eq!(mock.plays(), 0);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_play() {
        let (synthesizer, mock, player) = setup();
        synthesizer.lock().generate(".").unwrap();

        player.play().unwrap();
        assert_eq!(mock.plays(), 1);
        assert!(!player.is_playing());
        assert!(!mock.is_playing());
    }

    #[test]
    fn test_play_while_playing() -> Result<(), Box<dyn std::error::Error>> {
        let (synthesizer, mock, player) = setup();
        {
            let mut synthesizer = synthesizer.lock();
            synthesizer.set_timing(TimingUpdate {
                dash: Some(30.0),
                ..Default::default()
            })?;
            synthesizer.generate("-")?;
        }

        let join = {
            let player = player.clone();
            thread::spawn(move || player.play())
        };

        eventually(|| mock.is_playing(), "Mock device never started playing");
        assert!(player.is_playing());

        assert!(matches!(player.play(), Err(AudioError::AlreadyPlaying)));
        assert_eq!(mock.plays(), 1);

        player.stop()?;
        assert!(!player.is_playing());
        assert!(join.join().unwrap().is_ok());
        assert!(!player.is_playing());
        Ok(())
    }

    #[test]
    fn test_regenerate_during_playback() -> Result<(), Box<dyn std::error::Error>> {
        let (synthesizer, mock, player) = setup();
        synthesizer.lock().generate(".-")?;

        let join = {
            let player = player.clone();
            thread::spawn(move || player.play())
        };
        eventually(|| mock.is_playing(), "Mock device never started playing");

        // The synthesizer is free to regenerate while its previous buffer plays.
        synthesizer.lock().generate("...")?;
        assert!(join.join().unwrap().is_ok());

        player.play()?;
        assert_eq!(mock.plays(), 2);
        Ok(())
    }

    #[test]
    fn test_device_failure_resets_state() {
        let (synthesizer, mock, player) = setup();
        synthesizer.lock().generate(".").unwrap();
        mock.fail_play(true);

        let err = player.play().unwrap_err();
        assert!(matches!(err, AudioError::Playback(_)));
        assert!(err.to_string().contains("failed to play"));
        assert!(!player.is_playing());

        mock.fail_play(false);
        assert!(player.play().is_ok());
    }

    #[test]
    fn test_superseded_playback_keeps_newer_claim() -> Result<(), Box<dyn std::error::Error>> {
        let (synthesizer, mock, player) = setup();
        {
            let mut synthesizer = synthesizer.lock();
            synthesizer.set_timing(TimingUpdate {
                dash: Some(0.5),
                ..Default::default()
            })?;
            synthesizer.generate("-")?;
        }

        let first = {
            let player = player.clone();
            thread::spawn(move || player.play())
        };
        eventually(|| mock.is_playing(), "Mock device never started playing");
        thread::sleep(Duration::from_millis(100));

        // The device keeps playing but the player lets go of it.
        mock.fail_stop(true);
        assert!(matches!(player.stop(), Err(AudioError::Stop(_))));
        assert!(!player.is_playing());

        {
            let mut synthesizer = synthesizer.lock();
            synthesizer.set_timing(TimingUpdate {
                dash: Some(30.0),
                ..Default::default()
            })?;
            synthesizer.generate("-")?;
        }
        let second = {
            let player = player.clone();
            thread::spawn(move || player.play())
        };
        eventually(|| mock.plays() == 2, "Second playback never started");

        assert!(first.join().unwrap().is_ok());
        assert!(player.is_playing());
        assert!(matches!(player.play(), Err(AudioError::AlreadyPlaying)));
        assert_eq!(mock.plays(), 2);

        mock.fail_stop(false);
        player.stop()?;
        assert!(second.join().unwrap().is_ok());
        assert!(!player.is_playing());
        Ok(())
    }

    #[test]
    fn test_stop() {
        let (_, mock, player) = setup();
        assert!(player.stop().is_ok());
        assert!(!player.is_playing());

        mock.fail_stop(true);
        let err = player.stop().unwrap_err();
        assert!(matches!(err, AudioError::Stop(_)));
        assert!(!player.is_playing());
    }
}
