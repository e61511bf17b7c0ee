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
use std::any::Any;
use std::{error::Error, fmt, sync::Arc};

pub mod cpal;
pub mod error;
pub mod mock;
pub mod player;
pub mod synth;
pub mod timing;
pub mod wav;

pub use error::AudioError;
pub use player::Player;
pub use synth::Synthesizer;
pub use timing::{TimingProfile, TimingUpdate};

/// An output device that plays a fully materialized mono buffer.
pub trait Device: Any + fmt::Display + std::marker::Send + std::marker::Sync {
    /// Starts playing the given samples.
    fn play(&self, samples: Arc<[f32]>, sample_rate: u32) -> Result<(), Box<dyn Error>>;

    /// Blocks until the current buffer has played out or playback was stopped.
    fn wait_until_done(&self) -> Result<(), Box<dyn Error>>;

    /// Halts playback immediately.
    fn stop(&self) -> Result<(), Box<dyn Error>>;

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<mock::Device>, Box<dyn Error>>;
}

/// Lists devices known to cpal.
pub fn list_devices() -> Result<Vec<Box<dyn Device>>, Box<dyn Error>> {
    cpal::Device::list()
}

/// Gets a device with the given name.
pub fn get_device(name: &str) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    if name.is_empty() {
        return Err("there must be an audio device specified".into());
    }

    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name)));
    };

    Ok(Arc::new(cpal::Device::get(name)?))
}
