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
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::audio::{synth, timing, AudioError, Synthesizer, TimingProfile};

const MIN_FREQUENCY: f64 = 20.0;
const MAX_FREQUENCY: f64 = 20000.0;
const DEFAULT_DEVICE: &str = "default";

/// A YAML representation of the audio configuration.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Audio {
    /// Tone frequency in Hz (default: 800)
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency: Option<f64>,

    /// Tone amplitude between 0.0 and 1.0 (default: 0.5)
    #[serde(skip_serializing_if = "Option::is_none")]
    volume: Option<f64>,

    /// Sending speed. When unset the standard timing profile is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    wpm: Option<u32>,

    /// Sample rate in Hz (default: 44100)
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate: Option<u32>,

    /// The audio device (default: "default")
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<String>,
}

impl Audio {
    /// New will create a new Audio configuration.
    pub fn new(
        frequency: Option<f64>,
        volume: Option<f64>,
        wpm: Option<u32>,
        sample_rate: Option<u32>,
        device: Option<String>,
    ) -> Audio {
        Audio {
            frequency,
            volume,
            wpm,
            sample_rate,
            device,
        }
    }

    /// An audio configuration with every default filled in.
    pub fn defaults() -> Audio {
        Audio::new(
            Some(synth::DEFAULT_FREQUENCY),
            Some(synth::DEFAULT_VOLUME),
            None,
            Some(synth::DEFAULT_SAMPLE_RATE),
            Some(DEFAULT_DEVICE.to_string()),
        )
    }

    /// Returns the tone frequency (default: 800)
    pub fn frequency(&self) -> f64 {
        self.frequency.unwrap_or(synth::DEFAULT_FREQUENCY)
    }

    /// Returns the tone amplitude (default: 0.5)
    pub fn volume(&self) -> f64 {
        self.volume.unwrap_or(synth::DEFAULT_VOLUME)
    }

    /// Returns the configured sending speed, if any.
    pub fn wpm(&self) -> Option<u32> {
        self.wpm
    }

    /// Returns the sample rate (default: 44100)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(synth::DEFAULT_SAMPLE_RATE)
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    /// Returns the timing profile, derived from the speed when one is set.
    pub fn timing(&self) -> Result<TimingProfile, AudioError> {
        match self.wpm {
            Some(wpm) => TimingProfile::from_wpm(wpm),
            None => Ok(TimingProfile::default()),
        }
    }

    /// Creates a synthesizer from this configuration.
    pub fn synthesizer(&self) -> Result<Synthesizer, AudioError> {
        let mut synthesizer =
            Synthesizer::new(self.frequency(), self.volume(), self.sample_rate())?;
        synthesizer.set_timing_profile(self.timing()?);
        Ok(synthesizer)
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let frequency = self.frequency();
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
            return Err(ConfigError::Invalid(format!(
                "audio.frequency must be between {} and {} Hz, got {}",
                MIN_FREQUENCY, MAX_FREQUENCY, frequency
            )));
        }

        let volume = self.volume();
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::Invalid(format!(
                "audio.volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        if let Some(wpm) = self.wpm {
            if !(timing::MIN_WPM..=timing::MAX_WPM).contains(&wpm) {
                return Err(ConfigError::Invalid(format!(
                    "audio.wpm must be between {} and {}, got {}",
                    timing::MIN_WPM,
                    timing::MAX_WPM,
                    wpm
                )));
            }
        }

        if self.sample_rate() == 0 {
            return Err(ConfigError::Invalid(
                "audio.sample_rate must be positive".to_string(),
            ));
        }

        if self.device().is_empty() {
            return Err(ConfigError::Invalid(
                "audio.device cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
