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
use std::path::Path;

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use self::audio::Audio;
pub use self::error::ConfigError;
pub use self::system::System;

mod audio;
mod error;
mod system;

/// The file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "morse-converter.yaml";

/// The configuration for the converter.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// Tone and timing settings.
    #[serde(default)]
    audio: Audio,
    /// Process-wide settings.
    #[serde(default)]
    system: System,
}

impl Settings {
    /// Creates a new configuration.
    pub fn new(audio: Audio, system: System) -> Settings {
        Settings { audio, system }
    }

    /// A configuration with every default written out.
    pub fn defaults() -> Settings {
        Settings::new(
            Audio::defaults(),
            System::new(Some("info".to_string()), None, None),
        )
    }

    /// Loads and validates the configuration from a YAML file. A missing file yields the
    /// defaults.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes the configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let serialized = serde_yml::to_string(self)?;
        crate::file::write(path, &serialized)?;
        info!(path = path.display().to_string(), "Saved configuration.");
        Ok(())
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audio.validate()?;
        self.system.validate()
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn system(&self) -> &System {
        &self.system
    }
}
