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
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Size at which the log file is rotated, 10 MiB.
pub const DEFAULT_MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// A YAML representation of process-wide settings.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct System {
    /// The tracing filter used when RUST_LOG is not set (default: "info")
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,

    /// A file that receives a copy of the log alongside stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    log_file: Option<PathBuf>,

    /// Bytes the log file may reach before it is rotated (default: 10 MiB)
    #[serde(skip_serializing_if = "Option::is_none")]
    max_log_size: Option<u64>,
}

impl System {
    pub fn new(
        log_level: Option<String>,
        log_file: Option<PathBuf>,
        max_log_size: Option<u64>,
    ) -> System {
        System {
            log_level,
            log_file,
            max_log_size,
        }
    }

    /// Returns the log level (default: "info")
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn max_log_size(&self) -> u64 {
        self.max_log_size.unwrap_or(DEFAULT_MAX_LOG_SIZE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_log_size() == 0 {
            return Err(ConfigError::Invalid(
                "system.max_log_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
