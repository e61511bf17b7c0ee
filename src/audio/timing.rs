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
use super::error::AudioError;

/// Seconds in one unit at one word per minute, using "PARIS " (50 units) as the
/// reference word.
const PARIS_UNIT_SECONDS: f64 = 1.2;

pub const MIN_WPM: u32 = 5;
pub const MAX_WPM: u32 = 60;

/// The durations, in seconds, that govern tone and silence lengths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingProfile {
    pub dot: f64,
    pub dash: f64,
    /// Silence after every dot or dash.
    pub symbol_gap: f64,
    pub letter_gap: f64,
    pub word_gap: f64,
}

impl Default for TimingProfile {
    fn default() -> Self {
        TimingProfile {
            dot: 0.1,
            dash: 0.3,
            symbol_gap: 0.1,
            letter_gap: 0.3,
            word_gap: 0.7,
        }
    }
}

impl TimingProfile {
    /// Derives standard 1:3:1:3:7 timing from a words-per-minute speed.
    pub fn from_wpm(wpm: u32) -> Result<TimingProfile, AudioError> {
        if !(MIN_WPM..=MAX_WPM).contains(&wpm) {
            return Err(AudioError::InvalidParameter(format!(
                "words per minute must be between {} and {}, got {}",
                MIN_WPM, MAX_WPM, wpm
            )));
        }

        let unit = PARIS_UNIT_SECONDS / wpm as f64;
        Ok(TimingProfile {
            dot: unit,
            dash: 3.0 * unit,
            symbol_gap: unit,
            letter_gap: 3.0 * unit,
            word_gap: 7.0 * unit,
        })
    }

    /// Returns a copy with the given fields replaced. Every replacement must be a positive,
    /// finite number of seconds.
    pub fn apply(&self, update: &TimingUpdate) -> Result<TimingProfile, AudioError> {
        Ok(TimingProfile {
            dot: replace("dot", self.dot, update.dot)?,
            dash: replace("dash", self.dash, update.dash)?,
            symbol_gap: replace("symbol gap", self.symbol_gap, update.symbol_gap)?,
            letter_gap: replace("letter gap", self.letter_gap, update.letter_gap)?,
            word_gap: replace("word gap", self.word_gap, update.word_gap)?,
        })
    }
}

/// A partial update to a timing profile. Unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimingUpdate {
    pub dot: Option<f64>,
    pub dash: Option<f64>,
    pub symbol_gap: Option<f64>,
    pub letter_gap: Option<f64>,
    pub word_gap: Option<f64>,
}

fn replace(name: &str, current: f64, update: Option<f64>) -> Result<f64, AudioError> {
    match update {
        None => Ok(current),
        Some(value) if value > 0.0 && value.is_finite() => Ok(value),
        Some(value) => Err(AudioError::InvalidParameter(format!(
            "{} duration must be positive, got {}",
            name, value
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_wpm() {
        let timing = TimingProfile::from_wpm(20).unwrap();
        assert!((timing.dot - 0.06).abs() < 1e-9);
        assert!((timing.dash - 0.18).abs() < 1e-9);
        assert!((timing.word_gap - 0.42).abs() < 1e-9);

        assert!(TimingProfile::from_wpm(4).is_err());
        assert!(TimingProfile::from_wpm(61).is_err());
        assert!(TimingProfile::from_wpm(MIN_WPM).is_ok());
        assert!(TimingProfile::from_wpm(MAX_WPM).is_ok());
    }

    #[test]
    fn test_partial_update() {
        let timing = TimingProfile::default()
            .apply(&TimingUpdate {
                dot: Some(0.2),
                dash: Some(0.4),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(timing.dot, 0.2);
        assert_eq!(timing.dash, 0.4);
        assert_eq!(timing.symbol_gap, 0.1);
        assert_eq!(timing.letter_gap, 0.3);
        assert_eq!(timing.word_gap, 0.7);
    }

    #[test]
    fn test_update_rejects_non_positive() {
        let timing = TimingProfile::default();
        for value in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result = timing.apply(&TimingUpdate {
                word_gap: Some(value),
                ..Default::default()
            });
            assert!(
                matches!(result, Err(AudioError::InvalidParameter(_))),
                "value {}",
                value
            );
        }
    }
}
