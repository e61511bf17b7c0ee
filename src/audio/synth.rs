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
use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::error::AudioError;
use super::timing::{TimingProfile, TimingUpdate};

pub const DEFAULT_FREQUENCY: f64 = 800.0;
pub const DEFAULT_VOLUME: f64 = 0.5;
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Longest key click ramp applied to each end of a tone.
const RAMP_SECONDS: f64 = 0.005;

/// Upper bound on a generated message.
const MAX_BUFFER_SECONDS: f64 = 3600.0;

/// Turns Morse symbol strings into mono PCM sample buffers.
#[derive(Debug)]
pub struct Synthesizer {
    frequency: f64,
    volume: f64,
    sample_rate: u32,
    timing: TimingProfile,
    /// The last generated buffer. Shared with any playback in progress, so a regenerated
    /// buffer replaces it here without affecting that playback.
    buffer: Option<Arc<[f32]>>,
}

impl Synthesizer {
    /// Creates a synthesizer with the default timing profile.
    pub fn new(frequency: f64, volume: f64, sample_rate: u32) -> Result<Synthesizer, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidParameter(
                "sample rate must be positive".to_string(),
            ));
        }

        let mut synthesizer = Synthesizer {
            frequency: DEFAULT_FREQUENCY,
            volume: DEFAULT_VOLUME,
            sample_rate,
            timing: TimingProfile::default(),
            buffer: None,
        };
        synthesizer.set_frequency(frequency)?;
        synthesizer.set_volume(volume)?;
        Ok(synthesizer)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    /// Returns the last generated buffer, if any.
    pub fn buffer(&self) -> Option<Arc<[f32]>> {
        self.buffer.clone()
    }

    /// Returns the playing time of the last generated buffer.
    pub fn duration(&self) -> Option<Duration> {
        self.buffer
            .as_ref()
            .map(|buffer| Duration::from_secs_f64(buffer.len() as f64 / self.sample_rate as f64))
    }

    /// Sets the tone frequency in Hz. Applies to the next generated buffer.
    pub fn set_frequency(&mut self, frequency: f64) -> Result<(), AudioError> {
        if !(frequency > 0.0 && frequency.is_finite()) {
            return Err(AudioError::InvalidParameter(format!(
                "frequency must be positive, got {}",
                frequency
            )));
        }

        self.frequency = frequency;
        Ok(())
    }

    /// Sets the tone amplitude between 0.0 and 1.0.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), AudioError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(AudioError::InvalidParameter(format!(
                "volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        self.volume = volume;
        Ok(())
    }

    /// Replaces the whole timing profile.
    pub fn set_timing_profile(&mut self, timing: TimingProfile) {
        self.timing = timing;
    }

    /// Updates any subset of the timing fields.
    pub fn set_timing(&mut self, update: TimingUpdate) -> Result<(), AudioError> {
        self.timing = self.timing.apply(&update)?;
        debug!(timing = ?self.timing, "Updated timing.");
        Ok(())
    }

    /// Generates the sample buffer for a Morse symbol string.
    ///
    /// A dot or dash is a tone followed by the symbol gap and a space is the word gap.
    /// Anything else is skipped. Only the segments the symbols use are sized, so a duration
    /// that cannot be rendered fails only messages containing it. On error the previous
    /// buffer is kept.
    pub fn generate(&mut self, symbols: &str) -> Result<(), AudioError> {
        info!(
            symbols,
            frequency = self.frequency,
            sample_rate = self.sample_rate,
            "Generating audio."
        );

        let buffer = self.render(symbols).inspect_err(|e| {
            error!(err = %e, "Unable to generate audio.");
        })?;

        debug!(samples = buffer.len(), "Generated audio.");
        self.buffer = Some(buffer.into());
        Ok(())
    }

    fn render(&self, symbols: &str) -> Result<Vec<f32>, AudioError> {
        let uses = |symbol: char| symbols.contains(symbol);
        let dot = if uses('.') {
            self.tone(self.timing.dot)?
        } else {
            Vec::new()
        };
        let dash = if uses('-') {
            self.tone(self.timing.dash)?
        } else {
            Vec::new()
        };
        let symbol_gap = if uses('.') || uses('-') {
            self.sample_count(self.timing.symbol_gap)?
        } else {
            0
        };
        let word_gap = if uses(' ') {
            self.sample_count(self.timing.word_gap)?
        } else {
            0
        };
        let max_samples = (MAX_BUFFER_SECONDS * self.sample_rate as f64) as usize;

        let mut buffer: Vec<f32> = Vec::new();
        for c in symbols.chars() {
            let (tone, silence): (&[f32], usize) = match c {
                '.' => (dot.as_slice(), symbol_gap),
                '-' => (dash.as_slice(), symbol_gap),
                ' ' => (&[], word_gap),
                _ => {
                    warn!(character = %c, "Skipping character that is not a Morse symbol.");
                    continue;
                }
            };

            let length = buffer
                .len()
                .checked_add(tone.len())
                .and_then(|length| length.checked_add(silence))
                .filter(|length| *length <= max_samples)
                .ok_or_else(|| {
                    AudioError::Synthesis(format!(
                        "message is longer than {} seconds",
                        MAX_BUFFER_SECONDS
                    ))
                })?;

            buffer.extend_from_slice(tone);
            buffer.resize(length, 0.0);
        }

        Ok(buffer)
    }

    /// A sine tone shaped with a raised cosine attack and release.
    fn tone(&self, duration: f64) -> Result<Vec<f32>, AudioError> {
        let count = self.sample_count(duration)?;
        let ramp = ((RAMP_SECONDS * self.sample_rate as f64) as usize).min(count / 2);
        let step = 2.0 * PI * self.frequency / self.sample_rate as f64;

        Ok((0..count)
            .map(|i| {
                let envelope = if i < ramp {
                    0.5 * (1.0 - (PI * i as f64 / ramp as f64).cos())
                } else if i >= count - ramp {
                    0.5 * (1.0 - (PI * (count - 1 - i) as f64 / ramp as f64).cos())
                } else {
                    1.0
                };
                (self.volume * envelope * (step * i as f64).sin()) as f32
            })
            .collect())
    }

    fn sample_count(&self, duration: f64) -> Result<usize, AudioError> {
        let count = (self.sample_rate as f64 * duration).round();
        if !count.is_finite() || count < 0.0 || count > MAX_BUFFER_SECONDS * self.sample_rate as f64
        {
            return Err(AudioError::Synthesis(format!(
                "duration of {} seconds cannot be rendered at {} Hz",
                duration, self.sample_rate
            )));
        }
        Ok(count as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(DEFAULT_FREQUENCY, DEFAULT_VOLUME, DEFAULT_SAMPLE_RATE).unwrap()
    }

    fn seconds_to_samples(seconds: f64) -> usize {
        (seconds * DEFAULT_SAMPLE_RATE as f64).round() as usize
    }

    #[test]
    fn test_defaults() {
        let synthesizer = synthesizer();
        assert_eq!(synthesizer.frequency(), 800.0);
        assert_eq!(synthesizer.sample_rate(), 44100);
        assert_eq!(*synthesizer.timing(), TimingProfile::default());
        assert!(synthesizer.buffer().is_none());
        assert!(synthesizer.duration().is_none());
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        assert!(Synthesizer::new(0.0, 0.5, 44100).is_err());
        assert!(Synthesizer::new(800.0, 1.5, 44100).is_err());
        assert!(Synthesizer::new(800.0, 0.5, 0).is_err());
    }

    #[test]
    fn test_tone_and_silence() {
        let synthesizer = synthesizer();
        let tone = synthesizer.tone(0.1).unwrap();
        assert_eq!(tone.len(), 4410);
        assert!(tone.iter().all(|sample| sample.abs() <= 1.0));
        let peak = tone.iter().fold(0.0f32, |peak, sample| peak.max(sample.abs()));
        assert!(peak > 0.45 && peak <= 0.5, "peak {}", peak);

        // Ramps start and end the tone at silence.
        assert_eq!(tone[0], 0.0);
        assert!(tone[tone.len() - 1].abs() < 1e-3);
    }

    #[test]
    fn test_buffer_length() {
        let mut synthesizer = synthesizer();
        synthesizer.generate(".-").unwrap();

        let timing = *synthesizer.timing();
        let expected =
            44100.0 * (timing.dot + timing.symbol_gap + timing.dash + timing.symbol_gap);
        let actual = synthesizer.buffer().unwrap().len() as f64;
        assert!((actual - expected).abs() <= 1.0, "{} vs {}", actual, expected);
        let duration = synthesizer.duration().unwrap();
        assert!((duration.as_secs_f64() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_space_is_word_gap() {
        let mut synthesizer = synthesizer();
        synthesizer.generate(". .").unwrap();
        let buffer = synthesizer.buffer().unwrap();
        assert_eq!(
            buffer.len(),
            seconds_to_samples(0.1) * 4 + seconds_to_samples(0.7)
        );

        // The word gap is silent.
        let gap_start = seconds_to_samples(0.2);
        let gap_end = gap_start + seconds_to_samples(0.7);
        assert!(buffer[gap_start..gap_end].iter().all(|sample| *sample == 0.0));
    }

    #[test]
    fn test_generate_skips_other_characters() {
        let mut synthesizer = synthesizer();
        synthesizer.generate(".x-#").unwrap();
        let with_noise = synthesizer.buffer().unwrap().len();
        synthesizer.generate(".-").unwrap();
        assert_eq!(with_noise, synthesizer.buffer().unwrap().len());

        synthesizer.generate("invalid#morse").unwrap();
        assert_eq!(synthesizer.buffer().unwrap().len(), 0);
    }

    #[test]
    fn test_set_frequency() {
        let mut synthesizer = synthesizer();
        synthesizer.generate(".").unwrap();
        let before = synthesizer.buffer().unwrap();

        synthesizer.set_frequency(1000.0).unwrap();
        assert_eq!(synthesizer.frequency(), 1000.0);
        assert!(Arc::ptr_eq(&before, &synthesizer.buffer().unwrap()));

        assert!(matches!(
            synthesizer.set_frequency(-100.0),
            Err(AudioError::InvalidParameter(_))
        ));
        assert_eq!(synthesizer.frequency(), 1000.0);
        assert!(Arc::ptr_eq(&before, &synthesizer.buffer().unwrap()));
    }

    #[test]
    fn test_set_timing() {
        let mut synthesizer = synthesizer();
        synthesizer
            .set_timing(TimingUpdate {
                dot: Some(0.2),
                dash: Some(0.4),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(synthesizer.timing().dot, 0.2);
        assert_eq!(synthesizer.timing().dash, 0.4);
        assert_eq!(synthesizer.timing().word_gap, 0.7);

        assert!(synthesizer
            .set_timing(TimingUpdate {
                dot: Some(-1.0),
                ..Default::default()
            })
            .is_err());
        assert_eq!(synthesizer.timing().dot, 0.2);
    }

    #[test]
    fn test_pathological_duration_keeps_buffer() {
        let mut synthesizer = synthesizer();
        synthesizer.generate("...").unwrap();
        let before = synthesizer.buffer().unwrap();

        synthesizer
            .set_timing(TimingUpdate {
                dash: Some(1e300),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(
            synthesizer.generate("-"),
            Err(AudioError::Synthesis(_))
        ));
        assert!(Arc::ptr_eq(&before, &synthesizer.buffer().unwrap()));
    }

    #[test]
    fn test_unused_segments_are_not_rendered() {
        let mut synthesizer = synthesizer();
        synthesizer
            .set_timing(TimingUpdate {
                dash: Some(1e300),
                word_gap: Some(1e300),
                ..Default::default()
            })
            .unwrap();

        synthesizer.generate(".").unwrap();
        assert_eq!(synthesizer.buffer().unwrap().len(), seconds_to_samples(0.2));
        assert!(matches!(
            synthesizer.generate(". ."),
            Err(AudioError::Synthesis(_))
        ));
        assert!(matches!(
            synthesizer.generate(".-"),
            Err(AudioError::Synthesis(_))
        ));
        assert_eq!(synthesizer.buffer().unwrap().len(), seconds_to_samples(0.2));
    }

    #[test]
    fn test_regenerate_leaves_shared_buffer_intact() {
        let mut synthesizer = synthesizer();
        synthesizer.generate("-").unwrap();
        let playing = synthesizer.buffer().unwrap();
        let snapshot = playing.to_vec();

        synthesizer.generate("...").unwrap();
        assert_eq!(&playing[..], &snapshot[..]);
        assert_ne!(playing.len(), synthesizer.buffer().unwrap().len());
    }
}
