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

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use super::error::AudioError;

/// Writes a mono buffer to a 16-bit PCM WAV file.
pub fn write(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    info!(
        path = path.display().to_string(),
        samples = samples.len(),
        "Wrote WAV file."
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use hound::WavReader;

    use super::*;
    use crate::audio::Synthesizer;
    use crate::testutil::calculate_rms;

    #[test]
    fn test_write_generated_buffer() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("sos.wav");

        let mut synthesizer = Synthesizer::new(600.0, 0.8, 22050)?;
        synthesizer.generate("... --- ...")?;
        let buffer = synthesizer.buffer().ok_or("no buffer")?;
        write(&path, &buffer, synthesizer.sample_rate())?;

        let mut reader = WavReader::open(&path)?;
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);

        let samples: Vec<f32> = reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
            .collect::<Result<Vec<f32>, hound::Error>>()?;
        assert_eq!(samples.len(), buffer.len());
        assert!((calculate_rms(&samples) - calculate_rms(&buffer)).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn test_write_to_missing_directory() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("missing").join("out.wav");
        assert!(matches!(
            write(&path, &[0.0, 0.5], 8000),
            Err(AudioError::Wav(_))
        ));
    }
}
