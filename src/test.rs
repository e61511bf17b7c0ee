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
use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::audio::{get_device, AudioError, Player, Synthesizer};
use crate::config::Settings;
use crate::morse::{ConversionError, Converter, SymbolTable};
use crate::validator::{ValidationError, Validator};

fn converter() -> Converter {
    Converter::new(Arc::new(SymbolTable::new()))
}

#[test]
fn test_text_pipeline() -> Result<(), Box<dyn Error>> {
    let validator = Validator::new();
    let converter = converter();

    let text = "CQ DE W1AW, K?";
    validator.validate_text(text)?;
    let morse = converter.text_to_morse(text)?;
    validator.validate_morse(&morse)?;
    assert_eq!(converter.morse_to_text(&morse)?, text);
    Ok(())
}

#[test]
fn test_validation_stops_before_conversion() {
    let validator = Validator::new();
    let converter = converter();

    // Both layers reject the same input, each with its own error.
    assert!(matches!(
        validator.validate_text("SO#S"),
        Err(ValidationError::InvalidCharacters(_))
    ));
    assert_eq!(
        converter.text_to_morse("SO#S"),
        Err(ConversionError::UnsupportedCharacter('#'))
    );

    assert!(matches!(
        validator.validate_morse("...---..."),
        Err(ValidationError::TokenTooLong { .. })
    ));
    assert_eq!(
        converter.morse_to_text("...---..."),
        Err(ConversionError::UnknownSymbol("...---...".to_string()))
    );
}

#[test]
fn test_play_converted_text() -> Result<(), Box<dyn Error>> {
    let settings = Settings::default();
    let mut synthesizer = Synthesizer::new(
        settings.audio().frequency(),
        settings.audio().volume(),
        8000,
    )?;
    synthesizer.set_timing_profile(crate::audio::TimingProfile::from_wpm(60)?);

    let morse = converter().text_to_morse("HI!")?;
    synthesizer.generate(&morse)?;

    let device = get_device("mock-pipeline")?;
    let mock = device.to_mock()?;
    let synthesizer = Arc::new(Mutex::new(synthesizer));
    let player = Player::new(synthesizer.clone(), device);

    player.play()?;
    assert_eq!(mock.plays(), 1);
    assert!(!player.is_playing());

    // Invalid settings never reach the synthesizer.
    assert!(matches!(
        synthesizer.lock().set_frequency(-100.0),
        Err(AudioError::InvalidParameter(_))
    ));
    assert_eq!(synthesizer.lock().frequency(), 800.0);
    Ok(())
}
