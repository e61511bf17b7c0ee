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
use tracing::{debug, warn};

/// Longest input accepted, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Longest Morse token accepted. The longest standard symbol has six elements.
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 7;

/// Reasons input is rejected before conversion.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input cannot be empty")]
    Empty,

    #[error("Input is {length} characters long, the maximum is {max}")]
    TooLong { length: usize, max: usize },

    #[error("Invalid characters in input: {0}")]
    InvalidCharacters(String),

    #[error("Input contains consecutive spaces")]
    ConsecutiveSpaces,

    #[error("Morse token '{token}' is longer than {max} characters")]
    TokenTooLong { token: String, max: usize },

    #[error("Morse input contains an empty token")]
    EmptyToken,
}

/// Structural pre-flight checks on text and Morse input.
#[derive(Clone, Debug)]
pub struct Validator {
    max_length: usize,
    max_token_length: usize,
}

impl Validator {
    /// Creates a validator with the standard limits.
    pub fn new() -> Validator {
        Validator {
            max_length: DEFAULT_MAX_LENGTH,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
        }
    }

    /// Validates text before it is converted to Morse.
    pub fn validate_text(&self, text: &str) -> Result<(), ValidationError> {
        debug!(text, "Validating text input.");
        self.check_length(text)?;
        check_characters(text, is_text_character).map_err(|e| self.reject(e))?;

        if text.contains("  ") {
            return Err(self.reject(ValidationError::ConsecutiveSpaces));
        }

        Ok(())
    }

    /// Validates Morse code before it is converted to text.
    pub fn validate_morse(&self, morse: &str) -> Result<(), ValidationError> {
        debug!(morse, "Validating Morse input.");
        self.check_length(morse)?;
        check_characters(morse, |c| matches!(c, '.' | '-' | ' '))
            .map_err(|e| self.reject(e))?;

        for group in morse.split("  ") {
            for token in group.split(' ') {
                if token.is_empty() {
                    return Err(self.reject(ValidationError::EmptyToken));
                }
                if token.len() > self.max_token_length {
                    return Err(self.reject(ValidationError::TokenTooLong {
                        token: token.to_string(),
                        max: self.max_token_length,
                    }));
                }
            }
        }

        Ok(())
    }

    fn check_length(&self, input: &str) -> Result<(), ValidationError> {
        if input.is_empty() {
            return Err(self.reject(ValidationError::Empty));
        }

        let length = input.chars().count();
        if length > self.max_length {
            return Err(self.reject(ValidationError::TooLong {
                length,
                max: self.max_length,
            }));
        }

        Ok(())
    }

    fn reject(&self, err: ValidationError) -> ValidationError {
        warn!(err = %err, "Input failed validation.");
        err
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new()
    }
}

fn is_text_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | ',' | '?' | '!' | '@')
}

/// Rejects the input if any character fails the predicate, reporting each offender once in
/// order of appearance.
fn check_characters<F>(input: &str, allowed: F) -> Result<(), ValidationError>
where
    F: Fn(char) -> bool,
{
    let mut invalid: Vec<char> = Vec::new();
    for c in input.chars().filter(|c| !allowed(*c)) {
        if !invalid.contains(&c) {
            invalid.push(c);
        }
    }

    if invalid.is_empty() {
        return Ok(());
    }

    Err(ValidationError::InvalidCharacters(
        invalid
            .iter()
            .map(|c| format!("'{}'", c))
            .collect::<Vec<String>>()
            .join(", "),
    ))
}
