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
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::error::ConversionError;
use super::table::{is_punctuation, SymbolTable};

/// Separates symbols within a word group.
const SYMBOL_SEPARATOR: char = ' ';

/// Separates word groups.
const WORD_SEPARATOR: &str = "  ";

/// Translates between text and Morse symbol strings.
///
/// The converter does not assume its input has been through the validator and performs its
/// own character checks.
#[derive(Clone, Debug)]
pub struct Converter {
    table: Arc<SymbolTable>,
}

impl Converter {
    /// Creates a new converter backed by the given symbol table.
    pub fn new(table: Arc<SymbolTable>) -> Converter {
        Converter { table }
    }

    /// Converts text into Morse code.
    ///
    /// Words become groups of space separated symbols and groups are separated by two spaces.
    /// Punctuation always becomes its own group. Runs of spaces collapse into a single word
    /// boundary. Any character missing from the symbol table fails the whole conversion.
    pub fn text_to_morse(&self, text: &str) -> Result<String, ConversionError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        info!(text, "Converting text to Morse.");

        let mut groups: Vec<String> = Vec::new();
        let mut word: Vec<&str> = Vec::new();
        for c in text.chars().map(|c| c.to_ascii_uppercase()) {
            debug!(character = %c, "Processing character.");
            if c == ' ' {
                flush_word(&mut word, &mut groups);
                continue;
            }

            let symbol = self
                .table
                .symbol(c)
                .inspect_err(|e| error!(err = %e, "Unable to convert text."))?;
            if is_punctuation(c) {
                flush_word(&mut word, &mut groups);
                groups.push(symbol.to_string());
            } else {
                word.push(symbol);
            }
        }
        flush_word(&mut word, &mut groups);

        let morse = groups.join(WORD_SEPARATOR);
        info!(morse, "Conversion completed successfully.");
        Ok(morse)
    }

    /// Converts Morse code into upper case text.
    ///
    /// A word group that decodes to punctuation only is attached to the preceding word,
    /// mirroring how punctuation is split off during encoding. With no preceding word it
    /// stands alone.
    pub fn morse_to_text(&self, morse: &str) -> Result<String, ConversionError> {
        if morse.is_empty() {
            return Ok(String::new());
        }

        info!(morse, "Converting Morse to text.");

        let invalid: BTreeSet<char> = morse
            .chars()
            .filter(|c| !matches!(*c, '.' | '-' | SYMBOL_SEPARATOR))
            .collect();
        if !invalid.is_empty() {
            let err = ConversionError::InvalidMorseCharacters(invalid.into_iter().collect());
            error!(err = %err, "Unable to convert Morse.");
            return Err(err);
        }

        let mut words: Vec<String> = Vec::new();
        for group in morse.split(WORD_SEPARATOR) {
            let mut word = String::new();
            for token in group.split(SYMBOL_SEPARATOR).filter(|t| !t.is_empty()) {
                let c = self
                    .table
                    .character(token)
                    .inspect_err(|e| error!(err = %e, "Unable to convert Morse."))?;
                word.push(c);
            }
            if word.is_empty() {
                continue;
            }

            debug!(word, "Decoded word group.");
            match words.last_mut() {
                Some(previous) if word.chars().all(is_punctuation) => previous.push_str(&word),
                _ => words.push(word),
            }
        }

        let text = words.join(" ");
        info!(text, "Conversion completed successfully.");
        Ok(text)
    }
}

/// Moves the accumulated symbols of a word into a completed group.
fn flush_word(word: &mut Vec<&str>, groups: &mut Vec<String>) {
    if !word.is_empty() {
        groups.push(word.join(" "));
        word.clear();
    }
}
