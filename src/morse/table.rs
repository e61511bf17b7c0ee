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
use std::collections::HashMap;

use super::error::ConversionError;

/// Characters that form their own word group when encoded.
pub const PUNCTUATION: [char; 5] = ['.', '!', '?', '@', ','];

/// The symbol used for space. It is a word boundary and is never decoded.
const WORD_SEPARATOR: &str = "/";

const ENTRIES: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('!', "-.-.--"),
    ('@', ".--.-."),
    (' ', WORD_SEPARATOR),
];

/// Returns true if the character is encoded as a standalone word group.
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// The bidirectional mapping between characters and Morse symbols.
///
/// Built once at startup and shared by reference. Letters are stored in upper case and
/// looked up case-insensitively.
#[derive(Debug)]
pub struct SymbolTable {
    forward: HashMap<char, &'static str>,
    inverse: HashMap<&'static str, char>,
}

impl SymbolTable {
    /// Creates the standard symbol table.
    pub fn new() -> SymbolTable {
        let forward: HashMap<char, &'static str> = ENTRIES.iter().copied().collect();
        let inverse: HashMap<&'static str, char> = ENTRIES
            .iter()
            .filter(|(c, _)| *c != ' ')
            .map(|(c, symbol)| (*symbol, *c))
            .collect();

        SymbolTable { forward, inverse }
    }

    /// Gets the Morse symbol for the given character.
    pub fn symbol(&self, c: char) -> Result<&'static str, ConversionError> {
        self.forward
            .get(&c.to_ascii_uppercase())
            .copied()
            .ok_or(ConversionError::UnsupportedCharacter(c))
    }

    /// Gets the character for the given Morse symbol.
    pub fn character(&self, symbol: &str) -> Result<char, ConversionError> {
        self.inverse
            .get(symbol)
            .copied()
            .ok_or_else(|| ConversionError::UnknownSymbol(symbol.to_string()))
    }

    /// Iterates over every (character, symbol) entry in the table.
    pub fn entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.forward.iter().map(|(c, symbol)| (*c, *symbol))
    }

    /// The number of characters in the table.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
