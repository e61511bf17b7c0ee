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

/// Errors raised while translating between text and Morse symbols.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Character '{0}' is not supported in Morse code")]
    UnsupportedCharacter(char),

    #[error("Unknown Morse symbol: {0}")]
    UnknownSymbol(String),

    /// Every offending character, sorted and de-duplicated.
    #[error("Invalid characters in Morse code: {0}")]
    InvalidMorseCharacters(String),
}
