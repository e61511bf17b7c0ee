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

/// Errors raised while generating or playing Morse audio.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio generated")]
    NoAudio,

    #[error("already playing")]
    AlreadyPlaying,

    #[error("Invalid audio parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to generate audio: {0}")]
    Synthesis(String),

    #[error("Failed to play audio: {0}")]
    Playback(String),

    #[error("Failed to stop audio: {0}")]
    Stop(String),

    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),
}
