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
/// Errors raised while accepting, decoding or analyzing an audio upload. Decoder messages
/// are passed through unchanged so they can be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Please upload a .wav file")]
    UnsupportedFileType { filename: String },

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Symphonia(#[from] symphonia::core::errors::Error),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Sample rate not specified")]
    UnknownSampleRate,

    #[error("Audio processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
