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
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use super::{AudioDecoder, AudioError, DecodedAudio};

/// A mock decoder. Doesn't look at the bytes it is given; it hands back a canned result and
/// counts how often it was asked.
pub struct MockDecoder {
    result: Result<DecodedAudio, String>,
    calls: AtomicUsize,
}

impl MockDecoder {
    /// A decoder that always succeeds with the given audio.
    pub fn returning(decoded: DecodedAudio) -> MockDecoder {
        MockDecoder {
            result: Ok(decoded),
            calls: AtomicUsize::new(0),
        }
    }

    /// A decoder that always fails with the given message.
    pub fn failing(message: &str) -> MockDecoder {
        MockDecoder {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of decode calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl AudioDecoder for MockDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        info!(bytes = bytes.len(), "Decoding (mock)");
        self.result.clone().map_err(AudioError::Decode)
    }
}
