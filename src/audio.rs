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
//! Audio upload handling: the decode port, waveform downsampling and amplitude statistics.

use std::sync::Arc;

use tracing::{info, warn};

use crate::util::has_wav_extension;

mod error;
pub mod mock;
pub mod symphonia;

pub use self::error::AudioError;
pub use self::symphonia::SymphoniaDecoder;

/// Default upper bound on the number of retained waveform points.
pub const DEFAULT_MAX_POINTS: usize = 2000;

/// The output of a decode: the first channel of the audio as f32 samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub channel_samples: Vec<f32>,
    pub sample_rate: u32,
    /// Seconds.
    pub duration: f64,
}

impl DecodedAudio {
    pub fn new(channel_samples: Vec<f32>, sample_rate: u32) -> DecodedAudio {
        let duration = if sample_rate == 0 {
            0.0
        } else {
            channel_samples.len() as f64 / sample_rate as f64
        };
        DecodedAudio {
            channel_samples,
            sample_rate,
            duration,
        }
    }
}

/// Turns raw file bytes into samples.
pub trait AudioDecoder: Send + Sync {
    /// Decodes the bytes of an audio file.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, AudioError>;
}

/// A retained waveform point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSample {
    /// Seconds from the start of the audio.
    pub time: f64,
    pub amplitude: f32,
}

/// Amplitude statistics of a decoded file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSummary {
    pub duration: f64,
    pub sample_rate: u32,
    /// Largest absolute sample value.
    pub peak_amplitude: f32,
    pub rms_amplitude: f32,
    /// Sample count before downsampling.
    pub total_samples: usize,
}

impl AudioSummary {
    /// The user-facing metrics as (label, formatted value) pairs.
    pub fn metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Duration", format!("{:.3} s", self.duration)),
            ("Sample Rate", format!("{} Hz", self.sample_rate)),
            ("Peak Amplitude", format!("{:.3}", self.peak_amplitude)),
            ("RMS Amplitude", format!("{:.3}", self.rms_amplitude)),
            ("Total Samples", self.total_samples.to_string()),
        ]
    }
}

/// A downsampled waveform and the statistics of the full signal.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAnalysis {
    pub waveform: Vec<AudioSample>,
    pub summary: AudioSummary,
}

/// Rejects uploads that aren't `.wav` files.
pub fn validate_upload(filename: &str) -> Result<(), AudioError> {
    if has_wav_extension(filename) {
        Ok(())
    } else {
        warn!(filename, "Rejected audio upload");
        Err(AudioError::UnsupportedFileType {
            filename: filename.to_string(),
        })
    }
}

/// Downsamples the decoded audio to at most `max_points` points and computes its amplitude
/// statistics. Peak and RMS cover every sample, not only the retained ones.
pub fn summarize_audio(decoded: &DecodedAudio, max_points: usize) -> AudioAnalysis {
    let samples = &decoded.channel_samples;
    let step = samples.len().div_ceil(max_points.max(1)).max(1);

    let waveform = samples
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(index, amplitude)| AudioSample {
            time: if decoded.sample_rate == 0 {
                0.0
            } else {
                index as f64 / decoded.sample_rate as f64
            },
            amplitude: *amplitude,
        })
        .collect();

    let (sum_squares, peak_amplitude) =
        samples
            .iter()
            .fold((0.0f64, 0.0f32), |(sum_squares, peak), sample| {
                (
                    sum_squares + f64::from(*sample) * f64::from(*sample),
                    peak.max(sample.abs()),
                )
            });

    let rms_amplitude = if samples.is_empty() {
        0.0
    } else {
        (sum_squares / samples.len() as f64).sqrt() as f32
    };

    AudioAnalysis {
        waveform,
        summary: AudioSummary {
            duration: decoded.duration,
            sample_rate: decoded.sample_rate,
            peak_amplitude,
            rms_amplitude,
            total_samples: samples.len(),
        },
    }
}

/// Validates, decodes and analyzes an uploaded file. The file type is checked before any
/// decoding starts; decoding runs on the blocking pool.
pub async fn process_upload(
    decoder: Arc<dyn AudioDecoder>,
    filename: &str,
    bytes: Vec<u8>,
    max_points: usize,
) -> Result<AudioAnalysis, AudioError> {
    validate_upload(filename)?;

    info!(filename, bytes = bytes.len(), "Decoding audio upload");
    let analysis = tokio::task::spawn_blocking(move || {
        decoder
            .decode(&bytes)
            .map(|decoded| summarize_audio(&decoded, max_points))
    })
    .await??;

    info!(
        filename,
        sample_rate = analysis.summary.sample_rate,
        total_samples = analysis.summary.total_samples,
        points = analysis.waveform.len(),
        "Audio upload analyzed"
    );
    Ok(analysis)
}
