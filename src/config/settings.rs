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
use std::time::Duration;

use config::{Config, File};
use duration_string::DurationString;
use serde::Deserialize;

use crate::audio::DEFAULT_MAX_POINTS;
use crate::export::{AUDIO_CSV_FILENAME, HAPTIC_CSV_FILENAME};
use crate::pattern::extract::{
    DEFAULT_EVENT_DURATION, DEFAULT_TRANSIENT_DURATION, MIN_VISUAL_DURATION,
};
use crate::pattern::EventDurationDefaults;
use crate::sampler::DEFAULT_SAMPLE_COUNT;

use super::error::ConfigError;

/// A YAML representation of the analysis settings. Every field is optional.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    /// Number of grid intervals used when sampling (default: 600).
    sample_count: Option<usize>,

    /// Duration assumed for transient events without one, e.g. "10ms".
    transient_event_duration: Option<String>,

    /// Duration assumed for other events without one, e.g. "100ms".
    default_event_duration: Option<String>,

    /// Shortest timeline used for event streams, e.g. "500ms".
    min_visual_duration: Option<String>,

    /// Maximum number of retained waveform points (default: 2000).
    max_audio_points: Option<usize>,

    /// File name for haptic CSV exports (default: haptic_curves.csv).
    haptic_csv_filename: Option<String>,

    /// File name for audio CSV exports (default: audio_waveform.csv).
    audio_csv_filename: Option<String>,
}

impl Settings {
    /// Parses settings from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Settings, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// Returns the sample count (default: 600). Never less than 1.
    pub fn sample_count(&self) -> usize {
        self.sample_count.unwrap_or(DEFAULT_SAMPLE_COUNT).max(1)
    }

    /// Returns the durations assumed for events that don't declare one.
    pub fn event_duration_defaults(&self) -> Result<EventDurationDefaults, ConfigError> {
        Ok(EventDurationDefaults::new(
            seconds(
                "transient_event_duration",
                &self.transient_event_duration,
                DEFAULT_TRANSIENT_DURATION,
            )?,
            seconds(
                "default_event_duration",
                &self.default_event_duration,
                DEFAULT_EVENT_DURATION,
            )?,
        ))
    }

    /// Returns the shortest event stream timeline in seconds (default: 0.5).
    pub fn min_visual_duration(&self) -> Result<f64, ConfigError> {
        seconds(
            "min_visual_duration",
            &self.min_visual_duration,
            MIN_VISUAL_DURATION,
        )
    }

    /// Returns the maximum number of retained waveform points (default: 2000).
    pub fn max_audio_points(&self) -> usize {
        self.max_audio_points.unwrap_or(DEFAULT_MAX_POINTS).max(1)
    }

    /// Returns the file name for haptic CSV exports.
    pub fn haptic_csv_filename(&self) -> &str {
        self.haptic_csv_filename
            .as_deref()
            .unwrap_or(HAPTIC_CSV_FILENAME)
    }

    /// Returns the file name for audio CSV exports.
    pub fn audio_csv_filename(&self) -> &str {
        self.audio_csv_filename
            .as_deref()
            .unwrap_or(AUDIO_CSV_FILENAME)
    }
}

fn seconds(
    field: &'static str,
    value: &Option<String>,
    default: f64,
) -> Result<f64, ConfigError> {
    match value {
        Some(value) => {
            let duration: Duration = DurationString::from_string(value.clone())
                .map_err(|e| ConfigError::Duration {
                    field,
                    message: e.to_string(),
                })?
                .into();
            Ok(duration.as_secs_f64())
        }
        None => Ok(default),
    }
}
