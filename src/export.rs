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
//! CSV rendering of sampled series and audio waveforms.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::audio::AudioSample;
use crate::sampler::{EventStreams, SampledPoint};

/// Default file name for haptic series.
pub const HAPTIC_CSV_FILENAME: &str = "haptic_curves.csv";
/// Default file name for audio waveforms.
pub const AUDIO_CSV_FILENAME: &str = "audio_waveform.csv";

const CURVE_HEADER: &str = "time,intensity,sharpness";
const EVENT_HEADER: &str = "time,intensity,sharpness,eventType";
const AUDIO_HEADER: &str = "time,amplitude";

/// Renders a haptic series as CSV. A series of event stream samples gets the `eventType`
/// column, decided by the first sample.
pub fn haptic_csv(series: &[SampledPoint]) -> String {
    let is_event_data = series
        .first()
        .is_some_and(|point| point.event_type.is_some());
    let header = if is_event_data {
        EVENT_HEADER
    } else {
        CURVE_HEADER
    };

    let mut csv = String::from(header);
    for point in series {
        push_haptic_row(&mut csv, point, is_event_data);
    }
    csv
}

/// Renders every stream as one CSV under the event header.
pub fn event_streams_csv(streams: &EventStreams) -> String {
    let mut csv = String::from(EVENT_HEADER);
    for point in streams.samples() {
        push_haptic_row(&mut csv, point, true);
    }
    csv
}

/// Renders an audio waveform as CSV.
pub fn audio_csv(waveform: &[AudioSample]) -> String {
    let mut csv = String::from(AUDIO_HEADER);
    for sample in waveform {
        // Writing to a String cannot fail.
        let _ = write!(csv, "\n{},{}", sample.time, sample.amplitude);
    }
    csv
}

fn push_haptic_row(csv: &mut String, point: &SampledPoint, with_event_type: bool) {
    let _ = write!(csv, "\n{},{},{}", point.time, point.intensity, point.sharpness);
    if with_event_type {
        let _ = write!(csv, ",{}", point.event_type.as_deref().unwrap_or_default());
    }
}

/// Writes CSV contents to the given path.
pub fn write_csv(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)?;
    info!(
        path = ?path,
        rows = contents.lines().count().saturating_sub(1),
        "Wrote CSV"
    );
    Ok(())
}
