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

/// Number of decimal places sample times are rounded to.
pub const TIME_DECIMALS: i32 = 4;

/// Rounds the value to the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds a sample time to [TIME_DECIMALS] places.
pub fn round_time(time: f64) -> f64 {
    round_to(time, TIME_DECIMALS)
}

/// Extracts a displayable file name from a path, returning a fallback if the name is unreadable.
pub fn filename_display(path: &Path) -> &str {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("unreadable file name")
}

/// Returns true if the file name ends in `.wav`, ignoring case.
pub fn has_wav_extension(filename: &str) -> bool {
    wav_stem(filename).is_some()
}

/// Returns the file name without its `.wav` suffix, if it has one.
fn wav_stem(filename: &str) -> Option<&str> {
    let split = filename.len().checked_sub(".wav".len())?;
    let suffix = filename.get(split..)?;
    if suffix.eq_ignore_ascii_case(".wav") {
        filename.get(..split)
    } else {
        None
    }
}

/// Derives the waveform CSV name for an uploaded audio file, e.g. `kick.wav` becomes
/// `kick_waveform.csv`. Falls back to the given default when there is no usable stem.
pub fn waveform_csv_filename(upload_name: &str, default: &str) -> String {
    let stem = wav_stem(upload_name).unwrap_or(upload_name);

    if stem.is_empty() {
        default.to_string()
    } else {
        format!("{}_waveform.csv", stem)
    }
}
