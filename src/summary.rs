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
//! Summary statistics of a sampled series.

use std::fmt;

use crate::sampler::SampledPoint;

/// Intensities at or below this are treated as zero, and intensities this close to the peak
/// count as being at the peak.
pub const INTENSITY_EPSILON: f64 = 1e-6;

/// Summary metrics of a sampled series. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Time of the last sample.
    pub duration: f64,
    pub peak_intensity: f64,
    /// From the first non-zero sample to the start of the peak plateau.
    pub ramp_up: f64,
    /// Length of the first run of samples at peak intensity.
    pub plateau: f64,
    /// From the end of the peak plateau to the end of the series.
    pub ramp_down: f64,
    /// Trapezoidal integral of intensity over time.
    pub area: f64,
    pub sharpness_start: f64,
    pub sharpness_end: f64,
    pub sharpness_delta: f64,
}

/// Summarizes a series. Returns None for an empty series.
pub fn summarize(series: &[SampledPoint]) -> Option<Summary> {
    let first = series.first()?;
    let last = series.last()?;
    let duration = last.time;

    let peak_intensity = series
        .iter()
        .map(|point| point.intensity)
        .fold(f64::NEG_INFINITY, f64::max);

    let first_non_zero = series
        .iter()
        .find(|point| point.intensity > INTENSITY_EPSILON)
        .map_or(0.0, |point| point.time);

    let at_peak = |point: &SampledPoint| (point.intensity - peak_intensity).abs() < INTENSITY_EPSILON;

    // With a NaN peak nothing compares as being at the peak and the timing metrics are 0.
    let (ramp_up, plateau, ramp_down) = match series.iter().position(at_peak) {
        Some(peak_start) => {
            let peak_end = peak_start
                + series[peak_start..]
                    .iter()
                    .take_while(|point| at_peak(*point))
                    .count()
                - 1;
            let peak_start_time = series[peak_start].time;
            let peak_end_time = series[peak_end].time;
            (
                peak_start_time - first_non_zero,
                peak_end_time - peak_start_time,
                duration - peak_end_time,
            )
        }
        None => (0.0, 0.0, 0.0),
    };

    let area: f64 = series
        .windows(2)
        .map(|pair| (pair[0].intensity + pair[1].intensity) / 2.0 * (pair[1].time - pair[0].time))
        .sum();

    Some(Summary {
        duration,
        peak_intensity,
        ramp_up,
        plateau,
        ramp_down,
        area,
        sharpness_start: first.sharpness,
        sharpness_end: last.sharpness,
        sharpness_delta: last.sharpness - first.sharpness,
    })
}

impl Summary {
    /// The user-facing metrics as (label, formatted value) pairs, rounded to 3 decimals.
    pub fn metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Duration", format!("{:.3} s", self.duration)),
            ("Peak Intensity", format!("{:.3}", self.peak_intensity)),
            ("Ramp Up", format!("{:.3} s", self.ramp_up)),
            ("Plateau", format!("{:.3} s", self.plateau)),
            ("Ramp Down", format!("{:.3} s", self.ramp_down)),
            ("Intensity Area", format!("{:.3}", self.area)),
            ("Sharpness Δ", format!("{:.3}", self.sharpness_delta)),
        ]
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.metrics() {
            writeln!(f, "{:<16}{}", label, value)?;
        }
        Ok(())
    }
}
