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
//! Uniform time-grid sampling of curves and event streams.

use tracing::debug;

use crate::curve::Curve;
use crate::pattern::{EventDurationDefaults, EventsByType, HapticEvent};
use crate::summary::{summarize, Summary};
use crate::util::round_time;


/// Default number of grid intervals. Series hold one more point than this.
pub const DEFAULT_SAMPLE_COUNT: usize = 600;

/// Label used for an event stream with no events to take a type from.
const UNKNOWN_EVENT_TYPE: &str = "Unknown";

/// One point of a sampled series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPoint {
    /// Seconds, rounded to 4 decimal places.
    pub time: f64,
    pub intensity: f64,
    pub sharpness: f64,
    /// Set for event stream samples, unset for curve samples.
    pub event_type: Option<String>,
}

impl SampledPoint {
    /// Creates a curve sample.
    pub fn new(time: f64, intensity: f64, sharpness: f64) -> SampledPoint {
        SampledPoint {
            time,
            intensity,
            sharpness,
            event_type: None,
        }
    }

    /// Creates an event stream sample.
    pub fn for_event(time: f64, intensity: f64, sharpness: f64, event_type: &str) -> SampledPoint {
        SampledPoint {
            time,
            intensity,
            sharpness,
            event_type: Some(event_type.to_string()),
        }
    }
}

/// The grid times `k / sample_count * duration` for `k` in `0..=sample_count`, unrounded.
fn grid(duration: f64, sample_count: usize) -> impl Iterator<Item = f64> {
    let sample_count = sample_count.max(1);
    (0..=sample_count).map(move |k| k as f64 / sample_count as f64 * duration)
}

/// Samples the intensity and sharpness curves at `sample_count + 1` evenly spaced times
/// covering `[0, duration]`.
pub fn build_samples(
    intensity: &Curve,
    sharpness: &Curve,
    duration: f64,
    sample_count: usize,
) -> Vec<SampledPoint> {
    grid(duration, sample_count)
        .map(|t| SampledPoint::new(round_time(t), intensity.evaluate(t), sharpness.evaluate(t)))
        .collect()
}

/// Samples a list of events of one type on the same grid as [build_samples].
///
/// At each time the first event in list order whose interval contains the time supplies its
/// intensity and sharpness unchanged. Times outside every event sample as zero.
pub fn build_event_samples(
    events: &[HapticEvent],
    duration: f64,
    sample_count: usize,
    defaults: &EventDurationDefaults,
) -> Vec<SampledPoint> {
    let event_type = events
        .first()
        .map_or(UNKNOWN_EVENT_TYPE, |event| event.event_type.as_str());

    grid(duration, sample_count)
        .map(|t| {
            let (intensity, sharpness) = events
                .iter()
                .find(|event| defaults.is_active(event, t))
                .map_or((0.0, 0.0), |event| (event.intensity(), event.sharpness()));
            SampledPoint::for_event(round_time(t), intensity, sharpness, event_type)
        })
        .collect()
}

/// A sampled event stream for one event type.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStream {
    pub event_type: String,
    pub samples: Vec<SampledPoint>,
    pub summary: Option<Summary>,
}

/// Every event type's stream, sampled on one shared timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStreams {
    /// The shared x-domain is `[0, duration]`.
    pub duration: f64,
    pub streams: Vec<EventStream>,
}

impl EventStreams {
    /// Gets the stream for the given event type.
    pub fn get(&self, event_type: &str) -> Option<&EventStream> {
        self.streams
            .iter()
            .find(|stream| stream.event_type == event_type)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// All stream samples, stream after stream.
    pub fn samples(&self) -> impl Iterator<Item = &SampledPoint> {
        self.streams.iter().flat_map(|stream| stream.samples.iter())
    }
}

/// Samples and summarizes each event type's stream over `[0, duration]`.
pub fn build_event_streams(
    events: &EventsByType,
    duration: f64,
    sample_count: usize,
    defaults: &EventDurationDefaults,
) -> EventStreams {
    let streams = events
        .iter()
        .map(|(event_type, events)| {
            let samples = build_event_samples(events, duration, sample_count, defaults);
            let summary = summarize(&samples);
            debug!(
                event_type,
                events = events.len(),
                samples = samples.len(),
                "Sampled event stream"
            );
            EventStream {
                event_type: event_type.to_string(),
                samples,
                summary,
            }
        })
        .collect();

    EventStreams { duration, streams }
}
