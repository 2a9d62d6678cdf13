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
//! Pulls curves, events and timing out of a pattern document.

use crate::curve::Curve;

use super::{HapticEvent, PatternDocument, HAPTIC_TRANSIENT, INTENSITY_CONTROL, SHARPNESS_CONTROL};

/// Default duration of a transient event without an explicit duration, in seconds.
pub const DEFAULT_TRANSIENT_DURATION: f64 = 0.01;
/// Default duration of any other event without an explicit duration, in seconds.
pub const DEFAULT_EVENT_DURATION: f64 = 0.1;
/// The shortest overall duration of a combined extraction, in seconds.
pub const MIN_VISUAL_DURATION: f64 = 0.5;

/// Durations assumed for events that don't declare one. These only exist to give events a
/// visible width and say nothing about how a device would play them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDurationDefaults {
    /// Used for `HapticTransient` events.
    pub transient: f64,
    /// Used for every other event type.
    pub other: f64,
}

impl Default for EventDurationDefaults {
    fn default() -> Self {
        EventDurationDefaults {
            transient: DEFAULT_TRANSIENT_DURATION,
            other: DEFAULT_EVENT_DURATION,
        }
    }
}

impl EventDurationDefaults {
    pub fn new(transient: f64, other: f64) -> EventDurationDefaults {
        EventDurationDefaults { transient, other }
    }

    /// Resolves the duration of the event, falling back to the defaults.
    pub fn duration_of(&self, event: &HapticEvent) -> f64 {
        match event.event_duration {
            Some(duration) => duration,
            None if event.event_type == HAPTIC_TRANSIENT => self.transient,
            None => self.other,
        }
    }

    /// Resolves the time at which the event ends.
    pub fn end_of(&self, event: &HapticEvent) -> f64 {
        event.time + self.duration_of(event)
    }

    /// Returns true if the event is active at the given time. Both ends are inclusive.
    pub fn is_active(&self, event: &HapticEvent, t: f64) -> bool {
        t >= event.time && t <= self.end_of(event)
    }
}

/// Events grouped by event type. Types keep the order they first appear in, events keep
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsByType {
    groups: Vec<(String, Vec<HapticEvent>)>,
}

impl EventsByType {
    /// Adds an event to its type's group.
    pub fn push(&mut self, event: HapticEvent) {
        match self
            .groups
            .iter_mut()
            .find(|(event_type, _)| *event_type == event.event_type)
        {
            Some((_, events)) => events.push(event),
            None => self.groups.push((event.event_type.clone(), vec![event])),
        }
    }

    /// Gets the events of the given type.
    pub fn get(&self, event_type: &str) -> Option<&[HapticEvent]> {
        self.groups
            .iter()
            .find(|(group_type, _)| group_type == event_type)
            .map(|(_, events)| events.as_slice())
    }

    /// Iterates over (event type, events) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HapticEvent])> {
        self.groups
            .iter()
            .map(|(event_type, events)| (event_type.as_str(), events.as_slice()))
    }

    /// Gets the event types in order of first appearance.
    pub fn types(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|(event_type, _)| event_type.as_str())
            .collect()
    }

    /// Number of distinct event types.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> FromIterator<&'a HapticEvent> for EventsByType {
    fn from_iter<T: IntoIterator<Item = &'a HapticEvent>>(iter: T) -> Self {
        let mut events_by_type = EventsByType::default();
        for event in iter {
            events_by_type.push(event.clone());
        }
        events_by_type
    }
}

/// The parameter curves of a pattern and the time they span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedCurves {
    /// Latest event end or control point time, 0 if there are neither.
    pub duration: f64,
    pub intensity_curve: Curve,
    pub sharpness_curve: Curve,
}

impl ExtractedCurves {
    /// Returns true if neither curve has control points.
    pub fn is_empty(&self) -> bool {
        self.intensity_curve.is_empty() && self.sharpness_curve.is_empty()
    }
}

/// Everything the visualizer needs from a pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPattern {
    pub curves: ExtractedCurves,
    pub events: EventsByType,
    /// Latest event end, 0 without events.
    pub max_event_end: f64,
    /// The overall timeline length, never shorter than the minimum visual duration.
    pub duration: f64,
}

/// Groups the events of the document by their event type.
pub fn extract_events(document: &PatternDocument) -> EventsByType {
    document.events().collect()
}

/// Extracts the intensity and sharpness curves and the duration they cover. The first curve
/// with a matching parameter ID is used; curves with other IDs are ignored.
pub fn extract_curves(
    document: &PatternDocument,
    defaults: &EventDurationDefaults,
) -> ExtractedCurves {
    let max_event_end = max_event_end(document, defaults);
    let max_curve_time = document
        .curves()
        .flat_map(|curve| curve.control_points.iter())
        .map(|point| point.time)
        .fold(0.0, f64::max);

    let find_curve = |parameter_id: &str| {
        document
            .curves()
            .find(|curve| curve.parameter_id == parameter_id)
            .map(|curve| Curve::new(&curve.control_points))
            .unwrap_or_default()
    };

    ExtractedCurves {
        duration: max_event_end.max(max_curve_time),
        intensity_curve: find_curve(INTENSITY_CONTROL),
        sharpness_curve: find_curve(SHARPNESS_CONTROL),
    }
}

/// Extracts curves and events together. The overall duration is floored at `min_duration`
/// so even a lone transient gets a usable timeline.
pub fn extract_pattern(
    document: &PatternDocument,
    defaults: &EventDurationDefaults,
    min_duration: f64,
) -> ExtractedPattern {
    let curves = extract_curves(document, defaults);
    let max_event_end = max_event_end(document, defaults);
    let duration = curves.duration.max(max_event_end).max(min_duration);

    ExtractedPattern {
        curves,
        events: extract_events(document),
        max_event_end,
        duration,
    }
}

fn max_event_end(document: &PatternDocument, defaults: &EventDurationDefaults) -> f64 {
    document
        .events()
        .map(|event| defaults.end_of(event))
        .fold(0.0, f64::max)
}
