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
//! The AHAP-like pattern document model.
//!
//! Documents are JSON objects of the form
//! `{ "Version": 1.0, "Metadata": {...}, "Pattern": [ { "Event": {...} }, { "ParameterCurve": {...} } ] }`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

mod default;
mod error;
pub mod extract;

pub use default::DEFAULT_PATTERN;
pub use error::PatternError;
pub use extract::{
    extract_curves, extract_events, extract_pattern, EventDurationDefaults, EventsByType,
    ExtractedCurves, ExtractedPattern,
};

/// Event type of short, tap-like events.
pub const HAPTIC_TRANSIENT: &str = "HapticTransient";
/// Event type of sustained events.
pub const HAPTIC_CONTINUOUS: &str = "HapticContinuous";
/// Event parameter holding an event's intensity.
pub const HAPTIC_INTENSITY: &str = "HapticIntensity";
/// Event parameter holding an event's sharpness.
pub const HAPTIC_SHARPNESS: &str = "HapticSharpness";
/// Parameter curve controlling intensity.
pub const INTENSITY_CONTROL: &str = "HapticIntensityControl";
/// Parameter curve controlling sharpness.
pub const SHARPNESS_CONTROL: &str = "HapticSharpnessControl";

const DEFAULT_VERSION: f64 = 1.0;

/// A single (time, value) anchor of a parameter curve.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "ParameterValue")]
    pub value: f64,
}

impl ControlPoint {
    pub fn new(time: f64, value: f64) -> ControlPoint {
        ControlPoint { time, value }
    }
}

/// A named parameter value attached to an event.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventParameter {
    #[serde(rename = "ParameterID")]
    pub parameter_id: String,
    #[serde(rename = "ParameterValue")]
    pub value: f64,
}

impl EventParameter {
    pub fn new(parameter_id: &str, value: f64) -> EventParameter {
        EventParameter {
            parameter_id: parameter_id.to_string(),
            value,
        }
    }
}

/// A discrete haptic event, active over `[time, time + duration]`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HapticEvent {
    /// Start time in seconds.
    #[serde(rename = "Time", default)]
    pub time: f64,
    #[serde(rename = "EventType")]
    pub event_type: String,
    /// Explicit duration in seconds. When absent, see [EventDurationDefaults].
    #[serde(
        rename = "EventDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_duration: Option<f64>,
    #[serde(rename = "EventParameters", default)]
    pub parameters: Vec<EventParameter>,
}

impl HapticEvent {
    /// Creates a new event with no parameters.
    pub fn new(time: f64, event_type: &str, event_duration: Option<f64>) -> HapticEvent {
        HapticEvent {
            time,
            event_type: event_type.to_string(),
            event_duration,
            parameters: Vec::new(),
        }
    }

    /// Adds a parameter to the event.
    pub fn with_parameter(mut self, parameter_id: &str, value: f64) -> HapticEvent {
        self.parameters
            .push(EventParameter::new(parameter_id, value));
        self
    }

    /// Gets the value of the first parameter with the given ID, or 0 if it is absent.
    pub fn parameter(&self, parameter_id: &str) -> f64 {
        self.parameters
            .iter()
            .find(|parameter| parameter.parameter_id == parameter_id)
            .map_or(0.0, |parameter| parameter.value)
    }

    /// Gets the event's intensity.
    pub fn intensity(&self) -> f64 {
        self.parameter(HAPTIC_INTENSITY)
    }

    /// Gets the event's sharpness.
    pub fn sharpness(&self) -> f64 {
        self.parameter(HAPTIC_SHARPNESS)
    }

    /// Returns true if this is a transient event.
    pub fn is_transient(&self) -> bool {
        self.event_type == HAPTIC_TRANSIENT
    }
}

/// A continuous parameter curve.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ParameterCurve {
    #[serde(rename = "ParameterID")]
    pub parameter_id: String,
    /// Curve start time. Control point times are used as-is and are not offset by this.
    #[serde(rename = "Time", default)]
    pub time: f64,
    #[serde(rename = "ParameterCurveControlPoints", default)]
    pub control_points: Vec<ControlPoint>,
}

impl ParameterCurve {
    pub fn new(parameter_id: &str, control_points: Vec<ControlPoint>) -> ParameterCurve {
        ParameterCurve {
            parameter_id: parameter_id.to_string(),
            time: 0.0,
            control_points,
        }
    }
}

/// One entry of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternItem {
    Event(HapticEvent),
    ParameterCurve(ParameterCurve),
}

/// The JSON shape of a pattern entry. Nothing stops a document from setting both keys (or
/// neither), so the raw form is split into [PatternItem]s after parsing.
#[derive(Deserialize, Serialize, Default)]
struct RawPatternItem {
    #[serde(rename = "Event", default, skip_serializing_if = "Option::is_none")]
    event: Option<HapticEvent>,
    #[serde(
        rename = "ParameterCurve",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    parameter_curve: Option<ParameterCurve>,
}

#[derive(Deserialize, Serialize)]
struct RawPatternDocument {
    #[serde(rename = "Version", default = "default_version")]
    version: f64,
    #[serde(rename = "Metadata", default, skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
    #[serde(rename = "Pattern", default)]
    pattern: Vec<RawPatternItem>,
}

fn default_version() -> f64 {
    DEFAULT_VERSION
}

/// A parsed pattern document.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(from = "RawPatternDocument", into = "RawPatternDocument")]
pub struct PatternDocument {
    pub version: f64,
    /// Metadata is passed through untouched.
    pub metadata: Option<serde_json::Value>,
    pub items: Vec<PatternItem>,
}

impl From<RawPatternDocument> for PatternDocument {
    fn from(raw: RawPatternDocument) -> Self {
        let mut items = Vec::with_capacity(raw.pattern.len());
        for item in raw.pattern {
            if let Some(event) = item.event {
                items.push(PatternItem::Event(event));
            }
            if let Some(curve) = item.parameter_curve {
                items.push(PatternItem::ParameterCurve(curve));
            }
        }

        PatternDocument {
            version: raw.version,
            metadata: raw.metadata,
            items,
        }
    }
}

impl From<PatternDocument> for RawPatternDocument {
    fn from(document: PatternDocument) -> Self {
        RawPatternDocument {
            version: document.version,
            metadata: document.metadata,
            pattern: document
                .items
                .into_iter()
                .map(|item| match item {
                    PatternItem::Event(event) => RawPatternItem {
                        event: Some(event),
                        ..Default::default()
                    },
                    PatternItem::ParameterCurve(curve) => RawPatternItem {
                        parameter_curve: Some(curve),
                        ..Default::default()
                    },
                })
                .collect(),
        }
    }
}

impl Default for PatternDocument {
    fn default() -> Self {
        PatternDocument {
            version: DEFAULT_VERSION,
            metadata: None,
            items: Vec::new(),
        }
    }
}

impl PatternDocument {
    /// Creates a document from the given items.
    pub fn new(items: Vec<PatternItem>) -> PatternDocument {
        PatternDocument {
            items,
            ..Default::default()
        }
    }

    /// Parses a document from JSON text.
    pub fn parse(text: &str) -> Result<PatternDocument, PatternError> {
        let document: PatternDocument = serde_json::from_str(text)?;
        debug!(
            version = document.version,
            items = document.items.len(),
            "Parsed pattern"
        );
        Ok(document)
    }

    /// Reads and parses a document from a file.
    pub fn from_file(path: &Path) -> Result<PatternDocument, PatternError> {
        let text = std::fs::read_to_string(path).map_err(|e| PatternError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        PatternDocument::parse(&text)
    }

    /// Iterates over the events of the pattern in document order.
    pub fn events(&self) -> impl Iterator<Item = &HapticEvent> {
        self.items.iter().filter_map(|item| match item {
            PatternItem::Event(event) => Some(event),
            PatternItem::ParameterCurve(_) => None,
        })
    }

    /// Iterates over the parameter curves of the pattern in document order.
    pub fn curves(&self) -> impl Iterator<Item = &ParameterCurve> {
        self.items.iter().filter_map(|item| match item {
            PatternItem::Event(_) => None,
            PatternItem::ParameterCurve(curve) => Some(curve),
        })
    }

    /// Gets a string field out of the metadata, e.g. "Project" or "Description".
    pub fn metadata_field(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_pattern() {
        let document = PatternDocument::parse(DEFAULT_PATTERN).unwrap();
        assert_eq!(document.version, 1.0);
        assert_eq!(document.items.len(), 3);
        assert_eq!(document.events().count(), 1);
        assert_eq!(document.curves().count(), 2);
        assert_eq!(document.metadata_field("Project"), Some("Swipe Card Haptic"));

        let event = document.events().next().unwrap();
        assert_eq!(event.event_type, HAPTIC_CONTINUOUS);
        assert_eq!(event.event_duration, Some(0.55));
        assert_eq!(event.intensity(), 0.47);
        assert_eq!(event.sharpness(), 0.05);

        let curves: Vec<&ParameterCurve> = document.curves().collect();
        assert_eq!(curves[0].parameter_id, INTENSITY_CONTROL);
        assert_eq!(curves[0].control_points.len(), 4);
        assert_eq!(curves[1].parameter_id, SHARPNESS_CONTROL);
        assert_eq!(curves[1].control_points[1], ControlPoint::new(0.55, -0.05));
    }

    #[test]
    fn parse_applies_defaults() {
        let document = PatternDocument::parse(
            r#"{ "Pattern": [
                { "Event": { "EventType": "HapticTransient" } },
                { "ParameterCurve": { "ParameterID": "HapticIntensityControl" } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(document.version, 1.0);
        assert!(document.metadata.is_none());

        let event = document.events().next().unwrap();
        assert_eq!(event.time, 0.0);
        assert_eq!(event.event_duration, None);
        assert!(event.parameters.is_empty());
        assert!(event.is_transient());
        assert_eq!(event.intensity(), 0.0);

        let curve = document.curves().next().unwrap();
        assert_eq!(curve.time, 0.0);
        assert!(curve.control_points.is_empty());
    }

    #[test]
    fn parse_missing_pattern_is_empty() {
        let document = PatternDocument::parse(r#"{ "Version": 2 }"#).unwrap();
        assert_eq!(document.version, 2.0);
        assert!(document.items.is_empty());
    }

    #[test]
    fn parse_item_with_both_fields() {
        let document = PatternDocument::parse(
            r#"{ "Pattern": [
                { "Event": { "Time": 0.1, "EventType": "HapticContinuous" },
                  "ParameterCurve": { "ParameterID": "HapticSharpnessControl" } },
                { "EventWaveformPath": "ignored.wav" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(document.items.len(), 2);
        assert!(matches!(document.items[0], PatternItem::Event(_)));
        assert!(matches!(document.items[1], PatternItem::ParameterCurve(_)));
    }

    #[test]
    fn parse_first_parameter_wins() {
        let document = PatternDocument::parse(
            r#"{ "Pattern": [ { "Event": { "EventType": "HapticContinuous", "EventParameters": [
                { "ParameterID": "HapticIntensity", "ParameterValue": 0.3 },
                { "ParameterID": "HapticIntensity", "ParameterValue": 0.9 }
            ] } } ] }"#,
        )
        .unwrap();

        assert_eq!(document.events().next().unwrap().intensity(), 0.3);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            PatternDocument::parse("{ not json"),
            Err(PatternError::Parse(_))
        ));
        assert!(matches!(
            PatternDocument::parse("[1, 2, 3]"),
            Err(PatternError::Parse(_))
        ));
        assert!(matches!(
            PatternDocument::parse(r#"{ "Pattern": { "Event": {} } }"#),
            Err(PatternError::Parse(_))
        ));
        assert!(matches!(
            PatternDocument::parse(r#"{ "Pattern": [ { "Event": { "Time": 0 } } ] }"#),
            Err(PatternError::Parse(_))
        ));
    }

    #[test]
    fn serialize_round_trips() {
        let document = PatternDocument::new(vec![
            PatternItem::Event(
                HapticEvent::new(0.2, HAPTIC_TRANSIENT, None).with_parameter(HAPTIC_INTENSITY, 1.0),
            ),
            PatternItem::ParameterCurve(ParameterCurve::new(
                INTENSITY_CONTROL,
                vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)],
            )),
        ]);

        let json = serde_json::to_string(&document).unwrap();
        assert!(json.contains("\"Pattern\""));
        assert!(!json.contains("EventDuration"));
        assert_eq!(PatternDocument::parse(&json).unwrap(), document);
    }

    #[test]
    fn from_file_reads_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swipe.ahap");
        std::fs::write(&path, DEFAULT_PATTERN).unwrap();

        let document = PatternDocument::from_file(&path).unwrap();
        assert_eq!(document, PatternDocument::parse(DEFAULT_PATTERN).unwrap());

        std::fs::write(&path, "{ \"Pattern\": [").unwrap();
        assert!(matches!(
            PatternDocument::from_file(&path),
            Err(PatternError::Parse(_))
        ));
    }

    #[test]
    fn from_file_reports_path() {
        let result = PatternDocument::from_file(Path::new("/nonexistent/pattern.ahap"));
        match result {
            Err(e @ PatternError::Io { .. }) => {
                assert!(e.to_string().contains("/nonexistent/pattern.ahap"))
            }
            _ => panic!("expected an IO error"),
        }
    }
}
