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

/// The pattern a fresh haptic view starts with: a card swipe that ramps up quickly, holds,
/// and fades out while its sharpness drifts down.
pub const DEFAULT_PATTERN: &str = r#"{
  "Version": 1.0,
  "Metadata": {
    "Project": "Swipe Card Haptic",
    "Created": "18 June 2025",
    "Description": "An effect that harmonizes the multi-sensor experience of swiping a card."
  },
  "Pattern": [
    { "Event": { "Time": 0.0, "EventType": "HapticContinuous", "EventDuration": 0.55, "EventParameters": [ { "ParameterID": "HapticIntensity", "ParameterValue": 0.47 }, { "ParameterID": "HapticSharpness", "ParameterValue": 0.05 } ] } },
    { "ParameterCurve": { "ParameterID": "HapticIntensityControl", "Time": 0.0, "ParameterCurveControlPoints": [ { "Time": 0, "ParameterValue": 0.0 }, { "Time": 0.05, "ParameterValue": 0.47 }, { "Time": 0.28, "ParameterValue": 0.47 }, { "Time": 0.55, "ParameterValue": 0.0 } ] } },
    { "ParameterCurve": { "ParameterID": "HapticSharpnessControl", "Time": 0.0, "ParameterCurveControlPoints": [ { "Time": 0, "ParameterValue": 0.05 }, { "Time": 0.55, "ParameterValue": -0.05 } ] } }
  ]
}"#;
