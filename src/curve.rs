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
//! Piecewise-linear evaluation of parameter curves.

use crate::pattern::ControlPoint;

/// A parameter curve ready for evaluation. Control points are kept sorted by time; points
/// sharing a time keep the order they were given in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    points: Vec<ControlPoint>,
}

impl Curve {
    /// Creates a curve from control points in any order.
    pub fn new(points: &[ControlPoint]) -> Curve {
        let mut points = points.to_vec();
        // Stable, so equal times keep caller order.
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        Curve { points }
    }

    /// Returns the sorted control points.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Returns true if the curve has no control points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the time of the last control point, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.points.last().map(|point| point.time)
    }

    /// Evaluates the curve at the given time.
    ///
    /// An empty curve is 0 everywhere. Outside the control point range the nearest end value
    /// is held. Between points the value is linearly interpolated, and a pair of points
    /// sharing a time yields the earlier point's value.
    pub fn evaluate(&self, t: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        for pair in self.points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t >= a.time && t <= b.time {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return a.value;
                }
                return a.value + (b.value - a.value) * (t - a.time) / span;
            }
        }

        // Only reachable when t is NaN.
        0.0
    }
}

impl From<&[ControlPoint]> for Curve {
    fn from(points: &[ControlPoint]) -> Self {
        Curve::new(points)
    }
}

/// Evaluates an unsorted set of control points at a single time.
pub fn evaluate(points: &[ControlPoint], t: f64) -> f64 {
    Curve::new(points).evaluate(t)
}
