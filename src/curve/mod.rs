//! Editable 2D curves with arc-length parameterization.
//!
//! A [`Curve`] is an ordered run of control points interpolated linearly,
//! open or closed. It serves both as a surface's base profile and as a trim
//! contour drawn on the unfold plane. Arc-length queries go through a lazily
//! built cumulative-distance table that is discarded on every edit.

use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real, TAU};
use geo::{EuclideanDistance, Line, coord};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Resolution of the cumulative arc-length table.
const ARC_SAMPLES: usize = 200;

/// Chord-summed cumulative distances at `ARC_SAMPLES + 1` evenly spaced
/// parameter values. `cumulative[i]` is the distance from `point(0)` to
/// `point(i / ARC_SAMPLES)`.
#[derive(Debug)]
struct ArcLengthTable {
    cumulative: Vec<Real>,
}

/// An editable 2D piecewise-linear path with arc-length query support.
///
/// Open curves need at least 2 control points, closed curves at least 3;
/// both limits are enforced at construction and deserialization. Every
/// mutation drops the cached arc-length table, and cloning never carries
/// the cache over.
#[derive(Debug)]
pub struct Curve {
    control_points: Vec<Point2<Real>>,
    closed: bool,
    arc_table: OnceLock<ArcLengthTable>,
}

/// Stable serialization form of a [`Curve`]: control points and the closed
/// flag, nothing derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveData {
    pub control_points: Vec<PointData>,
    pub closed: bool,
}

/// A plain `{x, y}` coordinate pair on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: Real,
    pub y: Real,
}

impl Curve {
    /// Create a curve from control points.
    ///
    /// ## Errors
    /// `TooFewControlPoints` if fewer than 2 (open) or 3 (closed) points are
    /// given.
    pub fn new(control_points: Vec<Point2<Real>>, closed: bool) -> Result<Self, GeometryError> {
        let required = Self::minimum_points(closed);
        if control_points.len() < required {
            return Err(GeometryError::TooFewControlPoints {
                required,
                actual: control_points.len(),
            });
        }
        Ok(Curve {
            control_points,
            closed,
            arc_table: OnceLock::new(),
        })
    }

    /// Closed regular polygon approximating a circle of `radius`, used as the
    /// default base profile for surfaces. `segments` is clamped to at least 3.
    ///
    /// ## Errors
    /// `NonPositiveRadius` if `radius <= 0`.
    pub fn circle(radius: Real, segments: usize) -> Result<Self, GeometryError> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let theta = TAU * (i as Real) / (segments as Real);
                Point2::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        Curve::new(points, true)
    }

    const fn minimum_points(closed: bool) -> usize {
        if closed { 3 } else { 2 }
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn control_point(&self, index: usize) -> Option<Point2<Real>> {
        self.control_points.get(index).copied()
    }

    pub fn control_points(&self) -> &[Point2<Real>] {
        &self.control_points
    }

    /// Number of linear segments: one per point pair, plus the closing
    /// segment on closed curves.
    fn segment_count(&self) -> usize {
        if self.closed {
            self.control_points.len()
        } else {
            self.control_points.len() - 1
        }
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// Closed curves wrap `t` by modulo, so `point(1)` coincides with
    /// `point(0)`. Open curves clamp: `t <= 0` yields the first control
    /// point, `t >= 1` the last.
    pub fn point(&self, t: Real) -> Point2<Real> {
        let t = if self.closed {
            t.rem_euclid(1.0)
        } else if t <= 0.0 {
            return self.control_points[0];
        } else if t >= 1.0 {
            return self.control_points[self.control_points.len() - 1];
        } else {
            t
        };

        let segments = self.segment_count();
        let scaled = t * segments as Real;
        // t < 1 keeps the index in range; the min() guards rounding at the top end
        let segment = (scaled.floor() as usize).min(segments - 1);
        let frac = scaled - segment as Real;

        let a = self.control_points[segment];
        let b = self.control_points[(segment + 1) % self.control_points.len()];
        a + (b - a) * frac
    }

    /// Produce `n + 1` ordered points at `t = i / n`. On closed curves the
    /// last point repeats the first.
    pub fn sample_points(&self, n: usize) -> Vec<Point2<Real>> {
        let n = n.max(1);
        (0..=n)
            .map(|i| self.point(i as Real / n as Real))
            .collect()
    }

    fn arc_table(&self) -> &ArcLengthTable {
        self.arc_table.get_or_init(|| {
            let mut cumulative = Vec::with_capacity(ARC_SAMPLES + 1);
            cumulative.push(0.0);
            let mut total = 0.0;
            let mut last = self.point(0.0);
            for i in 1..=ARC_SAMPLES {
                let p = self.point(i as Real / ARC_SAMPLES as Real);
                total += (p - last).norm();
                cumulative.push(total);
                last = p;
            }
            ArcLengthTable { cumulative }
        })
    }

    /// Approximate curve length, chord-summed over the cached table.
    pub fn length(&self) -> Real {
        self.arc_table().cumulative[ARC_SAMPLES]
    }

    /// Inverse arc-length lookup: the point `d` units along the curve.
    ///
    /// Binary search over the cumulative table finds the bracketing
    /// interval, and the parameter is interpolated linearly within it.
    /// `d <= 0` yields the start; `d >= length()` the end on open curves,
    /// while closed curves wrap `d` by modulo.
    pub fn point_at_distance(&self, d: Real) -> Point2<Real> {
        let table = self.arc_table();
        let total = table.cumulative[ARC_SAMPLES];
        if total <= EPSILON {
            return self.control_points[0];
        }

        let d = if self.closed { d.rem_euclid(total) } else { d };
        if d <= 0.0 {
            return self.point(0.0);
        }
        if d >= total {
            return self.point(1.0);
        }

        // First sample strictly past d; 0 < d < total keeps hi in [1, ARC_SAMPLES].
        let hi = table.cumulative.partition_point(|&c| c < d);
        let lo = hi - 1;
        let span = table.cumulative[hi] - table.cumulative[lo];
        let frac = if span > EPSILON {
            (d - table.cumulative[lo]) / span
        } else {
            0.0
        };
        self.point((lo as Real + frac) / ARC_SAMPLES as Real)
    }

    /// Move a control point. Out-of-range indices are ignored; the edit is a
    /// UI-level constraint violation, not a failure.
    pub fn set_control_point(&mut self, index: usize, position: Point2<Real>) {
        if let Some(slot) = self.control_points.get_mut(index) {
            *slot = position;
            self.arc_table = OnceLock::new();
        }
    }

    /// Append a control point at the end of the path.
    pub fn push_control_point(&mut self, position: Point2<Real>) {
        self.control_points.push(position);
        self.arc_table = OnceLock::new();
    }

    /// Insert a control point into the segment closest to `position`
    /// (closing segment included on closed curves). Returns the index the
    /// point was inserted at.
    pub fn insert_at(&mut self, position: Point2<Real>) -> usize {
        let n = self.control_points.len();
        let probe = geo::Point::new(position.x, position.y);

        let mut best = 0;
        let mut best_distance = Real::MAX;
        for i in 0..self.segment_count() {
            let a = self.control_points[i];
            let b = self.control_points[(i + 1) % n];
            let segment = Line::new(coord! {x: a.x, y: a.y}, coord! {x: b.x, y: b.y});
            let distance = segment.euclidean_distance(&probe);
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }

        self.control_points.insert(best + 1, position);
        self.arc_table = OnceLock::new();
        best + 1
    }

    /// Remove a control point. A no-op when the index is out of range or
    /// when removal would drop below the minimum count for the curve's mode.
    pub fn remove(&mut self, index: usize) {
        if index >= self.control_points.len()
            || self.control_points.len() <= Self::minimum_points(self.closed)
        {
            return;
        }
        self.control_points.remove(index);
        self.arc_table = OnceLock::new();
    }

    /// Min/max corners over the control points.
    pub fn bounding_box(&self) -> (Point2<Real>, Point2<Real>) {
        let mut min = Point2::new(Real::MAX, Real::MAX);
        let mut max = Point2::new(-Real::MAX, -Real::MAX);
        for p in &self.control_points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    pub fn to_data(&self) -> CurveData {
        CurveData {
            control_points: self
                .control_points
                .iter()
                .map(|p| PointData { x: p.x, y: p.y })
                .collect(),
            closed: self.closed,
        }
    }

    /// Rebuild a curve from its serialized form, revalidating the
    /// minimum-point contract.
    pub fn from_data(data: &CurveData) -> Result<Self, GeometryError> {
        let points = data
            .control_points
            .iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect();
        Curve::new(points, data.closed)
    }
}

impl Clone for Curve {
    /// Deep-copies the control points; the arc-length cache is derived state
    /// and never travels with the clone.
    fn clone(&self) -> Self {
        Curve {
            control_points: self.control_points.clone(),
            closed: self.closed,
            arc_table: OnceLock::new(),
        }
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed && self.control_points == other.control_points
    }
}
