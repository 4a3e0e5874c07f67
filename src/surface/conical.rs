//! Conical sheet: the unfold plane is a polar sector around the apex.

use crate::curve::Curve;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real, TAU};
use nalgebra::{Point2, Point3};
use std::sync::OnceLock;

/// Resolution of the cumulative angle/slant table.
const ANGLE_SAMPLES: usize = 200;

/// One row of the cone's unfold table: the flattened sector angle
/// accumulated up to this base sample, its slant height, and the sample
/// itself.
#[derive(Debug, Clone, Copy)]
struct UnfoldEntry {
    angle: Real,
    slant: Real,
    base_point: Point2<Real>,
}

#[derive(Debug)]
struct UnfoldTable {
    entries: Vec<UnfoldEntry>,
    max_angle: Real,
}

/// A generalized cone over an arbitrary base profile.
///
/// The base curve lies in the plane `y = -height/2` (each control point's
/// `y` is the 3D `z`); the apex is the single point `(0, height/2, 0)`.
///
/// Unfolding a cone with a non-circular base cannot spread the sector angle
/// proportionally to base arc length: for each pair of adjacent base
/// samples the angular step is recovered from the triangle they span with
/// the apex, via the law of cosines over the two slant heights and the
/// chord. Accumulating those steps yields the angle/slant table, which is
/// the inverse map from unfold-plane polar angle back to a base point. The
/// table is rebuilt lazily whenever the base curve or the height changes.
#[derive(Debug)]
pub struct ConicalSurface {
    base: Curve,
    height: Real,
    radial_segments: usize,
    table: OnceLock<UnfoldTable>,
}

impl ConicalSurface {
    /// ## Errors
    /// `NonPositiveHeight` or `ZeroPerimeter`.
    pub fn new(base: Curve, height: Real, radial_segments: usize) -> Result<Self, GeometryError> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        if base.length() <= EPSILON {
            return Err(GeometryError::ZeroPerimeter);
        }
        Ok(ConicalSurface {
            base,
            height,
            radial_segments,
            table: OnceLock::new(),
        })
    }

    pub const fn height(&self) -> Real {
        self.height
    }

    pub const fn radial_segments(&self) -> usize {
        self.radial_segments
    }

    pub const fn base_curve(&self) -> &Curve {
        &self.base
    }

    /// The apex in 3D.
    pub fn apex(&self) -> Point3<Real> {
        Point3::new(0.0, self.height * 0.5, 0.0)
    }

    /// Total angle of the flattened sector.
    pub fn sector_angle(&self) -> Real {
        self.table().max_angle
    }

    fn slant_of(&self, base_point: Point2<Real>) -> Real {
        (self.height * self.height + base_point.coords.norm_squared()).sqrt()
    }

    fn table(&self) -> &UnfoldTable {
        self.table.get_or_init(|| {
            let mut entries = Vec::with_capacity(ANGLE_SAMPLES + 1);
            let mut prev = self.base.point(0.0);
            let mut prev_slant = self.slant_of(prev);
            let mut angle = 0.0;
            entries.push(UnfoldEntry {
                angle,
                slant: prev_slant,
                base_point: prev,
            });

            for i in 1..=ANGLE_SAMPLES {
                let p = self.base.point(i as Real / ANGLE_SAMPLES as Real);
                let slant = self.slant_of(p);
                let chord = (p - prev).norm();
                // Law of cosines in the apex triangle over two adjacent base
                // samples; slant >= height > 0 keeps the division safe.
                let cos = (prev_slant * prev_slant + slant * slant - chord * chord)
                    / (2.0 * prev_slant * slant);
                angle += cos.clamp(-1.0, 1.0).acos();
                entries.push(UnfoldEntry {
                    angle,
                    slant,
                    base_point: p,
                });
                prev = p;
                prev_slant = slant;
            }

            UnfoldTable {
                max_angle: angle,
                entries,
            }
        })
    }

    /// Map an unfold-plane coordinate (Cartesian, apex at the origin) to 3D.
    ///
    /// The coordinate is read as polar `(distance, angle)`; the angle is
    /// normalized into `[0, max_angle]`, clamping out-of-sector angles to
    /// the circularly nearest sector edge (the sector does not wrap). The
    /// bracketing table rows are interpolated and the result blends apex to
    /// base point by `distance / slant`, clamped onto the sheet.
    pub fn map_uv_to_3d(&self, u: Real, v: Real) -> Point3<Real> {
        let table = self.table();
        let entries = &table.entries;

        let dist = (u * u + v * v).sqrt();
        let mut angle = v.atan2(u);
        if angle < 0.0 {
            angle += TAU;
        }
        if angle > table.max_angle {
            let overshoot = angle - table.max_angle;
            let wrap = TAU - angle;
            angle = if overshoot <= wrap { table.max_angle } else { 0.0 };
        }

        let hi = entries
            .partition_point(|e| e.angle < angle)
            .clamp(1, entries.len() - 1);
        let lo = hi - 1;
        let span = entries[hi].angle - entries[lo].angle;
        let frac = if span > EPSILON {
            ((angle - entries[lo].angle) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let base_point =
            entries[lo].base_point + (entries[hi].base_point - entries[lo].base_point) * frac;
        let slant = entries[lo].slant + (entries[hi].slant - entries[lo].slant) * frac;
        let ratio = if slant > EPSILON {
            (dist / slant).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let apex = self.apex();
        let rim = Point3::new(base_point.x, -self.height * 0.5, base_point.y);
        apex + (rim - apex) * ratio
    }

    /// The flattened sector: apex, every table row's Cartesian projection,
    /// and back to the apex.
    pub fn unfold_outline(&self) -> Vec<Point2<Real>> {
        let table = self.table();
        let mut outline = Vec::with_capacity(table.entries.len() + 2);
        outline.push(Point2::origin());
        for e in &table.entries {
            outline.push(Point2::new(
                e.slant * e.angle.cos(),
                e.slant * e.angle.sin(),
            ));
        }
        outline.push(Point2::origin());
        outline
    }

    pub fn unfold_bounds(&self) -> (Point2<Real>, Point2<Real>) {
        let mut min = Point2::new(Real::MAX, Real::MAX);
        let mut max = Point2::new(-Real::MAX, -Real::MAX);
        for p in self.unfold_outline() {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Replace the base profile, discarding the unfold table.
    ///
    /// ## Errors
    /// `ZeroPerimeter`; the surface is left unchanged on error.
    pub fn set_base_curve(&mut self, base: Curve) -> Result<(), GeometryError> {
        if base.length() <= EPSILON {
            return Err(GeometryError::ZeroPerimeter);
        }
        self.base = base;
        self.table = OnceLock::new();
        Ok(())
    }

    /// ## Errors
    /// `NonPositiveHeight`; the surface is left unchanged on error.
    pub fn set_height(&mut self, height: Real) -> Result<(), GeometryError> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        self.height = height;
        self.table = OnceLock::new();
        Ok(())
    }
}

impl Clone for ConicalSurface {
    /// The unfold table is derived state and is not carried by clones.
    fn clone(&self) -> Self {
        ConicalSurface {
            base: self.base.clone(),
            height: self.height,
            radial_segments: self.radial_segments,
            table: OnceLock::new(),
        }
    }
}
