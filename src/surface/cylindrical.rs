//! Cylindrical sheet: the unfold plane is the rectangle
//! `[0, perimeter] x [0, height]`.

use crate::curve::Curve;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Point2, Point3};

/// A generalized cylinder over an arbitrary base profile.
///
/// The base curve lies in the XZ plane (each control point's `y` is the 3D
/// `z`); the sheet extrudes vertically, centered on `y = 0`. Unfold X is arc
/// length along the base curve, unfold Y is height above the bottom rim.
#[derive(Debug, Clone)]
pub struct CylindricalSurface {
    base: Curve,
    height: Real,
    radial_segments: usize,
}

impl CylindricalSurface {
    /// ## Errors
    /// `NonPositiveHeight` or `ZeroPerimeter`.
    pub fn new(base: Curve, height: Real, radial_segments: usize) -> Result<Self, GeometryError> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        if base.length() <= EPSILON {
            return Err(GeometryError::ZeroPerimeter);
        }
        Ok(CylindricalSurface {
            base,
            height,
            radial_segments,
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

    /// Arc length of the base curve, i.e. the unfold rectangle's width.
    pub fn perimeter(&self) -> Real {
        self.base.length()
    }

    /// Unfold X is walked along the base curve by arc length (wrapping on a
    /// closed profile, clamping on an open one); unfold Y clamps to
    /// `[0, height]` and recenters on y = 0.
    pub fn map_uv_to_3d(&self, u: Real, v: Real) -> Point3<Real> {
        let p = self.base.point_at_distance(u);
        let v = v.clamp(0.0, self.height);
        Point3::new(p.x, v - self.height * 0.5, p.y)
    }

    /// The closed rectangle `[0, perimeter] x [0, height]`.
    pub fn unfold_outline(&self) -> Vec<Point2<Real>> {
        let w = self.perimeter();
        let h = self.height;
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
            Point2::new(0.0, 0.0),
        ]
    }

    pub fn unfold_bounds(&self) -> (Point2<Real>, Point2<Real>) {
        (
            Point2::new(0.0, 0.0),
            Point2::new(self.perimeter(), self.height),
        )
    }

    /// Replace the base profile.
    ///
    /// ## Errors
    /// `ZeroPerimeter` if the new profile is degenerate; the surface is left
    /// unchanged on error.
    pub fn set_base_curve(&mut self, base: Curve) -> Result<(), GeometryError> {
        if base.length() <= EPSILON {
            return Err(GeometryError::ZeroPerimeter);
        }
        self.base = base;
        Ok(())
    }

    /// ## Errors
    /// `NonPositiveHeight`; the surface is left unchanged on error.
    pub fn set_height(&mut self, height: Real) -> Result<(), GeometryError> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        self.height = height;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::float_types::TAU;

    #[test]
    fn maps_arc_length_around_a_circle() {
        let base = Curve::circle(1.0, 256).expect("circle");
        let cylinder = CylindricalSurface::new(base, 2.0, 32).expect("cylinder");

        let perimeter = cylinder.perimeter();
        // A fine polygon is close to the true circumference.
        assert!((perimeter - TAU).abs() < 1e-3);

        // u = 0 starts at (1, 0) on the base circle, bottom rim at y = -1.
        let p = cylinder.map_uv_to_3d(0.0, 0.0);
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y + 1.0).abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);

        // A quarter of the perimeter lands near (0, _, 1).
        let q = cylinder.map_uv_to_3d(perimeter / 4.0, 2.0);
        assert!(q.x.abs() < 1e-2);
        assert!((q.z - 1.0).abs() < 1e-2);
        assert!((q.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn v_clamps_to_the_height_range() {
        let base = Curve::circle(1.0, 64).expect("circle");
        let cylinder = CylindricalSurface::new(base, 3.0, 32).expect("cylinder");
        approx::assert_relative_eq!(cylinder.map_uv_to_3d(0.0, -5.0).y, -1.5);
        approx::assert_relative_eq!(cylinder.map_uv_to_3d(0.0, 50.0).y, 1.5);
    }
}
