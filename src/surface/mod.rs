//! Developable surface models and their factory.
//!
//! A [`SurfaceModel`] maps between a 2D "unfold plane" coordinate and a 3D
//! point on the curved surface. Two variants exist: [`CylindricalSurface`]
//! (unfold X is arc length along the base curve, Y is height) and
//! [`ConicalSurface`] (the unfold plane is a polar sector around the apex).
//! Variants are selected at construction time through [`SurfaceModel::create`];
//! all consumers dispatch over the tagged union rather than a trait object.

use crate::curve::{Curve, CurveData};
use crate::errors::GeometryError;
use crate::float_types::Real;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod conical;
pub mod cylindrical;

pub use conical::ConicalSurface;
pub use cylindrical::CylindricalSurface;

/// Default visual density for generated profiles and consumers' meshes.
pub const DEFAULT_RADIAL_SEGMENTS: usize = 32;
/// Default surface height.
pub const DEFAULT_HEIGHT: Real = 3.0;
/// Default base radius of a cylindrical surface.
pub const DEFAULT_CYLINDER_RADIUS: Real = 1.5;
/// Default base radius of a conical surface.
pub const DEFAULT_CONE_RADIUS: Real = 2.0;

/// Tag selecting a surface variant; the wire form is lowercase
/// (`"cylindrical"` / `"conical"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Cylindrical,
    Conical,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Cylindrical => write!(f, "cylindrical"),
            SurfaceKind::Conical => write!(f, "conical"),
        }
    }
}

impl FromStr for SurfaceKind {
    type Err = GeometryError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "cylindrical" => Ok(SurfaceKind::Cylindrical),
            "conical" => Ok(SurfaceKind::Conical),
            other => Err(GeometryError::UnsupportedSurfaceKind(other.to_string())),
        }
    }
}

/// Factory parameters for [`SurfaceModel::create`].
///
/// `base_curve_data` overrides the generated circular profile; `radius` only
/// applies when no base curve is given. Missing optional fields fall back to
/// the per-kind defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceParams {
    pub height: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_curve_data: Option<CurveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial_segments: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Real>,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        SurfaceParams {
            height: DEFAULT_HEIGHT,
            base_curve_data: None,
            radial_segments: None,
            radius: None,
        }
    }
}

/// A developable surface, polymorphic over `{map_uv_to_3d, unfold_outline}`.
#[derive(Debug, Clone)]
pub enum SurfaceModel {
    Cylindrical(CylindricalSurface),
    Conical(ConicalSurface),
}

impl SurfaceModel {
    /// Construct a surface of the given kind, validating parameters eagerly.
    ///
    /// ## Errors
    /// `NonPositiveHeight`, `NonPositiveRadius`, `ZeroPerimeter`, or
    /// `TooFewControlPoints` for a malformed supplied base curve.
    pub fn create(kind: SurfaceKind, params: &SurfaceParams) -> Result<Self, GeometryError> {
        let radial_segments = params.radial_segments.unwrap_or(DEFAULT_RADIAL_SEGMENTS);
        let base = match &params.base_curve_data {
            Some(data) => Curve::from_data(data)?,
            None => {
                let radius = params.radius.unwrap_or(match kind {
                    SurfaceKind::Cylindrical => DEFAULT_CYLINDER_RADIUS,
                    SurfaceKind::Conical => DEFAULT_CONE_RADIUS,
                });
                Curve::circle(radius, radial_segments)?
            },
        };

        match kind {
            SurfaceKind::Cylindrical => Ok(SurfaceModel::Cylindrical(CylindricalSurface::new(
                base,
                params.height,
                radial_segments,
            )?)),
            SurfaceKind::Conical => Ok(SurfaceModel::Conical(ConicalSurface::new(
                base,
                params.height,
                radial_segments,
            )?)),
        }
    }

    pub const fn kind(&self) -> SurfaceKind {
        match self {
            SurfaceModel::Cylindrical(_) => SurfaceKind::Cylindrical,
            SurfaceModel::Conical(_) => SurfaceKind::Conical,
        }
    }

    /// Map an unfold-plane coordinate to its 3D point on the surface.
    /// Coordinates outside the valid domain clamp (or wrap, along a closed
    /// base curve) to the nearest boundary.
    pub fn map_uv_to_3d(&self, u: Real, v: Real) -> Point3<Real> {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.map_uv_to_3d(u, v),
            SurfaceModel::Conical(surface) => surface.map_uv_to_3d(u, v),
        }
    }

    /// Closed polyline outlining the flattened surface in unfold-plane
    /// coordinates.
    pub fn unfold_outline(&self) -> Vec<Point2<Real>> {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.unfold_outline(),
            SurfaceModel::Conical(surface) => surface.unfold_outline(),
        }
    }

    /// Min/max corners of the unfold outline.
    pub fn unfold_bounds(&self) -> (Point2<Real>, Point2<Real>) {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.unfold_bounds(),
            SurfaceModel::Conical(surface) => surface.unfold_bounds(),
        }
    }

    pub const fn height(&self) -> Real {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.height(),
            SurfaceModel::Conical(surface) => surface.height(),
        }
    }

    pub const fn radial_segments(&self) -> usize {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.radial_segments(),
            SurfaceModel::Conical(surface) => surface.radial_segments(),
        }
    }

    pub const fn base_curve(&self) -> &Curve {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.base_curve(),
            SurfaceModel::Conical(surface) => surface.base_curve(),
        }
    }

    /// Replace the base profile, rebuilding derived tables.
    pub fn set_base_curve(&mut self, base: Curve) -> Result<(), GeometryError> {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.set_base_curve(base),
            SurfaceModel::Conical(surface) => surface.set_base_curve(base),
        }
    }

    /// Change the height, rebuilding derived tables.
    pub fn set_height(&mut self, height: Real) -> Result<(), GeometryError> {
        match self {
            SurfaceModel::Cylindrical(surface) => surface.set_height(height),
            SurfaceModel::Conical(surface) => surface.set_height(height),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        assert_eq!(
            "cylindrical".parse::<SurfaceKind>().expect("known tag"),
            SurfaceKind::Cylindrical
        );
        assert_eq!(
            "conical".parse::<SurfaceKind>().expect("known tag"),
            SurfaceKind::Conical
        );
        assert!(matches!(
            "spherical".parse::<SurfaceKind>(),
            Err(GeometryError::UnsupportedSurfaceKind(tag)) if tag == "spherical"
        ));
    }

    #[test]
    fn factory_rejects_bad_parameters() {
        let flat = SurfaceParams {
            height: 0.0,
            ..SurfaceParams::default()
        };
        assert!(matches!(
            SurfaceModel::create(SurfaceKind::Cylindrical, &flat),
            Err(GeometryError::NonPositiveHeight(_))
        ));

        let pinched = SurfaceParams {
            radius: Some(-1.0),
            ..SurfaceParams::default()
        };
        assert!(matches!(
            SurfaceModel::create(SurfaceKind::Conical, &pinched),
            Err(GeometryError::NonPositiveRadius(_))
        ));

        // A base curve collapsed onto a single point has no perimeter.
        let point = crate::curve::PointData { x: 1.0, y: 1.0 };
        let collapsed = SurfaceParams {
            base_curve_data: Some(CurveData {
                control_points: vec![point; 3],
                closed: true,
            }),
            ..SurfaceParams::default()
        };
        assert!(matches!(
            SurfaceModel::create(SurfaceKind::Cylindrical, &collapsed),
            Err(GeometryError::ZeroPerimeter)
        ));
    }

    #[test]
    fn factory_defaults_build_valid_surfaces() {
        let cylinder = SurfaceModel::create(SurfaceKind::Cylindrical, &SurfaceParams::default())
            .expect("default cylinder");
        assert_eq!(cylinder.kind(), SurfaceKind::Cylindrical);
        assert_eq!(cylinder.radial_segments(), DEFAULT_RADIAL_SEGMENTS);

        let cone = SurfaceModel::create(SurfaceKind::Conical, &SurfaceParams::default())
            .expect("default cone");
        assert_eq!(cone.kind(), SurfaceKind::Conical);
        assert!(cone.height() == DEFAULT_HEIGHT);
    }
}
