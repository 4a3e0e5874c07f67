//! Surface strips: a developable surface plus the closed contour that trims
//! it, with whole-strip serialization.
//!
//! A strip is the outward-facing aggregate the editor works with. The trim
//! contour lives in unfold-plane coordinates and has no 3D meaning on its
//! own; combined with the surface it defines the curved sheet cut-out. Until
//! the user draws a custom contour, a rectangle inset from the unfold
//! bounding box guarantees a valid, non-degenerate starting mesh.

use crate::curve::{Curve, CurveData};
use crate::errors::GeometryError;
use crate::float_types::Real;
use crate::surface::{SurfaceKind, SurfaceModel, SurfaceParams};
use crate::trim::{StripTrimmer, TrimmedMesh};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Inset of the default contour from the unfold bounding box.
const DEFAULT_CONTOUR_MARGIN: Real = 0.1;
/// Inner margin applied when clamping editor points into the unfold bounds.
const CONSTRAIN_MARGIN: Real = 0.05;

/// Stable serialization form of a whole strip, tagged
/// `{"type": "strip", ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "strip", rename_all = "camelCase")]
pub struct StripData {
    pub surface_type: SurfaceKind,
    pub surface_params: SurfaceParams,
    pub strip_contour_data: CurveData,
}

/// A developable surface together with its owned trim contour.
///
/// Every geometry edit bumps a monotonically increasing revision. A consumer
/// re-trimming on live edits should stamp each [`TrimmedMesh`] with the
/// revision it was computed at and drop results older than the newest
/// stamp: a newer trim always supersedes an in-flight one.
#[derive(Debug, Clone)]
pub struct SurfaceStrip {
    surface: SurfaceModel,
    contour: Curve,
    revision: u64,
}

impl SurfaceStrip {
    /// Build a strip, validating the surface parameters eagerly. A missing
    /// contour falls back to the default inset rectangle.
    ///
    /// ## Errors
    /// Any surface construction error, plus `OpenContour` or
    /// `TooFewControlPoints` for a malformed supplied contour.
    pub fn new(
        kind: SurfaceKind,
        params: &SurfaceParams,
        contour: Option<&CurveData>,
    ) -> Result<Self, GeometryError> {
        let surface = SurfaceModel::create(kind, params)?;
        let contour = match contour {
            Some(data) => {
                let curve = Curve::from_data(data)?;
                if !curve.is_closed() {
                    return Err(GeometryError::OpenContour);
                }
                curve
            },
            None => Self::default_contour(&surface)?,
        };
        Ok(SurfaceStrip {
            surface,
            contour,
            revision: 0,
        })
    }

    /// Rectangle inset by a fixed margin from the unfold bounding box. The
    /// margin backs off on boxes too small to absorb it.
    fn default_contour(surface: &SurfaceModel) -> Result<Curve, GeometryError> {
        let (min, max) = surface.unfold_bounds();
        let margin_x = DEFAULT_CONTOUR_MARGIN.min((max.x - min.x) * 0.25);
        let margin_y = DEFAULT_CONTOUR_MARGIN.min((max.y - min.y) * 0.25);
        Curve::new(
            vec![
                Point2::new(min.x + margin_x, min.y + margin_y),
                Point2::new(max.x - margin_x, min.y + margin_y),
                Point2::new(max.x - margin_x, max.y - margin_y),
                Point2::new(min.x + margin_x, max.y - margin_y),
            ],
            true,
        )
    }

    pub const fn surface(&self) -> &SurfaceModel {
        &self.surface
    }

    pub const fn contour(&self) -> &Curve {
        &self.contour
    }

    /// Monotonically increasing edit counter; see the type-level docs.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the trim contour.
    ///
    /// ## Errors
    /// `OpenContour`; the strip is left unchanged on error.
    pub fn set_contour(&mut self, contour: Curve) -> Result<(), GeometryError> {
        if !contour.is_closed() {
            return Err(GeometryError::OpenContour);
        }
        self.contour = contour;
        self.revision += 1;
        Ok(())
    }

    /// Replace the trim contour from its serialized form.
    pub fn set_contour_data(&mut self, data: &CurveData) -> Result<(), GeometryError> {
        self.set_contour(Curve::from_data(data)?)
    }

    /// Replace the surface's base profile.
    pub fn set_base_curve(&mut self, base: Curve) -> Result<(), GeometryError> {
        self.surface.set_base_curve(base)?;
        self.revision += 1;
        Ok(())
    }

    /// Change the surface height.
    pub fn set_height(&mut self, height: Real) -> Result<(), GeometryError> {
        self.surface.set_height(height)?;
        self.revision += 1;
        Ok(())
    }

    /// Run the trimmer against the current surface and contour.
    pub fn mesh(&self, trimmer: &StripTrimmer) -> Result<TrimmedMesh, GeometryError> {
        trimmer.trim(&self.surface, &self.contour)
    }

    /// Min/max corners of the flattened surface.
    pub fn unfold_bounds(&self) -> (Point2<Real>, Point2<Real>) {
        self.surface.unfold_bounds()
    }

    pub fn is_point_inside_unfold_bounds(&self, point: Point2<Real>) -> bool {
        let (min, max) = self.unfold_bounds();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Clamp an editor point into the unfold bounds, keeping a small inner
    /// margin so contour handles stay draggable.
    pub fn constrain_point_to_unfold_bounds(&self, point: Point2<Real>) -> Point2<Real> {
        let (min, max) = self.unfold_bounds();
        Point2::new(
            (min.x + CONSTRAIN_MARGIN).max(point.x.min(max.x - CONSTRAIN_MARGIN)),
            (min.y + CONSTRAIN_MARGIN).max(point.y.min(max.y - CONSTRAIN_MARGIN)),
        )
    }

    /// Contour polyline for the 2D unfold view.
    pub fn contour_points(&self, n: usize) -> Vec<Point2<Real>> {
        self.contour.sample_points(n)
    }

    /// Flattened-surface outline polyline for the 2D unfold view.
    pub fn outline_points(&self) -> Vec<Point2<Real>> {
        self.surface.unfold_outline()
    }

    pub fn to_data(&self) -> StripData {
        StripData {
            surface_type: self.surface.kind(),
            surface_params: SurfaceParams {
                height: self.surface.height(),
                base_curve_data: Some(self.surface.base_curve().to_data()),
                radial_segments: Some(self.surface.radial_segments()),
                radius: None,
            },
            strip_contour_data: self.contour.to_data(),
        }
    }

    pub fn from_data(data: &StripData) -> Result<Self, GeometryError> {
        Self::new(
            data.surface_type,
            &data.surface_params,
            Some(&data.strip_contour_data),
        )
    }
}
