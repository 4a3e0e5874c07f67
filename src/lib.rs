//! A geometry engine for **developable surfaces**: sheet shapes that flatten
//! into a plane without stretching (cylinders and cones).
//!
//! Users edit a 2D base profile and a 2D trim contour on the surface's
//! flattened ("unfold plane") representation; the engine maps between the
//! flattened and folded coordinate spaces and produces curved 3D triangle
//! meshes of the trimmed region.
//!
//! # Components
//! - [`Curve`]: editable piecewise-linear 2D path with arc-length queries.
//! - [`SurfaceModel`]: cylindrical/conical UV→3D mapping and unfold outline,
//!   built through [`SurfaceModel::create`].
//! - [`StripTrimmer`]: grid-cull-and-snap trimming producing a
//!   [`TrimmedMesh`].
//! - [`SurfaceStrip`]: surface + contour aggregate with whole-strip
//!   serialization.
//!
//! # Features
//! - **f64** (default) / **f32**: select the `Real` scalar, mutually
//!   exclusive.
//! - **parallel**: fan the per-triangle cull and per-vertex snap/map phases
//!   out over rayon.

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod curve;
pub mod errors;
pub mod float_types;
pub mod strip;
pub mod surface;
pub mod trim;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use curve::{Curve, CurveData, PointData};
pub use errors::GeometryError;
pub use strip::{StripData, SurfaceStrip};
pub use surface::{
    ConicalSurface, CylindricalSurface, SurfaceKind, SurfaceModel, SurfaceParams,
};
pub use trim::{StripTrimmer, TrimmedMesh};
