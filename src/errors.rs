//! Validation errors
//!
//! Geometry construction validates eagerly and fails fast with one of these
//! typed errors. The trimming pipeline only errors on malformed inputs; a
//! valid-but-empty trim result is expressed as an empty mesh, not an error.

use crate::float_types::Real;

/// All the validation failures geometry construction can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A curve was built (or deserialized) with fewer control points than its
    /// closed/open mode requires.
    #[error("curve requires at least {required} control points, got {actual}")]
    TooFewControlPoints { required: usize, actual: usize },

    /// A surface was given a zero or negative height.
    #[error("surface height must be positive, got {0}")]
    NonPositiveHeight(Real),

    /// A default base profile was requested with a zero or negative radius.
    #[error("base profile radius must be positive, got {0}")]
    NonPositiveRadius(Real),

    /// The base curve's perimeter is too short to parameterize by arc length.
    #[error("base curve has (near) zero perimeter")]
    ZeroPerimeter,

    /// The factory was handed a surface-kind tag it does not know.
    #[error("unsupported surface kind: {0:?}")]
    UnsupportedSurfaceKind(String),

    /// A trim contour must be a closed curve.
    #[error("trim contour must be closed")]
    OpenContour,
}
