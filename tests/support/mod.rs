//! Test support library
//! Provides various helper functions & utilities for tests.

use devsurf::TrimmedMesh;
use devsurf::float_types::Real;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a trimmed mesh's vertex positions.
pub fn mesh_bounding_box(mesh: &TrimmedMesh) -> [Real; 6] {
    let mut bounds = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        -Real::MAX,
        -Real::MAX,
        -Real::MAX,
    ];
    for p in mesh.positions.chunks_exact(3) {
        for axis in 0..3 {
            if p[axis] < bounds[axis] {
                bounds[axis] = p[axis];
            }
            if p[axis] > bounds[axis + 3] {
                bounds[axis + 3] = p[axis];
            }
        }
    }
    bounds
}

/// Largest distance of any mesh vertex from the Y axis.
pub fn max_radial_distance(mesh: &TrimmedMesh) -> Real {
    let mut max = 0.0;
    for p in mesh.positions.chunks_exact(3) {
        let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
        if r > max {
            max = r;
        }
    }
    max
}
