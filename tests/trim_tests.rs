use devsurf::float_types::{Real, TAU};
use devsurf::{
    Curve, GeometryError, StripTrimmer, SurfaceKind, SurfaceModel, SurfaceParams, SurfaceStrip,
};
use nalgebra::Point2;

mod support;

use crate::support::{approx_eq, max_radial_distance, mesh_bounding_box};

fn cylinder(height: Real, radius: Real, segments: usize) -> SurfaceModel {
    SurfaceModel::create(
        SurfaceKind::Cylindrical,
        &SurfaceParams {
            height,
            radius: Some(radius),
            radial_segments: Some(segments),
            ..SurfaceParams::default()
        },
    )
    .expect("cylinder")
}

fn rectangle(min_x: Real, min_y: Real, max_x: Real, max_y: Real) -> Curve {
    Curve::new(
        vec![
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ],
        true,
    )
    .expect("rectangle contour")
}

#[test]
fn full_outline_contour_keeps_the_whole_grid() {
    let surface = cylinder(3.0, 1.5, 64);
    let perimeter = surface.base_curve().length();
    let contour = rectangle(0.0, 0.0, perimeter, 3.0);

    let trimmer = StripTrimmer::new();
    let mesh = trimmer.trim(&surface, &contour).expect("trim");

    let grid_vertices = (trimmer.grid_resolution() + 1) * (trimmer.grid_resolution() + 1);
    let grid_triangles = trimmer.grid_resolution() * trimmer.grid_resolution() * 2;

    assert!(!mesh.is_empty());
    assert_eq!(mesh.vertex_count(), grid_vertices, "no holes expected");
    // The snap collapses at most a small fraction of silhouette triangles
    // where adjacent boundary vertices land on the same contour sample.
    assert!(mesh.triangle_count() >= grid_triangles - grid_triangles / 50);
    assert!(mesh.triangle_count() <= grid_triangles);
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    assert_eq!(mesh.positions.len(), mesh.vertex_count() * 3);
}

#[test]
fn near_zero_area_contour_yields_an_empty_mesh() {
    let surface = cylinder(3.0, 1.5, 32);
    let contour = Curve::new(
        vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0 + 1e-12, 1.0),
            Point2::new(1.0, 1.0 + 1e-12),
        ],
        true,
    )
    .expect("degenerate contour");

    let mesh = StripTrimmer::new().trim(&surface, &contour).expect("trim");
    assert!(mesh.indices.is_empty());
    assert!(mesh.positions.is_empty());
    assert!(mesh.is_empty());
}

#[test]
fn open_contours_are_rejected() {
    let surface = cylinder(3.0, 1.5, 32);
    let open = Curve::new(vec![Point2::new(0.0, 0.0), Point2::new(4.0, 2.0)], false)
        .expect("open curve");
    assert!(matches!(
        StripTrimmer::new().trim(&surface, &open),
        Err(GeometryError::OpenContour)
    ));
}

#[test]
fn trimmed_cylinder_tracks_its_radius_and_height() {
    // Cylinder of radius 1.5 and height 3, trimmed with its full outline
    // minus a 0.05 margin.
    let surface = cylinder(3.0, 1.5, 64);
    let width = TAU * 1.5;
    let contour = rectangle(0.05, 0.05, width - 0.05, 3.0 - 0.05);

    let mesh = StripTrimmer::new().trim(&surface, &contour).expect("trim");
    assert!(!mesh.is_empty());

    let bounds = mesh_bounding_box(&mesh);
    let mesh_height = bounds[4] - bounds[1];
    assert!(
        (mesh_height - 3.0).abs() <= 0.1 + 1e-6,
        "mesh height {mesh_height} should be within 0.1 of 3"
    );

    let max_radius = max_radial_distance(&mesh);
    assert!(
        (max_radius - 1.5).abs() <= 0.015,
        "max radial distance {max_radius} should be within 1% of 1.5"
    );
}

#[test]
fn interior_contour_produces_a_partial_shell() {
    let surface = cylinder(3.0, 1.5, 64);
    let perimeter = surface.base_curve().length();

    // A window covering roughly the middle ninth of the unfold plane.
    let contour = rectangle(perimeter / 3.0, 1.0, 2.0 * perimeter / 3.0, 2.0);
    let trimmer = StripTrimmer::new();
    let mesh = trimmer.trim(&surface, &contour).expect("trim");

    assert!(!mesh.is_empty());
    let full = trimmer
        .trim(&surface, &rectangle(0.0, 0.0, perimeter, 3.0))
        .expect("full trim");
    assert!(mesh.triangle_count() < full.triangle_count());

    // Every vertex still lies on the cylinder wall, inside the window's
    // height band.
    for p in mesh.positions.chunks_exact(3) {
        let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
        assert!(r <= 1.5 + 1e-6);
        assert!(r >= 1.5 * (1.0 - 0.01));
        assert!(p[1] >= -0.5 - 1e-6 && p[1] <= 0.5 + 1e-6);
    }
}

#[test]
fn normals_are_unit_length() {
    let surface = cylinder(2.0, 1.0, 48);
    let perimeter = surface.base_curve().length();
    let contour = rectangle(0.1, 0.1, perimeter - 0.1, 1.9);

    let mesh = StripTrimmer::new().trim(&surface, &contour).expect("trim");
    for n in mesh.normals.chunks_exact(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!(approx_eq(len, 1.0, 1e-6), "normal length {len}");
    }
}

#[test]
fn indices_stay_in_range_and_form_triangles() {
    let surface = cylinder(3.0, 1.5, 32);
    let perimeter = surface.base_curve().length();
    let contour = rectangle(0.2, 0.2, perimeter - 0.2, 2.8);

    let mesh = StripTrimmer::with_resolution(16, 128)
        .trim(&surface, &contour)
        .expect("trim");
    assert_eq!(mesh.indices.len() % 3, 0);
    let vertex_count = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&i| i < vertex_count));
}

#[test]
fn default_strip_meshes_are_valid_for_both_kinds() {
    let trimmer = StripTrimmer::new();
    for kind in [SurfaceKind::Cylindrical, SurfaceKind::Conical] {
        let strip = SurfaceStrip::new(kind, &SurfaceParams::default(), None)
            .expect("default strip");
        let mesh = strip.mesh(&trimmer).expect("trim");
        assert!(!mesh.is_empty(), "default {kind} strip should be visible");
        assert_eq!(mesh.positions.len(), mesh.normals.len());
    }
}

#[test]
fn conical_strip_stays_between_base_and_apex() {
    let strip = SurfaceStrip::new(SurfaceKind::Conical, &SurfaceParams::default(), None)
        .expect("default cone strip");
    let mesh = strip.mesh(&StripTrimmer::new()).expect("trim");
    assert!(!mesh.is_empty());

    let bounds = mesh_bounding_box(&mesh);
    // height defaults to 3: the sheet spans y in [-1.5, 1.5].
    assert!(bounds[1] >= -1.5 - 1e-6);
    assert!(bounds[4] <= 1.5 + 1e-6);
}
