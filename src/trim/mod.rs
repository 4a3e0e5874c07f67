//! Contour-based trimming of developable surfaces ("grid cull and snap").
//!
//! [`StripTrimmer`] rasterizes the region of the unfold plane enclosed by a
//! closed contour into a regular triangulated grid, culls triangles whose
//! centroid falls outside the contour, snaps the cut silhouette onto the
//! contour itself, and maps the surviving vertices through the surface's
//! UV→3D mapping. The result is a fresh, immutable [`TrimmedMesh`].
//!
//! The cull, snap, and map phases are per-item independent; with the
//! `parallel` feature they fan out over rayon while index compaction stays a
//! single sequential pass.

use crate::curve::Curve;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real};
use crate::surface::SurfaceModel;
use geo::{BoundingRect, LineString, coord};
use hashbrown::{HashMap, HashSet};
use log::debug;
use nalgebra::{Point2, Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default grid density: quads per side of the contour's bounding box.
pub const DEFAULT_GRID_RESOLUTION: usize = 64;
/// Default number of contour samples used for culling and snapping.
pub const DEFAULT_CONTOUR_SAMPLES: usize = 200;

/// An immutable trim result: flat position/normal buffers (xyz triples) and
/// a triangle index buffer. Ownership transfers entirely to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedMesh {
    pub positions: Vec<Real>,
    pub normals: Vec<Real>,
    pub indices: Vec<u32>,
}

impl TrimmedMesh {
    /// The explicit "nothing visible" result.
    pub const fn empty() -> Self {
        TrimmedMesh {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Regular triangulated grid over an axis-aligned box, two triangles per
/// quad, vertices in row-major order.
struct TrimGrid {
    origin: Point2<Real>,
    dx: Real,
    dy: Real,
    resolution: usize,
}

impl TrimGrid {
    fn new(origin: Point2<Real>, width: Real, height: Real, resolution: usize) -> Self {
        TrimGrid {
            origin,
            dx: width / resolution as Real,
            dy: height / resolution as Real,
            resolution,
        }
    }

    fn vertex_count(&self) -> usize {
        (self.resolution + 1) * (self.resolution + 1)
    }

    fn triangle_count(&self) -> usize {
        self.resolution * self.resolution * 2
    }

    fn vertex_position(&self, index: usize) -> Point2<Real> {
        let row = index / (self.resolution + 1);
        let col = index % (self.resolution + 1);
        Point2::new(
            self.origin.x + col as Real * self.dx,
            self.origin.y + row as Real * self.dy,
        )
    }

    /// Vertex indices of a triangle; even indices take the lower-right half
    /// of their quad, odd the upper-left.
    fn triangle(&self, index: usize) -> [u32; 3] {
        let quad = index / 2;
        let col = quad % self.resolution;
        let row = quad / self.resolution;
        let stride = (self.resolution + 1) as u32;
        let v00 = row as u32 * stride + col as u32;
        let v10 = v00 + 1;
        let v01 = v00 + stride;
        let v11 = v01 + 1;
        if index % 2 == 0 {
            [v00, v10, v11]
        } else {
            [v00, v11, v01]
        }
    }

    fn centroid(&self, index: usize) -> Point2<Real> {
        let [a, b, c] = self.triangle(index);
        let pa = self.vertex_position(a as usize);
        let pb = self.vertex_position(b as usize);
        let pc = self.vertex_position(c as usize);
        Point2::new(
            (pa.x + pb.x + pc.x) / 3.0,
            (pa.y + pb.y + pc.y) / 3.0,
        )
    }
}

/// Even-odd ray cast of `p` against the sampled contour polygon.
fn point_in_contour(p: Point2<Real>, samples: &[Point2<Real>]) -> bool {
    let mut inside = false;
    let mut j = samples.len() - 1;
    for i in 0..samples.len() {
        let a = samples[i];
        let b = samples[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Nearest contour sample by squared distance.
fn nearest_sample(p: Point2<Real>, samples: &[Point2<Real>]) -> Point2<Real> {
    let mut best = samples[0];
    let mut best_sq = (p - best).norm_squared();
    for &s in &samples[1..] {
        let sq = (p - s).norm_squared();
        if sq < best_sq {
            best_sq = sq;
            best = s;
        }
    }
    best
}

/// Trims a [`SurfaceModel`] by a closed contour drawn on its unfold plane.
///
/// Grid resolution is a pure quality/performance trade-off: higher values
/// reduce faceting where the contour runs near-tangential to grid lines, at
/// quadratic cost.
#[derive(Debug, Clone, Copy)]
pub struct StripTrimmer {
    grid_resolution: usize,
    contour_samples: usize,
}

impl Default for StripTrimmer {
    fn default() -> Self {
        StripTrimmer {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            contour_samples: DEFAULT_CONTOUR_SAMPLES,
        }
    }
}

impl StripTrimmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the grid density and contour sampling, clamped to workable
    /// minimums.
    pub fn with_resolution(grid_resolution: usize, contour_samples: usize) -> Self {
        StripTrimmer {
            grid_resolution: grid_resolution.max(1),
            contour_samples: contour_samples.max(3),
        }
    }

    pub const fn grid_resolution(&self) -> usize {
        self.grid_resolution
    }

    pub const fn contour_samples(&self) -> usize {
        self.contour_samples
    }

    /// Produce the curved 3D mesh of the region inside `contour`.
    ///
    /// A contour enclosing no grid triangle yields [`TrimmedMesh::empty`],
    /// never an error: "nothing visible" is a valid user state.
    ///
    /// ## Errors
    /// `OpenContour` if the contour curve is not closed.
    pub fn trim(
        &self,
        surface: &SurfaceModel,
        contour: &Curve,
    ) -> Result<TrimmedMesh, GeometryError> {
        if !contour.is_closed() {
            return Err(GeometryError::OpenContour);
        }

        let samples = contour.sample_points(self.contour_samples);
        let ring: LineString<Real> = samples.iter().map(|p| coord! {x: p.x, y: p.y}).collect();
        let Some(rect) = ring.bounding_rect() else {
            return Ok(TrimmedMesh::empty());
        };
        if rect.width() <= EPSILON || rect.height() <= EPSILON {
            debug!(
                "trim contour bounding box is degenerate ({} x {}), yielding empty mesh",
                rect.width(),
                rect.height()
            );
            return Ok(TrimmedMesh::empty());
        }

        let grid = TrimGrid::new(
            Point2::new(rect.min().x, rect.min().y),
            rect.width(),
            rect.height(),
            self.grid_resolution,
        );

        // Cull: mark triangles whose centroid lies inside the contour. The
        // mask pass is per-triangle independent; the fill pass below
        // allocates exactly once from the counted mask.
        #[cfg(feature = "parallel")]
        let mask: Vec<bool> = (0..grid.triangle_count())
            .into_par_iter()
            .map(|t| point_in_contour(grid.centroid(t), &samples))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let mask: Vec<bool> = (0..grid.triangle_count())
            .map(|t| point_in_contour(grid.centroid(t), &samples))
            .collect();

        let retained_count = mask.iter().filter(|&&keep| keep).count();
        if retained_count == 0 {
            debug!("trim contour retained no triangles, yielding empty mesh");
            return Ok(TrimmedMesh::empty());
        }

        let mut retained: Vec<[u32; 3]> = Vec::with_capacity(retained_count);
        for (index, keep) in mask.iter().enumerate() {
            if *keep {
                retained.push(grid.triangle(index));
            }
        }

        // Boundary edges belong to exactly one retained triangle; edges are
        // keyed by their unordered vertex-index pair.
        let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &retained {
            for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        let mut boundary: HashSet<u32> = HashSet::new();
        for (&(a, b), &count) in &edge_counts {
            if count == 1 {
                boundary.insert(a);
                boundary.insert(b);
            }
        }

        // Unfold-plane positions for the whole grid, then snap every
        // boundary vertex onto its nearest contour sample to remove the
        // staircase silhouette left by the cull.
        let mut uv: Vec<Point2<Real>> = (0..grid.vertex_count())
            .map(|v| grid.vertex_position(v))
            .collect();

        let boundary_list: Vec<u32> = boundary.iter().copied().collect();
        #[cfg(feature = "parallel")]
        let snapped: Vec<(u32, Point2<Real>)> = boundary_list
            .par_iter()
            .map(|&v| (v, nearest_sample(uv[v as usize], &samples)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let snapped: Vec<(u32, Point2<Real>)> = boundary_list
            .iter()
            .map(|&v| (v, nearest_sample(uv[v as usize], &samples)))
            .collect();
        for (v, p) in snapped {
            uv[v as usize] = p;
        }

        // Compact: referenced vertices keep ascending order under new ids.
        let mut referenced = vec![false; grid.vertex_count()];
        for tri in &retained {
            for &v in tri {
                referenced[v as usize] = true;
            }
        }
        let mut remap = vec![u32::MAX; grid.vertex_count()];
        let mut kept: Vec<u32> = Vec::new();
        for (old, flag) in referenced.iter().enumerate() {
            if *flag {
                remap[old] = kept.len() as u32;
                kept.push(old as u32);
            }
        }

        // Map every kept vertex through the surface.
        #[cfg(feature = "parallel")]
        let mapped: Vec<Point3<Real>> = kept
            .par_iter()
            .map(|&v| {
                let p = uv[v as usize];
                surface.map_uv_to_3d(p.x, p.y)
            })
            .collect();
        #[cfg(not(feature = "parallel"))]
        let mapped: Vec<Point3<Real>> = kept
            .iter()
            .map(|&v| {
                let p = uv[v as usize];
                surface.map_uv_to_3d(p.x, p.y)
            })
            .collect();

        // Rebuild indices, dropping triangles collapsed by the snap (two
        // corners on the same contour sample have zero area).
        let mut indices: Vec<u32> = Vec::with_capacity(retained.len() * 3);
        for tri in &retained {
            let pa = uv[tri[0] as usize];
            let pb = uv[tri[1] as usize];
            let pc = uv[tri[2] as usize];
            if pa == pb || pb == pc || pc == pa {
                continue;
            }
            indices.extend_from_slice(&[
                remap[tri[0] as usize],
                remap[tri[1] as usize],
                remap[tri[2] as usize],
            ]);
        }
        if indices.is_empty() {
            debug!("all retained triangles degenerated after snapping, yielding empty mesh");
            return Ok(TrimmedMesh::empty());
        }

        // Area-weighted vertex normals from the final 3D triangles.
        let mut accumulated = vec![Vector3::<Real>::zeros(); kept.len()];
        for tri in indices.chunks_exact(3) {
            let p0 = mapped[tri[0] as usize];
            let p1 = mapped[tri[1] as usize];
            let p2 = mapped[tri[2] as usize];
            let face = (p1 - p0).cross(&(p2 - p0));
            accumulated[tri[0] as usize] += face;
            accumulated[tri[1] as usize] += face;
            accumulated[tri[2] as usize] += face;
        }

        let mut positions = Vec::with_capacity(kept.len() * 3);
        let mut normals = Vec::with_capacity(kept.len() * 3);
        for (point, sum) in mapped.iter().zip(&accumulated) {
            positions.extend_from_slice(&[point.x, point.y, point.z]);
            let normal = if sum.norm() > EPSILON {
                sum.normalize()
            } else {
                Vector3::z()
            };
            normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        }

        debug!(
            "trim retained {} of {} triangles ({} vertices, {} snapped to contour)",
            indices.len() / 3,
            grid.triangle_count(),
            kept.len(),
            boundary_list.len()
        );

        Ok(TrimmedMesh {
            positions,
            normals,
            indices,
        })
    }
}
