//! # Triangulator
//!
//! Turns a rectangular occupancy grid (usually one tile) into flat mesh
//! buffers. Runs four fixed stages in order:
//!
//! 1. **Vertices**: one per cell, row-major, at `(x * scale, y * scale, 0)`
//! 2. **Triangles**: per 2x2 quad, from which corners are open
//! 3. **Normals**: each position offset by `(0, 0, -1)`
//! 4. **UVs**: `(x / width, y / height)`, independent of scale
//!
//! A cell is *open* when it still holds the grid's default status, i.e. the
//! surface covers the uncarved rock and leaves the cave empty.
//!
//! ## Quad Rules
//!
//! ```text
//!   b---c     a = (x, y)       b = (x, y + 1)
//!   |   |     c = (x + 1, y + 1)  d = (x + 1, y)
//!   a---d
//!
//!   a b c open  -> (a, b, c)
//!   a d c open  -> (a, c, d)
//!   all open    -> done with this quad
//!   a b d open  -> (a, b, d)
//!   d b c open  -> (d, b, c)
//! ```
//!
//! The rules are tested in this order and not as a match, so triangle order
//! within the buffer is fixed: a fully open quad yields `(a, b, c)` then
//! `(a, c, d)`, a quad with three open corners yields exactly one triangle,
//! anything less yields none.

use cavern_core::{CaveError, CaveResult, Grid, Vec2, Vec3};
use tracing::trace;

use crate::buffers::MeshBuffers;
use crate::vertex::Vertex;

/// Converts occupancy grids into mesh buffers at a fixed scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangulator {
    scale: f32,
}

impl Triangulator {
    /// Creates a triangulator.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] unless `scale` is finite and
    /// positive.
    pub fn new(scale: f32) -> CaveResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaveError::invalid(format!(
                "scale must be positive and finite, got {scale}"
            )));
        }
        Ok(Self { scale })
    }

    /// Distance between neighbouring vertices.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Triangulates `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] if the grid has more cells
    /// than a `u32` index buffer can address.
    pub fn triangulate(&self, grid: &Grid) -> CaveResult<MeshBuffers> {
        if u32::try_from(grid.cells().len()).is_err() {
            return Err(CaveError::invalid(format!(
                "{}x{} grid exceeds the u32 index range",
                grid.width(),
                grid.height()
            )));
        }

        let lifted = Vertex::lift_all(grid, self.scale);
        let triangles = build_triangles(&lifted, grid.width(), grid.height(), grid.default_status());
        let vertices: Vec<Vec3> = lifted.iter().map(|v| v.space_position).collect();
        let normals = build_normals(&vertices);
        let uvs = build_uvs(&lifted, grid.width(), grid.height());

        trace!(
            width = grid.width(),
            height = grid.height(),
            triangles = triangles.len(),
            "triangulated"
        );

        Ok(MeshBuffers { vertices, triangles, normals, uvs })
    }
}

/// Triangulates `grid` at `scale`.
///
/// # Errors
///
/// See [`Triangulator::new`] and [`Triangulator::triangulate`].
pub fn triangulate(grid: &Grid, scale: f32) -> CaveResult<MeshBuffers> {
    Triangulator::new(scale)?.triangulate(grid)
}

// =============================================================================
// STAGES
// =============================================================================

#[allow(clippy::many_single_char_names)]
fn build_triangles(
    vertices: &[Vertex],
    width: usize,
    height: usize,
    default_status: bool,
) -> Vec<[u32; 3]> {
    let mut triangles = Vec::new();
    let at = |x: usize, y: usize| &vertices[y * width + x];

    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let va = at(x, y);
            let vb = at(x, y + 1);
            let vc = at(x + 1, y + 1);
            let vd = at(x + 1, y);

            let open = |v: &Vertex| v.occupied == default_status;
            let (a, b, c, d) = (open(va), open(vb), open(vc), open(vd));
            let (ia, ib, ic, id) = (va.mesh_index, vb.mesh_index, vc.mesh_index, vd.mesh_index);

            if a && b && c {
                triangles.push([ia, ib, ic]);
            }
            if a && d && c {
                triangles.push([ia, ic, id]);
            }
            if a && b && c && d {
                continue;
            }
            if a && b && d {
                triangles.push([ia, ib, id]);
            }
            if d && b && c {
                triangles.push([id, ib, ic]);
            }
        }
    }

    triangles
}

fn build_normals(vertices: &[Vec3]) -> Vec<Vec3> {
    vertices.iter().map(|&v| v + Vec3::BACK).collect()
}

fn build_uvs(vertices: &[Vertex], width: usize, height: usize) -> Vec<Vec2> {
    let (w, h) = (width as f32, height as f32);
    vertices
        .iter()
        .map(|v| {
            let (x, y) = v.grid_position;
            Vec2::new(x as f32 / w, y as f32 / h)
        })
        .collect()
}
