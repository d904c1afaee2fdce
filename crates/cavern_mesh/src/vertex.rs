//! Per-cell vertex record used while a tile is triangulated.

use cavern_core::{Grid, Vec3};

/// One grid cell lifted into mesh space.
///
/// Built per tile and dropped once the buffers are written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vertex {
    /// Cell coordinates inside the tile.
    pub grid_position: (u32, u32),
    /// `(x * scale, y * scale, 0)`.
    pub space_position: Vec3,
    /// Index into the vertex buffer (`y * width + x`).
    pub mesh_index: u32,
    /// Raw value of the source cell.
    pub occupied: bool,
}

impl Vertex {
    /// Lifts every cell of `grid`, row-major.
    ///
    /// The caller guarantees `width * height` fits in `u32`.
    pub fn lift_all(grid: &Grid, scale: f32) -> Vec<Self> {
        let width = grid.width();
        grid.cells()
            .iter()
            .enumerate()
            .map(|(i, &occupied)| {
                let x = (i % width) as u32;
                let y = (i / width) as u32;
                Self {
                    grid_position: (x, y),
                    space_position: Vec3::new(x as f32 * scale, y as f32 * scale, 0.0),
                    mesh_index: i as u32,
                    occupied,
                }
            })
            .collect()
    }
}
