//! # Tiler
//!
//! Splits a carved grid into overlapping square tiles and triangulates each
//! one.
//!
//! ## Layout
//!
//! Tile `(tx, ty)` starts at cell `(tx * (edge - 1), ty * (edge - 1))`, so
//! neighbouring tiles share one row or column of cells. After each tile is
//! moved by its world offset, the shared vertices land on the same point and
//! the surface has no seams.
//!
//! ```text
//!   edge = 4, stride = 3
//!
//!   cells:  0 1 2 3 4 5 6 7 ...
//!   tile 0: [0 1 2 3]
//!   tile 1:       [3 4 5 6]
//!   tile 2:             [6 7 ...
//! ```
//!
//! Tile indices run over `0..=ceil(width / edge)` on each axis. Any index
//! whose origin falls at or past the grid edge holds no cells and is
//! skipped. The range reaches the far edge whenever `edge * edge >= width`
//! (roughly); narrower edges on wide grids leave the last cells untiled and
//! log a warning.
//!
//! ## Threading
//!
//! Tiles are independent. [`Tiler::tile_parallel`] fans them out with rayon
//! over a shared `Arc<Grid>`; results come back ordered by [`TileCoord`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use cavern_core::{CaveError, CaveResult, Grid, Vec3};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::buffers::MeshBuffers;
use crate::triangulator::Triangulator;

/// Smallest usable tile edge; an edge of 1 would have zero stride.
pub const MIN_CHUNK_EDGE: usize = 2;

/// Tile index on the tile lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What to do with tiles that hang over the grid edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Reads past the edge repeat the last row or column; every tile is
    /// `edge x edge`.
    #[default]
    Clamp,
    /// Tiles stop at the grid edge and may be smaller than `edge x edge`.
    Trim,
}

impl EdgePolicy {
    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Trim => "trim",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgePolicy {
    type Err = CaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "trim" => Ok(Self::Trim),
            other => Err(CaveError::invalid(format!(
                "unknown edge policy {other:?}, expected \"clamp\" or \"trim\""
            ))),
        }
    }
}

/// One triangulated tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Position on the tile lattice.
    pub coord: TileCoord,
    /// First grid cell covered by this tile.
    pub cell_origin: (usize, usize),
    /// Tile size in cells.
    pub size: (usize, usize),
    /// Offset from the cave origin: `((edge - 1) * tx * scale, (edge - 1) * ty * scale, 0)`.
    pub offset: Vec3,
    /// Tile-local mesh.
    pub mesh: MeshBuffers,
}

impl Tile {
    /// Mesh moved to world space for a cave placed at `origin`.
    #[must_use]
    pub fn world_mesh(&self, origin: Vec3) -> MeshBuffers {
        self.mesh.translated(self.offset + origin)
    }
}

/// Partitions grids into tiles and triangulates them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tiler {
    chunk_edge: usize,
    policy: EdgePolicy,
    triangulator: Triangulator,
}

impl Tiler {
    /// Creates a tiler with the default [`EdgePolicy::Clamp`].
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] if `chunk_edge` is below
    /// [`MIN_CHUNK_EDGE`] or `scale` is not positive and finite.
    pub fn new(chunk_edge: usize, scale: f32) -> CaveResult<Self> {
        if chunk_edge < MIN_CHUNK_EDGE {
            return Err(CaveError::invalid(format!(
                "chunk edge must be at least {MIN_CHUNK_EDGE}, got {chunk_edge}"
            )));
        }
        Ok(Self {
            chunk_edge,
            policy: EdgePolicy::default(),
            triangulator: Triangulator::new(scale)?,
        })
    }

    /// Sets the edge policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Tile edge length in cells.
    #[inline]
    #[must_use]
    pub const fn chunk_edge(&self) -> usize {
        self.chunk_edge
    }

    /// Vertex spacing.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.triangulator.scale()
    }

    /// Edge policy in use.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Cells between the origins of neighbouring tiles.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.chunk_edge - 1
    }

    /// Every tile coordinate that covers at least one cell, ordered by
    /// column then row.
    #[must_use]
    pub fn coords(&self, grid: &Grid) -> Vec<TileCoord> {
        let xs = self.axis_tiles(grid.width());
        let ys = self.axis_tiles(grid.height());
        let mut coords = Vec::with_capacity(xs * ys);
        for tx in 0..xs {
            for ty in 0..ys {
                coords.push(TileCoord::new(tx as u32, ty as u32));
            }
        }
        coords
    }

    /// Tiles with a non-empty origin along an axis of `len` cells.
    fn axis_tiles(&self, len: usize) -> usize {
        let last = len.div_ceil(self.chunk_edge);
        let count = (0..=last).take_while(|t| t * self.stride() < len).count();
        let reach = count * self.stride() + 1;
        if reach < len {
            warn!(len, reach, chunk_edge = self.chunk_edge, "tiles stop short of the grid edge");
        }
        count
    }

    /// Offset of a tile from the cave origin.
    #[must_use]
    pub fn offset(&self, coord: TileCoord) -> Vec3 {
        let step = self.stride() as f32 * self.scale();
        Vec3::new(coord.x as f32 * step, coord.y as f32 * step, 0.0)
    }

    /// Copies the cells of one tile into a sealed sub-grid.
    ///
    /// The sub-grid keeps the source grid's default status.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::OutOfRange`] if the tile origin lies outside the
    /// grid.
    pub fn extract(&self, grid: &Grid, coord: TileCoord) -> CaveResult<Grid> {
        let ox = coord.x as usize * self.stride();
        let oy = coord.y as usize * self.stride();
        if ox >= grid.width() || oy >= grid.height() {
            return Err(CaveError::OutOfRange {
                x: ox as i64,
                y: oy as i64,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let (w, h) = match self.policy {
            EdgePolicy::Clamp => (self.chunk_edge, self.chunk_edge),
            EdgePolicy::Trim => (
                self.chunk_edge.min(grid.width() - ox),
                self.chunk_edge.min(grid.height() - oy),
            ),
        };

        let mut sub = Grid::new(w, h, grid.default_status())?;
        let max_x = grid.width() - 1;
        let max_y = grid.height() - 1;
        for my in 0..h {
            let sy = (oy + my).min(max_y);
            let row = grid.row(sy as i32)?;
            for mx in 0..w {
                let sx = (ox + mx).min(max_x);
                sub.set(mx as i32, my as i32, row[sx])?;
            }
        }
        sub.seal();
        Ok(sub)
    }

    /// Extracts and triangulates one tile.
    ///
    /// # Errors
    ///
    /// See [`Tiler::extract`].
    pub fn build(&self, grid: &Grid, coord: TileCoord) -> CaveResult<Tile> {
        let sub = self.extract(grid, coord)?;
        let mesh = self.triangulator.triangulate(&sub)?;
        trace!(%coord, triangles = mesh.triangle_count(), "tile built");
        Ok(Tile {
            coord,
            cell_origin: (coord.x as usize * self.stride(), coord.y as usize * self.stride()),
            size: sub.size(),
            offset: self.offset(coord),
            mesh,
        })
    }

    /// Triangulates every tile on the calling thread.
    ///
    /// # Errors
    ///
    /// Propagates the first tile error.
    pub fn tile(&self, grid: &Grid) -> CaveResult<Vec<Tile>> {
        let tiles = self
            .coords(grid)
            .into_iter()
            .map(|coord| self.build(grid, coord))
            .collect::<CaveResult<Vec<_>>>()?;
        log_summary(&tiles, "sequential");
        Ok(tiles)
    }

    /// Triangulates every tile on the rayon pool.
    ///
    /// Output order matches [`Tiler::tile`].
    ///
    /// # Errors
    ///
    /// Propagates a tile error.
    pub fn tile_parallel(&self, grid: &Arc<Grid>) -> CaveResult<Vec<Tile>> {
        let tiles = self
            .coords(grid)
            .into_par_iter()
            .map(|coord| self.build(grid, coord))
            .collect::<CaveResult<Vec<_>>>()?;
        log_summary(&tiles, "parallel");
        Ok(tiles)
    }

    /// Sends each tile through `sender` as soon as it is built.
    ///
    /// Stops early without error if the receiver is dropped. Returns the
    /// number of tiles delivered.
    ///
    /// # Errors
    ///
    /// Propagates the first tile error.
    pub fn stream(&self, grid: &Grid, sender: &Sender<Tile>) -> CaveResult<usize> {
        let mut sent = 0;
        for coord in self.coords(grid) {
            let tile = self.build(grid, coord)?;
            if sender.send(tile).is_err() {
                debug!(sent, "tile receiver dropped, stopping stream");
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }
}

fn log_summary(tiles: &[Tile], mode: &str) {
    let triangles: usize = tiles.iter().map(|t| t.mesh.triangle_count()).sum();
    debug!(tiles = tiles.len(), triangles, mode, "tiling finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: usize, h: usize) -> Grid {
        let mut grid = Grid::walls(w, h).unwrap();
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                if (x + y) % 3 == 0 {
                    grid.carve(x, y).unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(Tiler::new(1, 1.0), Err(CaveError::InvalidParameters(_))));
        assert!(matches!(Tiler::new(0, 1.0), Err(CaveError::InvalidParameters(_))));
        assert!(matches!(Tiler::new(8, 0.0), Err(CaveError::InvalidParameters(_))));
        assert!(matches!(Tiler::new(8, f32::NAN), Err(CaveError::InvalidParameters(_))));
    }

    #[test]
    fn test_coords_skip_empty_tiles() {
        // 8 wide, edge 8, stride 7: origins 0 and 7 hold cells, 14 does not.
        let tiler = Tiler::new(8, 1.0).unwrap();
        let coords = tiler.coords(&Grid::walls(8, 8).unwrap());
        assert_eq!(
            coords,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(0, 1),
                TileCoord::new(1, 0),
                TileCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_coords_reach_far_edge() {
        for (w, edge) in [(10, 4), (64, 16), (5, 2), (17, 17), (3, 8)] {
            let tiler = Tiler::new(edge, 1.0).unwrap();
            let grid = Grid::walls(w, 3).unwrap();
            let last = tiler.coords(&grid).iter().map(|c| c.x).max().unwrap() as usize;
            assert!(last * (edge - 1) < w, "w={w} edge={edge}");
            assert!(last * (edge - 1) + edge >= w, "w={w} edge={edge} leaves cells uncovered");
        }
    }

    #[test]
    fn test_narrow_edge_on_wide_grid_falls_short() {
        // ceil(100 / 2) = 50, so tiles stop at cell 51.
        let tiler = Tiler::new(2, 1.0).unwrap();
        let coords = tiler.coords(&Grid::walls(100, 2).unwrap());
        assert_eq!(coords.iter().map(|c| c.x).max(), Some(50));
    }

    #[test]
    fn test_extract_reads_with_stride() {
        let grid = checker(10, 10);
        let tiler = Tiler::new(4, 1.0).unwrap();
        let sub = tiler.extract(&grid, TileCoord::new(1, 2)).unwrap();

        assert_eq!(sub.size(), (4, 4));
        assert!(sub.is_sealed());
        for my in 0..4 {
            for mx in 0..4 {
                assert_eq!(
                    sub.get(mx, my).unwrap(),
                    grid.get(mx + 3, my + 6).unwrap(),
                    "({mx}, {my})"
                );
            }
        }
    }

    #[test]
    fn test_clamp_repeats_last_column() {
        let grid = checker(10, 10);
        let tiler = Tiler::new(4, 1.0).unwrap();
        // Origin x = 9: only one real column.
        let sub = tiler.extract(&grid, TileCoord::new(3, 0)).unwrap();
        assert_eq!(sub.size(), (4, 4));
        for my in 0..4 {
            for mx in 0..4 {
                assert_eq!(sub.get(mx, my).unwrap(), grid.get(9, my).unwrap());
            }
        }
    }

    #[test]
    fn test_trim_cuts_at_edge() {
        let grid = checker(10, 10);
        let tiler = Tiler::new(4, 1.0).unwrap().with_policy(EdgePolicy::Trim);
        assert_eq!(tiler.extract(&grid, TileCoord::new(3, 0)).unwrap().size(), (1, 4));
        assert_eq!(tiler.extract(&grid, TileCoord::new(2, 3)).unwrap().size(), (4, 1));
        assert_eq!(tiler.extract(&grid, TileCoord::new(1, 1)).unwrap().size(), (4, 4));
    }

    #[test]
    fn test_extract_past_edge_is_out_of_range() {
        let tiler = Tiler::new(4, 1.0).unwrap();
        let err = tiler.extract(&Grid::walls(6, 6).unwrap(), TileCoord::new(2, 0)).unwrap_err();
        assert!(matches!(err, CaveError::OutOfRange { .. }));
    }

    #[test]
    fn test_extract_keeps_default_status() {
        let mut grid = Grid::new(6, 6, true).unwrap();
        grid.carve(1, 1).unwrap();
        let sub = Tiler::new(4, 1.0).unwrap().extract(&grid, TileCoord::new(0, 0)).unwrap();
        assert!(sub.default_status());
        assert!(sub.is_carved(1, 1).unwrap());
        assert_eq!(sub.carved_count(), 1);
    }

    #[test]
    fn test_offsets() {
        let tiler = Tiler::new(16, 2.0).unwrap();
        assert_eq!(tiler.offset(TileCoord::new(0, 0)), Vec3::ZERO);
        assert_eq!(tiler.offset(TileCoord::new(2, 1)), Vec3::new(60.0, 30.0, 0.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = checker(37, 23);
        let tiler = Tiler::new(8, 1.5).unwrap();
        let sequential = tiler.tile(&grid).unwrap();
        let parallel = tiler.tile_parallel(&grid.into_shared()).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_stream_delivers_in_order() {
        let grid = checker(20, 20);
        let tiler = Tiler::new(6, 1.0).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();

        let sent = tiler.stream(&grid, &tx).unwrap();
        drop(tx);
        let received: Vec<TileCoord> = rx.iter().map(|tile| tile.coord).collect();

        assert_eq!(sent, received.len());
        assert_eq!(received, tiler.coords(&grid));
    }

    #[test]
    fn test_stream_stops_when_receiver_dropped() {
        let grid = checker(20, 20);
        let tiler = Tiler::new(6, 1.0).unwrap();
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        assert_eq!(tiler.stream(&grid, &tx).unwrap(), 0);
    }

    #[test]
    fn test_edge_policy_parse() {
        assert_eq!("clamp".parse::<EdgePolicy>().unwrap(), EdgePolicy::Clamp);
        assert_eq!("TRIM".parse::<EdgePolicy>().unwrap(), EdgePolicy::Trim);
        assert!("wrap".parse::<EdgePolicy>().is_err());
        assert_eq!(EdgePolicy::Trim.to_string(), "trim");
    }
}
