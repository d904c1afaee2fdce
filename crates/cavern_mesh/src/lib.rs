//! # CAVERN Mesh
//!
//! Grid-to-mesh conversion for carved caves.
//!
//! ## Design Principles
//!
//! 1. **Pure**: Same grid and settings, same buffers
//! 2. **Seamless**: Tiles overlap by one cell so their edges coincide
//! 3. **Lock-free**: Tile workers only read a shared `Arc<Grid>`
//! 4. **Upload-ready**: Every buffer is `Pod`
//!
//! ## Core Components
//!
//! - `Triangulator`: Occupancy grid to vertices, triangles, normals, UVs
//! - `Tiler`: Overlapping tiles, sequential, parallel or streamed
//! - `MeshBuffers`: Flat mesh output with invariant checks
//!
//! ## Example
//!
//! ```rust
//! use cavern_core::Grid;
//! use cavern_mesh::{Tiler, TileCoord};
//!
//! let grid = Grid::walls(8, 8).unwrap();
//! let tiles = Tiler::new(8, 1.0).unwrap().tile(&grid).unwrap();
//!
//! assert_eq!(tiles[0].coord, TileCoord::new(0, 0));
//! assert_eq!(tiles[0].mesh.vertex_count(), 64);
//! assert!(tiles.iter().all(|t| t.mesh.validate().is_ok()));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffers;
pub mod tiler;
pub mod triangulator;
mod vertex;

pub use buffers::MeshBuffers;
pub use tiler::{EdgePolicy, Tile, TileCoord, Tiler, MIN_CHUNK_EDGE};
pub use triangulator::{triangulate, Triangulator};
