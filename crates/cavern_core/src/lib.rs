//! # CAVERN Core
//!
//! Storage types shared by every stage of the cave pipeline.
//!
//! ## Contents
//!
//! - [`Grid`]: bounds-checked boolean occupancy grid with a default status
//! - [`CaveError`]: error taxonomy for carving, triangulating and tiling
//! - [`Vec2`] / [`Vec3`]: `Pod` vectors for mesh buffers
//!
//! ## Ownership
//!
//! A grid has a single writer (the carver) and is then sealed and shared
//! read-only, typically as an `Arc<Grid>` handed to tile workers.
//!
//! ## Example
//!
//! ```rust
//! use cavern_core::{CaveError, Grid};
//!
//! let mut grid = Grid::walls(8, 8).unwrap();
//! grid.carve(3, 4).unwrap();
//! assert!(grid.is_carved(3, 4).unwrap());
//! assert!(matches!(grid.get(8, 0), Err(CaveError::OutOfRange { .. })));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod grid;
pub mod math;

pub use error::{CaveError, CaveResult};
pub use grid::{Grid, CARVED_CHAR, WALL_CHAR};
pub use math::{Vec2, Vec3};
