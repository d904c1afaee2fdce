//! # CAVERN
//!
//! Random-walk caves, triangulated into seamless tiles.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          CAVERN                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌────────────────┐    ┌────────────────┐    ┌───────────┐  │
//! │  │  procedural    │    │  mesh          │    │ placement │  │
//! │  │                │───>│                │───>│           │  │
//! │  │  • CaveSeed    │    │  • Tiler       │    │ • TileSet │  │
//! │  │  • CaveCarver  │    │  • Triangulator│    │           │  │
//! │  │  • correction  │    │  • MeshBuffers │    │           │  │
//! │  └───────┬────────┘    └───────┬────────┘    └───────────┘  │
//! │          │                     │                            │
//! │          └──────> core <───────┘                            │
//! │             Grid, CaveError, Vec2/Vec3                      │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration and its errors
//! - `pipeline`: One carve -> tile -> place run
//! - `placement`: Tile consumers
//!
//! ## Example
//!
//! ```rust
//! use cavern::{CavePipeline, GenerationConfig, TileSet};
//!
//! let mut config = GenerationConfig::default();
//! config.carve.width = 8;
//! config.carve.height = 8;
//! config.carve.border = 1;
//! config.carve.target_length = 5;
//! config.carve.seed = 42;
//! config.tiling.chunk_edge = 8;
//!
//! let mut tiles = TileSet::new();
//! let run = CavePipeline::new(config).unwrap().run(&mut tiles).unwrap();
//!
//! assert_eq!(run.report.tiles, 4);
//! assert!(run.report.triangles > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod pipeline;
pub mod placement;

// Re-export the stages
pub use cavern_core as core;
pub use cavern_mesh as mesh;
pub use cavern_procedural as procedural;

// Re-export commonly used types
pub use config::{CarveConfig, ConfigError, GenerationConfig, TilingConfig};
pub use pipeline::{CavePipeline, Generation, GenerationReport};
pub use placement::{PlacedTile, SharedTileSet, TilePlacement, TileSet};
