//! # Tile Placement
//!
//! The receiving end of a pipeline run. A [`TilePlacement`] gets the full
//! set of tiles for a cave plus the cave's world origin and replaces
//! whatever it held before.
//!
//! [`TileSet`] keeps tiles in memory, keyed by coordinate. Wrap it in a
//! [`SharedTileSet`] when another thread reads the tiles while the pipeline
//! regenerates them.

use std::collections::BTreeMap;
use std::sync::Arc;

use cavern_core::Vec3;
use cavern_mesh::{MeshBuffers, Tile, TileCoord};
use parking_lot::RwLock;
use tracing::debug;

/// Consumer of a finished tile set.
pub trait TilePlacement {
    /// Replaces the current tiles with `tiles`, placed relative to `origin`.
    fn place(&mut self, origin: Vec3, tiles: Vec<Tile>);
}

/// A tile positioned in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTile {
    /// The tile as built.
    pub tile: Tile,
    /// Translation applied to the tile's local mesh.
    pub world_offset: Vec3,
}

impl PlacedTile {
    /// The tile's mesh in world coordinates.
    #[must_use]
    pub fn world_mesh(&self) -> MeshBuffers {
        self.tile.mesh.translated(self.world_offset)
    }
}

/// In-memory tile set; each placement discards the previous one.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    origin: Vec3,
    tiles: BTreeMap<TileCoord, PlacedTile>,
    generation: u64,
}

impl TileSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set behind a shared lock.
    #[must_use]
    pub fn shared() -> SharedTileSet {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Number of placed tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if nothing has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// World origin of the current cave.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// How many placements this set has received.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Looks up one tile.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<&PlacedTile> {
        self.tiles.get(&coord)
    }

    /// Tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.values()
    }

    /// Triangles across all tiles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.tiles.values().map(|p| p.tile.mesh.triangle_count()).sum()
    }
}

impl TilePlacement for TileSet {
    fn place(&mut self, origin: Vec3, tiles: Vec<Tile>) {
        self.tiles.clear();
        self.origin = origin;
        for tile in tiles {
            let world_offset = tile.offset + origin;
            self.tiles.insert(tile.coord, PlacedTile { tile, world_offset });
        }
        self.generation += 1;
        debug!(tiles = self.tiles.len(), generation = self.generation, "tile set replaced");
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a PlacedTile;
    type IntoIter = std::collections::btree_map::Values<'a, TileCoord, PlacedTile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.values()
    }
}

/// A tile set shared between the pipeline and readers.
pub type SharedTileSet = Arc<RwLock<TileSet>>;

impl TilePlacement for SharedTileSet {
    fn place(&mut self, origin: Vec3, tiles: Vec<Tile>) {
        self.write().place(origin, tiles);
    }
}
