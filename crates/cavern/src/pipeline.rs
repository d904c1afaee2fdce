//! # Cave Pipeline
//!
//! One run: carve, tile, place.
//!
//! ```text
//! GenerationConfig ──> resolve seed ──> CaveCarver ──> Arc<Grid>
//!                                                         │
//!                          TilePlacement <── Tiler <──────┘
//!                                │
//!                                └──> GenerationReport ──> callback / channel
//! ```
//!
//! Completion is the return value. Callers that hand the run to another
//! thread can also register a callback or a channel sender; either fires
//! once per successful run, after the tiles are placed.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cavern_core::{CaveResult, Grid};
use cavern_mesh::Tile;
use cavern_procedural::{CarveStats, CaveCarver, CaveSeed};
use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GenerationConfig};
use crate::placement::TilePlacement;

/// Summary of one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationReport {
    /// Seed the cave was carved from.
    pub seed: CaveSeed,
    /// Carver statistics.
    pub carve: CarveStats,
    /// Tiles handed to the placement.
    pub tiles: usize,
    /// Vertices across all tiles.
    pub vertices: usize,
    /// Triangles across all tiles.
    pub triangles: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:        {}", self.seed.value())?;
        writeln!(
            f,
            "carve:       {} of {} target ({} nominal, factor {:.3})",
            self.carve.counted, self.carve.effective_length, self.carve.nominal_length, self.carve.draw_factor
        )?;
        writeln!(
            f,
            "walk:        {} steps, {} resets",
            self.carve.iterations, self.carve.resets
        )?;
        writeln!(
            f,
            "correction:  {} cells in {} sweeps",
            self.carve.correction.cells_carved, self.carve.correction.sweeps
        )?;
        writeln!(f, "carved:      {} cells", self.carve.carved_cells)?;
        writeln!(
            f,
            "mesh:        {} tiles, {} vertices, {} triangles",
            self.tiles, self.vertices, self.triangles
        )?;
        write!(f, "elapsed:     {:?}", self.elapsed)
    }
}

/// Output of a successful run.
#[derive(Clone, Debug)]
pub struct Generation {
    /// The sealed grid, shared read-only.
    pub grid: Arc<Grid>,
    /// Run summary.
    pub report: GenerationReport,
}

type Callback = Box<dyn FnMut(&GenerationReport) + Send>;

/// Carve, tile and place according to a [`GenerationConfig`].
pub struct CavePipeline {
    config: GenerationConfig,
    on_complete: Option<Callback>,
    notify: Option<Sender<GenerationReport>>,
}

impl fmt::Debug for CavePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CavePipeline")
            .field("config", &self.config)
            .field("on_complete", &self.on_complete.is_some())
            .field("notify", &self.notify.is_some())
            .finish()
    }
}

impl CavePipeline {
    /// Creates a pipeline after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration cannot run.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, on_complete: None, notify: None })
    }

    /// Registers a callback run after every successful generation.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnMut(&GenerationReport) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Sends a copy of every report through `sender`.
    #[must_use]
    pub fn notify(mut self, sender: Sender<GenerationReport>) -> Self {
        self.notify = Some(sender);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs the pipeline and hands the tiles to `placement`.
    ///
    /// # Errors
    ///
    /// Propagates carve and tiling errors. The placement is left untouched
    /// on error.
    pub fn run<P: TilePlacement + ?Sized>(&mut self, placement: &mut P) -> CaveResult<Generation> {
        let started = Instant::now();
        let seed = self.config.resolve_seed();
        if self.config.carve.random_seed {
            info!(seed = seed.value(), "drew fresh seed");
        }

        let params = self.config.carve_parameters(seed);
        let (grid, carve) = CaveCarver::new(params)?.carve_with_stats()?;
        let grid = grid.into_shared();

        let tiler = self.config.tiler()?;
        let tiles = if self.config.tiling.parallel {
            tiler.tile_parallel(&grid)?
        } else {
            tiler.tile(&grid)?
        };

        let (vertices, triangles) = mesh_totals(&tiles);
        let tile_count = tiles.len();
        debug!(tiles = tile_count, vertices, triangles, "placing tiles");
        placement.place(self.config.tiling.origin, tiles);

        let report = GenerationReport {
            seed,
            carve,
            tiles: tile_count,
            vertices,
            triangles,
            elapsed: started.elapsed(),
        };

        info!(
            seed = seed.value(),
            carved = carve.carved_cells,
            tiles = tile_count,
            triangles,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "generation complete"
        );

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&report);
        }
        if let Some(sender) = &self.notify {
            if sender.send(report).is_err() {
                warn!("completion receiver dropped");
                self.notify = None;
            }
        }

        Ok(Generation { grid, report })
    }
}

fn mesh_totals(tiles: &[Tile]) -> (usize, usize) {
    tiles.iter().fold((0, 0), |(v, t), tile| {
        (v + tile.mesh.vertex_count(), t + tile.mesh.triangle_count())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::TileSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_config() -> GenerationConfig {
        let mut config = GenerationConfig::default();
        config.carve.width = 24;
        config.carve.height = 24;
        config.carve.border = 2;
        config.carve.target_length = 40;
        config.tiling.chunk_edge = 8;
        config
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = small_config();
        config.tiling.scale = -1.0;
        assert!(CavePipeline::new(config).is_err());
    }

    #[test]
    fn test_report_matches_placement() {
        let mut set = TileSet::new();
        let out = CavePipeline::new(small_config()).unwrap().run(&mut set).unwrap();

        assert_eq!(out.report.tiles, set.len());
        assert_eq!(out.report.triangles, set.triangle_count());
        assert_eq!(out.report.seed, CaveSeed::new(420));
        assert!(out.grid.is_sealed());
        assert_eq!(out.report.carve.carved_cells, out.grid.carved_count());
    }

    #[test]
    fn test_callback_and_channel_fire_once_per_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (tx, rx) = crossbeam_channel::unbounded();

        let mut pipeline = CavePipeline::new(small_config())
            .unwrap()
            .on_complete(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .notify(tx);

        let mut set = TileSet::new();
        pipeline.run(&mut set).unwrap();
        pipeline.run(&mut set).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(set.generation(), 2);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut sequential = TileSet::new();
        let mut parallel = TileSet::new();

        let mut config = small_config();
        let a = CavePipeline::new(config.clone()).unwrap().run(&mut sequential).unwrap();
        config.tiling.parallel = true;
        let b = CavePipeline::new(config).unwrap().run(&mut parallel).unwrap();

        assert_eq!(a.report.triangles, b.report.triangles);
        assert!(sequential.iter().zip(parallel.iter()).all(|(x, y)| x == y));
    }

    #[test]
    fn test_random_seed_reported() {
        let mut config = small_config();
        config.carve.random_seed = true;
        let out = CavePipeline::new(config).unwrap().run(&mut TileSet::new()).unwrap();
        let seed = out.report.seed.value();
        assert!((CaveSeed::FRESH_MIN..=CaveSeed::FRESH_MAX).contains(&seed));
    }
}
