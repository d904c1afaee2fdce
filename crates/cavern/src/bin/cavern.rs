//! # CAVERN Generator
//!
//! Headless cave generation from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: 64x64, border 8, seed 420, 16-cell tiles
//! cavern
//!
//! # From a file, with overrides
//! cavern --config cave.toml --seed 1234 --parallel
//!
//! # A fresh seed every run, grid printed to stdout
//! cavern --random-seed --print-grid
//!
//! # More detail
//! RUST_LOG=debug cavern
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use cavern::mesh::EdgePolicy;
use cavern::{CavePipeline, GenerationConfig, TileSet};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cavern")]
#[command(about = "Carve a random-walk cave and triangulate it into tiles")]
struct Args {
    /// TOML configuration file (command line flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Solid band along every edge, in cells
    #[arg(short, long)]
    border: Option<i32>,

    /// Carve target (0 or less: a third of the area)
    #[arg(short, long, allow_hyphen_values = true)]
    target: Option<i64>,

    /// Seed
    #[arg(short, long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Draw a fresh seed instead of using the configured one
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,

    /// Tile edge length in cells
    #[arg(long)]
    chunk_edge: Option<usize>,

    /// Distance between neighbouring vertices
    #[arg(long)]
    scale: Option<f32>,

    /// Tiles overhanging the grid: clamp or trim
    #[arg(long)]
    edge_policy: Option<EdgePolicy>,

    /// Triangulate tiles in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the carved grid ('#' wall, '.' cave)
    #[arg(long)]
    print_grid: bool,
}

impl Args {
    fn apply(&self, config: &mut GenerationConfig) {
        if let Some(width) = self.width {
            config.carve.width = width;
        }
        if let Some(height) = self.height {
            config.carve.height = height;
        }
        if let Some(border) = self.border {
            config.carve.border = border;
        }
        if let Some(target) = self.target {
            config.carve.target_length = target;
        }
        if let Some(seed) = self.seed {
            config.carve.seed = seed;
            config.carve.random_seed = false;
        }
        if self.random_seed {
            config.carve.random_seed = true;
        }
        if let Some(edge) = self.chunk_edge {
            config.tiling.chunk_edge = edge;
        }
        if let Some(scale) = self.scale {
            config.tiling.scale = scale;
        }
        if let Some(policy) = self.edge_policy {
            config.tiling.edge_policy = policy;
        }
        if self.parallel {
            config.tiling.parallel = true;
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    args.apply(&mut config);

    let mut pipeline = CavePipeline::new(config)?;
    let mut tiles = TileSet::new();
    let generation = pipeline.run(&mut tiles)?;

    if args.print_grid {
        println!("{}", generation.grid);
        println!();
    }
    println!("{}", generation.report);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
