//! # Generation Configuration
//!
//! Everything one pipeline run needs, loadable from TOML.
//!
//! ```toml
//! [carve]
//! width = 64
//! height = 64
//! border = 8
//! target_length = 666
//! seed = 420
//! random_seed = false
//! step_protocol = "reference"   # or "cardinal"
//! correction = "single_pass"    # or "converge"
//!
//! [tiling]
//! chunk_edge = 16
//! scale = 1.0
//! edge_policy = "clamp"         # or "trim"
//! parallel = false
//! origin = { x = 0.0, y = 0.0, z = 0.0 }
//! ```
//!
//! Every key is optional; missing keys take the defaults shown.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cavern_core::{CaveError, Vec3};
use cavern_mesh::{EdgePolicy, Tiler};
use cavern_procedural::{CarveParameters, CaveSeed, CorrectionMode, StepProtocol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or checking a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("cannot access config file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written as TOML.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parse but describe an impossible run.
    #[error(transparent)]
    Invalid(#[from] CaveError),
}

/// Carving section (`[carve]`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarveConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Solid band width along every edge.
    pub border: i32,
    /// Carve target; `<= 0` means a third of the area.
    pub target_length: i64,
    /// Seed used unless `random_seed` is set.
    pub seed: i64,
    /// Draw a fresh seed for every run.
    pub random_seed: bool,
    /// Direction draw protocol.
    pub step_protocol: StepProtocol,
    /// Correction sweeps.
    pub correction: CorrectionMode,
}

impl Default for CarveConfig {
    fn default() -> Self {
        let params = CarveParameters::default();
        Self {
            width: params.width,
            height: params.height,
            border: params.border,
            target_length: params.target_length,
            seed: params.seed.value(),
            random_seed: false,
            step_protocol: params.step_protocol,
            correction: params.correction,
        }
    }
}

/// Tiling section (`[tiling]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilingConfig {
    /// Tile edge length in cells.
    pub chunk_edge: usize,
    /// Distance between neighbouring vertices.
    pub scale: f32,
    /// Handling of tiles that overhang the grid.
    pub edge_policy: EdgePolicy,
    /// Triangulate tiles on the rayon pool.
    pub parallel: bool,
    /// World position of the cave's first cell.
    pub origin: Vec3,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            chunk_edge: 16,
            scale: 1.0,
            edge_policy: EdgePolicy::default(),
            parallel: false,
            origin: Vec3::ZERO,
        }
    }
}

/// Full configuration of one generation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// `[carve]` table.
    pub carve: CarveConfig,
    /// `[tiling]` table.
    pub tiling: TilingConfig,
}

impl GenerationConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Serialize`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The seed for the next run: fresh if `random_seed` is set.
    #[must_use]
    pub fn resolve_seed(&self) -> CaveSeed {
        if self.carve.random_seed {
            CaveSeed::fresh()
        } else {
            CaveSeed::new(self.carve.seed)
        }
    }

    /// Carve parameters for a run with `seed`.
    #[must_use]
    pub fn carve_parameters(&self, seed: CaveSeed) -> CarveParameters {
        CarveParameters {
            width: self.carve.width,
            height: self.carve.height,
            border: self.carve.border,
            target_length: self.carve.target_length,
            seed,
            step_protocol: self.carve.step_protocol,
            correction: self.carve.correction,
        }
    }

    /// Tiler for the `[tiling]` section.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] for a bad edge or scale.
    pub fn tiler(&self) -> Result<Tiler, CaveError> {
        Ok(Tiler::new(self.tiling.chunk_edge, self.tiling.scale)?
            .with_policy(self.tiling.edge_policy))
    }

    /// Checks both sections without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.carve_parameters(CaveSeed::new(self.carve.seed)).validate()?;
        self.tiler()?;
        Ok(())
    }
}
