//! # CAVERN Procedural Generation
//!
//! Deterministic random-walk cave carving.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same parameters always produce the same grid
//! 2. **Connected**: The walker always restarts from the centre
//! 3. **Bounded**: Nothing is carved inside the border band
//! 4. **Sealed**: The returned grid rejects every write
//!
//! ## Core Components
//!
//! - `CaveSeed`: Seed and ChaCha8 random stream
//! - `CarveParameters`: Size, border, target length, protocols
//! - `CaveCarver`: Random walk plus correction pass
//! - `correction`: Pillar and protrusion removal
//!
//! ## Example
//!
//! ```rust
//! use cavern_procedural::{CarveParameters, CaveCarver};
//!
//! let params = CarveParameters::new(8, 8)
//!     .with_border(1)
//!     .with_target_length(5)
//!     .with_seed(42);
//!
//! let grid = CaveCarver::new(params).unwrap().carve().unwrap();
//! assert!(grid.is_sealed());
//! assert!(grid.is_carved(4, 4).unwrap());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod carver;
pub mod correction;
pub mod params;
pub mod seed;
pub mod walk;

pub use carver::{carve, CarveStats, CaveCarver};
pub use correction::{correct, CorrectionMode, CorrectionReport};
pub use params::CarveParameters;
pub use seed::CaveSeed;
pub use walk::{Point, Region, Step, StepProtocol};
