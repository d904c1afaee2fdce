//! # Cave Seeds
//!
//! Every carve derives from a single signed 64-bit seed.
//!
//! ## Determinism Guarantee
//!
//! The seed feeds a `ChaCha8Rng` through `SeedableRng::seed_from_u64`. ChaCha
//! output is specified independently of platform and word size, so a given
//! `CaveSeed` produces **exactly** the same draw sequence everywhere.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed for deterministic cave generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaveSeed(i64);

impl CaveSeed {
    /// Smallest seed handed out by [`CaveSeed::fresh`].
    pub const FRESH_MIN: i64 = 1_000_000;

    /// Largest seed handed out by [`CaveSeed::fresh`].
    pub const FRESH_MAX: i64 = 9_999_999;

    /// Creates a new seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Draws a new seed from OS entropy.
    ///
    /// Fresh seeds are seven-digit numbers so they are easy to read back
    /// from a log and type into a config file.
    #[must_use]
    pub fn fresh() -> Self {
        Self(rand::thread_rng().gen_range(Self::FRESH_MIN..=Self::FRESH_MAX))
    }

    /// Builds the deterministic random stream for this seed.
    ///
    /// The seed's two's-complement bits are used unchanged, so `-1` and
    /// `u64::MAX` name the same stream.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(u64::from_le_bytes(self.0.to_le_bytes()))
    }
}

impl Default for CaveSeed {
    fn default() -> Self {
        Self(420)
    }
}

impl From<i64> for CaveSeed {
    fn from(seed: i64) -> Self {
        Self(seed)
    }
}
