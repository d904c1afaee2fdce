//! # Cavern Error Types
//!
//! All errors that can occur while carving, triangulating or tiling.
//!
//! Every error is fatal to the call that produced it. Generation is
//! deterministic, so retrying with the same inputs reproduces the same
//! failure: callers wanting a different outcome change the seed or the
//! parameters.

use thiserror::Error;

/// Errors that can occur in the cave pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaveError {
    /// Grid access outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is out of range for a {width}x{height} grid")]
    OutOfRange {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// Attempted to replace or write cells of a grid that is read-only.
    #[error("grid is read-only: {0}")]
    ReadOnly(&'static str),

    /// The carve walk counted more cells than its own stop condition allows.
    #[error("runaway generation: carved {carved} cells, limit was {limit}")]
    RunawayGeneration {
        /// Cells counted when the guard tripped.
        carved: i64,
        /// The guard limit (`effective length + 5`).
        limit: i64,
    },

    /// Parameters rejected before any work started.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Mesh buffers whose lengths or indices disagree.
    #[error("malformed mesh: {0}")]
    MalformedMesh(String),
}

impl CaveError {
    /// Shorthand for an [`CaveError::InvalidParameters`] error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameters(reason.into())
    }
}

/// Result type for cave operations.
pub type CaveResult<T> = Result<T, CaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = CaveError::OutOfRange { x: -1, y: 3, width: 8, height: 8 };
        assert_eq!(err.to_string(), "cell (-1, 3) is out of range for a 8x8 grid");
    }

    #[test]
    fn test_invalid_shorthand() {
        let err = CaveError::invalid("scale must be positive");
        assert_eq!(err, CaveError::InvalidParameters("scale must be positive".into()));
    }
}
