//! # Correction Pass
//!
//! Post-carve smoothing. Every interior wall cell with fewer than two wall
//! neighbours (out of its four orthogonal ones) is forced carved. This
//! removes single-cell pillars and one-cell-wide protrusions.
//!
//! ## Sweep Order
//!
//! A sweep visits interior cells row by row (`y` outer, `x` inner) and
//! updates in place, so a cell can be carved because of an earlier carve in
//! the same sweep. The flip side: a wall cell that kept two wall neighbours
//! when visited may lose one later in the sweep. A single sweep is therefore
//! not idempotent; [`CorrectionMode::Converge`] repeats until nothing
//! changes.

use cavern_core::{CaveResult, Grid};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::walk::Point;

/// Minimum wall neighbours a wall cell needs to survive correction.
pub const MIN_WALL_NEIGHBORS: usize = 2;

/// How many correction sweeps to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Exactly one sweep.
    #[default]
    SinglePass,
    /// Sweep until a sweep carves nothing.
    Converge,
}

/// What the correction stage did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Sweeps performed (including the final no-op sweep under `Converge`).
    pub sweeps: usize,
    /// Cells carved across all sweeps.
    pub cells_carved: usize,
}

/// Counts the orthogonal neighbours of `point` that are still walls.
///
/// # Errors
///
/// Returns `OutOfRange` if any neighbour lies off the grid. Callers only ask
/// about interior cells, so this is a logic error, not a recoverable state.
pub fn wall_neighbors(grid: &Grid, point: Point) -> CaveResult<usize> {
    let mut walls = 0;
    for n in point.neighbors() {
        if !grid.is_carved(n.x, n.y)? {
            walls += 1;
        }
    }
    Ok(walls)
}

/// Runs one in-place sweep over the interior and returns the cells carved.
///
/// # Errors
///
/// Propagates grid access errors (out-of-range or sealed grid).
pub fn sweep(grid: &mut Grid) -> CaveResult<usize> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut carved = 0;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if wall_neighbors(grid, Point::new(x, y))? < MIN_WALL_NEIGHBORS
                && !grid.is_carved(x, y)?
            {
                grid.carve(x, y)?;
                carved += 1;
            }
        }
    }

    Ok(carved)
}

/// Applies the correction stage.
///
/// # Errors
///
/// Propagates grid access errors (out-of-range or sealed grid).
pub fn correct(grid: &mut Grid, mode: CorrectionMode) -> CaveResult<CorrectionReport> {
    let mut report = CorrectionReport::default();

    loop {
        let carved = sweep(grid)?;
        report.sweeps += 1;
        report.cells_carved += carved;
        trace!(sweep = report.sweeps, carved, "correction sweep");

        if carved == 0 || mode == CorrectionMode::SinglePass {
            break;
        }
    }

    debug!(
        sweeps = report.sweeps,
        cells = report.cells_carved,
        ?mode,
        "correction finished"
    );
    Ok(report)
}
