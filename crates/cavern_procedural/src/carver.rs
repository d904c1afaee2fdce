//! # Cave Carver
//!
//! Random-walk carving of a single connected cave into an all-wall grid.
//!
//! ## Algorithm
//!
//! ```text
//! r         = max(draw(), 0.5)
//! effective = floor(nominal * r)
//! p         = centre
//!
//! while counted < effective:
//!     step = protocol.draw()
//!     if p is eligible:
//!         if p + 2*step is off-grid or uncarved: counted += 1
//!         carve p and its four neighbours
//!     else:
//!         p = centre
//!     p += step
//!
//! correction(mode)
//! seal
//! ```
//!
//! The walk always returns to the centre, so the carved area is a single
//! connected region around it. `counted` is a heuristic: it measures fresh
//! ground *ahead* of the walker, not cells actually carved.

use cavern_core::{CaveError, CaveResult, Grid};
use rand::Rng;
use tracing::{debug, info, trace};

use crate::correction::{correct, CorrectionReport};
use crate::params::CarveParameters;
use crate::walk::Point;

/// Lower clamp applied to the random length factor.
pub const MIN_DRAW_FACTOR: f64 = 0.5;

/// How far past `effective` the counter may run before the carve is
/// declared runaway.
pub const RUNAWAY_SLACK: i64 = 5;

/// Default status of a fresh carver grid: `false` means wall.
pub const WALL_STATUS: bool = false;

/// What happened during one carve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CarveStats {
    /// Target before the random factor.
    pub nominal_length: i64,
    /// Target after the random factor.
    pub effective_length: i64,
    /// The random factor, after clamping to [`MIN_DRAW_FACTOR`].
    pub draw_factor: f64,
    /// Walk iterations (one step draw each).
    pub iterations: u64,
    /// Times the walker left the eligible region and went back to the centre.
    pub resets: u64,
    /// Final value of the fresh-ground counter.
    pub counted: i64,
    /// Correction stage summary.
    pub correction: CorrectionReport,
    /// Carved cells in the finished grid.
    pub carved_cells: usize,
}

/// Random-walk cave generator.
///
/// Holds validated parameters; every [`CaveCarver::carve`] call starts a
/// fresh random stream, so repeated calls return identical grids.
#[derive(Clone, Debug)]
pub struct CaveCarver {
    params: CarveParameters,
}

impl CaveCarver {
    /// Creates a carver after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] if the parameters cannot
    /// produce a cave.
    pub fn new(params: CarveParameters) -> CaveResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters this carver was built with.
    #[must_use]
    pub const fn params(&self) -> &CarveParameters {
        &self.params
    }

    /// Carves a cave and returns the sealed grid.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::RunawayGeneration`] if the walk counter overshoots
    /// its target; grid errors are propagated.
    pub fn carve(&self) -> CaveResult<Grid> {
        self.carve_with_stats().map(|(grid, _)| grid)
    }

    /// Carves a cave and returns the sealed grid with run statistics.
    ///
    /// # Errors
    ///
    /// Same as [`CaveCarver::carve`].
    pub fn carve_with_stats(&self) -> CaveResult<(Grid, CarveStats)> {
        let params = &self.params;
        let mut grid = Grid::new(params.width, params.height, WALL_STATUS)?;
        let mut rng = params.seed.rng();

        let nominal = params.nominal_length();
        let factor = rng.gen::<f64>().max(MIN_DRAW_FACTOR);
        let effective = (nominal as f64 * factor).floor() as i64;
        let limit = effective + RUNAWAY_SLACK;

        debug!(
            seed = params.seed.value(),
            width = params.width,
            height = params.height,
            nominal,
            effective,
            factor,
            "carve started"
        );

        let region = params.region();
        let center = params.center();
        let mut point = center;
        let mut stats = CarveStats {
            nominal_length: nominal,
            effective_length: effective,
            draw_factor: factor,
            ..CarveStats::default()
        };

        while stats.counted < effective {
            stats.iterations += 1;
            let step = params.step_protocol.draw(&mut rng);

            if region.contains(point) {
                let ahead = point.offset(step, 2);
                let fresh = !grid.contains(ahead.x, ahead.y) || !grid.is_carved(ahead.x, ahead.y)?;
                if fresh {
                    stats.counted += 1;
                }
                carve_footprint(&mut grid, point)?;
            } else {
                trace!(x = point.x, y = point.y, "walker left region, reset");
                stats.resets += 1;
                point = center;
            }

            point = point.offset(step, 1);
            check_runaway(stats.counted, limit)?;
        }

        stats.correction = correct(&mut grid, params.correction)?;
        grid.seal();
        stats.carved_cells = grid.carved_count();

        info!(
            seed = params.seed.value(),
            iterations = stats.iterations,
            resets = stats.resets,
            carved = stats.carved_cells,
            corrected = stats.correction.cells_carved,
            "cave carved"
        );

        Ok((grid, stats))
    }
}

/// Fails once the fresh-ground counter has passed `limit`.
fn check_runaway(counted: i64, limit: i64) -> CaveResult<()> {
    if counted > limit {
        return Err(CaveError::RunawayGeneration { carved: counted, limit });
    }
    Ok(())
}

/// Carves `point` and its four orthogonal neighbours.
fn carve_footprint(grid: &mut Grid, point: Point) -> CaveResult<()> {
    grid.carve(point.x, point.y)?;
    for n in point.neighbors() {
        grid.carve(n.x, n.y)?;
    }
    Ok(())
}

/// Validates `params` and carves one cave.
///
/// # Errors
///
/// See [`CaveCarver::new`] and [`CaveCarver::carve`].
pub fn carve(params: &CarveParameters) -> CaveResult<Grid> {
    CaveCarver::new(params.clone())?.carve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CorrectionMode;

    #[test]
    fn test_grid_is_sealed() {
        let mut grid = carve(&CarveParameters::new(16, 16).with_border(2)).unwrap();
        assert!(grid.is_sealed());
        assert!(matches!(grid.carve(8, 8), Err(CaveError::ReadOnly(_))));
    }

    #[test]
    fn test_centre_always_carved() {
        for seed in 0..20 {
            let params = CarveParameters::new(20, 14)
                .with_border(2)
                .with_target_length(30)
                .with_seed(seed);
            let grid = carve(&params).unwrap();
            assert!(grid.is_carved(10, 7).unwrap(), "seed {seed}");
        }
    }

    #[test]
    fn test_border_band_stays_wall() {
        let params = CarveParameters::new(32, 24).with_border(3).with_target_length(0);
        let grid = carve(&params).unwrap();
        // Footprints of eligible points reach one cell into the band.
        for y in 0..24 {
            for x in 0..32 {
                if x < 3 || y < 3 || x > 28 || y > 20 {
                    assert!(!grid.is_carved(x, y).unwrap(), "({x}, {y}) carved");
                }
            }
        }
    }

    #[test]
    fn test_stats_are_consistent() {
        let params = CarveParameters::new(24, 24).with_border(2).with_target_length(40);
        let (grid, stats) = CaveCarver::new(params).unwrap().carve_with_stats().unwrap();

        assert_eq!(stats.nominal_length, 40);
        assert!(stats.draw_factor >= MIN_DRAW_FACTOR && stats.draw_factor < 1.0);
        assert_eq!(stats.effective_length, (40.0 * stats.draw_factor).floor() as i64);
        assert_eq!(stats.counted, stats.effective_length);
        assert!(stats.iterations >= stats.counted as u64);
        assert_eq!(stats.carved_cells, grid.carved_count());
    }

    #[test]
    fn test_repeat_calls_identical() {
        let carver = CaveCarver::new(
            CarveParameters::new(40, 30)
                .with_border(4)
                .with_correction(CorrectionMode::SinglePass),
        )
        .unwrap();
        assert_eq!(carver.carve().unwrap(), carver.carve().unwrap());
    }

    #[test]
    fn test_runaway_guard() {
        let limit = 3 + RUNAWAY_SLACK;
        assert!(check_runaway(0, limit).is_ok());
        assert!(check_runaway(limit, limit).is_ok());
        assert_eq!(
            check_runaway(limit + 1, limit),
            Err(CaveError::RunawayGeneration { carved: limit + 1, limit })
        );
    }

    #[test]
    fn test_invalid_parameters_rejected_up_front() {
        let err = CaveCarver::new(CarveParameters::new(6, 6).with_border(2)).unwrap_err();
        assert!(matches!(err, CaveError::InvalidParameters(_)));
    }
}
