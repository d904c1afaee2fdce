//! # Carve Parameters
//!
//! Everything a carve depends on. Two carves with equal parameters produce
//! bit-identical grids.
//!
//! ## Defaults
//!
//! | field            | default       |
//! |------------------|---------------|
//! | `width x height` | 64 x 64       |
//! | `border`         | 8             |
//! | `target_length`  | 666           |
//! | `seed`           | 420           |
//! | `step_protocol`  | `reference`   |
//! | `correction`     | `single_pass` |

use cavern_core::{CaveError, CaveResult};
use serde::{Deserialize, Serialize};

use crate::correction::CorrectionMode;
use crate::seed::CaveSeed;
use crate::walk::{Point, Region, StepProtocol};

/// Smallest eligible span (cells per axis) a walk can make progress in.
///
/// With fewer cells every step off the centre lands outside the region and
/// is reset, forever.
pub const MIN_ELIGIBLE_SPAN: i32 = 3;

/// Parameters of a single carve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParameters {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// No carving within `border` cells of any edge.
    pub border: i32,
    /// Newly carved cells to aim for; `<= 0` means `width * height / 3`.
    pub target_length: i64,
    /// Seed of the random stream.
    pub seed: CaveSeed,
    /// Direction draw protocol.
    pub step_protocol: StepProtocol,
    /// Correction sweeps after the walk.
    pub correction: CorrectionMode,
}

impl Default for CarveParameters {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            border: 8,
            target_length: 666,
            seed: CaveSeed::default(),
            step_protocol: StepProtocol::default(),
            correction: CorrectionMode::default(),
        }
    }
}

impl CarveParameters {
    /// Creates parameters for a `width x height` grid with default settings.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// Sets the border inset.
    #[must_use]
    pub const fn with_border(mut self, border: i32) -> Self {
        self.border = border;
        self
    }

    /// Sets the target length (`<= 0` selects the area-based default).
    #[must_use]
    pub const fn with_target_length(mut self, target_length: i64) -> Self {
        self.target_length = target_length;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: i64) -> Self {
        self.seed = CaveSeed::new(seed);
        self
    }

    /// Sets the direction draw protocol.
    #[must_use]
    pub const fn with_step_protocol(mut self, protocol: StepProtocol) -> Self {
        self.step_protocol = protocol;
        self
    }

    /// Sets the correction mode.
    #[must_use]
    pub const fn with_correction(mut self, correction: CorrectionMode) -> Self {
        self.correction = correction;
        self
    }

    /// The target before the random factor is applied.
    #[must_use]
    pub fn nominal_length(&self) -> i64 {
        if self.target_length > 0 {
            self.target_length
        } else {
            (self.width as i64 * self.height as i64) / 3
        }
    }

    /// Grid centre, where the walk starts and resets to.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width as i32 / 2, self.height as i32 / 2)
    }

    /// The carve-eligible interior.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::inset(self.width as i32, self.height as i32, self.border)
    }

    /// Checks the parameters before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] for a zero or oversized grid,
    /// a negative border, or a border that leaves fewer than
    /// [`MIN_ELIGIBLE_SPAN`] eligible cells on either axis.
    pub fn validate(&self) -> CaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaveError::invalid(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(CaveError::invalid(format!(
                "size {}x{} exceeds the i32 coordinate space",
                self.width, self.height
            )));
        }
        if self.border < 0 {
            return Err(CaveError::invalid(format!(
                "border must not be negative, got {}",
                self.border
            )));
        }

        let region = self.region();
        if region.span_x() < MIN_ELIGIBLE_SPAN || region.span_y() < MIN_ELIGIBLE_SPAN {
            return Err(CaveError::invalid(format!(
                "border {} leaves a {}x{} carvable interior in a {}x{} grid, need at least {MIN_ELIGIBLE_SPAN}x{MIN_ELIGIBLE_SPAN}",
                self.border,
                region.span_x().max(0),
                region.span_y().max(0),
                self.width,
                self.height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = CarveParameters::default();
        assert_eq!((params.width, params.height), (64, 64));
        assert_eq!(params.border, 8);
        assert_eq!(params.target_length, 666);
        assert_eq!(params.seed, CaveSeed::new(420));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_nominal_length_defaults_to_third_of_area() {
        let params = CarveParameters::new(30, 20).with_border(1).with_target_length(0);
        assert_eq!(params.nominal_length(), 200);
        assert_eq!(params.with_target_length(-5).nominal_length(), 200);
    }

    #[test]
    fn test_center_and_region() {
        let params = CarveParameters::new(8, 8).with_border(1);
        assert_eq!(params.center(), Point::new(4, 4));
        assert!(params.region().contains(params.center()));
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = CarveParameters::new(0, 8).validate().unwrap_err();
        assert!(matches!(err, CaveError::InvalidParameters(_)));
    }

    #[test]
    fn test_rejects_negative_border() {
        let err = CarveParameters::new(16, 16).with_border(-1).validate().unwrap_err();
        assert!(matches!(err, CaveError::InvalidParameters(_)));
    }

    #[test]
    fn test_rejects_border_that_swallows_the_grid() {
        // 2 * border + 5 is the smallest workable dimension.
        assert!(CarveParameters::new(9, 9).with_border(2).validate().is_ok());
        assert!(CarveParameters::new(8, 9).with_border(2).validate().is_err());
        assert!(CarveParameters::new(9, 8).with_border(2).validate().is_err());
    }
}
