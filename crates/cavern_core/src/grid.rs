//! # Occupancy Grid
//!
//! A fixed-size 2D boolean array plus the "default status": the value an
//! uncarved (wall) cell holds. A cell is *carved* when it differs from the
//! default status.
//!
//! ## Access Contract
//!
//! - Coordinates outside `[0, width) x [0, height)` fail with
//!   [`CaveError::OutOfRange`]. The grid never wraps or clamps; clamping is a
//!   tiling policy, not a storage one.
//! - The cell array can never be replaced wholesale.
//! - Once sealed (the carver seals what it returns), every write fails with
//!   [`CaveError::ReadOnly`].
//!
//! ## Layout
//!
//! Cells are stored row-major (`index = y * width + x`), the same order the
//! triangulator uses for its vertex buffer.

use std::fmt;
use std::sync::Arc;

use crate::error::{CaveError, CaveResult};

/// Character used for wall (uncarved) cells in text form.
pub const WALL_CHAR: char = '#';

/// Character used for carved cells in text form.
pub const CARVED_CHAR: char = '.';

/// A rectangular boolean occupancy grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Value of a freshly created, uncarved cell.
    default_status: bool,
    /// Row-major cell storage.
    cells: Vec<bool>,
    /// Set once generation is finished.
    sealed: bool,
}

impl Grid {
    /// Creates a grid with every cell set to `default_status`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] if either dimension is zero.
    pub fn new(width: usize, height: usize, default_status: bool) -> CaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaveError::invalid(format!(
                "grid size must be positive, got {width}x{height}"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(CaveError::invalid(format!(
                "grid size {width}x{height} exceeds the i32 coordinate space"
            )));
        }

        Ok(Self {
            width,
            height,
            default_status,
            cells: vec![default_status; width * height],
            sealed: false,
        })
    }

    /// Creates an all-wall grid whose default status is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] if either dimension is zero.
    pub fn walls(width: usize, height: usize) -> CaveResult<Self> {
        Self::new(width, height, false)
    }

    /// Builds an unsealed grid from text rows (`#` wall, `.` carved).
    ///
    /// Row `0` is `y = 0`. Mostly used for fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParameters`] for empty input, ragged rows
    /// or unknown characters.
    pub fn from_rows(rows: &[&str], default_status: bool) -> CaveResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::new(width, height, default_status)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(CaveError::invalid(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let carved = match ch {
                    WALL_CHAR => false,
                    CARVED_CHAR => true,
                    other => {
                        return Err(CaveError::invalid(format!(
                            "unknown cell character {other:?} at ({x}, {y})"
                        )))
                    }
                };
                grid.cells[y * width + x] = if carved { !default_status } else { default_status };
            }
        }

        Ok(grid)
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Value held by an uncarved cell.
    #[inline]
    #[must_use]
    pub const fn default_status(&self) -> bool {
        self.default_status
    }

    /// Whether the grid has been sealed against writes.
    #[inline]
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns true if `(x, y)` addresses a cell of this grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> CaveResult<usize> {
        if self.contains(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(CaveError::OutOfRange {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Reads a cell.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::OutOfRange`] outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> CaveResult<bool> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::ReadOnly`] on a sealed grid and
    /// [`CaveError::OutOfRange`] outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) -> CaveResult<()> {
        if self.sealed {
            return Err(CaveError::ReadOnly("grid was sealed after generation"));
        }
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Returns true if the cell differs from the default status.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::OutOfRange`] outside the grid.
    #[inline]
    pub fn is_carved(&self, x: i32, y: i32) -> CaveResult<bool> {
        self.get(x, y).map(|cell| cell != self.default_status)
    }

    /// Flips a cell to the carved state.
    ///
    /// # Errors
    ///
    /// Same as [`Grid::set`].
    #[inline]
    pub fn carve(&mut self, x: i32, y: i32) -> CaveResult<()> {
        self.set(x, y, !self.default_status)
    }

    /// Rejects wholesale replacement of the cell array.
    ///
    /// The grid is filled in place by its generator and is read-only
    /// afterwards; replacing the backing array is never allowed.
    ///
    /// # Errors
    ///
    /// Always returns [`CaveError::ReadOnly`]; `self` is left untouched.
    pub fn replace_cells(&mut self, _cells: Vec<bool>) -> CaveResult<()> {
        Err(CaveError::ReadOnly("cells cannot be replaced after construction"))
    }

    /// Seals the grid: all later writes fail.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Seals the grid and moves it behind an `Arc` for read-only sharing.
    #[must_use]
    pub fn into_shared(mut self) -> Arc<Self> {
        self.seal();
        Arc::new(self)
    }

    /// Row-major view of all cells.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// One row of cells.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::OutOfRange`] if `y` is not a row of the grid.
    pub fn row(&self, y: i32) -> CaveResult<&[bool]> {
        let start = self.index(0, y)?;
        Ok(&self.cells[start..start + self.width])
    }

    /// Number of carved cells.
    #[must_use]
    pub fn carved_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != self.default_status).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                let ch = if cell == self.default_status { WALL_CHAR } else { CARVED_CHAR };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Grid {}x{} (default {}, sealed {})",
            self.width, self.height, self.default_status, self.sealed
        )?;
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_default_status() {
        let grid = Grid::new(4, 3, true).unwrap();
        assert_eq!(grid.size(), (4, 3));
        assert!(grid.cells().iter().all(|&c| c));
        assert_eq!(grid.carved_count(), 0);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Grid::walls(0, 5), Err(CaveError::InvalidParameters(_))));
        assert!(matches!(Grid::walls(5, 0), Err(CaveError::InvalidParameters(_))));
    }

    #[test]
    fn test_bounds_on_all_four_edges() {
        let mut grid = Grid::walls(6, 4).unwrap();

        for (x, y) in [(-1, 0), (6, 0), (0, -1), (0, 4)] {
            assert!(
                matches!(grid.get(x, y), Err(CaveError::OutOfRange { .. })),
                "get({x}, {y}) should fail"
            );
            assert!(
                matches!(grid.set(x, y, true), Err(CaveError::OutOfRange { .. })),
                "set({x}, {y}) should fail"
            );
        }

        for y in 0..4 {
            for x in 0..6 {
                grid.set(x, y, true).unwrap();
                assert!(grid.get(x, y).unwrap());
            }
        }
    }

    #[test]
    fn test_replace_cells_is_rejected() {
        let mut grid = Grid::walls(3, 3).unwrap();
        grid.carve(1, 1).unwrap();
        let before = grid.clone();

        let result = grid.replace_cells(vec![true; 9]);

        assert!(matches!(result, Err(CaveError::ReadOnly(_))));
        assert_eq!(grid, before, "rejected replacement must not mutate");
    }

    #[test]
    fn test_sealed_grid_rejects_writes() {
        let mut grid = Grid::walls(3, 3).unwrap();
        grid.seal();
        assert!(matches!(grid.set(1, 1, true), Err(CaveError::ReadOnly(_))));
        assert!(!grid.get(1, 1).unwrap());
    }

    #[test]
    fn test_carve_respects_default_status() {
        let mut grid = Grid::new(3, 3, true).unwrap();
        grid.carve(2, 0).unwrap();
        assert!(!grid.get(2, 0).unwrap());
        assert!(grid.is_carved(2, 0).unwrap());
        assert!(!grid.is_carved(0, 0).unwrap());
    }

    #[test]
    fn test_text_round_trip() {
        let rows = ["####", "#..#", "####"];
        let grid = Grid::from_rows(&rows, false).unwrap();
        assert_eq!(grid.size(), (4, 3));
        assert!(grid.is_carved(1, 1).unwrap());
        assert_eq!(grid.carved_count(), 2);
        assert_eq!(grid.to_string(), rows.join("\n"));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Grid::from_rows(&["###", "##"], false);
        assert!(matches!(result, Err(CaveError::InvalidParameters(_))));
    }

    #[test]
    fn test_row_access() {
        let grid = Grid::from_rows(&["#.", ".#"], false).unwrap();
        assert_eq!(grid.row(1).unwrap(), &[true, false]);
        assert!(grid.row(2).is_err());
    }
}
