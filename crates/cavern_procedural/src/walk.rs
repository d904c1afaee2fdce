//! # Walker Primitives
//!
//! Points, unit steps and the two direction draw protocols.
//!
//! ## Draw Protocols
//!
//! ```text
//! Reference (3 draws / step)        Cardinal (1 draw / step)
//!
//!   axis      > 0.5 ? X : Y           index in 0..4
//!   magnitude > 0.5 ? 1 : 0             0 => +Y   1 => -Y
//!   sign      > 0.5 ? -m : m            2 => -X   3 => +X
//! ```
//!
//! `Reference` keeps the draw count and order of the reference engine, so a
//! seed names the same cave there and here. Its magnitude draw yields a zero
//! step half of the time; the walker then stays put for that iteration.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A grid position of the walker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `n` steps away along `step`.
    #[inline]
    #[must_use]
    pub const fn offset(self, step: Step, n: i32) -> Self {
        Self::new(self.x + step.dx * n, self.y + step.dy * n)
    }

    /// The four orthogonal neighbours (left, right, down, up).
    #[inline]
    #[must_use]
    pub const fn neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
        ]
    }
}

/// A walker step along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Step {
    /// Horizontal delta (-1, 0 or 1).
    pub dx: i32,
    /// Vertical delta (-1, 0 or 1).
    pub dy: i32,
}

impl Step {
    /// No movement.
    pub const STAY: Self = Self { dx: 0, dy: 0 };
    /// One cell towards +Y.
    pub const UP: Self = Self { dx: 0, dy: 1 };
    /// One cell towards -Y.
    pub const DOWN: Self = Self { dx: 0, dy: -1 };
    /// One cell towards -X.
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    /// One cell towards +X.
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };
}

/// How a step direction is drawn from the random stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepProtocol {
    /// Three coin flips per step: axis, magnitude, sign.
    #[default]
    Reference,
    /// One uniform four-way choice per step.
    Cardinal,
}

impl StepProtocol {
    /// Draws the next step.
    #[inline]
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> Step {
        match self {
            Self::Reference => {
                let horizontal = rng.gen::<f64>() > 0.5;
                let magnitude = i32::from(rng.gen::<f64>() > 0.5);
                let delta = if rng.gen::<f64>() > 0.5 { -magnitude } else { magnitude };
                if horizontal {
                    Step { dx: delta, dy: 0 }
                } else {
                    Step { dx: 0, dy: delta }
                }
            }
            Self::Cardinal => match rng.gen_range(0..4u8) {
                0 => Step::UP,
                1 => Step::DOWN,
                2 => Step::LEFT,
                _ => Step::RIGHT,
            },
        }
    }
}

/// The carve-eligible interior: strictly inside the border band.
///
/// A point is eligible when `border < x < width - border - 1` and likewise
/// for `y`. Eligible points keep their whole plus footprint on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Exclusive lower bound on both axes (the border).
    pub min_exclusive: i32,
    /// Exclusive upper bound on X.
    pub max_exclusive_x: i32,
    /// Exclusive upper bound on Y.
    pub max_exclusive_y: i32,
}

impl Region {
    /// The eligible region of a `width x height` grid with the given border.
    #[must_use]
    pub const fn inset(width: i32, height: i32, border: i32) -> Self {
        Self {
            min_exclusive: border,
            max_exclusive_x: width - border - 1,
            max_exclusive_y: height - border - 1,
        }
    }

    /// Returns true if `point` may be carved.
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x > self.min_exclusive
            && point.y > self.min_exclusive
            && point.x < self.max_exclusive_x
            && point.y < self.max_exclusive_y
    }

    /// Number of eligible columns.
    #[must_use]
    pub const fn span_x(&self) -> i32 {
        self.max_exclusive_x - self.min_exclusive - 1
    }

    /// Number of eligible rows.
    #[must_use]
    pub const fn span_y(&self) -> i32 {
        self.max_exclusive_y - self.min_exclusive - 1
    }
}
