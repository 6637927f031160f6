//! Grid and pixel coordinates
//!
//! Logical positions address pyramid cells: `y` is the row counted from the
//! bottom and `x` runs along the base, so a hop changes both by one step.
//! Pixel positions are screen coordinates with y growing downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// An immutable integer coordinate (grid cell or pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position2D(IVec2);

impl Position2D {
    /// Parking spot for characters that have been created but not placed yet
    pub const UNDEFINED: Position2D = Position2D(IVec2::new(-1000, -1000));

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.0.y
    }

    /// Offset by the given deltas
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self(self.0 + IVec2::new(dx, dy))
    }

    /// Neighbouring cell reached by hopping in `dir` with the given step
    #[inline]
    pub fn hop(&self, dir: Direction, step: i32) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx * step, dy * step)
    }

    #[inline]
    pub fn as_ivec2(&self) -> IVec2 {
        self.0
    }

    /// Whether this logical position is a pyramid tile
    pub fn is_tile(&self) -> bool {
        let (x, y) = (self.x(), self.y());
        (0..MAP_ROWS).contains(&y)
            && (x - MAP_CENTER_X).abs() <= MAP_ROWS - 1 - y
            && (x + y) % 2 == 0
    }

    /// Whether the position is on the bottom row of the pyramid
    pub fn is_bottom_row(&self) -> bool {
        self.y() == 0 && self.is_tile()
    }

    /// Pixel position of the sprite standing on this logical cell
    pub fn to_pixel(&self) -> Position2D {
        Position2D::new(
            MAP_ORIGIN_X + self.x() * CUBE_WIDTH / 2,
            MAP_ORIGIN_Y + (MAP_ROWS - 1 - self.y()) * ROW_HEIGHT,
        )
    }

    /// Manhattan distance, used by chasers to rank candidate hops
    pub fn manhattan(&self, other: Position2D) -> i32 {
        (self.x() - other.x()).abs() + (self.y() - other.y()).abs()
    }
}

impl From<(i32, i32)> for Position2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The top tile of the pyramid, where the player starts every round
pub const TOP_TILE: Position2D = Position2D::new(MAP_CENTER_X, MAP_ROWS - 1);

/// The four diagonal hops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Logical (dx, dy) for a unit step
    #[inline]
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, 1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (1, -1),
        }
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        matches!(self, Direction::UpLeft | Direction::UpRight)
    }

    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Direction::UpLeft | Direction::DownLeft)
    }
}
