use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

/// Pixel coordinate in board-local space.
pub type Px = f32;

/// Counter type for moves and clicks.
pub type Count = u32;

/// Grid coordinates `(row, col)`.
pub type Cell2 = (usize, usize);

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Px,
    pub y: Px,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }

    /// True when both axes differ from `target` by strictly less than `tolerance`.
    pub fn is_near(self, target: Point, tolerance: Px) -> bool {
        distance(self.x, target.x) < tolerance && distance(self.y, target.y) < tolerance
    }
}

fn distance(a: Px, b: Px) -> Px {
    if a > b { a - b } else { b - a }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Px,
    pub height: Px,
}

impl Size {
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }
}

/// Quarter-turn orientation of a piece.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    pub const fn degrees(self) -> u16 {
        use Rotation::*;
        match self {
            Deg0 => 0,
            Deg90 => 90,
            Deg180 => 180,
            Deg270 => 270,
        }
    }

    /// Next orientation clockwise, wrapping 270 back to 0.
    pub const fn cycled(self) -> Self {
        use Rotation::*;
        match self {
            Deg0 => Deg90,
            Deg90 => Deg180,
            Deg180 => Deg270,
            Deg270 => Deg0,
        }
    }
}
