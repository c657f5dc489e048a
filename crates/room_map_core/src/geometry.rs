//! Integer coordinates and pixel rectangles
//!
//! `GridPos` is used both for tile-unit positions (cells, entrances, room
//! offsets) and pixel offsets; which one is meant depends on context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A 2D integer coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ZERO: GridPos = GridPos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale a tile-unit position into pixel space
    pub fn to_pixels(self, tile_width: u32, tile_height: u32) -> GridPos {
        GridPos::new(self.x * tile_width as i32, self.y * tile_height as i32)
    }
}

impl From<[i32; 2]> for GridPos {
    fn from([x, y]: [i32; 2]) -> Self {
        GridPos::new(x, y)
    }
}

impl From<GridPos> for [i32; 2] {
    fn from(pos: GridPos) -> Self {
        [pos.x, pos.y]
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GridPos {
    fn add_assign(&mut self, rhs: GridPos) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for GridPos {
    type Output = GridPos;

    fn neg(self) -> GridPos {
        GridPos::new(-self.x, -self.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(feature = "bevy")]
impl From<GridPos> for bevy::math::IVec2 {
    fn from(pos: GridPos) -> Self {
        bevy::math::IVec2::new(pos.x, pos.y)
    }
}

#[cfg(feature = "bevy")]
impl From<bevy::math::IVec2> for GridPos {
    fn from(v: bevy::math::IVec2) -> Self {
        GridPos::new(v.x, v.y)
    }
}

/// An axis-aligned rectangle in pixels (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Move the rectangle by a pixel offset
    pub fn translated(self, offset: GridPos) -> PixelRect {
        PixelRect {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self
        }
    }

    /// Check whether a pixel lies inside this rectangle
    pub fn contains(&self, point: GridPos) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width as i32
            && point.y < self.y + self.height as i32
    }
}

#[cfg(feature = "bevy")]
impl From<PixelRect> for bevy::math::Rect {
    fn from(rect: PixelRect) -> Self {
        bevy::math::Rect::new(
            rect.x as f32,
            rect.y as f32,
            (rect.x + rect.width as i32) as f32,
            (rect.y + rect.height as i32) as f32,
        )
    }
}
