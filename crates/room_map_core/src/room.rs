//! Room shapes and the directions rooms connect through

use crate::{GridPos, MapError, MapResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Side of a room a connection leaves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    /// Get display name for logs and errors
    pub fn display_name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        }
    }

    /// Get the opposite direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    /// Returns all direction variants
    pub fn all() -> &'static [Direction] {
        &[
            Direction::Left,
            Direction::Right,
            Direction::Top,
            Direction::Bottom,
        ]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Static shape of a room: size in tiles and one entrance per connected side
///
/// Entrances sit on the boundary line of their side: a Left entrance has
/// `x == 0`, Right `x == width`, Top `y == 0`, Bottom `y == height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGeometry {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub entrances: BTreeMap<Direction, GridPos>,
}

impl RoomGeometry {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            entrances: BTreeMap::new(),
        }
    }

    /// Add an entrance on a side
    pub fn with_entrance(mut self, direction: Direction, entrance: impl Into<GridPos>) -> Self {
        self.entrances.insert(direction, entrance.into());
        self
    }

    /// Entrance on a side; a missing entrance is an error, never the origin
    pub fn entrance(&self, direction: Direction) -> MapResult<GridPos> {
        self.entrances
            .get(&direction)
            .copied()
            .ok_or_else(|| MapError::MissingEntrance {
                room: self.name.clone(),
                direction,
            })
    }

    pub fn has_entrance(&self, direction: Direction) -> bool {
        self.entrances.contains_key(&direction)
    }

    /// Check every declared entrance lies on its own edge
    pub fn validate(&self) -> MapResult<()> {
        for (&direction, &entrance) in &self.entrances {
            let on_edge = match direction {
                Direction::Left => entrance.x == 0 && (0..=self.height).contains(&entrance.y),
                Direction::Right => {
                    entrance.x == self.width && (0..=self.height).contains(&entrance.y)
                }
                Direction::Top => entrance.y == 0 && (0..=self.width).contains(&entrance.x),
                Direction::Bottom => {
                    entrance.y == self.height && (0..=self.width).contains(&entrance.x)
                }
            };
            if !on_edge {
                return Err(MapError::EntranceOffEdge {
                    room: self.name.clone(),
                    direction,
                    entrance,
                });
            }
        }
        Ok(())
    }
}
