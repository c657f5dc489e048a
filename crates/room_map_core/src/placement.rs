//! Directional room placement
//!
//! Placing `second` next to `first` in a direction returns `second`'s origin
//! relative to `first`'s origin, chosen so that `first`'s entrance on that
//! side and `second`'s entrance on the opposite side coincide.

use crate::{Direction, GridPos, MapResult, RoomGeometry};

impl Direction {
    /// Offset of `second` when attached to `first` on this side
    pub fn place(self, first: &RoomGeometry, second: &RoomGeometry) -> MapResult<GridPos> {
        let exit = first.entrance(self)?;
        let entry = second.entrance(self.opposite())?;

        let offset = match self {
            Direction::Left => GridPos::new(exit.x - second.width, exit.y - entry.y),
            Direction::Right => GridPos::new(exit.x, exit.y - entry.y),
            Direction::Top => GridPos::new(exit.x - entry.x, -second.height),
            Direction::Bottom => GridPos::new(exit.x - entry.x, exit.y),
        };
        Ok(offset)
    }
}
