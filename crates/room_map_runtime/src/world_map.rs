//! The finished world map
//!
//! A [`WorldMap`] owns every cell and texture produced by one load session.
//! Cells live in a single arena ordered by room placement; rooms and the
//! coordinate index refer to them by position in that arena. Once built the
//! map is read-only for the simulation, render and pathfinding collaborators.

use crate::{TextureHandle, TextureSet, TileCell, TilesetTexture};
use bevy::prelude::Resource;
use room_map_core::{grid_cell_count, GridPos, MapError, MapResult};
use std::collections::HashMap;
use std::ops::Range;
use uuid::Uuid;

/// A room after placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedRoom {
    pub id: String,
    /// Absolute offset in tiles
    pub offset: GridPos,
    pub width: u32,
    pub height: u32,
    /// Range of this room's cells in [`WorldMap::cells`]
    pub cells: Range<usize>,
}

impl PlacedRoom {
    /// Check whether a global grid coordinate falls inside this room
    pub fn contains(&self, pos: GridPos) -> bool {
        let local = pos - self.offset;
        local.x >= 0 && local.y >= 0 && local.x < self.width as i32 && local.y < self.height as i32
    }
}

/// Resolved world: cells keyed by global grid coordinate
#[derive(Resource, Debug, Clone)]
pub struct WorldMap {
    name: String,
    tile_width: u32,
    tile_height: u32,
    textures: TextureSet,
    cells: Vec<TileCell>,
    index: HashMap<GridPos, usize>,
    rooms: Vec<PlacedRoom>,
}

impl WorldMap {
    pub(crate) fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        session: Uuid,
    ) -> Self {
        Self {
            name: name.into(),
            tile_width,
            tile_height,
            textures: TextureSet::empty(session),
            cells: Vec::new(),
            index: HashMap::new(),
            rooms: Vec::new(),
        }
    }

    /// Insert a room's cells, already translated to global coordinates
    pub(crate) fn insert_room(
        &mut self,
        id: &str,
        offset: GridPos,
        size: (u32, u32),
        cells: Vec<TileCell>,
    ) -> MapResult<()> {
        let start = self.cells.len();
        for cell in &cells {
            if let Some(&existing) = self.index.get(&cell.grid) {
                let owner = self
                    .room_of_cell(existing)
                    .map(|room| room.id.clone())
                    .unwrap_or_default();
                return Err(MapError::RoomOverlap {
                    room_a: owner,
                    room_b: id.to_string(),
                    position: cell.grid,
                });
            }
        }
        for (i, cell) in cells.iter().enumerate() {
            self.index.insert(cell.grid, start + i);
        }
        self.cells.extend(cells);
        self.rooms.push(PlacedRoom {
            id: id.to_string(),
            offset,
            width: size.0,
            height: size.1,
            cells: start..self.cells.len(),
        });
        Ok(())
    }

    pub(crate) fn set_textures(&mut self, textures: TextureSet) {
        self.textures = textures;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile size in pixels as `(width, height)`
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Every cell, room by room, each room row-major
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a global grid coordinate
    pub fn cell_at(&self, pos: GridPos) -> Option<&TileCell> {
        self.index.get(&pos).map(|&i| &self.cells[i])
    }

    /// Cell containing a global pixel position
    pub fn cell_at_pixel(&self, pixel: GridPos) -> Option<&TileCell> {
        let pos = GridPos::new(
            pixel.x.div_euclid(self.tile_width.max(1) as i32),
            pixel.y.div_euclid(self.tile_height.max(1) as i32),
        );
        self.cell_at(pos)
    }

    /// Rooms in placement order (root first)
    pub fn rooms(&self) -> &[PlacedRoom] {
        &self.rooms
    }

    pub fn room(&self, id: &str) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Room covering a global grid coordinate
    pub fn room_at(&self, pos: GridPos) -> Option<&PlacedRoom> {
        self.index.get(&pos).and_then(|&i| self.room_of_cell(i))
    }

    /// Cells belonging to one room
    pub fn room_cells(&self, id: &str) -> Option<&[TileCell]> {
        self.room(id).map(|room| &self.cells[room.cells.clone()])
    }

    fn room_of_cell(&self, cell: usize) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|room| room.cells.contains(&cell))
    }

    /// Texture behind a cell layer entry
    pub fn texture(&self, handle: TextureHandle) -> Option<&TilesetTexture> {
        self.textures.get(handle)
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn collidable_cells(&self) -> impl Iterator<Item = &TileCell> {
        self.cells.iter().filter(|cell| cell.collidable)
    }

    /// Grid extent covered by rooms as `(min, max)`, `max` exclusive
    pub fn bounds(&self) -> Option<(GridPos, GridPos)> {
        let mut rooms = self.rooms.iter();
        let first = rooms.next()?;
        let init = (
            first.offset,
            first.offset + GridPos::new(first.width as i32, first.height as i32),
        );
        Some(rooms.fold(init, |(min, max), room| {
            let end = room.offset + GridPos::new(room.width as i32, room.height as i32);
            (
                GridPos::new(min.x.min(room.offset.x), min.y.min(room.offset.y)),
                GridPos::new(max.x.max(end.x), max.y.max(end.y)),
            )
        }))
    }

    /// Dense obstacle grid over [`bounds`](Self::bounds) for pathfinding
    ///
    /// Collidable cells and coordinates no room covers are blocked. Rooms
    /// spread too far apart for one dense grid give `GridTooLarge`.
    pub fn obstacle_grid(&self) -> MapResult<ObstacleGrid> {
        let Some((min, max)) = self.bounds() else {
            return Ok(ObstacleGrid {
                origin: GridPos::ZERO,
                width: 0,
                height: 0,
                blocked: Vec::new(),
            });
        };
        let span = |lo: i32, hi: i32| {
            u32::try_from(i64::from(hi) - i64::from(lo)).unwrap_or(u32::MAX)
        };
        let (width, height) = (span(min.x, max.x), span(min.y, max.y));
        let mut blocked = vec![true; grid_cell_count(width, height)?];
        for cell in &self.cells {
            let local = cell.grid - min;
            blocked[local.y as usize * width as usize + local.x as usize] = cell.collidable;
        }
        Ok(ObstacleGrid {
            origin: min,
            width,
            height,
            blocked,
        })
    }
}

/// Read-only walkability grid handed to pathfinding and physics setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleGrid {
    /// Global grid coordinate of the first entry
    pub origin: GridPos,
    pub width: u32,
    pub height: u32,
    blocked: Vec<bool>,
}

impl ObstacleGrid {
    /// Whether a global grid coordinate is blocked; outside the grid is blocked
    pub fn is_blocked(&self, pos: GridPos) -> bool {
        let local = pos - self.origin;
        if local.x < 0
            || local.y < 0
            || local.x as u32 >= self.width
            || local.y as u32 >= self.height
        {
            return true;
        }
        self.blocked[local.y as usize * self.width as usize + local.x as usize]
    }

    pub fn walkable_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| !b).count()
    }

    /// Rows of `#` (blocked) and `.` (walkable)
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.blocked.len() + self.height as usize);
        for row in self.blocked.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|&b| if b { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}
