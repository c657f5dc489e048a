//! Core data structures for room_map
//!
//! This crate provides the plain-data side of world building:
//! - `TileMap` - A tile-grid map description with tilesets and layers
//! - `Tileset` - Tileset table entry and tile sub-rectangle math
//! - `TileLayer` - One grid of tile ids with a role (normal or collision)
//! - `RoomGeometry` - A room's size and entrances
//! - `Direction::place` - Directional placement of one room next to another
//! - `WorldDesc` / `RoomGraph` - Room graph description, validation and layout
//!
//! Nothing here touches storage; loading lives in `room_map_runtime`.

mod error;
mod geometry;
mod layer;
mod map;
mod placement;
mod room;
mod tileset;
mod world;

pub use error::{MapError, MapResult};
pub use geometry::{GridPos, PixelRect};
pub use layer::{grid_cell_count, LayerRole, TileLayer, EMPTY_TILE, MAX_GRID_CELLS};
pub use map::TileMap;
pub use room::{Direction, RoomGeometry};
pub use tileset::{tileset_for_gid, Tileset};
pub use world::{RoomConnection, RoomDesc, RoomGraph, RoomMapSource, RoomPlacement, WorldDesc};
