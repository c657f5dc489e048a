//! room_map_runtime - World loading for room_map
//!
//! This crate turns the descriptions from `room_map_core` into a finished,
//! read-only [`WorldMap`]:
//! - [`TextureCache`] - Loads each tileset image once per load session
//! - [`TileCellBuilder`] - Resolves every grid cell of a tile map
//! - [`WorldAssembler`] - Places rooms by their entrances and merges their cells
//! - [`load_world`] / [`load_single_map`] - File entry points
//! - [`RoomMapPlugin`] - Performs the load during Bevy's `Startup`
//!
//! A load either produces a complete map or an error; partial maps are
//! never exposed.

mod assembler;
mod cell_builder;
mod config;
mod loader;
mod plugin;
mod texture_cache;
mod world_map;

#[cfg(test)]
mod testing;

pub use assembler::WorldAssembler;
pub use cell_builder::{CellLayer, TileCell, TileCellBuilder};
pub use config::{CollisionRule, LoaderConfig, LEGACY_COLLISION_LAYER};
pub use loader::{
    load_single_map, load_world, parse_tile_map, parse_world, read_tile_map, read_world,
    resolve_room_maps,
};
pub use plugin::{LoadedWorld, MapSource, RoomMapPlugin, WorldLoadFailed, WorldLoadRequest};
pub use texture_cache::{
    FsImageSource, ImageSource, TextureCache, TextureHandle, TextureSet, TilesetTexture,
};
pub use world_map::{ObstacleGrid, PlacedRoom, WorldMap};

// Re-export core for convenience
pub use room_map_core;
