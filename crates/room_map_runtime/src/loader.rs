//! Loading tile maps and worlds from JSON files
//!
//! Tile maps live in `.map.json` files and worlds in `.world.json` files. A
//! world room either embeds its tile map or names a map file by a path
//! relative to the world file.
//!
//! # Example
//!
//! ```rust,ignore
//! use room_map_runtime::{load_world, LoaderConfig};
//!
//! let config = LoaderConfig::default().with_asset_root("resources");
//! let world = load_world("resources/castle.world.json".as_ref(), &config)?;
//! println!("{} cells", world.len());
//! ```

use crate::{LoaderConfig, WorldAssembler, WorldMap};
use bevy::log::{debug, info};
use room_map_core::{MapError, MapResult, RoomMapSource, TileMap, WorldDesc};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a tile map from a JSON string
pub fn parse_tile_map(json: &str) -> Result<TileMap, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a world description from a JSON string
pub fn parse_world(json: &str) -> Result<WorldDesc, serde_json::Error> {
    serde_json::from_str(json)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> MapResult<T> {
    let bytes = std::fs::read(path).map_err(|e| MapError::ResourceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| MapError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read a `.map.json` file
pub fn read_tile_map(path: &Path) -> MapResult<TileMap> {
    let map: TileMap = read_json(path)?;
    debug!(
        "Read tile map '{}' ({}x{}) from {}",
        map.name,
        map.width,
        map.height,
        path.display()
    );
    Ok(map)
}

/// Read a `.world.json` file without loading the map files it references
pub fn read_world(path: &Path) -> MapResult<WorldDesc> {
    read_json(path)
}

/// Replace every file-backed room map with the parsed map
///
/// `base_dir` is the directory map paths are relative to, normally the
/// directory holding the world file.
pub fn resolve_room_maps(mut world: WorldDesc, base_dir: &Path) -> MapResult<WorldDesc> {
    for room in &mut world.rooms {
        if let RoomMapSource::File { map_path } = &room.source {
            let map = read_tile_map(&base_dir.join(map_path))?;
            room.source = RoomMapSource::Inline { map };
        }
    }
    Ok(world)
}

/// Load a world file and assemble it into a finished map
pub fn load_world(path: &Path, config: &LoaderConfig) -> MapResult<WorldMap> {
    info!("Loading world from {}", path.display());
    let world = read_world(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let world = resolve_room_maps(world, base_dir)?;
    WorldAssembler::new(config).assemble(&world)
}

/// Load a single `.map.json` file as a one-room world
pub fn load_single_map(path: &Path, config: &LoaderConfig) -> MapResult<WorldMap> {
    info!("Loading map from {}", path.display());
    let map = read_tile_map(path)?;
    WorldAssembler::new(config).assemble_map(&map)
}
