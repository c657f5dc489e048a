//! Error taxonomy for map and world loading
//!
//! Every variant aborts the load in progress. Resource errors come from
//! storage, data errors from malformed descriptions, graph errors from room
//! placement.

use crate::{Direction, GridPos};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout room_map
pub type MapResult<T> = Result<T, MapError>;

/// Error type for map and world loading failures
#[derive(Debug, Error)]
pub enum MapError {
    // Resource errors
    #[error("Failed to load resource '{}': {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },
    #[error("Failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    // Data errors
    #[error("Malformed tileset '{tileset_id}': {reason}")]
    MalformedTileset { tileset_id: String, reason: String },
    #[error("Tileset '{tileset_id}' is declared twice with different images")]
    TilesetConflict { tileset_id: String },
    #[error("Layer '{layer}' has {actual} tiles, expected {expected}")]
    MalformedLayer {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("Grid of {width}x{height} tiles is too large to build")]
    GridTooLarge { width: u32, height: u32 },
    #[error("Tile id {gid} does not belong to any tileset")]
    UnknownTile { gid: u32 },
    #[error("Tile index {index} is out of range for tileset '{tileset_id}' ({tile_count} tiles)")]
    TileIndexOutOfRange {
        tileset_id: String,
        index: u32,
        tile_count: u32,
    },
    #[error("Layer '{layer}' at ({x}, {y}): {source}")]
    AtCell {
        layer: String,
        x: u32,
        y: u32,
        #[source]
        source: Box<MapError>,
    },
    #[error("Room '{room}' has no {direction} entrance")]
    MissingEntrance { room: String, direction: Direction },
    #[error("Room '{room}' {direction} entrance {entrance} is not on its {direction} edge")]
    EntranceOffEdge {
        room: String,
        direction: Direction,
        entrance: GridPos,
    },
    #[error("Room '{room}' uses tile size {actual:?}, expected {expected:?}")]
    TileSizeMismatch {
        room: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    // Graph errors
    #[error("Unknown room '{room}'")]
    UnknownRoom { room: String },
    #[error("Room '{room}' is declared more than once")]
    DuplicateRoom { room: String },
    #[error("Room '{room}' has more than one connection on its {direction} side")]
    DirectionConflict { room: String, direction: Direction },
    #[error(
        "Room '{room_b}' placed at {expected} but reaching it from '{room_a}' computes {computed}"
    )]
    GraphInconsistency {
        room_a: String,
        room_b: String,
        expected: GridPos,
        computed: GridPos,
    },
    #[error("Rooms not reachable from the root: {}", rooms.join(", "))]
    UnreachableRooms { rooms: Vec<String> },
    #[error("Rooms '{room_a}' and '{room_b}' overlap at {position}")]
    RoomOverlap {
        room_a: String,
        room_b: String,
        position: GridPos,
    },
}

impl MapError {
    /// Attach the failing layer and coordinate to a per-tile error
    pub fn at_cell(self, layer: &str, x: u32, y: u32) -> MapError {
        MapError::AtCell {
            layer: layer.to_string(),
            x,
            y,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping coordinate context
    pub fn root_cause(&self) -> &MapError {
        match self {
            MapError::AtCell { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
