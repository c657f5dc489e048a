//! Tile-grid map description

use crate::{grid_cell_count, tileset_for_gid, MapError, MapResult, TileLayer, Tileset};
use serde::{Deserialize, Serialize};

/// A tile map as read from a `.map.json` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    #[serde(default)]
    pub name: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default)]
    pub layers: Vec<TileLayer>,
}

impl TileMap {
    /// Create a new map without tilesets or layers
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tile_width,
            tile_height,
            tilesets: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_tileset(mut self, tileset: Tileset) -> Self {
        self.tilesets.push(tileset);
        self
    }

    pub fn with_layer(mut self, layer: TileLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Tile size in pixels as `(width, height)`
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Number of grid cells, saturating for sizes no valid map has
    pub fn cell_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Number of grid cells, or an error when the map is too large to build
    ///
    /// Besides the cell limit, the map's pixel extent must fit an `i32`.
    pub fn checked_cell_count(&self) -> MapResult<usize> {
        let count = grid_cell_count(self.width, self.height)?;
        let fits = |tiles: u32, size: u32| u64::from(tiles) * u64::from(size) <= i32::MAX as u64;
        if !fits(self.width, self.tile_width) || !fits(self.height, self.tile_height) {
            return Err(MapError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(count)
    }

    /// Get a tileset by id
    pub fn get_tileset(&self, id: &str) -> Option<&Tileset> {
        self.tilesets.iter().find(|ts| ts.id == id)
    }

    /// Find the tileset and local index for a global tile id
    pub fn resolve_gid(&self, gid: u32) -> MapResult<(&Tileset, u32)> {
        tileset_for_gid(&self.tilesets, gid)
    }

    /// Layers sorted by ascending z-order (stable for equal z-orders)
    pub fn layers_by_z(&self) -> Vec<&TileLayer> {
        let mut layers: Vec<&TileLayer> = self.layers.iter().collect();
        layers.sort_by_key(|layer| layer.z_order);
        layers
    }

    /// Check structural consistency: tilesets slice evenly, layer grids match
    /// the map size, and no two tilesets share an id or a first gid.
    pub fn validate(&self) -> MapResult<()> {
        self.checked_cell_count()?;
        for (i, tileset) in self.tilesets.iter().enumerate() {
            tileset.validate(self.tile_width, self.tile_height)?;
            for other in &self.tilesets[..i] {
                if other.id == tileset.id || other.first_gid == tileset.first_gid {
                    return Err(MapError::MalformedTileset {
                        tileset_id: tileset.id.clone(),
                        reason: format!("collides with tileset '{}'", other.id),
                    });
                }
            }
        }
        for layer in &self.layers {
            layer.validate(self.width, self.height)?;
        }
        Ok(())
    }
}
