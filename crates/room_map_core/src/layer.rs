//! Tile layers and their roles

use crate::{MapError, MapResult};
use serde::{Deserialize, Serialize};

/// Tile id meaning "this layer contributes nothing here"
pub const EMPTY_TILE: u32 = 0;

/// Largest number of cells a single grid may hold
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Number of cells in a `width` x `height` grid
///
/// Grids above [`MAX_GRID_CELLS`] cells, or with a side longer than that, are
/// rejected.
pub fn grid_cell_count(width: u32, height: u32) -> MapResult<usize> {
    let (width_cells, height_cells) = (width as usize, height as usize);
    if width_cells > MAX_GRID_CELLS || height_cells > MAX_GRID_CELLS {
        return Err(MapError::GridTooLarge { width, height });
    }
    width_cells
        .checked_mul(height_cells)
        .filter(|&count| count <= MAX_GRID_CELLS)
        .ok_or(MapError::GridTooLarge { width, height })
}

/// What a layer is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Drawn only
    #[default]
    Normal,
    /// Drawn, and any non-empty tile makes its cell collidable
    Collision,
}

/// One full grid of tile ids drawn at a given z-order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    /// Draw order; lower values are drawn first
    #[serde(default)]
    pub z_order: i32,
    #[serde(default)]
    pub role: LayerRole,
    /// Row-major global tile ids, `EMPTY_TILE` for no tile
    pub tiles: Vec<u32>,
}

impl TileLayer {
    /// Create an empty layer covering a `width` x `height` grid
    pub fn new(name: impl Into<String>, z_order: i32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            z_order,
            role: LayerRole::Normal,
            tiles: vec![EMPTY_TILE; (width as usize).saturating_mul(height as usize)],
        }
    }

    /// Create a layer from row-major tile ids
    pub fn from_tiles(name: impl Into<String>, z_order: i32, tiles: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            z_order,
            role: LayerRole::Normal,
            tiles,
        }
    }

    /// Set the layer role
    pub fn with_role(mut self, role: LayerRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_collision(&self) -> bool {
        self.role == LayerRole::Collision
    }

    /// Check the tile grid covers exactly `width` x `height` cells
    pub fn validate(&self, width: u32, height: u32) -> MapResult<()> {
        let expected = grid_cell_count(width, height)?;
        if self.tiles.len() != expected {
            return Err(MapError::MalformedLayer {
                layer: self.name.clone(),
                expected,
                actual: self.tiles.len(),
            });
        }
        Ok(())
    }

    /// Tile id at a grid position, `None` if empty or outside the layer
    pub fn tile(&self, x: u32, y: u32, width: u32) -> Option<u32> {
        if x >= width {
            return None;
        }
        let idx = y as usize * width as usize + x as usize;
        self.tiles.get(idx).copied().filter(|&gid| gid != EMPTY_TILE)
    }

    /// Set the tile id at a grid position
    pub fn set_tile(&mut self, x: u32, y: u32, width: u32, gid: u32) {
        let idx = y as usize * width as usize + x as usize;
        if x < width {
            if let Some(slot) = self.tiles.get_mut(idx) {
                *slot = gid;
            }
        }
    }
}
