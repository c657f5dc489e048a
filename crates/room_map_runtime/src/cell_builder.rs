//! Tile cell building
//!
//! Turns a [`TileMap`] into one fully resolved [`TileCell`] per grid
//! coordinate: every non-empty layer tile becomes a draw entry pointing at a
//! sub-rectangle of a cached tileset texture, and tiles on the collision
//! layer mark their cell collidable.

use crate::{CollisionRule, ImageSource, TextureCache, TextureHandle};
use room_map_core::{GridPos, MapResult, PixelRect, TileMap};

/// One layer's contribution to a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLayer {
    pub z_order: i32,
    pub tileset_id: String,
    pub texture: TextureHandle,
    /// Source rectangle within the tileset image
    pub source: PixelRect,
}

/// A fully resolved grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCell {
    /// Grid coordinate in tiles
    pub grid: GridPos,
    /// Pixel bounds of the cell
    pub bounds: PixelRect,
    /// Draw entries in ascending z-order
    pub layers: Vec<CellLayer>,
    pub collidable: bool,
}

impl TileCell {
    fn new(grid: GridPos, tile_width: u32, tile_height: u32) -> Self {
        let origin = grid.to_pixels(tile_width, tile_height);
        Self {
            grid,
            bounds: PixelRect::new(origin.x, origin.y, tile_width, tile_height),
            layers: Vec::new(),
            collidable: false,
        }
    }

    /// Whether no layer draws anything here
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Move the cell by a tile offset
    pub(crate) fn translate(&mut self, offset: GridPos) {
        let pixels = offset.to_pixels(self.bounds.width, self.bounds.height);
        self.grid += offset;
        self.bounds = self.bounds.translated(pixels);
    }
}

/// Builds tile cells for one map at a time
#[derive(Debug, Clone, Default)]
pub struct TileCellBuilder {
    collision: CollisionRule,
}

impl TileCellBuilder {
    pub fn new(collision: CollisionRule) -> Self {
        Self { collision }
    }

    pub fn collision_rule(&self) -> &CollisionRule {
        &self.collision
    }

    /// Build every cell of `map` in row-major order
    ///
    /// Either the whole grid is returned or the first failure, wrapped with
    /// the layer and coordinate it happened at.
    pub fn build<S: ImageSource>(
        &self,
        map: &TileMap,
        cache: &mut TextureCache<S>,
    ) -> MapResult<Vec<TileCell>> {
        map.validate()?;

        let layers = map.layers_by_z();
        let collision: Vec<bool> = layers
            .iter()
            .map(|layer| self.collision.is_collision(layer))
            .collect();

        let mut cells = Vec::with_capacity(map.cell_count());
        for y in 0..map.height {
            for x in 0..map.width {
                let mut cell = TileCell::new(
                    GridPos::new(x as i32, y as i32),
                    map.tile_width,
                    map.tile_height,
                );

                for (layer, &is_collision) in layers.iter().zip(&collision) {
                    let Some(gid) = layer.tile(x, y, map.width) else {
                        continue;
                    };

                    let entry = resolve_tile(map, gid, layer.z_order, cache)
                        .map_err(|e| e.at_cell(&layer.name, x, y))?;
                    cell.layers.push(entry);

                    if is_collision {
                        cell.collidable = true;
                    }
                }

                cells.push(cell);
            }
        }

        Ok(cells)
    }
}

fn resolve_tile<S: ImageSource>(
    map: &TileMap,
    gid: u32,
    z_order: i32,
    cache: &mut TextureCache<S>,
) -> MapResult<CellLayer> {
    let (tileset, local) = map.resolve_gid(gid)?;
    let source = tileset.source_rect(local, map.tile_width, map.tile_height)?;
    let texture = cache.resolve(tileset)?;
    Ok(CellLayer {
        z_order,
        tileset_id: tileset.id.clone(),
        texture,
        source,
    })
}
