//! Tileset table entries and tile sub-rectangle math

use crate::{MapError, MapResult, PixelRect};
use serde::{Deserialize, Serialize};

fn default_first_gid() -> u32 {
    1
}

/// A single tileset image sliced into a uniform grid of tiles
///
/// Layer tiles reference tilesets through global ids: a tileset owns every id
/// from `first_gid` up to (but excluding) the next tileset's `first_gid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: String,
    /// Path to the image file (relative to the asset root)
    pub image: String,
    /// Declared image width in pixels
    pub image_width: u32,
    /// Declared image height in pixels
    pub image_height: u32,
    /// First global tile id owned by this tileset
    #[serde(default = "default_first_gid")]
    pub first_gid: u32,
}

impl Tileset {
    /// Create a new tileset starting at global id 1
    pub fn new(id: impl Into<String>, image: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            image: image.into(),
            image_width: width,
            image_height: height,
            first_gid: default_first_gid(),
        }
    }

    /// Set the first global id
    pub fn with_first_gid(mut self, first_gid: u32) -> Self {
        self.first_gid = first_gid;
        self
    }

    /// Check that the image can be sliced into whole tiles of the given size
    pub fn validate(&self, tile_width: u32, tile_height: u32) -> MapResult<()> {
        let malformed = |reason: String| MapError::MalformedTileset {
            tileset_id: self.id.clone(),
            reason,
        };

        if tile_width == 0 || tile_height == 0 {
            return Err(malformed(format!(
                "tile size {}x{} is empty",
                tile_width, tile_height
            )));
        }
        if self.image_width / tile_width == 0 || self.image_height / tile_height == 0 {
            return Err(malformed(format!(
                "image {}x{} is smaller than one {}x{} tile",
                self.image_width, self.image_height, tile_width, tile_height
            )));
        }
        if self.image_width % tile_width != 0 || self.image_height % tile_height != 0 {
            return Err(malformed(format!(
                "image {}x{} is not a whole number of {}x{} tiles",
                self.image_width, self.image_height, tile_width, tile_height
            )));
        }
        if self.first_gid == 0 {
            return Err(malformed("first_gid 0 is reserved for empty tiles".to_string()));
        }
        Ok(())
    }

    /// Number of tile columns in the image
    pub fn columns(&self, tile_width: u32) -> u32 {
        if tile_width == 0 {
            0
        } else {
            self.image_width / tile_width
        }
    }

    /// Number of tile rows in the image
    pub fn rows(&self, tile_height: u32) -> u32 {
        if tile_height == 0 {
            0
        } else {
            self.image_height / tile_height
        }
    }

    /// Total number of tiles in this image
    pub fn tile_count(&self, tile_width: u32, tile_height: u32) -> u32 {
        self.columns(tile_width).saturating_mul(self.rows(tile_height))
    }

    /// Check whether a global id belongs to the range starting at this tileset
    pub fn local_index(&self, gid: u32) -> Option<u32> {
        gid.checked_sub(self.first_gid)
    }

    /// Source rectangle of a local tile index within the image
    pub fn source_rect(
        &self,
        index: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> MapResult<PixelRect> {
        self.validate(tile_width, tile_height)?;

        let tiles_per_row = self.columns(tile_width);
        let tile_count = self.tile_count(tile_width, tile_height);
        if index >= tile_count {
            return Err(MapError::TileIndexOutOfRange {
                tileset_id: self.id.clone(),
                index,
                tile_count,
            });
        }

        let row = index / tiles_per_row;
        let col = index - row * tiles_per_row;
        Ok(PixelRect::new(
            (col * tile_width) as i32,
            (row * tile_height) as i32,
            tile_width,
            tile_height,
        ))
    }
}

/// Find the tileset owning a global tile id
///
/// The owner is the tileset with the greatest `first_gid` not above `gid`.
pub fn tileset_for_gid(tilesets: &[Tileset], gid: u32) -> MapResult<(&Tileset, u32)> {
    tilesets
        .iter()
        .filter(|ts| ts.first_gid <= gid)
        .max_by_key(|ts| ts.first_gid)
        .and_then(|ts| ts.local_index(gid).map(|local| (ts, local)))
        .ok_or(MapError::UnknownTile { gid })
}
