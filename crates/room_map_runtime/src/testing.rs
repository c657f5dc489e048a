//! Test helpers: an in-memory image source and small map builders

use crate::ImageSource;
use image::RgbaImage;
use room_map_core::{Direction, RoomDesc, TileLayer, TileMap, Tileset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Image source serving blank images of fixed sizes and counting reads
#[derive(Debug, Default)]
pub struct MemoryImageSource {
    sizes: HashMap<PathBuf, (u32, u32)>,
    reads: HashMap<PathBuf, usize>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.sizes.insert(path.into(), (width, height));
        self
    }

    pub fn reads(&self, path: &Path) -> usize {
        self.reads.get(path).copied().unwrap_or(0)
    }

    pub fn total_reads(&self) -> usize {
        self.reads.values().sum()
    }
}

impl ImageSource for MemoryImageSource {
    fn read_image(&mut self, path: &Path) -> Result<RgbaImage, String> {
        *self.reads.entry(path.to_path_buf()).or_default() += 1;
        self.sizes
            .get(path)
            .map(|&(w, h)| RgbaImage::new(w, h))
            .ok_or_else(|| format!("no such file: {}", path.display()))
    }
}

/// Source with the tilesets used by [`room_map`] under asset root `res`
pub fn standard_source() -> MemoryImageSource {
    MemoryImageSource::new()
        .with_image("res/base.png", 64, 32)
        .with_image("res/walls.png", 64, 64)
}

/// A `width` x `height` room map with a ground layer filled with tile 1 and
/// a collision layer holding `walls` (row-major, 0 for open)
pub fn room_map(name: &str, width: u32, height: u32, walls: Vec<u32>) -> TileMap {
    TileMap::new(name, width, height, 32, 32)
        .with_tileset(Tileset::new("base", "base.png", 64, 32))
        .with_tileset(Tileset::new("walls", "walls.png", 64, 64).with_first_gid(3))
        .with_layer(TileLayer::from_tiles(
            "Ground",
            0,
            vec![1; width as usize * height as usize],
        ))
        .with_layer(
            TileLayer::from_tiles("Walls", 1, walls)
                .with_role(room_map_core::LayerRole::Collision),
        )
}

/// An open room with entrances in the middle of the given sides
pub fn open_room(id: &str, size: u32, sides: &[Direction]) -> RoomDesc {
    let s = size as i32;
    let mid = s / 2;
    let map = room_map(id, size, size, vec![0; size as usize * size as usize]);
    sides
        .iter()
        .fold(RoomDesc::inline(id, map), |room, &side| {
            let entrance = match side {
                Direction::Left => [0, mid],
                Direction::Right => [s, mid],
                Direction::Top => [mid, 0],
                Direction::Bottom => [mid, s],
            };
            room.with_entrance(side, entrance)
        })
}
