//! Per-session tileset texture cache
//!
//! Each distinct tileset image is read from storage once per load session.
//! Cells refer to textures through [`TextureHandle`]s, which carry the id of
//! the session that issued them so a handle never resolves against another
//! session's textures.

use bevy::log::{debug, info};
use image::RgbaImage;
use room_map_core::{MapError, MapResult, Tileset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Storage backend for tileset images
pub trait ImageSource {
    /// Read and decode the image at `path`
    fn read_image(&mut self, path: &Path) -> Result<RgbaImage, String>;
}

/// Reads images from the filesystem via the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn read_image(&mut self, path: &Path) -> Result<RgbaImage, String> {
        image::open(path)
            .map(|img| img.into_rgba8())
            .map_err(|e| e.to_string())
    }
}

/// A loaded tileset image
#[derive(Debug, Clone)]
pub struct TilesetTexture {
    pub tileset_id: String,
    /// Resolved path the image was read from
    pub path: PathBuf,
    /// Path as declared by the tileset
    pub declared_path: String,
    pub image: RgbaImage,
}

impl TilesetTexture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Reference to a texture owned by a cache or a finished world map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    session: Uuid,
    index: u32,
}

impl TextureHandle {
    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Textures owned by one load session
#[derive(Debug, Clone)]
pub struct TextureSet {
    session: Uuid,
    textures: Vec<TilesetTexture>,
}

impl TextureSet {
    pub(crate) fn empty(session: Uuid) -> Self {
        Self {
            session,
            textures: Vec::new(),
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Get a texture, `None` for handles issued by another session
    pub fn get(&self, handle: TextureHandle) -> Option<&TilesetTexture> {
        if handle.session != self.session {
            return None;
        }
        self.textures.get(handle.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TilesetTexture> {
        self.textures.iter()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Maps tileset ids to loaded textures for one load session
pub struct TextureCache<S: ImageSource = FsImageSource> {
    asset_root: PathBuf,
    source: S,
    textures: TextureSet,
    by_id: HashMap<String, TextureHandle>,
}

impl TextureCache<FsImageSource> {
    /// Create a cache reading from the filesystem under `asset_root`
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self::with_source(asset_root, FsImageSource)
    }
}

impl<S: ImageSource> TextureCache<S> {
    /// Create a cache reading through a custom image source
    pub fn with_source(asset_root: impl Into<PathBuf>, source: S) -> Self {
        Self {
            asset_root: asset_root.into(),
            source,
            textures: TextureSet::empty(Uuid::new_v4()),
            by_id: HashMap::new(),
        }
    }

    pub fn session(&self) -> Uuid {
        self.textures.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of distinct tilesets loaded so far
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Path a tileset image is read from
    pub fn resolve_path(&self, tileset: &Tileset) -> PathBuf {
        self.asset_root.join(&tileset.image)
    }

    /// Get the texture for a tileset, loading it on first use
    ///
    /// A tileset id seen before must declare the same image and size; the
    /// decoded image must match the declared size.
    pub fn resolve(&mut self, tileset: &Tileset) -> MapResult<TextureHandle> {
        if let Some(&handle) = self.by_id.get(&tileset.id) {
            let texture = &self.textures.textures[handle.index()];
            if texture.declared_path != tileset.image
                || texture.width() != tileset.image_width
                || texture.height() != tileset.image_height
            {
                return Err(MapError::TilesetConflict {
                    tileset_id: tileset.id.clone(),
                });
            }
            return Ok(handle);
        }

        let path = self.resolve_path(tileset);
        info!("Loading tileset '{}' from {}", tileset.id, path.display());

        let image = self
            .source
            .read_image(&path)
            .map_err(|reason| MapError::ResourceLoad {
                path: path.clone(),
                reason,
            })?;

        if image.width() != tileset.image_width || image.height() != tileset.image_height {
            return Err(MapError::MalformedTileset {
                tileset_id: tileset.id.clone(),
                reason: format!(
                    "declared {}x{} but {} is {}x{}",
                    tileset.image_width,
                    tileset.image_height,
                    path.display(),
                    image.width(),
                    image.height()
                ),
            });
        }

        let handle = TextureHandle {
            session: self.textures.session,
            index: self.textures.textures.len() as u32,
        };
        self.textures.textures.push(TilesetTexture {
            tileset_id: tileset.id.clone(),
            path,
            declared_path: tileset.image.clone(),
            image,
        });
        self.by_id.insert(tileset.id.clone(), handle);
        debug!("Tileset '{}' cached as texture {}", tileset.id, handle.index);

        Ok(handle)
    }

    /// Get a loaded texture
    pub fn get(&self, handle: TextureHandle) -> Option<&TilesetTexture> {
        self.textures.get(handle)
    }

    /// Get a loaded texture by tileset id
    pub fn get_by_id(&self, tileset_id: &str) -> Option<&TilesetTexture> {
        self.by_id
            .get(tileset_id)
            .and_then(|&handle| self.textures.get(handle))
    }

    /// End the session, handing over ownership of every loaded texture
    pub fn into_textures(self) -> TextureSet {
        self.textures
    }
}
