//! Loader configuration
//!
//! Configuration can be built in code or read from a TOML file:
//!
//! ```toml
//! asset_root = "resources"
//! root_override = "entrance_hall"
//!
//! [collision]
//! type = "layer_name"
//! name = "Collision"
//! ```

use room_map_core::{MapError, MapResult, TileLayer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default layer name used by [`CollisionRule::legacy`]
pub const LEGACY_COLLISION_LAYER: &str = "Collision";

/// How the collision layer of a tile map is recognised
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollisionRule {
    /// Layers whose `role` is `collision`
    #[default]
    Role,
    /// Layers whose name matches exactly (case-sensitive)
    LayerName { name: String },
}

impl CollisionRule {
    /// Name matching against `"Collision"`, for existing assets without roles
    pub fn legacy() -> Self {
        CollisionRule::LayerName {
            name: LEGACY_COLLISION_LAYER.to_string(),
        }
    }

    /// Check whether tiles on this layer make their cells collidable
    pub fn is_collision(&self, layer: &TileLayer) -> bool {
        match self {
            CollisionRule::Role => layer.is_collision(),
            CollisionRule::LayerName { name } => layer.name == *name,
        }
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("resources")
}

/// Settings for one load session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory tileset image paths are resolved against
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default)]
    pub collision: CollisionRule,
    /// Root room to use instead of the world file's `root`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_override: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            collision: CollisionRule::default(),
            root_override: None,
        }
    }
}

impl LoaderConfig {
    /// Set the asset root
    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    /// Set the collision rule
    pub fn with_collision(mut self, collision: CollisionRule) -> Self {
        self.collision = collision;
        self
    }

    /// Override the root room
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root_override = Some(root.into());
        self
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> MapResult<Self> {
        toml::from_str(text).map_err(|e| MapError::Parse {
            path: PathBuf::from("<config>"),
            reason: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> MapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MapError::ResourceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| MapError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> MapResult<String> {
        toml::to_string_pretty(self).map_err(|e| MapError::Parse {
            path: PathBuf::from("<config>"),
            reason: e.to_string(),
        })
    }
}
