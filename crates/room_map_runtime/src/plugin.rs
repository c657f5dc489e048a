//! Bevy plugin that loads a world at startup
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use room_map_runtime::{LoadedWorld, RoomMapPlugin};
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RoomMapPlugin::world("resources/castle.world.json"))
//!     .add_systems(Update, |world: Option<Res<LoadedWorld>>| {
//!         if let Some(world) = world {
//!             info!("{} rooms", world.rooms().len());
//!         }
//!     })
//!     .run();
//! ```

use crate::{load_single_map, load_world, LoaderConfig, WorldMap};
use bevy::prelude::*;
use room_map_core::MapError;
use std::path::PathBuf;

/// What the plugin loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// A `.world.json` room graph
    World(PathBuf),
    /// A single `.map.json` tile map
    Map(PathBuf),
}

/// Loads a world or a single map during `Startup`
///
/// On success the finished map is inserted as [`LoadedWorld`]; on failure
/// [`WorldLoadFailed`] is inserted instead and no partial map is exposed.
pub struct RoomMapPlugin {
    source: MapSource,
    config: LoaderConfig,
}

impl RoomMapPlugin {
    pub fn world(path: impl Into<PathBuf>) -> Self {
        Self {
            source: MapSource::World(path.into()),
            config: LoaderConfig::default(),
        }
    }

    pub fn map(path: impl Into<PathBuf>) -> Self {
        Self {
            source: MapSource::Map(path.into()),
            config: LoaderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for RoomMapPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldLoadRequest {
            source: self.source.clone(),
            config: self.config.clone(),
        })
        .add_systems(Startup, load_requested_world);
    }
}

/// The load the plugin performs at startup
#[derive(Resource, Debug, Clone)]
pub struct WorldLoadRequest {
    pub source: MapSource,
    pub config: LoaderConfig,
}

/// The finished map, available once startup loading succeeded
#[derive(Resource, Debug, Deref)]
pub struct LoadedWorld(pub WorldMap);

/// Inserted instead of [`LoadedWorld`] when loading failed
#[derive(Resource, Debug)]
pub struct WorldLoadFailed {
    pub error: MapError,
}

fn load_requested_world(mut commands: Commands, request: Res<WorldLoadRequest>) {
    let result = match &request.source {
        MapSource::World(path) => load_world(path, &request.config),
        MapSource::Map(path) => load_single_map(path, &request.config),
    };

    match result {
        Ok(world) => {
            info!(
                "Loaded world '{}': {} rooms, {} cells",
                world.name(),
                world.rooms().len(),
                world.len()
            );
            commands.insert_resource(LoadedWorld(world));
        }
        Err(e) => {
            error!("Failed to load world: {}", e);
            commands.insert_resource(WorldLoadFailed { error: e });
        }
    }
}
