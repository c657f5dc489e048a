//! Example loading a world headless and printing its obstacle grid
//!
//! Run from the workspace root with:
//!
//! ```sh
//! cargo run --example load_world -- \
//!     crates/room_map_runtime/assets/demo.world.json \
//!     crates/room_map_runtime/assets/loader.toml
//! ```
//!
//! A path ending in `.map.json` is loaded as a single-room world.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use room_map_runtime::{LoadedWorld, LoaderConfig, RoomMapPlugin, WorldLoadFailed};
use std::path::PathBuf;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: load_world <world.json | map.json> [loader.toml]");
        std::process::exit(2);
    };

    let config = match args.next() {
        Some(config_path) => match LoaderConfig::load(config_path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => LoaderConfig::default(),
    };

    let plugin = if path.to_string_lossy().ends_with(".map.json") {
        RoomMapPlugin::map(path)
    } else {
        RoomMapPlugin::world(path)
    };

    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .add_plugins(plugin.with_config(config))
        .add_systems(PostStartup, report);
    app.update();
}

fn report(loaded: Option<Res<LoadedWorld>>, failed: Option<Res<WorldLoadFailed>>) {
    if let Some(failed) = failed {
        error!("{}", failed.error);
        return;
    }
    let Some(world) = loaded else {
        return;
    };

    println!("World '{}'", world.name());
    for room in world.rooms() {
        println!(
            "  {:<16} at {:<10} {}x{}",
            room.id,
            room.offset.to_string(),
            room.width,
            room.height
        );
    }
    if let Some((min, max)) = world.bounds() {
        println!("Bounds {} .. {}", min, max);
    }
    println!(
        "{} cells, {} collidable, {} tileset textures",
        world.len(),
        world.collidable_cells().count(),
        world.textures().len()
    );
    match world.obstacle_grid() {
        Ok(grid) => print!("{}", grid.to_ascii()),
        Err(e) => error!("No obstacle grid: {}", e),
    }
}
