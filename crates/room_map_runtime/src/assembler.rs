//! World graph assembly
//!
//! Lays out a room graph from its root, builds each room's tile cells and
//! merges them, translated to their absolute placement, into one
//! [`WorldMap`]. The map is only handed out when every room merged.

use crate::{FsImageSource, ImageSource, LoaderConfig, TextureCache, TileCellBuilder, WorldMap};
use bevy::log::{debug, info};
use room_map_core::{
    MapError, MapResult, RoomDesc, RoomGeometry, RoomGraph, RoomMapSource, RoomPlacement, TileMap,
    WorldDesc,
};
use std::path::PathBuf;

/// Assembles one world per load session
pub struct WorldAssembler<S: ImageSource = FsImageSource> {
    cache: TextureCache<S>,
    builder: TileCellBuilder,
    root_override: Option<String>,
}

impl WorldAssembler<FsImageSource> {
    /// Create an assembler reading tileset images from the filesystem
    pub fn new(config: &LoaderConfig) -> Self {
        Self::with_source(config, FsImageSource)
    }
}

impl<S: ImageSource> WorldAssembler<S> {
    /// Create an assembler reading tileset images through `source`
    pub fn with_source(config: &LoaderConfig, source: S) -> Self {
        Self {
            cache: TextureCache::with_source(config.asset_root.clone(), source),
            builder: TileCellBuilder::new(config.collision.clone()),
            root_override: config.root_override.clone(),
        }
    }

    pub fn cache(&self) -> &TextureCache<S> {
        &self.cache
    }

    /// Assemble a world whose rooms all carry inline tile maps
    ///
    /// Use [`crate::resolve_room_maps`] first for worlds referencing map files.
    /// The configured root override, if any, replaces the world's root.
    pub fn assemble(self, world: &WorldDesc) -> MapResult<WorldMap> {
        let root = self
            .root_override
            .clone()
            .unwrap_or_else(|| world.root.clone());
        self.assemble_from(world, &root)
    }

    /// Assemble a world laid out from `root`, ignoring any root override
    pub fn assemble_from(self, world: &WorldDesc, root: &str) -> MapResult<WorldMap> {
        info!(
            "Assembling world '{}' from {} rooms, root '{}'",
            world.name,
            world.rooms.len(),
            root
        );

        let mut maps: Vec<&TileMap> = Vec::with_capacity(world.rooms.len());
        let mut geometries: Vec<RoomGeometry> = Vec::with_capacity(world.rooms.len());
        for room in &world.rooms {
            let map = match &room.source {
                RoomMapSource::Inline { map } => map,
                RoomMapSource::File { map_path } => {
                    return Err(MapError::ResourceLoad {
                        path: PathBuf::from(map_path),
                        reason: format!("map for room '{}' was not loaded", room.id),
                    });
                }
            };
            map.checked_cell_count()?;
            if let Some(first) = maps.first() {
                if first.tile_size() != map.tile_size() {
                    return Err(MapError::TileSizeMismatch {
                        room: room.id.clone(),
                        expected: first.tile_size(),
                        actual: map.tile_size(),
                    });
                }
            }
            geometries.push(room.geometry(map));
            maps.push(map);
        }

        let graph = RoomGraph::new(geometries, &world.connections)?;
        let placements = graph.layout(root)?;
        self.merge(world, &graph, &maps, &placements)
    }

    /// Assemble a single tile map as a one-room world
    ///
    /// The map is its own root, so a configured root override does not apply.
    pub fn assemble_map(self, map: &TileMap) -> MapResult<WorldMap> {
        let id = if map.name.is_empty() {
            "map".to_string()
        } else {
            map.name.clone()
        };
        let world = WorldDesc::new(map.name.clone(), id.clone())
            .with_room(RoomDesc::inline(id.clone(), map.clone()));
        self.assemble_from(&world, &id)
    }

    fn merge(
        mut self,
        world: &WorldDesc,
        graph: &RoomGraph,
        maps: &[&TileMap],
        placements: &[RoomPlacement],
    ) -> MapResult<WorldMap> {
        let (tile_width, tile_height) = maps.first().map(|m| m.tile_size()).unwrap_or((0, 0));
        let mut world_map = WorldMap::new(
            world.name.clone(),
            tile_width,
            tile_height,
            self.cache.session(),
        );

        for placement in placements {
            let map = maps[placement.room];
            let id = graph
                .room(placement.room)
                .map(|room| room.name.as_str())
                .unwrap_or_default();

            let mut cells = self.builder.build(map, &mut self.cache)?;
            for cell in &mut cells {
                cell.translate(placement.offset);
            }
            world_map.insert_room(id, placement.offset, (map.width, map.height), cells)?;
            debug!("Placed room '{}' at {}", id, placement.offset);
        }

        let textures = self.cache.into_textures();
        info!(
            "World '{}' assembled: {} rooms, {} cells, {} tilesets",
            world.name,
            world_map.rooms().len(),
            world_map.len(),
            textures.len()
        );
        world_map.set_textures(textures);
        Ok(world_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{open_room, room_map, standard_source, MemoryImageSource};
    use room_map_core::{Direction, GridPos, PixelRect};
    use std::path::Path;

    fn assembler() -> WorldAssembler<MemoryImageSource> {
        let config = LoaderConfig::default().with_asset_root("res");
        WorldAssembler::with_source(&config, standard_source())
    }

    fn two_rooms() -> WorldDesc {
        let a = RoomDesc::inline("a", room_map("a", 4, 4, vec![0; 16]))
            .with_entrance(Direction::Right, [4, 2]);
        let mut b_walls = vec![0; 16];
        b_walls[4] = 3; // local (0, 1)
        let b = RoomDesc::inline("b", room_map("b", 4, 4, b_walls))
            .with_entrance(Direction::Left, [0, 1]);
        WorldDesc::new("Pair", "a")
            .with_room(a)
            .with_room(b)
            .connect("a", Direction::Right, "b")
    }

    #[test]
    fn test_entrances_line_up() {
        let world = assembler().assemble(&two_rooms()).unwrap();

        let b = world.room("b").unwrap();
        assert_eq!(b.offset, GridPos::new(4, 1));
        assert!(b.contains(GridPos::new(4, 2)));
        assert!(!b.contains(GridPos::new(3, 2)));

        // b's local (0, 1) sits right of a's boundary cell (3, 2)
        let entry = world.cell_at(GridPos::new(4, 2)).unwrap();
        assert_eq!(world.room_at(GridPos::new(4, 2)).unwrap().id, "b");
        assert_eq!(entry.bounds, PixelRect::new(128, 64, 32, 32));
        assert!(entry.collidable);
        assert_eq!(world.room_at(GridPos::new(3, 2)).unwrap().id, "a");
    }

    #[test]
    fn test_all_cells_merged() {
        let world = assembler().assemble(&two_rooms()).unwrap();

        assert_eq!(world.len(), 32);
        assert_eq!(world.rooms()[0].id, "a");
        assert_eq!(world.rooms()[0].offset, GridPos::ZERO);
        assert_eq!(world.bounds(), Some((GridPos::new(0, 0), GridPos::new(8, 5))));
        assert_eq!(world.collidable_cells().count(), 1);
    }

    #[test]
    fn test_tilesets_loaded_once_per_world() {
        let world = WorldDesc::new("Row", "a")
            .with_room(open_room("a", 4, &[Direction::Right]))
            .with_room(open_room("b", 4, &[Direction::Left, Direction::Right]))
            .with_room(open_room("c", 4, &[Direction::Left]))
            .connect("a", Direction::Right, "b")
            .connect("b", Direction::Right, "c");

        let assembler = assembler();
        let reads_before = assembler.cache().source().total_reads();
        let map = assembler.assemble(&world).unwrap();

        assert_eq!(reads_before, 0);
        assert_eq!(map.textures().len(), 1);
        let handle = map.cells()[0].layers[0].texture;
        assert!(map.cells().iter().all(|c| c.layers[0].texture == handle));
        assert_eq!(map.room("c").unwrap().offset, GridPos::new(8, 0));
    }

    #[test]
    fn test_root_override() {
        let config = LoaderConfig::default().with_asset_root("res").with_root("b");
        let world = WorldAssembler::with_source(&config, standard_source())
            .assemble(&two_rooms())
            .unwrap();

        assert_eq!(world.rooms()[0].id, "b");
        assert_eq!(world.room("a").unwrap().offset, GridPos::new(-4, -1));
    }

    #[test]
    fn test_conflicting_placement_is_error() {
        // d is reached from b's bottom and from c's right at different offsets
        let world = WorldDesc::new("Loop", "a")
            .with_room(open_room("a", 4, &[Direction::Right, Direction::Bottom]))
            .with_room(open_room("b", 4, &[Direction::Left, Direction::Bottom]))
            .with_room(open_room("c", 4, &[Direction::Top, Direction::Right]))
            .with_room(open_room("d", 2, &[Direction::Top, Direction::Left]))
            .connect("a", Direction::Right, "b")
            .connect("a", Direction::Bottom, "c")
            .connect("b", Direction::Bottom, "d")
            .connect("c", Direction::Right, "d");
        assert!(matches!(
            assembler().assemble(&world),
            Err(MapError::GraphInconsistency { .. })
        ));
    }

    #[test]
    fn test_unreachable_room_is_error() {
        let world = two_rooms().with_room(open_room("island", 4, &[Direction::Left]));

        let assembler = assembler();
        match assembler.assemble(&world) {
            Err(MapError::UnreachableRooms { rooms }) => assert_eq!(rooms, vec!["island"]),
            other => panic!("Expected UnreachableRooms, got {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_rooms_are_rejected() {
        // b's left entrance is deep inside a tall room, pulling it over c
        let world = WorldDesc::new("Crowded", "a")
            .with_room(open_room("a", 4, &[Direction::Right, Direction::Bottom]))
            .with_room(
                RoomDesc::inline("b", room_map("b", 4, 8, vec![0; 32]))
                    .with_entrance(Direction::Left, [0, 0]),
            )
            .with_room(
                RoomDesc::inline("c", room_map("c", 8, 4, vec![0; 32]))
                    .with_entrance(Direction::Top, [0, 0]),
            )
            .connect("a", Direction::Right, "b")
            .connect("a", Direction::Bottom, "c");

        assert!(matches!(
            assembler().assemble(&world),
            Err(MapError::RoomOverlap { .. })
        ));
    }

    #[test]
    fn test_tile_size_mismatch() {
        let mut small = room_map("b", 4, 4, vec![0; 16]);
        small.tile_width = 16;
        small.tile_height = 16;
        let world = WorldDesc::new("Mixed", "a")
            .with_room(open_room("a", 4, &[Direction::Right]))
            .with_room(RoomDesc::inline("b", small).with_entrance(Direction::Left, [0, 2]))
            .connect("a", Direction::Right, "b");

        assert!(matches!(
            assembler().assemble(&world),
            Err(MapError::TileSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_unloaded_room_map_is_error() {
        let world = WorldDesc::new("Lazy", "a").with_room(RoomDesc::from_file("a", "a.map.json"));
        match assembler().assemble(&world) {
            Err(MapError::ResourceLoad { path, .. }) => assert_eq!(path, Path::new("a.map.json")),
            other => panic!("Expected ResourceLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_room_aborts_whole_world() {
        let mut world = two_rooms();
        if let RoomMapSource::Inline { map } = &mut world.rooms[1].source {
            map.layers[0].tiles[0] = 99;
        }
        let err = assembler().assemble(&world).unwrap_err();
        assert!(matches!(err.root_cause(), MapError::TileIndexOutOfRange { .. }));
    }

    #[test]
    fn test_single_map_ignores_root_override() {
        let config = LoaderConfig::default().with_asset_root("res").with_root("hall");
        let map = room_map("Cellar", 2, 2, vec![0; 4]);

        let world = WorldAssembler::with_source(&config, standard_source())
            .assemble_map(&map)
            .unwrap();

        assert_eq!(world.rooms()[0].id, "Cellar");
        assert_eq!(world.rooms()[0].offset, GridPos::ZERO);
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_single_map() {
        let map = room_map("Cellar", 3, 2, vec![0, 0, 3, 0, 0, 0]);
        let world = assembler().assemble_map(&map).unwrap();

        assert_eq!(world.rooms().len(), 1);
        assert_eq!(world.rooms()[0].id, "Cellar");
        assert_eq!(world.len(), 6);
        assert!(world.cell_at(GridPos::new(2, 0)).unwrap().collidable);
    }
}
