//! Room graph description and layout
//!
//! A world is a set of rooms connected through their sides. Laying the world
//! out walks the graph from a root room and gives every reachable room an
//! absolute offset in tile units.

use crate::{Direction, GridPos, MapError, MapResult, RoomGeometry, TileMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Where a room's tile map comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomMapSource {
    /// Tile map embedded in the world file
    Inline { map: TileMap },
    /// Path to a `.map.json`, relative to the world file
    File { map_path: String },
}

/// A room as declared in a `.world.json` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDesc {
    pub id: String,
    #[serde(flatten)]
    pub source: RoomMapSource,
    #[serde(default)]
    pub entrances: BTreeMap<Direction, GridPos>,
}

impl RoomDesc {
    /// Create a room with an inline tile map
    pub fn inline(id: impl Into<String>, map: TileMap) -> Self {
        Self {
            id: id.into(),
            source: RoomMapSource::Inline { map },
            entrances: BTreeMap::new(),
        }
    }

    /// Create a room whose tile map lives in its own file
    pub fn from_file(id: impl Into<String>, map_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: RoomMapSource::File {
                map_path: map_path.into(),
            },
            entrances: BTreeMap::new(),
        }
    }

    pub fn with_entrance(mut self, direction: Direction, entrance: impl Into<GridPos>) -> Self {
        self.entrances.insert(direction, entrance.into());
        self
    }

    /// Geometry of this room, sized by its tile map
    pub fn geometry(&self, map: &TileMap) -> RoomGeometry {
        RoomGeometry {
            name: self.id.clone(),
            width: map.width as i32,
            height: map.height as i32,
            entrances: self.entrances.clone(),
        }
    }
}

/// A directed adjacency edge: `to` is attached to `from` on `direction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConnection {
    pub from: String,
    pub direction: Direction,
    pub to: String,
}

impl RoomConnection {
    pub fn new(from: impl Into<String>, direction: Direction, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            direction,
            to: to.into(),
        }
    }
}

/// World description stored in a `.world.json` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDesc {
    #[serde(default)]
    pub name: String,
    /// Room placed at the origin
    pub root: String,
    pub rooms: Vec<RoomDesc>,
    #[serde(default)]
    pub connections: Vec<RoomConnection>,
}

impl WorldDesc {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            rooms: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_room(mut self, room: RoomDesc) -> Self {
        self.rooms.push(room);
        self
    }

    /// Connect `to` onto `from`'s `direction` side
    pub fn connect(mut self, from: &str, direction: Direction, to: &str) -> Self {
        self.connections.push(RoomConnection::new(from, direction, to));
        self
    }

    pub fn get_room(&self, id: &str) -> Option<&RoomDesc> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// A room's absolute offset in tile units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPlacement {
    /// Index of the room in the graph
    pub room: usize,
    pub offset: GridPos,
}

/// Validated room adjacency graph
///
/// Rooms are stored in an arena and addressed by index. Each connection is
/// recorded from both ends, so `(a, Right, b)` also gives `b` a Left
/// neighbour `a`. Only the room a connection starts from owns the side it
/// names; several rooms reaching the same side of a room are left to the
/// layout's consistency check.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: Vec<RoomGeometry>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<(Direction, usize)>>,
}

impl RoomGraph {
    /// Build the graph, rejecting unknown or duplicate rooms, entrances off
    /// their edges, and one room connecting a single side to two rooms.
    pub fn new(rooms: Vec<RoomGeometry>, connections: &[RoomConnection]) -> MapResult<Self> {
        let mut index = HashMap::with_capacity(rooms.len());
        for (i, room) in rooms.iter().enumerate() {
            room.validate()?;
            if index.insert(room.name.clone(), i).is_some() {
                return Err(MapError::DuplicateRoom {
                    room: room.name.clone(),
                });
            }
        }

        let mut graph = Self {
            adjacency: vec![Vec::new(); rooms.len()],
            rooms,
            index,
        };
        let mut claimed: HashMap<(usize, Direction), usize> = HashMap::new();
        for connection in connections {
            let from = graph.require(&connection.from)?;
            let to = graph.require(&connection.to)?;
            match claimed.insert((from, connection.direction), to) {
                Some(existing) if existing != to => {
                    return Err(MapError::DirectionConflict {
                        room: graph.rooms[from].name.clone(),
                        direction: connection.direction,
                    });
                }
                _ => {}
            }
            graph.link(from, connection.direction, to);
            graph.link(to, connection.direction.opposite(), from);
        }
        for sides in &mut graph.adjacency {
            sides.sort_by_key(|&(direction, _)| direction);
        }
        Ok(graph)
    }

    fn require(&self, id: &str) -> MapResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| MapError::UnknownRoom {
                room: id.to_string(),
            })
    }

    fn link(&mut self, room: usize, direction: Direction, neighbour: usize) {
        let sides = &mut self.adjacency[room];
        if !sides.contains(&(direction, neighbour)) {
            sides.push((direction, neighbour));
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, index: usize) -> Option<&RoomGeometry> {
        self.rooms.get(index)
    }

    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Neighbours of a room, in side order
    pub fn neighbours(&self, room: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        self.adjacency
            .get(room)
            .into_iter()
            .flat_map(|sides| sides.iter().copied())
    }

    /// Place every room breadth-first from `root` at the origin
    ///
    /// A room is placed by the first room that reaches it. Every later edge
    /// reaching an already placed room must compute the same offset. Rooms
    /// left unplaced are reported together.
    pub fn layout(&self, root: &str) -> MapResult<Vec<RoomPlacement>> {
        let root = self.require(root)?;

        let mut offsets: Vec<Option<GridPos>> = vec![None; self.rooms.len()];
        let mut order = Vec::with_capacity(self.rooms.len());
        let mut queue = VecDeque::new();

        offsets[root] = Some(GridPos::ZERO);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let origin = offsets[current].unwrap_or_default();
            order.push(RoomPlacement {
                room: current,
                offset: origin,
            });

            for (direction, next) in self.neighbours(current) {
                let computed =
                    origin + direction.place(&self.rooms[current], &self.rooms[next])?;
                match offsets[next] {
                    None => {
                        offsets[next] = Some(computed);
                        queue.push_back(next);
                    }
                    Some(expected) if expected != computed => {
                        return Err(MapError::GraphInconsistency {
                            room_a: self.rooms[current].name.clone(),
                            room_b: self.rooms[next].name.clone(),
                            expected,
                            computed,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let mut unreachable: Vec<String> = offsets
            .iter()
            .enumerate()
            .filter(|(_, offset)| offset.is_none())
            .map(|(i, _)| self.rooms[i].name.clone())
            .collect();
        if !unreachable.is_empty() {
            unreachable.sort();
            return Err(MapError::UnreachableRooms { rooms: unreachable });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, size: i32) -> RoomGeometry {
        let mid = size / 2;
        RoomGeometry::new(name, size, size)
            .with_entrance(Direction::Left, [0, mid])
            .with_entrance(Direction::Right, [size, mid])
            .with_entrance(Direction::Top, [mid, 0])
            .with_entrance(Direction::Bottom, [mid, size])
    }

    fn offsets(graph: &RoomGraph, placements: &[RoomPlacement]) -> HashMap<String, GridPos> {
        placements
            .iter()
            .map(|p| (graph.room(p.room).unwrap().name.clone(), p.offset))
            .collect()
    }

    #[test]
    fn test_layout_chain() {
        let rooms = vec![square("a", 4), square("b", 4), square("c", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("b", Direction::Bottom, "c"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        let placements = graph.layout("a").unwrap();
        let by_name = offsets(&graph, &placements);

        assert_eq!(placements[0].offset, GridPos::ZERO);
        assert_eq!(by_name["a"], GridPos::new(0, 0));
        assert_eq!(by_name["b"], GridPos::new(4, 0));
        assert_eq!(by_name["c"], GridPos::new(4, 4));
    }

    #[test]
    fn test_layout_follows_edges_backwards() {
        // "b" is attached to the root's left only through an edge that starts at "b"
        let rooms = vec![square("root", 4), square("b", 2)];
        let connections = vec![RoomConnection::new("b", Direction::Right, "root")];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        let by_name = offsets(&graph, &graph.layout("root").unwrap());

        // b's right entrance (2,1) meets root's left entrance (0,2)
        assert_eq!(by_name["b"], GridPos::new(-2, 1));
    }

    #[test]
    fn test_consistent_cycle_is_accepted() {
        let rooms = vec![square("a", 4), square("b", 4), square("c", 4), square("d", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("a", Direction::Bottom, "c"),
            RoomConnection::new("b", Direction::Bottom, "d"),
            RoomConnection::new("c", Direction::Right, "d"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        let by_name = offsets(&graph, &graph.layout("a").unwrap());
        assert_eq!(by_name["d"], GridPos::new(4, 4));
    }

    #[test]
    fn test_inconsistent_cycle_is_rejected() {
        // "d" is too tall for the loop to close
        let d = RoomGeometry::new("d", 4, 6)
            .with_entrance(Direction::Top, [2, 0])
            .with_entrance(Direction::Left, [0, 4]);
        let rooms = vec![square("a", 4), square("b", 4), square("c", 4), d];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("a", Direction::Bottom, "c"),
            RoomConnection::new("b", Direction::Bottom, "d"),
            RoomConnection::new("c", Direction::Right, "d"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        let err = graph.layout("a").unwrap_err();

        match err {
            MapError::GraphInconsistency {
                room_b,
                expected,
                computed,
                ..
            } => {
                assert_eq!(room_b, "d");
                assert_ne!(expected, computed);
            }
            other => panic!("Expected GraphInconsistency, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_rooms_are_reported() {
        let rooms = vec![square("a", 4), square("b", 4), square("z", 4), square("y", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("z", Direction::Right, "y"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();

        match graph.layout("a").unwrap_err() {
            MapError::UnreachableRooms { rooms } => assert_eq!(rooms, vec!["y", "z"]),
            other => panic!("Expected UnreachableRooms, got {other:?}"),
        }
    }

    #[test]
    fn test_direction_conflict() {
        let rooms = vec![square("a", 4), square("b", 4), square("c", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("a", Direction::Right, "c"),
        ];
        let err = RoomGraph::new(rooms, &connections).unwrap_err();
        assert!(matches!(
            err,
            MapError::DirectionConflict { ref room, direction: Direction::Right } if room == "a"
        ));
    }

    #[test]
    fn test_same_side_reached_twice_is_inconsistent() {
        // c's left side is reached from a (at c's level) and from b (one room lower)
        let rooms = vec![square("a", 4), square("b", 4), square("c", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Bottom, "b"),
            RoomConnection::new("a", Direction::Right, "c"),
            RoomConnection::new("b", Direction::Right, "c"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();

        assert!(matches!(
            graph.layout("a"),
            Err(MapError::GraphInconsistency { .. })
        ));
    }

    #[test]
    fn test_same_side_reached_consistently_is_accepted() {
        // b claims a's right side from the other end and lands where a puts it
        let rooms = vec![square("a", 4), square("b", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("b", Direction::Left, "a"),
            RoomConnection::new("b", Direction::Left, "a"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        let by_name = offsets(&graph, &graph.layout("a").unwrap());
        assert_eq!(by_name["b"], GridPos::new(4, 0));
    }

    #[test]
    fn test_mirrored_edge_is_not_a_conflict() {
        let rooms = vec![square("a", 4), square("b", 4)];
        let connections = vec![
            RoomConnection::new("a", Direction::Right, "b"),
            RoomConnection::new("b", Direction::Left, "a"),
        ];
        let graph = RoomGraph::new(rooms, &connections).unwrap();
        assert_eq!(graph.neighbours(0).count(), 1);
        assert_eq!(graph.layout("a").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_and_duplicate_rooms() {
        let connections = vec![RoomConnection::new("a", Direction::Right, "ghost")];
        assert!(matches!(
            RoomGraph::new(vec![square("a", 4)], &connections),
            Err(MapError::UnknownRoom { ref room }) if room == "ghost"
        ));

        assert!(matches!(
            RoomGraph::new(vec![square("a", 4), square("a", 2)], &[]),
            Err(MapError::DuplicateRoom { .. })
        ));

        let graph = RoomGraph::new(vec![square("a", 4)], &[]).unwrap();
        assert!(matches!(graph.layout("nope"), Err(MapError::UnknownRoom { .. })));
    }

    #[test]
    fn test_missing_entrance_aborts_layout() {
        let closed = RoomGeometry::new("closed", 4, 4);
        let graph = RoomGraph::new(
            vec![square("a", 4), closed],
            &[RoomConnection::new("a", Direction::Right, "closed")],
        )
        .unwrap();
        assert!(matches!(
            graph.layout("a"),
            Err(MapError::MissingEntrance { .. })
        ));
    }

    #[test]
    fn test_parse_world_json() {
        let json = r#"{
            "name": "Keep",
            "root": "hall",
            "rooms": [
                {"id": "hall", "map_path": "hall.map.json", "entrances": {"right": [4, 2]}},
                {"id": "yard", "map": {"width": 4, "height": 4, "tile_width": 16, "tile_height": 16},
                 "entrances": {"left": [0, 1]}}
            ],
            "connections": [{"from": "hall", "direction": "right", "to": "yard"}]
        }"#;
        let world: WorldDesc = serde_json::from_str(json).unwrap();

        assert_eq!(world.root, "hall");
        assert!(matches!(
            world.get_room("hall").unwrap().source,
            RoomMapSource::File { ref map_path } if map_path == "hall.map.json"
        ));
        let yard = world.get_room("yard").unwrap();
        let RoomMapSource::Inline { map } = &yard.source else {
            panic!("Expected inline map");
        };
        let geometry = yard.geometry(map);
        assert_eq!((geometry.width, geometry.height), (4, 4));
        assert_eq!(geometry.entrance(Direction::Left).unwrap(), GridPos::new(0, 1));
        assert_eq!(world.connections[0].direction, Direction::Right);
    }
}
