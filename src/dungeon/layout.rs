//! A generated floor: rooms in path order plus the corridors between them

use crate::collision::{CollisionQuery, Rect};
use crate::core::types::Vec2;
use crate::dungeon::biome::Biome;
use crate::dungeon::room::{Room, RoomRole};

/// Rooms are connected linearly: room `i` only opens onto `i - 1` and `i + 1`.
/// The layout never changes after generation; only room contents shrink.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: u64,
    pub floor: u32,
    pub biome: Biome,
    rooms: Vec<Room>,
    corridors: Vec<Rect>,
    boss_room: usize,
    spawn: Vec2,
    geometry: CollisionQuery,
}

impl Dungeon {
    /// Corridors must reach into the rooms they join by at least an actor's
    /// radius or the seam blocks movement (see `CollisionQuery::circle_fits`).
    pub fn new(seed: u64, floor: u32, biome: Biome, rooms: Vec<Room>, corridors: Vec<Rect>) -> Self {
        let boss_room = rooms
            .iter()
            .position(|r| r.role == RoomRole::Boss)
            .unwrap_or(rooms.len().saturating_sub(1));
        let spawn = rooms.first().map(Room::center).unwrap_or(Vec2::ZERO);

        let walkable = rooms
            .iter()
            .map(|r| r.bounds)
            .chain(corridors.iter().copied())
            .collect();

        Self {
            seed,
            floor,
            biome,
            rooms,
            corridors,
            boss_room,
            spawn,
            geometry: CollisionQuery::new(walkable),
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn room_mut(&mut self, index: usize) -> Option<&mut Room> {
        self.rooms.get_mut(index)
    }

    pub fn corridors(&self) -> &[Rect] {
        &self.corridors
    }

    pub fn boss_room(&self) -> usize {
        self.boss_room
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn geometry(&self) -> &CollisionQuery {
        &self.geometry
    }

    /// Room containing `point`; corridors belong to no room
    pub fn room_at(&self, point: Vec2) -> Option<usize> {
        self.rooms.iter().position(|r| r.contains(point))
    }

    /// The floor is done once its boss room is cleared
    pub fn is_cleared(&self) -> bool {
        self.rooms.get(self.boss_room).map_or(false, Room::is_cleared)
    }

    pub fn live_hostiles(&self) -> usize {
        self.rooms.iter().map(Room::live_count).sum()
    }

    /// Room contents are mutable; the room list itself is not
    pub fn rooms_mut(&mut self) -> &mut [Room] {
        &mut self.rooms
    }

    /// Rooms and walkable area borrowed at once
    pub fn split_mut(&mut self) -> (&mut [Room], &CollisionQuery) {
        (&mut self.rooms, &self.geometry)
    }
}
