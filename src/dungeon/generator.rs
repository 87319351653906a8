//! Floor generation
//!
//! Rooms sit on a jittered grid walked in serpentine order, so consecutive
//! rooms are always grid neighbours and an L-shaped corridor between them
//! never crosses a third room. Everything is driven by one `ChaCha8Rng`
//! seeded from `(seed, floor, biome)`.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::{spawn_boss, spawn_enemy, Hostile};
use crate::collision::Rect;
use crate::core::config::{config, DungeonTuning};
use crate::core::types::{ActorIdAllocator, Vec2};
use crate::dungeon::biome::Biome;
use crate::dungeon::layout::Dungeon;
use crate::dungeon::room::{LootEntry, Obstacle, Room, RoomRole};
use crate::loot::LootGenerator;

const MIN_LOOT_DROPS: u32 = 2;
const MAX_LOOT_DROPS: u32 = 4;
const MIN_OBSTACLES: u32 = 2;
const MAX_OBSTACLES: u32 = 5;
const OBSTACLE_RADIUS: (f32, f32) = (10.0, 24.0);
const OBSTACLE_STYLES: u8 = 4;

#[derive(Debug, Clone)]
pub struct EncounterGenerator {
    tuning: DungeonTuning,
    loot: LootGenerator,
}

impl Default for EncounterGenerator {
    fn default() -> Self {
        Self::new(config().dungeon.clone(), LootGenerator::default())
    }
}

impl EncounterGenerator {
    pub fn new(tuning: DungeonTuning, loot: LootGenerator) -> Self {
        Self { tuning, loot }
    }

    pub fn room_count(&self, floor: u32) -> usize {
        self.tuning.base_rooms + self.tuning.rooms_per_floor * floor as usize
    }

    /// Mix the inputs into one rng seed
    pub fn floor_seed(seed: u64, floor: u32, biome: Biome) -> u64 {
        seed.wrapping_mul(6364136223846793005)
            .wrapping_add((floor as u64).wrapping_mul(1442695040888963407))
            .wrapping_add(biome.ordinal().wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Build one floor; floors count from 1 and floor 0 is generated as floor 1
    pub fn generate(&self, seed: u64, floor: u32, biome: Biome) -> Dungeon {
        let floor = floor.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(Self::floor_seed(seed, floor, biome));
        let mut ids = ActorIdAllocator::new();

        let bounds = self.layout_rooms(&mut rng, self.room_count(floor));
        let roles = self.assign_roles(&mut rng, bounds.len());
        let corridors: Vec<Rect> = bounds
            .windows(2)
            .flat_map(|pair| l_corridor(&pair[0], &pair[1], self.tuning.corridor_width))
            .collect();

        let mut rooms = Vec::with_capacity(bounds.len());
        for (index, (rect, role)) in bounds.into_iter().zip(roles).enumerate() {
            let mut room = Room::new(index, rect, role);
            self.populate(&mut room, &mut rng, &mut ids, floor, biome);
            self.scatter_obstacles(&mut room, &mut rng);
            rooms.push(room);
        }

        let dungeon = Dungeon::new(seed, floor, biome, rooms, corridors);
        tracing::info!(
            "Generated floor {} ({}) with {} rooms, {} hostiles",
            floor,
            biome,
            dungeon.rooms().len(),
            dungeon.live_hostiles()
        );
        dungeon
    }

    fn layout_rooms(&self, rng: &mut ChaCha8Rng, count: usize) -> Vec<Rect> {
        let columns = (count as f32).sqrt().ceil().max(1.0) as usize;
        let t = &self.tuning;

        (0..count)
            .map(|i| {
                let row = i / columns;
                let mut col = i % columns;
                if row % 2 == 1 {
                    col = columns - 1 - col;
                }

                let jitter_x = rng.gen_range(-t.room_jitter..=t.room_jitter);
                let jitter_y = rng.gen_range(-t.room_jitter..=t.room_jitter);
                let center = Vec2::new(
                    col as f32 * t.room_spacing + jitter_x,
                    row as f32 * t.room_spacing + jitter_y,
                );
                let width = rng.gen_range(t.room_min_size..=t.room_max_size);
                let height = rng.gen_range(t.room_min_size..=t.room_max_size);
                Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
            })
            .collect()
    }

    fn assign_roles(&self, rng: &mut ChaCha8Rng, count: usize) -> Vec<RoomRole> {
        (0..count)
            .map(|i| {
                if i == 0 {
                    RoomRole::Start
                } else if i == count - 1 {
                    RoomRole::Boss
                } else if rng.gen_bool(self.tuning.treasure_chance.clamp(0.0, 1.0)) {
                    RoomRole::Treasure
                } else {
                    RoomRole::Combat
                }
            })
            .collect()
    }

    /// Random point comfortably inside the room
    fn interior_point(&self, room: &Room, rng: &mut ChaCha8Rng) -> Vec2 {
        let area = room.bounds.inset(self.tuning.spawn_margin);
        Vec2::new(
            rng.gen_range(area.x..=area.right()),
            rng.gen_range(area.y..=area.bottom()),
        )
    }

    fn populate(&self, room: &mut Room, rng: &mut ChaCha8Rng, ids: &mut ActorIdAllocator, floor: u32, biome: Biome) {
        match room.role {
            RoomRole::Start => {}
            RoomRole::Combat => {
                let count = rng.gen_range(self.tuning.min_enemies..=self.tuning.max_enemies_base + floor);
                for _ in 0..count {
                    let tag = biome.enemy_pool().choose(rng).copied().unwrap_or("grunt");
                    let position = self.interior_point(room, rng);
                    room.spawn(Hostile::Enemy(spawn_enemy(tag, ids.next_id(), position, floor)));
                }
            }
            RoomRole::Boss => {
                let boss = spawn_boss(biome.boss().tag(), ids.next_id(), room.center(), floor);
                room.spawn(Hostile::Boss(boss));
            }
            RoomRole::Treasure => {
                for _ in 0..rng.gen_range(MIN_LOOT_DROPS..=MAX_LOOT_DROPS) {
                    let drop = self.loot.roll_drop(rng, floor);
                    let position = self.interior_point(room, rng);
                    room.loot.push(LootEntry {
                        drop,
                        position,
                        collected: false,
                    });
                }
            }
        }
    }

    fn scatter_obstacles(&self, room: &mut Room, rng: &mut ChaCha8Rng) {
        for _ in 0..rng.gen_range(MIN_OBSTACLES..=MAX_OBSTACLES) {
            let position = self.interior_point(room, rng);
            room.obstacles.push(Obstacle {
                position,
                radius: rng.gen_range(OBSTACLE_RADIUS.0..=OBSTACLE_RADIUS.1),
                style: rng.gen_range(0..OBSTACLE_STYLES),
            });
        }
    }
}

/// Horizontal leg from `a`'s center, then vertical leg into `b`'s center
///
/// Each leg extends half a width past the bend so the elbow is walkable.
pub fn l_corridor(a: &Rect, b: &Rect, width: f32) -> [Rect; 2] {
    let from = a.center();
    let to = b.center();
    let half = width / 2.0;

    let horizontal = Rect::from_corners(
        Vec2::new(from.x.min(to.x) - half, from.y - half),
        Vec2::new(from.x.max(to.x) + half, from.y + half),
    );
    let vertical = Rect::from_corners(
        Vec2::new(to.x - half, from.y.min(to.y) - half),
        Vec2::new(to.x + half, from.y.max(to.y) + half),
    );
    [horizontal, vertical]
}
