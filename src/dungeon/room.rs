//! Rooms and their contents
//!
//! A room's `cleared` flag only ever goes from false to true, and only for a
//! room that actually had hostiles in it.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::ai::{Behavior, Hostile};
use crate::collision::Rect;
use crate::core::types::Vec2;
use crate::loot::LootDrop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum RoomRole {
    Start,
    Combat,
    Treasure,
    Boss,
}

/// Loot lying in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub drop: LootDrop,
    pub position: Vec2,
    pub collected: bool,
}

/// Decorative prop; never blocks movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f32,
    /// Render variant
    pub style: u8,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub index: usize,
    pub bounds: Rect,
    pub role: RoomRole,
    pub hostiles: Vec<Hostile>,
    pub loot: Vec<LootEntry>,
    pub obstacles: Vec<Obstacle>,
    /// How many hostiles were placed at generation
    spawned: usize,
    cleared: bool,
}

impl Room {
    pub fn new(index: usize, bounds: Rect, role: RoomRole) -> Self {
        Self {
            index,
            bounds,
            role,
            hostiles: Vec::new(),
            loot: Vec::new(),
            obstacles: Vec::new(),
            spawned: 0,
            cleared: false,
        }
    }

    /// Add a hostile during generation
    pub fn spawn(&mut self, hostile: Hostile) {
        self.hostiles.push(hostile);
        self.spawned += 1;
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn live_count(&self) -> usize {
        self.hostiles.iter().filter(|h| h.body().is_alive()).count()
    }

    /// Take the dead out of the hostile list
    pub fn remove_dead(&mut self) -> Vec<Hostile> {
        let (dead, alive): (Vec<Hostile>, Vec<Hostile>) =
            self.hostiles.drain(..).partition(|h| !h.body().is_alive());
        self.hostiles = alive;
        dead
    }

    /// Mark the room cleared if it just ran out of hostiles
    ///
    /// Returns true exactly once over the room's life.
    pub fn try_clear(&mut self) -> bool {
        if self.cleared || self.spawned == 0 || self.live_count() > 0 {
            return false;
        }
        self.cleared = true;
        true
    }

    pub fn uncollected_loot(&self) -> impl Iterator<Item = &LootEntry> {
        self.loot.iter().filter(|l| !l.collected)
    }

    pub fn boss(&self) -> Option<&Hostile> {
        self.hostiles.iter().find(|h| h.is_boss())
    }
}
