//! Scripted player for headless runs and benchmarks
//!
//! Fights whatever is awake in the current room, sweeps up loot, then walks
//! the L-shaped corridor to the next room in path order.

use crate::actor::Intent;
use crate::ai::Behavior;
use crate::collision::nearest;
use crate::core::types::Vec2;
use crate::fragments::ABILITY_SLOTS;
use crate::simulation::run::DungeonRun;

/// Close enough to a waypoint to move on
const ARRIVE_DISTANCE: f32 = 8.0;
/// Hostiles closer than this get swung at
const ENGAGE_DISTANCE: f32 = 70.0;
/// Abilities fire when a hostile is within this range
const ABILITY_DISTANCE: f32 = 150.0;
/// Dodge when health drops below this fraction
const DODGE_HEALTH: f32 = 0.35;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Room the autopilot is walking toward
    target_room: usize,
    /// 0: center of the room left behind, 1: corridor elbow, 2: target center
    leg: u8,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { target_room: 1, leg: 0 }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_room(&self) -> usize {
        self.target_room
    }

    /// Intents for the next tick
    pub fn next_intents(&mut self, run: &DungeonRun) -> Vec<Intent> {
        let position = run.player().position();
        if let Some(current) = run.current_room() {
            self.arrive(current);
        }

        if let Some(intents) = self.fight(run, position) {
            return intents;
        }
        if let Some(intents) = self.loot(run, position) {
            return intents;
        }
        self.travel(run, position)
    }

    /// Standing in a room restarts the route from its center
    fn arrive(&mut self, current: usize) {
        if current >= self.target_room {
            self.target_room = current + 1;
            self.leg = 0;
        }
    }

    fn fight(&mut self, run: &DungeonRun, position: Vec2) -> Option<Vec<Intent>> {
        let room = run.dungeon().room(run.current_room()?)?;
        let live = room
            .hostiles
            .iter()
            .filter(|h| h.body().is_alive())
            .map(|h| (h.body().position, h.body().position));
        let (target, distance) = nearest(position, live)?;

        // Knocked off the path; head back through the room center
        self.leg = 0;

        let player = run.player();
        let mut intents = vec![step_toward(position, target)];
        if distance < ENGAGE_DISTANCE {
            intents.push(Intent::Attack);
        }
        if distance < ABILITY_DISTANCE {
            let ready = (0..ABILITY_SLOTS)
                .find(|s| player.loadout.active(*s).is_some() && player.loadout.cooldown(*s) == Some(0.0));
            if let Some(slot) = ready {
                intents.push(Intent::ActivateAbility(slot));
            }
        }
        if player.health() < player.max_health() * DODGE_HEALTH {
            intents.push(Intent::Dodge);
        }
        Some(intents)
    }

    fn loot(&mut self, run: &DungeonRun, position: Vec2) -> Option<Vec<Intent>> {
        let room = run.dungeon().room(run.current_room()?)?;
        let (spot, distance) = nearest(position, room.uncollected_loot().map(|l| (l.position, l.position)))?;

        self.leg = 0;
        if distance < run.player().tuning().pickup_radius {
            Some(vec![Intent::Interact])
        } else {
            Some(vec![step_toward(position, spot)])
        }
    }

    fn travel(&mut self, run: &DungeonRun, position: Vec2) -> Vec<Intent> {
        let dungeon = run.dungeon();
        let (from, to) = match (dungeon.room(self.target_room - 1), dungeon.room(self.target_room)) {
            (Some(from), Some(to)) => (from.center(), to.center()),
            _ => return Vec::new(),
        };

        let waypoints = [from, Vec2::new(to.x, from.y), to];
        let mut waypoint = waypoints[self.leg as usize];
        if waypoint.distance(&position) < ARRIVE_DISTANCE && self.leg < 2 {
            self.leg += 1;
            waypoint = waypoints[self.leg as usize];
        }
        vec![step_toward(position, waypoint)]
    }
}

fn step_toward(from: Vec2, to: Vec2) -> Intent {
    let dir = (to - from).normalize();
    Intent::Move { dx: dir.x, dy: dir.y }
}
