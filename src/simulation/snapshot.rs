//! Read-only frame view handed to the renderer

use serde::Serialize;

use crate::actor::Player;
use crate::ai::{AiState, Behavior, Hostile};
use crate::combat::CombatResolver;
use crate::core::types::{ActorId, Tick, Vec2};
use crate::fragments::ABILITY_SLOTS;
use crate::status::StatusKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub dodging: bool,
    pub cooldowns: [f32; ABILITY_SLOTS],
    pub statuses: Vec<StatusKind>,
    pub gold: u32,
    pub level: u32,
}

impl PlayerSnapshot {
    pub fn capture(player: &Player) -> Self {
        Self {
            position: player.position(),
            facing: player.facing,
            health: player.health(),
            max_health: player.max_health(),
            dodging: player.is_dodging(),
            cooldowns: *player.loadout.cooldowns(),
            statuses: player.status.active_kinds(),
            gold: player.gold,
            level: player.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub label: &'static str,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub state: AiState,
    pub statuses: Vec<StatusKind>,
    pub invisible: bool,
    pub phase: Option<u32>,
}

impl ActorSnapshot {
    pub fn capture(hostile: &Hostile) -> Self {
        let body = hostile.body();
        Self {
            id: body.id,
            label: hostile.label(),
            position: body.position,
            health: body.health(),
            max_health: body.max_health(),
            state: hostile.ai_state(),
            statuses: hostile.status().active_kinds(),
            invisible: hostile.is_invisible(),
            phase: hostile.phase(),
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: Tick,
    pub elapsed: f32,
    pub current_room: Option<usize>,
    pub player: PlayerSnapshot,
    /// Living hostiles in the current room
    pub actors: Vec<ActorSnapshot>,
    /// Origin and radius of each live hitbox
    pub hitboxes: Vec<(Vec2, f32)>,
    pub projectiles: Vec<Vec2>,
    pub decoy: Option<Vec2>,
}

impl FrameSnapshot {
    pub fn capture(
        tick: Tick,
        elapsed: f32,
        current_room: Option<usize>,
        player: &Player,
        hostiles: &[Hostile],
        resolver: &CombatResolver,
    ) -> Self {
        Self {
            tick,
            elapsed,
            current_room,
            player: PlayerSnapshot::capture(player),
            actors: hostiles
                .iter()
                .filter(|h| h.body().is_alive())
                .map(ActorSnapshot::capture)
                .collect(),
            hitboxes: resolver.hitboxes().iter().map(|h| (h.origin, h.radius)).collect(),
            projectiles: resolver.projectiles().iter().map(|p| p.position).collect(),
            decoy: resolver.decoy().map(|d| d.position),
        }
    }
}
