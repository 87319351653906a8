//! The shared chase/attack loop
//!
//! Every hostile runs the same three-state machine. Variants add behavior
//! around it but never change the transition rule.

use serde::{Deserialize, Serialize};

use crate::actor::body::ActorBody;
use crate::collision::CollisionQuery;
use crate::core::types::Vec2;
use crate::status::StatusEffectManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
}

impl AiState {
    /// Pick the state for a target `distance` away
    pub fn select(distance: f32, aggro_range: f32, attack_range: f32) -> AiState {
        if distance >= aggro_range {
            AiState::Idle
        } else if distance < attack_range {
            AiState::Attack
        } else {
            AiState::Chase
        }
    }
}

/// Run one step of the base loop for `body`
///
/// Moves the body while chasing and returns `true` when an attack should be
/// launched this tick. The cooldown is reset here when it fires.
pub fn step_base_loop(
    state: &mut AiState,
    body: &mut ActorBody,
    status: &StatusEffectManager,
    target: Vec2,
    dt: f32,
    geometry: &CollisionQuery,
) -> bool {
    body.tick_cooldown(dt);
    let distance = body.distance_to(target);
    *state = AiState::select(distance, body.aggro_range, body.attack_range);

    match *state {
        AiState::Idle => {
            body.velocity = Vec2::ZERO;
            false
        }
        AiState::Chase => {
            let speed = body.speed * status.speed_multiplier();
            let direction = (target - body.position).normalize();
            let step = (speed * dt).min(distance);
            let from = body.position;
            body.position = geometry.resolve_movement(from, direction * step, body.radius);
            body.velocity = direction * speed;
            false
        }
        AiState::Attack => {
            body.velocity = Vec2::ZERO;
            if body.cooldown_timer <= 0.0 {
                body.cooldown_timer = body.attack_cooldown;
                true
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ActorId;

    fn body() -> ActorBody {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 50.0);
        body.speed = 100.0;
        body.aggro_range = 300.0;
        body.attack_range = 40.0;
        body.attack_cooldown = 1.0;
        body.radius = 10.0;
        body
    }

    #[test]
    fn test_state_selection() {
        assert_eq!(AiState::select(500.0, 300.0, 40.0), AiState::Idle);
        assert_eq!(AiState::select(300.0, 300.0, 40.0), AiState::Idle);
        assert_eq!(AiState::select(200.0, 300.0, 40.0), AiState::Chase);
        assert_eq!(AiState::select(39.0, 300.0, 40.0), AiState::Attack);
    }

    #[test]
    fn test_chase_moves_toward_target() {
        let arena = CollisionQuery::arena(1000.0);
        let mut b = body();
        let mut state = AiState::Idle;
        let status = StatusEffectManager::new();

        let attacked = step_base_loop(&mut state, &mut b, &status, Vec2::new(200.0, 0.0), 0.5, &arena);
        assert!(!attacked);
        assert_eq!(state, AiState::Chase);
        assert!((b.position.x - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_slow_reduces_chase_speed() {
        let arena = CollisionQuery::arena(1000.0);
        let mut b = body();
        let mut state = AiState::Idle;
        let mut status = StatusEffectManager::new();
        status.add_effect(crate::status::StatusKind::Slow, 5.0, 0.5);

        step_base_loop(&mut state, &mut b, &status, Vec2::new(200.0, 0.0), 0.5, &arena);
        assert!((b.position.x - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_attack_gated_by_cooldown() {
        let arena = CollisionQuery::arena(1000.0);
        let mut b = body();
        let mut state = AiState::Idle;
        let status = StatusEffectManager::new();
        let target = Vec2::new(20.0, 0.0);

        assert!(step_base_loop(&mut state, &mut b, &status, target, 0.25, &arena));
        for _ in 0..3 {
            assert!(!step_base_loop(&mut state, &mut b, &status, target, 0.25, &arena));
        }
        assert_eq!(state, AiState::Attack);
        assert!(step_base_loop(&mut state, &mut b, &status, target, 0.25, &arena));
    }

    #[test]
    fn test_idle_zeroes_velocity() {
        let arena = CollisionQuery::arena(1000.0);
        let mut b = body();
        b.velocity = Vec2::new(5.0, 5.0);
        let mut state = AiState::Chase;
        let status = StatusEffectManager::new();
        step_base_loop(&mut state, &mut b, &status, Vec2::new(900.0, 0.0), 0.1, &arena);
        assert_eq!(state, AiState::Idle);
        assert_eq!(b.velocity, Vec2::ZERO);
    }
}
