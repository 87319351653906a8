//! Closed set of hostile actors and the interface the run drives them through

use rand_chacha::ChaCha8Rng;

use crate::actor::body::{ActorBody, Damageable, HitOutcome};
use crate::ai::boss::Boss;
use crate::ai::enemy::Enemy;
use crate::ai::state::AiState;
use crate::collision::CollisionQuery;
use crate::combat::CombatResolver;
use crate::core::types::{ActorId, Faction, Vec2};
use crate::status::StatusEffectManager;

/// Notable things a hostile did during its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiSignal {
    Enraged(ActorId),
    Teleported { id: ActorId, to: Vec2 },
    PhaseChange { id: ActorId, phase: u32 },
    Special { id: ActorId, name: &'static str },
}

/// Everything a hostile may read or touch during its update
pub struct AiContext<'a> {
    /// Where to aim: the player, or the decoy while one is out
    pub target: Vec2,
    pub dt: f32,
    pub geometry: &'a CollisionQuery,
    pub resolver: &'a mut CombatResolver,
    pub rng: &'a mut ChaCha8Rng,
    pub signals: Vec<AiSignal>,
}

impl<'a> AiContext<'a> {
    pub fn new(
        target: Vec2,
        dt: f32,
        geometry: &'a CollisionQuery,
        resolver: &'a mut CombatResolver,
        rng: &'a mut ChaCha8Rng,
    ) -> Self {
        Self {
            target,
            dt,
            geometry,
            resolver,
            rng,
            signals: Vec::new(),
        }
    }
}

/// Per-frame interface shared by enemies and bosses
pub trait Behavior {
    fn body(&self) -> &ActorBody;
    fn body_mut(&mut self) -> &mut ActorBody;
    fn status(&self) -> &StatusEffectManager;
    fn status_mut(&mut self) -> &mut StatusEffectManager;
    fn ai_state(&self) -> AiState;
    /// Short type tag for logs and snapshots
    fn label(&self) -> &'static str;

    /// Render hint only; never gates AI logic
    fn is_invisible(&self) -> bool {
        false
    }

    /// Advance one frame; the dead are skipped by the caller
    fn update(&mut self, ctx: &mut AiContext<'_>);
}

#[derive(Debug, Clone)]
pub enum Hostile {
    Enemy(Enemy),
    Boss(Boss),
}

impl Hostile {
    fn behavior(&self) -> &dyn Behavior {
        match self {
            Hostile::Enemy(enemy) => enemy,
            Hostile::Boss(boss) => boss,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Hostile::Enemy(enemy) => enemy,
            Hostile::Boss(boss) => boss,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Hostile::Boss(_))
    }

    pub fn as_boss(&self) -> Option<&Boss> {
        match self {
            Hostile::Boss(boss) => Some(boss),
            Hostile::Enemy(_) => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Hostile::Enemy(enemy) => Some(enemy),
            Hostile::Boss(_) => None,
        }
    }

    /// Current boss phase, if this is a boss
    pub fn phase(&self) -> Option<u32> {
        self.as_boss().map(Boss::phase)
    }
}

impl Behavior for Hostile {
    fn body(&self) -> &ActorBody {
        self.behavior().body()
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        self.behavior_mut().body_mut()
    }

    fn status(&self) -> &StatusEffectManager {
        self.behavior().status()
    }

    fn status_mut(&mut self) -> &mut StatusEffectManager {
        self.behavior_mut().status_mut()
    }

    fn ai_state(&self) -> AiState {
        self.behavior().ai_state()
    }

    fn label(&self) -> &'static str {
        self.behavior().label()
    }

    fn is_invisible(&self) -> bool {
        self.behavior().is_invisible()
    }

    fn update(&mut self, ctx: &mut AiContext<'_>) {
        if !self.body().is_alive() {
            return;
        }
        self.behavior_mut().update(ctx);
    }
}

impl Damageable for Hostile {
    fn id(&self) -> ActorId {
        self.body().id
    }

    fn faction(&self) -> Faction {
        Faction::Hostile
    }

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn set_position(&mut self, position: Vec2) {
        self.body_mut().position = position;
    }

    fn radius(&self) -> f32 {
        self.body().radius
    }

    fn is_alive(&self) -> bool {
        self.body().is_alive()
    }

    fn receive_hit(&mut self, damage: f32) -> HitOutcome {
        let dealt = self.body_mut().take_damage(damage);
        HitOutcome::Applied {
            dealt,
            killed: dealt > 0.0 && !self.body().is_alive(),
        }
    }

    fn status_effects_mut(&mut self) -> &mut StatusEffectManager {
        Behavior::status_mut(self)
    }
}
