//! One dungeon attempt, driven a fixed timestep at a time
//!
//! Tick order: status effects, player intents and cooldowns, hostile AI,
//! combat resolution, deaths, room clearance.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actor::{Damageable, HitOutcome, Intent, Player};
use crate::ai::{AiContext, AiSignal, Behavior};
use crate::combat::{AttackOwner, CombatResolver};
use crate::core::config::config;
use crate::core::error::{Result, SimError};
use crate::core::types::{RunId, Tick};
use crate::dungeon::{Biome, Dungeon, EncounterGenerator};
use crate::fragments::create_fragment;
use crate::simulation::events::{EventBus, GameEvent};
use crate::simulation::progression::{AccountProgress, RewardDelta};
use crate::simulation::snapshot::FrameSnapshot;

/// Fixed step the binaries drive the simulation with
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Keeps the AI stream apart from the generation stream
const AI_STREAM: u64 = 0xA1A1_5EED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    InProgress,
    Cleared,
    Died,
}

/// What the player brings into a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub seed: u64,
    pub floor: u32,
    pub biome: String,
    pub core: Option<String>,
    /// Actives fill ability slots in order
    pub actives: Vec<String>,
    pub passives: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            floor: 1,
            biome: Biome::default().tag().to_string(),
            core: Some("void_core".to_string()),
            actives: vec!["void_step".to_string(), "ember_burst".to_string()],
            passives: vec!["iron_skin".to_string()],
        }
    }
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub seed: u64,
    pub floor: u32,
    pub biome: Biome,
    pub outcome: RunOutcome,
    pub ticks: Tick,
    pub elapsed: f32,
    pub kills: u32,
    pub rooms_cleared: u32,
    pub player_level: u32,
    pub player_health: f32,
    pub gold: u32,
    pub reward: RewardDelta,
}

#[derive(Debug)]
pub struct DungeonRun {
    id: RunId,
    dungeon: Dungeon,
    player: Player,
    resolver: CombatResolver,
    rng: ChaCha8Rng,
    bus: EventBus,
    current_room: Option<usize>,
    /// Last room the player stood in; corridors don't reset it
    last_room: Option<usize>,
    tick: Tick,
    elapsed: f32,
    outcome: RunOutcome,
    experience_earned: u32,
    kills: u32,
    rooms_cleared: u32,
}

impl DungeonRun {
    /// Generate a floor and equip the starting loadout
    ///
    /// Locked or unknown biomes fall back to the default biome. Fragments the
    /// account has not unlocked, or that fail to equip, are skipped.
    pub fn enter(progress: &AccountProgress, options: RunOptions) -> Self {
        let biome = resolve_biome(progress, &options.biome);
        let dungeon = EncounterGenerator::default().generate(options.seed, options.floor, biome);
        let mut player = Player::new(dungeon.spawn());
        equip_starting(&mut player, progress, &options);

        info!(
            "Entering floor {} of {} (seed {}, {} rooms)",
            dungeon.floor,
            dungeon.biome,
            dungeon.seed,
            dungeon.rooms().len()
        );
        Self::from_parts(dungeon, player)
    }

    /// Same as `enter` but refuses floor 0 and locked or unknown biomes and
    /// fragments
    pub fn try_enter(progress: &AccountProgress, options: RunOptions) -> Result<Self> {
        if options.floor == 0 {
            return Err(SimError::InvalidFloor(0));
        }
        let biome = Biome::from_tag(&options.biome)?;
        if !progress.has_biome(biome) {
            return Err(SimError::LockedBiome(biome.to_string()));
        }
        let names = options.core.iter().chain(&options.actives).chain(&options.passives);
        for name in names {
            if !progress.has_fragment(name) {
                return Err(SimError::LockedFragment(name.clone()));
            }
            create_fragment(name)?;
        }
        Ok(Self::enter(progress, options))
    }

    /// Wrap an already built floor and player
    pub fn from_parts(dungeon: Dungeon, player: Player) -> Self {
        let stream = EncounterGenerator::floor_seed(dungeon.seed, dungeon.floor, dungeon.biome) ^ AI_STREAM;
        let current_room = dungeon.room_at(player.position());
        Self {
            id: RunId::new(),
            rng: ChaCha8Rng::seed_from_u64(stream),
            dungeon,
            player,
            resolver: CombatResolver::new(),
            bus: EventBus::new(),
            current_room,
            last_room: current_room,
            tick: 0,
            elapsed: 0.0,
            outcome: RunOutcome::InProgress,
            experience_earned: 0,
            kills: 0,
            rooms_cleared: 0,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn dungeon_mut(&mut self) -> &mut Dungeon {
        &mut self.dungeon
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn resolver(&self) -> &CombatResolver {
        &self.resolver
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn current_room(&self) -> Option<usize> {
        self.current_room
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome != RunOutcome::InProgress
    }

    pub fn ticks(&self) -> Tick {
        self.tick
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn rooms_cleared(&self) -> u32 {
        self.rooms_cleared
    }

    /// Advance the run by `dt` seconds
    ///
    /// Returns the events produced this tick; they are also published on the
    /// bus. A finished run ignores further ticks.
    pub fn tick(&mut self, dt: f32, intents: &[Intent]) -> Vec<GameEvent> {
        if self.is_over() || dt <= 0.0 {
            return Vec::new();
        }
        self.tick += 1;
        self.elapsed += dt;
        let mut events = Vec::new();

        self.tick_statuses(dt);

        self.player.tick_timers(dt);
        for intent in intents {
            self.apply_intent(*intent, dt, &mut events);
        }
        self.enter_room(self.dungeon.room_at(self.player.position()));
        self.update_hostiles(dt, &mut events);

        self.resolve_combat(dt, &mut events);
        self.collect_dead(&mut events);

        if self.player.is_alive() {
            self.check_clearance(&mut events);
        } else {
            info!("Player died on floor {} after {} ticks", self.dungeon.floor, self.tick);
            self.outcome = RunOutcome::Died;
            self.player.status.clear();
            events.push(GameEvent::PlayerDied);
        }
        if self.is_over() {
            self.resolver.clear();
        }

        self.bus.publish_all(&events);
        events
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let hostiles = self
            .current_room
            .and_then(|i| self.dungeon.room(i))
            .map(|r| r.hostiles.as_slice())
            .unwrap_or(&[]);
        FrameSnapshot::capture(
            self.tick,
            self.elapsed,
            self.current_room,
            &self.player,
            hostiles,
            &self.resolver,
        )
    }

    /// What the account gains from the run as it stands
    ///
    /// Dying forfeits half the gold and the equipped core. Clearing a floor
    /// unlocks the next biome.
    pub fn reward(&self) -> RewardDelta {
        let gold = self.player.gold;
        match self.outcome {
            RunOutcome::Cleared => RewardDelta {
                experience: self.experience_earned,
                currency: gold,
                lost_core: None,
                unlocked_biomes: next_biome(self.dungeon.biome).into_iter().collect(),
            },
            RunOutcome::Died => RewardDelta {
                experience: self.experience_earned,
                currency: gold / 2,
                lost_core: self.player.loadout.core().map(|c| c.name().to_string()),
                unlocked_biomes: Vec::new(),
            },
            RunOutcome::InProgress => RewardDelta {
                experience: self.experience_earned,
                currency: gold / 2,
                ..Default::default()
            },
        }
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            run_id: self.id,
            seed: self.dungeon.seed,
            floor: self.dungeon.floor,
            biome: self.dungeon.biome,
            outcome: self.outcome,
            ticks: self.tick,
            elapsed: self.elapsed,
            kills: self.kills,
            rooms_cleared: self.rooms_cleared,
            player_level: self.player.level(),
            player_health: self.player.health(),
            gold: self.player.gold,
            reward: self.reward(),
        }
    }

    /// Poison lands straight on the body; dodging does not avoid it
    fn tick_statuses(&mut self, dt: f32) {
        let result = self.player.status.tick(dt);
        self.player.body.take_damage(result.poison_damage);
        self.player.body.heal(result.regen_heal);

        for room in self.dungeon.rooms_mut() {
            for hostile in room.hostiles.iter_mut().filter(|h| h.body().is_alive()) {
                let result = hostile.status_mut().tick(dt);
                let body = hostile.body_mut();
                body.take_damage(result.poison_damage);
                body.heal(result.regen_heal);
            }
        }
    }

    fn apply_intent(&mut self, intent: Intent, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.player.is_alive() {
            return;
        }
        match intent {
            Intent::Move { dx, dy } => {
                self.player.move_by(dx, dy, dt, self.dungeon.geometry());
            }
            Intent::Attack => {
                if let Some(spec) = self.player.try_attack() {
                    self.resolver.spawn_hitbox(AttackOwner::Player, spec);
                }
            }
            Intent::Dodge => {
                self.player.try_dodge();
            }
            Intent::ActivateAbility(slot) => {
                let activation = match self.player.activate(slot) {
                    Some(a) => a,
                    None => return,
                };
                debug!("Slot {} fired {}", slot, activation.fragment);
                events.push(GameEvent::AbilityUsed {
                    slot,
                    fragment: activation.fragment,
                });

                let room = self.dungeon.room_at(self.player.position());
                let (rooms, geometry) = self.dungeon.split_mut();
                let mut hostiles: Vec<&mut dyn Damageable> = match room {
                    Some(i) => rooms[i].hostiles.iter_mut().map(|h| h as &mut dyn Damageable).collect(),
                    None => Vec::new(),
                };
                self.resolver
                    .apply_event(activation.event, &mut self.player, &mut hostiles, geometry);
            }
            Intent::Interact => self.collect_loot(events),
        }
    }

    fn collect_loot(&mut self, events: &mut Vec<GameEvent>) {
        let position = self.player.position();
        let radius = self.player.tuning().pickup_radius;
        let index = match self.dungeon.room_at(position) {
            Some(i) => i,
            None => return,
        };
        let room = match self.dungeon.room_mut(index) {
            Some(r) => r,
            None => return,
        };

        for entry in room.loot.iter_mut() {
            if entry.collected || entry.position.distance(&position) >= radius {
                continue;
            }
            entry.collected = true;
            self.player.collect(entry.drop.clone());
            events.push(GameEvent::LootCollected {
                room: index,
                drop: entry.drop.clone(),
            });
        }
    }

    /// Only the room the player stands in is awake
    fn update_hostiles(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let index = match self.current_room {
            Some(i) => i,
            None => return,
        };
        let target = self.resolver.lure_position(self.player.position());
        let (rooms, geometry) = self.dungeon.split_mut();
        let mut ctx = AiContext::new(target, dt, geometry, &mut self.resolver, &mut self.rng);
        for hostile in rooms[index].hostiles.iter_mut() {
            hostile.update(&mut ctx);
        }

        events.extend(ctx.signals.into_iter().map(|signal| match signal {
            AiSignal::Enraged(actor) => GameEvent::Enraged { actor },
            AiSignal::Teleported { id, to } => GameEvent::Blink { actor: id, to },
            AiSignal::PhaseChange { id, phase } => GameEvent::PhaseChange { boss: id, phase },
            AiSignal::Special { id, name } => GameEvent::BossSpecial { boss: id, name },
        }));
    }

    fn resolve_combat(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let hits = {
            let (rooms, geometry) = self.dungeon.split_mut();
            let mut targets: Vec<&mut dyn Damageable> = Vec::new();
            targets.push(&mut self.player);
            if let Some(i) = self.current_room {
                targets.extend(rooms[i].hostiles.iter_mut().map(|h| h as &mut dyn Damageable));
            }
            self.resolver.tick(dt, &mut targets, geometry)
        };

        for hit in hits {
            events.push(GameEvent::Hit {
                source: hit.owner.actor_id(),
                target: hit.target,
                damage: hit.dealt(),
                position: hit.position,
                suppressed: matches!(hit.outcome, HitOutcome::Suppressed),
            });
            if matches!(hit.owner, AttackOwner::Player) {
                self.player.apply_lifesteal(hit.dealt());
            }
        }
    }

    fn collect_dead(&mut self, events: &mut Vec<GameEvent>) {
        for room in self.dungeon.rooms_mut() {
            for dead in room.remove_dead() {
                let body = dead.body();
                debug!("{} {} died", dead.label(), body.id);
                events.push(GameEvent::Death {
                    actor: body.id,
                    position: body.position,
                });
                if let Some(enemy) = dead.as_enemy() {
                    self.player.gold += enemy.bounty;
                }
                self.kills += 1;
            }
        }
    }

    /// Attacks still in flight don't follow the player into another room
    fn enter_room(&mut self, room: Option<usize>) {
        self.current_room = room;
        if room.is_some() && room != self.last_room {
            let in_flight = self.resolver.hitboxes().len() + self.resolver.projectiles().len();
            debug!("Entered room {:?}, dropping {} attacks", room, in_flight);
            self.resolver.clear();
            self.last_room = room;
        }
    }

    fn check_clearance(&mut self, events: &mut Vec<GameEvent>) {
        let index = match self.current_room {
            Some(i) => i,
            None => return,
        };
        let floor = self.dungeon.floor;
        let is_boss_room = index == self.dungeon.boss_room();
        let cleared = self.dungeon.room_mut(index).map_or(false, |r| r.try_clear());
        if !cleared {
            return;
        }

        let cfg = config();
        let mut experience = cfg.dungeon.xp_per_floor * floor;
        if is_boss_room {
            experience *= cfg.boss.xp_multiplier;
        }
        info!("Room {} cleared (+{} xp)", index, experience);
        events.push(GameEvent::RoomCleared { room: index, experience });
        self.rooms_cleared += 1;
        self.experience_earned += experience;

        let before = self.player.level();
        let gained = self.player.grant_experience(experience);
        for level in before + 1..=before + gained {
            info!("Player reached level {}", level);
            events.push(GameEvent::LevelUp { level });
        }

        if self.dungeon.is_cleared() {
            info!("Floor {} cleared in {:.1}s", floor, self.elapsed);
            self.outcome = RunOutcome::Cleared;
            events.push(GameEvent::DungeonCleared { floor });
        }
    }
}

fn resolve_biome(progress: &AccountProgress, tag: &str) -> Biome {
    let fallback = Biome::default();
    match Biome::from_tag(tag) {
        Ok(biome) if progress.has_biome(biome) => biome,
        Ok(biome) => {
            warn!("Biome {} is locked, entering {}", biome, fallback);
            fallback
        }
        Err(err) => {
            warn!("{}, entering {}", err, fallback);
            fallback
        }
    }
}

fn equip_starting(player: &mut Player, progress: &AccountProgress, options: &RunOptions) {
    let mut slot = 0;
    let names = options.core.iter().chain(&options.actives).chain(&options.passives);
    for name in names {
        if !progress.has_fragment(name) {
            warn!("Fragment {} is locked, skipping", name);
            continue;
        }
        let equipped = create_fragment(name).and_then(|fragment| {
            let active = fragment.is_active();
            player.equip(fragment, slot).map(|_| active)
        });
        match equipped {
            Ok(true) => slot += 1,
            Ok(false) => {}
            Err(err) => warn!("Skipping fragment {}: {}", name, err),
        }
    }
}

fn next_biome(biome: Biome) -> Option<Biome> {
    let all = Biome::all();
    all.iter()
        .position(|b| *b == biome)
        .and_then(|i| all.get(i + 1))
        .copied()
}
