//! Game events and a synchronous topic-based event bus
//!
//! Every `DungeonRun::tick` returns the events it produced and also
//! publishes them here, so audio and particle layers can subscribe to the
//! topics they care about without polling.

use ahash::AHashMap;
use serde::Serialize;

use crate::core::types::{ActorId, Vec2};
use crate::loot::LootDrop;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Topic {
    /// Hits, deaths, ability use
    Combat,
    /// Boss phases, room and floor progress
    Encounter,
    /// Loot and leveling
    Progress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Hit {
        source: ActorId,
        target: ActorId,
        damage: f32,
        position: Vec2,
        /// Landed on a dodging player
        suppressed: bool,
    },
    Death {
        actor: ActorId,
        position: Vec2,
    },
    AbilityUsed {
        slot: usize,
        fragment: &'static str,
    },
    Enraged {
        actor: ActorId,
    },
    Blink {
        actor: ActorId,
        to: Vec2,
    },
    PhaseChange {
        boss: ActorId,
        phase: u32,
    },
    BossSpecial {
        boss: ActorId,
        name: &'static str,
    },
    RoomCleared {
        room: usize,
        experience: u32,
    },
    LootCollected {
        room: usize,
        drop: LootDrop,
    },
    LevelUp {
        level: u32,
    },
    DungeonCleared {
        floor: u32,
    },
    PlayerDied,
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::Hit { .. }
            | GameEvent::Death { .. }
            | GameEvent::AbilityUsed { .. }
            | GameEvent::Enraged { .. }
            | GameEvent::Blink { .. } => Topic::Combat,
            GameEvent::PhaseChange { .. }
            | GameEvent::BossSpecial { .. }
            | GameEvent::RoomCleared { .. }
            | GameEvent::DungeonCleared { .. }
            | GameEvent::PlayerDied => Topic::Encounter,
            GameEvent::LootCollected { .. } | GameEvent::LevelUp { .. } => Topic::Progress,
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct SubscriptionId(u32);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Topic-based event bus
///
/// Handlers run synchronously, in subscription order, inside `publish`.
#[derive(Default)]
pub struct EventBus {
    handlers: AHashMap<Topic, Vec<(SubscriptionId, Handler)>>,
    next_id: u32,
    published: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("published", &self.published)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one topic
    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(topic).or_default().push((id, Box::new(handler)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(pos) = handlers.iter().position(|(sub, _)| *sub == id) {
                drop(handlers.remove(pos));
                return true;
            }
        }
        false
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&mut self, event: &GameEvent) {
        self.published += 1;
        match self.handlers.get_mut(&event.topic()) {
            Some(handlers) if !handlers.is_empty() => {
                for (_, handler) in handlers.iter_mut() {
                    handler(event);
                }
            }
            _ => tracing::trace!("No subscribers for topic {:?}", event.topic()),
        }
    }

    pub fn publish_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.publish(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Total events published over the bus's life
    pub fn published(&self) -> u64 {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribers_only_see_their_topic() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(Topic::Encounter, move |e| sink.borrow_mut().push(e.clone()));

        bus.publish(&GameEvent::LevelUp { level: 2 });
        bus.publish(&GameEvent::RoomCleared { room: 3, experience: 25 });

        assert_eq!(*seen.borrow(), vec![GameEvent::RoomCleared { room: 3, experience: 25 }]);
        assert_eq!(bus.published(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = bus.subscribe(Topic::Combat, move |_| *counter.borrow_mut() += 1);

        bus.publish(&GameEvent::PlayerDied);
        bus.publish(&GameEvent::Enraged { actor: ActorId(1) });
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&GameEvent::Enraged { actor: ActorId(1) });

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
