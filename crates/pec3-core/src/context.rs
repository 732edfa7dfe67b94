//! Per-engine shared state and the frame view handed to every behaviour.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::DespawnTimer;
use crate::config::{GameSettings, PrefabCatalog};
use crate::host::Host;

/// Damage waiting to be applied at the end of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDamage {
    pub victim: Entity,
    pub amount: f32,
    /// Attacker that becomes the victim's forced target
    pub source: Option<Entity>,
}

/// Cross-entity damage queue. Victims see damage on their next update.
#[derive(Debug, Clone, Default)]
pub struct DamageInbox {
    pending: Vec<PendingDamage>,
}

impl DamageInbox {
    pub fn push(&mut self, victim: Entity, amount: f32, source: Option<Entity>) {
        self.pending.push(PendingDamage {
            victim,
            amount,
            source,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn take(&mut self) -> Vec<PendingDamage> {
        std::mem::take(&mut self.pending)
    }
}

/// Process-wide services, created once with the engine and passed down by
/// reference.
pub struct GameContext {
    pub settings: GameSettings,
    pub catalog: PrefabCatalog,
    pub rng: StdRng,
    /// Seconds since the engine started
    pub now: f32,
    /// Length of the current frame
    pub delta: f32,
    pub inbox: DamageInbox,
}

impl GameContext {
    pub fn new(settings: GameSettings, catalog: PrefabCatalog, seed: u64) -> Self {
        Self {
            settings,
            catalog,
            rng: StdRng::seed_from_u64(seed),
            now: 0.0,
            delta: 0.0,
            inbox: DamageInbox::default(),
        }
    }
}

/// Mutable view over everything a behaviour may touch during a frame.
pub struct Frame<'a> {
    pub world: &'a mut World,
    pub host: &'a mut dyn Host,
    pub ctx: &'a mut GameContext,
}

impl<'a> Frame<'a> {
    pub fn new(world: &'a mut World, host: &'a mut dyn Host, ctx: &'a mut GameContext) -> Self {
        Self { world, host, ctx }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.ctx.settings
    }

    pub fn now(&self) -> f32 {
        self.ctx.now
    }

    pub fn delta(&self) -> f32 {
        self.ctx.delta
    }

    /// Show a gameplay hint for the configured message duration.
    pub fn message(&mut self, text: &str) {
        let duration = self.ctx.settings.message_duration;
        self.host.show_message(text, duration);
    }

    /// Schedule `entity` for destruction after `delay` seconds. An earlier
    /// deadline already in place is kept.
    pub fn destroy(&mut self, entity: Entity, delay: f32) {
        let delay = delay.max(0.0);
        if let Ok(mut timer) = self.world.get::<&mut DespawnTimer>(entity) {
            timer.remaining = timer.remaining.min(delay);
            return;
        }
        // Only fails for entities that no longer exist
        let _ = self
            .world
            .insert_one(entity, DespawnTimer { remaining: delay });
    }

    pub fn is_destroying(&self, entity: Entity) -> bool {
        self.world.get::<&DespawnTimer>(entity).is_ok()
    }
}
