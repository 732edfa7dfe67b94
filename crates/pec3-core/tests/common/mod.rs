//! Shared arena fixture for the integration tests.

#![allow(dead_code)]

use hecs::Entity;
use pec3_core::config::{
    CharacterPrefab, KeyPrefab, PowerUpPrefab, ProjectilePrefab, SpawnerSpec,
};
use pec3_core::prelude::*;
use pec3_core::testing::RecordingHost;

pub const FRAME: f32 = 1.0 / 60.0;

fn character(kind: CharacterKind) -> Prefab {
    Prefab::Character(CharacterPrefab {
        kind,
        stats: CharacterStats::default(),
        mandatory_drop: None,
        optional_drops: vec![],
    })
}

/// Every prefab the tests use.
pub fn catalog() -> PrefabCatalog {
    let mut player = CharacterStats::default();
    player.projectile = Some("bolt".into());
    player.projectile_spawn = Some(Vec3::new(0.0, 1.5, 0.5));

    PrefabCatalog::new()
        .with(
            "player",
            Prefab::Character(CharacterPrefab {
                kind: CharacterKind::Player,
                stats: player,
                mandatory_drop: None,
                optional_drops: vec![],
            }),
        )
        .with("grunt", character(CharacterKind::Enemy))
        .with("boss", character(CharacterKind::Boss))
        .with("villager", character(CharacterKind::Neutral))
        .with("buddy", character(CharacterKind::Ally))
        .with("crate", character(CharacterKind::Still))
        .with(
            "carrier",
            Prefab::Character(CharacterPrefab {
                kind: CharacterKind::Enemy,
                stats: CharacterStats::default(),
                mandatory_drop: Some("blue_key".into()),
                optional_drops: vec!["medkit".into()],
            }),
        )
        .with(
            "medkit",
            Prefab::PowerUp(PowerUpPrefab {
                kind: PowerUpKind::Health,
                persistent: false,
            }),
        )
        .with(
            "battery",
            Prefab::PowerUp(PowerUpPrefab {
                kind: PowerUpKind::Shield,
                persistent: true,
            }),
        )
        .with("blue_key", Prefab::Key(KeyPrefab { color: KeyColor::Blue }))
        .with("green_key", Prefab::Key(KeyPrefab { color: KeyColor::Green }))
        .with("red_key", Prefab::Key(KeyPrefab { color: KeyColor::Red }))
        .with("bolt", Prefab::Projectile(ProjectilePrefab::default()))
}

pub struct Arena {
    pub engine: GameEngine,
    pub host: RecordingHost,
}

impl Arena {
    pub fn new() -> Self {
        Self::with(GameSettings::default(), vec![])
    }

    pub fn with(settings: GameSettings, spawners: Vec<SpawnerSpec>) -> Self {
        let config = ArenaConfig {
            settings,
            prefabs: catalog(),
            spawners,
        };
        Self {
            engine: GameEngine::new(config, 42).expect("valid arena"),
            host: RecordingHost::new(),
        }
    }

    pub fn spawn(&mut self, prefab: &str, position: Vec3) -> Entity {
        self.engine
            .spawn(&mut self.host, &prefab.into(), position, Vec3::FORWARD)
            .expect("spawn")
    }

    pub fn step(&mut self) {
        self.engine.update(FRAME, &mut self.host).expect("frame");
    }

    /// Advance by whole frames covering `seconds`.
    pub fn run(&mut self, seconds: f32) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            self.step();
        }
    }

    pub fn trigger(&mut self, entity: Entity, contact: Contact) {
        self.engine.push_event(FrameEvent::Trigger { entity, contact });
    }

    pub fn animation(&mut self, entity: Entity, event: AnimationEvent) {
        self.engine.push_event(FrameEvent::Animation { entity, event });
    }

    pub fn input(&mut self, entity: Entity, input: PlayerInput) {
        self.engine.push_event(FrameEvent::Input { entity, input });
    }

    /// Queue damage for delivery at the end of the next frame.
    pub fn damage(&mut self, victim: Entity, amount: f32, source: Option<Entity>) {
        self.engine.ctx.inbox.push(victim, amount, source);
    }

    pub fn character(&self, entity: Entity) -> Character {
        self.engine
            .world()
            .get::<&Character>(entity)
            .map(|c| (*c).clone())
            .expect("character")
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.engine.world().contains(entity)
    }

    pub fn is_inactive(&self, entity: Entity) -> bool {
        self.engine.world().get::<&Inactive>(entity).is_ok()
    }

    pub fn count<T: hecs::Component>(&self) -> usize {
        self.engine.world().query::<&T>().iter().count()
    }
}
