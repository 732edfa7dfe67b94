//! Error types for the gameplay core.
//!
//! Only authoring and initialization mistakes are errors. Gameplay contention
//! (attacking on cooldown, damaging a corpse, a stale target) is resolved
//! locally by the operation that hit it and never reaches these types.

use hecs::Entity;
use thiserror::Error;

use crate::config::PrefabId;

/// Invalid arena configuration. Fatal: the offending object is not created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse arena config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown prefab `{0}`")]
    UnknownPrefab(PrefabId),

    #[error("prefab `{id}` is a {found} prefab, expected {expected}")]
    WrongPrefabType {
        id: PrefabId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("spawn table `{0}` has no entry with a positive weight")]
    EmptySpawnTable(String),

    #[error("spawn table `{0}` has an empty wave schedule")]
    EmptySchedule(String),

    #[error("key prefab `{0}` uses colour All, which only doors may require")]
    KeyPickupAll(PrefabId),

    #[error("locked door `{0}` has no key colour")]
    LockedWithoutKey(String),

    #[error("setting `{name}` out of range: {value}")]
    InvalidSetting { name: &'static str, value: f32 },
}

/// A collaborator reference an entity needs at start-of-life is missing.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("AI ship {0:?} has no waypoints to patrol")]
    MissingWaypoints(Entity),

    #[error("player {0:?} has no projectile spawn point")]
    MissingProjectileSpawn(Entity),

    #[error("dock {0:?} has no spawn point")]
    MissingDockSpawn(Entity),

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
}

/// Anything an engine entry point can fail with.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Init(#[from] InitError),
}

pub type GameResult<T> = Result<T, GameError>;
