//! PEC3 Core - gameplay logic for an arena action game
//!
//! Characters, ships and doors are driven by per-kind behaviour objects
//! over an ECS world. The host engine (rendering, physics, navigation,
//! animation, audio, UI) is reached only through the traits in [`host`].
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: characters, ships, docks, doors, switches, items, projectiles
//! - **Components**: Pure data attached to entities (Character, Transform, Tag, etc.)
//! - **Behaviours**: zero-sized state objects selected by kind (`states`, `ships`)
//!   and frame systems (doors, pickups, projectiles, spawners)
//!
//! # Example
//!
//! ```rust,no_run
//! use pec3_core::prelude::*;
//!
//! fn run(host: &mut dyn Host) -> GameResult<()> {
//!     let mut engine = GameEngine::from_json(r#"{ "prefabs": {} }"#, 7)?;
//!     loop {
//!         engine.update(1.0 / 60.0, host)?; // 60 FPS
//!     }
//! }
//! ```

pub mod combat;
pub mod components;
pub mod config;
pub mod context;
pub mod doors;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod pickups;
pub mod projectile;
pub mod sequences;
pub mod ships;
pub mod spawning;
pub mod states;
pub mod targeting;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{ArenaConfig, GameSettings, Prefab, PrefabCatalog, PrefabId};
    pub use crate::context::{Frame, GameContext};
    pub use crate::doors::{Door, DoorSpec, DoorType, LeafAnchors};
    pub use crate::engine::GameEngine;
    pub use crate::error::{ConfigError, GameError, GameResult, InitError};
    pub use crate::events::{Contact, ContactPhase, FrameEvent, PlayerInput, Zone};
    pub use crate::host::{AnimationEvent, Host};
    pub use pec3_logic::Vec3;
}
