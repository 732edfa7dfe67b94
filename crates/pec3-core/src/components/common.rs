//! Components shared by every kind of entity in the arena.

use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// World placement. The host owns physics and writes positions back through
/// `GameEngine::sync_transform`; the core only reads them and edits facing
/// or scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Horizontal unit facing
    pub forward: Vec3,
    pub scale: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::FORWARD,
            scale: 1.0,
        }
    }

    pub fn facing(mut self, forward: Vec3) -> Self {
        let flat = forward.horizontal().normalize();
        if flat != Vec3::ZERO {
            self.forward = flat;
        }
        self
    }

    /// Yaw of the facing direction in degrees, clockwise from +Z.
    pub fn yaw_degrees(&self) -> f32 {
        self.forward.x.atan2(self.forward.z).to_degrees()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Classification label used for every target and interaction filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Tag {
    Player,
    Ally,
    Enemy,
    Neutral,
    Still,
    Item,
    Port,
    Ship,
    Projectile,
    Untagged,
}

impl Tag {
    pub fn is_any(self, tags: &[Tag]) -> bool {
        tags.contains(&self)
    }
}

/// Marker: the entity exists but takes no part in the simulation (a pilot
/// sitting in a ship, an exploded hull waiting to be destroyed).
#[derive(Debug, Clone, Copy, Default)]
pub struct Inactive;

/// Destroy the entity once `remaining` seconds have elapsed.
#[derive(Debug, Clone, Copy)]
pub struct DespawnTimer {
    pub remaining: f32,
}
