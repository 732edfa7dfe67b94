//! Pickups, keys, door switches, projectiles and the player's item senses.

use hecs::Entity;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::common::Tag;

/// Key colours. `All` is only meaningful as a door requirement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum KeyColor {
    Blue,
    Green,
    Red,
    All,
}

impl KeyColor {
    /// The three collectable colours.
    pub fn collectable() -> impl Iterator<Item = KeyColor> {
        Self::iter().filter(|c| *c != Self::All)
    }
}

/// Keys held by a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRing {
    pub blue: bool,
    pub green: bool,
    pub red: bool,
}

impl KeyRing {
    pub fn has(&self, color: KeyColor) -> bool {
        match color {
            KeyColor::Blue => self.blue,
            KeyColor::Green => self.green,
            KeyColor::Red => self.red,
            KeyColor::All => self.blue && self.green && self.red,
        }
    }

    pub fn grant(&mut self, color: KeyColor) {
        match color {
            KeyColor::Blue => self.blue = true,
            KeyColor::Green => self.green = true,
            KeyColor::Red => self.red = true,
            KeyColor::All => {
                self.blue = true;
                self.green = true;
                self.red = true;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PowerUpKind {
    Health,
    Shield,
}

/// A restorative pickup lying in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub persistent: bool,
    /// Seconds since it was dropped
    pub age: f32,
    pub visible: bool,
    pub expiring: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, persistent: bool) -> Self {
        Self {
            kind,
            persistent,
            age: 0.0,
            visible: true,
            expiring: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPickup {
    pub color: KeyColor,
}

/// Pressing this switch arms the linked timed door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorSwitch {
    pub door: Entity,
}

/// An in-flight projectile. The core integrates its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub damage: f32,
    pub velocity: Vec3,
    /// Seconds left before it expires
    pub remaining: f32,
    pub owner: Option<Entity>,
    pub hits: Vec<Tag>,
}

/// Things the player senses in its inner zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSenses {
    /// Items in range, in arrival order
    pub items: Vec<Entity>,
    /// Item the look-at rig is pointed at
    pub looking_at: Option<Entity>,
    pub ship_in_range: Option<Entity>,
}
