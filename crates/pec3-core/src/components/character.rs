//! Character components: kind, base stats, the mutable combat record and
//! capability flags.

use bitflags::bitflags;
use pec3_logic::damage::Vitals;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::common::Tag;
use crate::config::PrefabId;

/// Which behaviour variant drives a character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CharacterKind {
    Ally,
    Boss,
    Enemy,
    Neutral,
    Player,
    Still,
}

impl CharacterKind {
    /// Tag carried by characters of this kind. Bosses are hunted as enemies.
    pub fn tag(self) -> Tag {
        match self {
            Self::Ally => Tag::Ally,
            Self::Boss | Self::Enemy => Tag::Enemy,
            Self::Neutral => Tag::Neutral,
            Self::Player => Tag::Player,
            Self::Still => Tag::Still,
        }
    }
}

/// Authored base values. Never mutated at runtime; every rebirth starts
/// again from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub max_health: f32,
    pub max_shield: f32,
    pub move_speed: f32,
    pub sprint_speed: f32,
    /// Seconds between wander destinations
    pub wander_time: f32,
    pub wander_radius: f32,
    /// Seconds between flee destinations
    pub flee_time: f32,
    pub attack_distance: f32,
    /// Minimum seconds between attacks
    pub attack_rate: f32,
    pub melee_damage: f32,
    /// Minimum seconds between shots
    pub shoot_rate: f32,
    pub projectile: Option<PrefabId>,
    /// Projectile spawn point relative to the character, in its facing frame
    pub projectile_spawn: Option<Vec3>,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_shield: 100.0,
            move_speed: 2.0,
            sprint_speed: 5.335,
            wander_time: 5.0,
            wander_radius: 10.0,
            flee_time: 1.0,
            attack_distance: 1.5,
            attack_rate: 1.0,
            melee_damage: 10.0,
            shoot_rate: 0.5,
            projectile: None,
            projectile_spawn: None,
        }
    }
}

impl CharacterStats {
    pub fn full_vitals(&self) -> Vitals {
        Vitals::full(self.max_health, self.max_shield)
    }
}

/// The mutable combat record shared by every character variant.
///
/// All per-life state lives here so a kind change can swap the behaviour
/// variant without losing the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub kind: CharacterKind,
    pub vitals: Vitals,
    /// Effective values after difficulty and game speed scaling
    pub melee_damage: f32,
    pub move_speed: f32,
    pub sprint_speed: f32,

    // Action flags
    pub attacking: bool,
    pub aiming: bool,
    pub charging_finished: bool,
    pub shooting: bool,
    pub shooting_started: bool,
    pub shooting_finished: bool,
    pub hit: bool,
    pub dead: bool,
    /// Set once the death animation has been handled for this life
    pub death_finished: bool,
    /// Latched attack press, consumed by the next player update
    pub attack_requested: bool,
    /// Latched attack-complete animation signal
    pub attack_landed: bool,

    // Timers
    pub last_attack_time: f32,
    pub last_shoot_time: f32,
    pub wander_timer: f32,
    pub flee_timer: f32,

    /// Bumped on every death, explosion and kind change. Sequences started
    /// in an earlier life are discarded when they next run.
    pub life: u32,
    /// World point the player is aiming at
    pub aim_point: Option<Vec3>,
}

impl Character {
    pub fn new(kind: CharacterKind, stats: &CharacterStats) -> Self {
        Self {
            kind,
            vitals: stats.full_vitals(),
            melee_damage: stats.melee_damage,
            move_speed: stats.move_speed,
            sprint_speed: stats.sprint_speed,
            attacking: false,
            aiming: false,
            charging_finished: false,
            shooting: false,
            shooting_started: false,
            shooting_finished: false,
            hit: false,
            dead: false,
            death_finished: false,
            attack_requested: false,
            attack_landed: false,
            last_attack_time: 0.0,
            last_shoot_time: 0.0,
            wander_timer: 0.0,
            flee_timer: 0.0,
            life: 0,
            aim_point: None,
        }
    }

    /// Full property reset for a new life as `kind`. Only the life epoch
    /// carries over, advanced by one.
    pub fn reset(&mut self, kind: CharacterKind, stats: &CharacterStats) {
        let life = self.life.wrapping_add(1);
        *self = Self::new(kind, stats);
        self.life = life;
    }

    /// Drop every in-flight action.
    pub fn cancel_actions(&mut self) {
        self.attacking = false;
        self.attack_landed = false;
        self.attack_requested = false;
        self.aiming = false;
        self.charging_finished = false;
        self.shooting = false;
        self.shooting_started = false;
        self.shooting_finished = false;
    }

    pub fn attack_ready(&self, now: f32, attack_rate: f32) -> bool {
        !self.attacking && now >= self.last_attack_time + attack_rate
    }

    pub fn shot_ready(&self, now: f32, shoot_rate: f32) -> bool {
        !self.shooting_started && now >= self.last_shoot_time + shoot_rate
    }
}

/// What a character leaves behind when it dies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loot {
    pub mandatory: Option<PrefabId>,
    pub optional: Vec<PrefabId>,
}

bitflags! {
    /// Control surfaces an entity currently exposes to the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Accepts player input events
        const PLAYER_INPUT = 1 << 0;
        /// Third-person locomotion controller
        const LOCOMOTION = 1 << 1;
        /// Aim rig and camera switching
        const AIM_RIG = 1 << 2;
        /// Moved by the navigation collaborator
        const AI_NAVIGATION = 1 << 3;
        /// Ship steering
        const VEHICLE_CONTROL = 1 << 4;

        const PLAYER_CONTROLS = Self::PLAYER_INPUT.bits()
            | Self::LOCOMOTION.bits()
            | Self::AIM_RIG.bits();
    }
}

impl Capabilities {
    pub fn for_kind(kind: CharacterKind) -> Self {
        match kind {
            CharacterKind::Player => Self::PLAYER_CONTROLS,
            CharacterKind::Still => Self::empty(),
            _ => Self::AI_NAVIGATION,
        }
    }
}
