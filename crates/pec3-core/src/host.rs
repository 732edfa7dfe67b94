//! Collaborator interfaces the core drives.
//!
//! The host engine owns rendering, physics, navigation, animation playback,
//! audio and UI. The core talks to it only through these traits, which keeps
//! every gameplay rule testable against an in-memory double.

use hecs::Entity;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::components::{Tag, Transform};
use crate::config::PrefabId;

/// Physics layer bitmask.
pub type LayerMask = u32;

/// Every layer.
pub const ALL_LAYERS: LayerMask = u32::MAX;

/// Nearest hit of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub tag: Tag,
    pub entity: Entity,
}

/// Animator parameters and triggers the core sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum AnimParam {
    Attacking,
    Charging,
    Shooting,
    Hit,
    Dead,
    Speed,
    MotionSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum SoundCue {
    Attack,
    Hit,
    Death,
    Rebirth,
    Explosion,
    /// A hostile spotted its target
    Detect,
    /// A neutral spotted a threat
    Scared,
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum ParticleFx {
    Hit,
    HitBurst,
    Death,
    AfterDeath,
    Rebirth,
    Explosion,
}

/// Animation rigs blended by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum Rig {
    AimBody,
    AimFist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CameraRig {
    PlayerFollow,
    PlayerAim,
    ShipFollow,
}

/// Signals raised by animation clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AnimationEvent {
    ChargeComplete,
    ShootComplete,
    AttackComplete,
    HitComplete,
    DeadComplete,
}

pub trait SpatialQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    fn overlap_sphere(&self, point: Vec3, radius: f32, mask: LayerMask) -> bool;
}

pub trait Navigation {
    /// Nearest point on the navigation surface within `max_distance`.
    fn sample_position(&self, point: Vec3, max_distance: f32, area_mask: LayerMask)
        -> Option<Vec3>;
    fn set_destination(&mut self, entity: Entity, point: Vec3);
    fn set_speed(&mut self, entity: Entity, speed: f32, acceleration: f32);
    fn set_angular_speed(&mut self, entity: Entity, degrees_per_second: f32);
    fn remaining_distance(&self, entity: Entity) -> f32;
    fn stopping_distance(&self, entity: Entity) -> f32;
    fn velocity(&self, entity: Entity) -> Vec3;
}

pub trait Animation {
    fn set_trigger(&mut self, entity: Entity, param: AnimParam);
    fn set_bool(&mut self, entity: Entity, param: AnimParam, value: bool);
    fn set_float(&mut self, entity: Entity, param: AnimParam, value: f32);
    /// Reset the animator to its entry state.
    fn rebind(&mut self, entity: Entity);
    fn set_rig_weight(&mut self, entity: Entity, rig: Rig, weight: f32);
    fn set_look_at(&mut self, entity: Entity, target: Option<Entity>);
}

pub trait Presentation {
    fn play_sound(&mut self, entity: Entity, cue: SoundCue);
    fn set_particle_active(&mut self, entity: Entity, fx: ParticleFx, active: bool);
    fn set_visible(&mut self, entity: Entity, visible: bool);
    fn show_message(&mut self, text: &str, duration: f32);
    fn update_health_shield_bars(&mut self, health: f32, shield: f32);
    fn update_key_icons(&mut self, red: bool, green: bool, blue: bool);
    fn update_timer_display(&mut self, seconds: f32, visible: bool);
    fn show_game_over(&mut self, text: &str);
    fn focus_camera(&mut self, rig: CameraRig, follow: Entity);
}

pub trait Lifecycle {
    /// A new entity was created by the core; the host builds its visuals.
    fn spawned(&mut self, entity: Entity, prefab: Option<&PrefabId>, transform: &Transform);
    /// The entity is gone from the core.
    fn destroyed(&mut self, entity: Entity);
}

/// Everything the core needs from the engine hosting it.
pub trait Host: SpatialQuery + Navigation + Animation + Presentation + Lifecycle {}

impl<T> Host for T where T: SpatialQuery + Navigation + Animation + Presentation + Lifecycle {}
