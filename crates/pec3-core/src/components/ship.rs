//! Ship and dock components.

use hecs::Entity;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ShipKind {
    /// Piloted by the player
    Human,
    /// Patrols a waypoint loop
    AI,
}

/// Ship record shared by both variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub kind: ShipKind,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub max_angular_speed: f32,
    pub waypoints: Vec<Vec3>,
    pub next_waypoint: usize,
    /// Dock currently inside the inner zone
    pub dock_in_range: Option<Entity>,
    /// Player piloting the ship
    pub pilot: Option<Entity>,
}

impl Ship {
    pub fn new(kind: ShipKind) -> Self {
        Self {
            kind,
            max_speed: 10.0,
            max_acceleration: 5.0,
            max_angular_speed: 60.0,
            waypoints: Vec::new(),
            next_waypoint: 0,
            dock_in_range: None,
            pilot: None,
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Vec3>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn with_limits(mut self, speed: f32, acceleration: f32, angular_speed: f32) -> Self {
        self.max_speed = speed;
        self.max_acceleration = acceleration;
        self.max_angular_speed = angular_speed;
        self
    }
}

/// A port the player can disembark at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dock {
    /// Where the player reappears; `None` is an authoring error
    pub spawn_point: Option<Vec3>,
    /// Facing of the disembarked player, in degrees
    pub yaw: f32,
}
