//! Inbound signals queued by the host and dispatched once per frame after
//! every state update has run.

use hecs::Entity;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::host::AnimationEvent;

/// Which of the receiver's colliders reported the contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Zone {
    /// The receiver's own body
    Body,
    /// Inner sensing radius: target candidates and items
    Inner,
    /// Outer sensing radius: losing a forced target
    Outer,
    /// A ship's hull
    Hull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// One trigger or collision callback as seen by its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub phase: ContactPhase,
    pub zone: Zone,
    pub other: Entity,
}

impl Contact {
    pub fn new(phase: ContactPhase, zone: Zone, other: Entity) -> Self {
        Self { phase, zone, other }
    }

    pub fn enter(zone: Zone, other: Entity) -> Self {
        Self::new(ContactPhase::Enter, zone, other)
    }

    pub fn stay(zone: Zone, other: Entity) -> Self {
        Self::new(ContactPhase::Stay, zone, other)
    }

    pub fn exit(zone: Zone, other: Entity) -> Self {
        Self::new(ContactPhase::Exit, zone, other)
    }
}

/// Edge-triggered player input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    Attack(bool),
    Aim(bool),
    Shoot(bool),
    EnterShip(bool),
    ExitShip(bool),
    /// World point under the crosshair
    AimAt(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    Trigger { entity: Entity, contact: Contact },
    Collision { entity: Entity, contact: Contact },
    Animation { entity: Entity, event: AnimationEvent },
    Input { entity: Entity, input: PlayerInput },
}

impl FrameEvent {
    pub fn entity(&self) -> Entity {
        match *self {
            Self::Trigger { entity, .. }
            | Self::Collision { entity, .. }
            | Self::Animation { entity, .. }
            | Self::Input { entity, .. } => entity,
        }
    }
}
