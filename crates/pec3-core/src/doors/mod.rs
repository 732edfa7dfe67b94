//! Sliding doors.
//!
//! A door is a pair of leaves interpolated toward open or closed anchors,
//! plus one behaviour object chosen from the door type when the door is
//! created. The behaviour only flips the opening/closing flags; the leaves
//! move in [`door_system`].

mod automatic;
mod destroy_enemies;
mod locked;
mod timed;

pub use automatic::Automatic;
pub use destroy_enemies::DestroyEnemies;
pub use locked::Locked;
pub use timed::Timed;

use hecs::Entity;
use log::debug;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::components::{KeyColor, Tag};
use crate::context::Frame;
use crate::error::ConfigError;
use crate::events::{Contact, ContactPhase};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DoorType {
    Automatic,
    DestroyEnemies,
    Locked,
    Timed,
}

/// Where a leaf sits when the door is closed and when it is open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafAnchors {
    pub closed: Vec3,
    pub open: Vec3,
}

/// One sliding leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub position: Vec3,
    pub anchors: LeafAnchors,
}

impl Leaf {
    pub fn closed(anchors: LeafAnchors) -> Self {
        Self {
            position: anchors.closed,
            anchors,
        }
    }

    fn approach(&mut self, target: Vec3, t: f32) {
        self.position = self.position.lerp(target, t);
    }
}

/// What a leaf step finished doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorMotion {
    Opened,
    Closed,
}

/// Leaves, movement flags and the switch input every behaviour acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorMechanism {
    pub left: Leaf,
    pub right: Leaf,
    /// Lerp rate per second
    pub speed: f32,
    pub is_opening: bool,
    pub is_closing: bool,
    /// Set by a linked switch, consumed by timed doors
    pub timer_button_pressed: bool,
}

impl DoorMechanism {
    pub fn new(left: LeafAnchors, right: LeafAnchors, speed: f32) -> Self {
        Self {
            left: Leaf::closed(left),
            right: Leaf::closed(right),
            speed,
            is_opening: false,
            is_closing: false,
            timer_button_pressed: false,
        }
    }

    pub fn open(&mut self) {
        self.is_opening = true;
        self.is_closing = false;
    }

    pub fn close(&mut self) {
        self.is_opening = false;
        self.is_closing = true;
    }

    pub fn is_open(&self) -> bool {
        !self.is_opening && self.left.position == self.left.anchors.open
    }

    pub fn is_closed(&self) -> bool {
        !self.is_closing && self.left.position == self.left.anchors.closed
    }

    /// Move both leaves one frame toward the active anchor. The left leaf
    /// decides when the move is over; both snap together.
    pub fn step(&mut self, delta: f32, epsilon: f32) -> Option<DoorMotion> {
        let opening = if self.is_opening {
            true
        } else if self.is_closing {
            false
        } else {
            return None;
        };
        let pick = |leaf: &Leaf| {
            if opening {
                leaf.anchors.open
            } else {
                leaf.anchors.closed
            }
        };
        let (left_target, right_target) = (pick(&self.left), pick(&self.right));

        if self.left.position.distance(&left_target) < epsilon {
            self.left.position = left_target;
            self.right.position = right_target;
            if opening {
                self.is_opening = false;
                return Some(DoorMotion::Opened);
            }
            self.is_closing = false;
            return Some(DoorMotion::Closed);
        }
        let t = delta * self.speed;
        self.left.approach(left_target, t);
        self.right.approach(right_target, t);
        None
    }
}

/// Reaction of a door type to frames and player contacts.
pub trait DoorBehaviour {
    fn door_type(&self) -> DoorType;

    /// Runs every frame before the leaves move.
    fn update(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism);

    fn on_enter(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism, player: Entity);

    fn on_stay(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism, player: Entity);

    fn on_exit(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism, player: Entity);
}

/// The behaviour variant of one door, fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub enum Behaviour {
    Automatic(Automatic),
    DestroyEnemies(DestroyEnemies),
    Locked(Locked),
    Timed(Timed),
}

impl Behaviour {
    fn as_dyn(&mut self) -> &mut dyn DoorBehaviour {
        match self {
            Behaviour::Automatic(b) => b,
            Behaviour::DestroyEnemies(b) => b,
            Behaviour::Locked(b) => b,
            Behaviour::Timed(b) => b,
        }
    }
}

/// Door component.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub name: String,
    pub mechanism: DoorMechanism,
    pub behaviour: Behaviour,
}

impl Door {
    /// Build a door from its description. `enemies` are the handles a
    /// destroy-enemies door waits on; other types ignore them.
    pub fn from_spec(spec: &DoorSpec, enemies: Vec<Entity>) -> Result<Self, ConfigError> {
        let behaviour = match spec.door_type {
            DoorType::Automatic => Behaviour::Automatic(Automatic),
            DoorType::DestroyEnemies => Behaviour::DestroyEnemies(DestroyEnemies::new(enemies)),
            DoorType::Locked => {
                let color = spec
                    .key_color
                    .ok_or_else(|| ConfigError::LockedWithoutKey(spec.name.clone()))?;
                Behaviour::Locked(Locked::new(color))
            }
            DoorType::Timed => Behaviour::Timed(Timed::new(spec.max_time)),
        };
        if spec.max_time <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "door.max_time",
                value: spec.max_time,
            });
        }
        if spec.speed <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "door.speed",
                value: spec.speed,
            });
        }
        Ok(Self {
            name: spec.name.clone(),
            mechanism: DoorMechanism::new(spec.left, spec.right, spec.speed),
            behaviour,
        })
    }

    pub fn door_type(&self) -> DoorType {
        match &self.behaviour {
            Behaviour::Automatic(b) => b.door_type(),
            Behaviour::DestroyEnemies(b) => b.door_type(),
            Behaviour::Locked(b) => b.door_type(),
            Behaviour::Timed(b) => b.door_type(),
        }
    }

    /// A linked switch was pressed.
    pub fn press_switch(&mut self) {
        self.mechanism.timer_button_pressed = true;
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        self.behaviour.as_dyn().update(frame, &mut self.mechanism);
    }

    fn contact(&mut self, frame: &mut Frame<'_>, phase: ContactPhase, player: Entity) {
        let behaviour = self.behaviour.as_dyn();
        match phase {
            ContactPhase::Enter => behaviour.on_enter(frame, &mut self.mechanism, player),
            ContactPhase::Stay => behaviour.on_stay(frame, &mut self.mechanism, player),
            ContactPhase::Exit => behaviour.on_exit(frame, &mut self.mechanism, player),
        }
    }
}

/// Authoring description of a door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub name: String,
    pub door_type: DoorType,
    #[serde(default)]
    pub key_color: Option<KeyColor>,
    #[serde(default = "default_max_time")]
    pub max_time: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    pub position: Vec3,
    pub left: LeafAnchors,
    pub right: LeafAnchors,
}

fn default_max_time() -> f32 {
    5.0
}

fn default_speed() -> f32 {
    1.0
}

/// Run every door's behaviour and move its leaves.
pub fn door_system(frame: &mut Frame<'_>) {
    let doors: Vec<Entity> = frame
        .world
        .query::<&Door>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    let delta = frame.delta();
    let epsilon = frame.settings().door_snap_epsilon;

    for entity in doors {
        let Some(mut door) = frame.world.get::<&Door>(entity).ok().map(|d| (*d).clone()) else {
            continue;
        };
        door.update(frame);
        match door.mechanism.step(delta, epsilon) {
            Some(DoorMotion::Opened) => debug!("door {} open", door.name),
            Some(DoorMotion::Closed) => debug!("door {} closed", door.name),
            None => {}
        }
        if let Ok(mut slot) = frame.world.get::<&mut Door>(entity) {
            *slot = door;
        }
    }
}

/// Forward a trigger contact to the door's behaviour. Only player-tagged
/// bodies operate doors.
pub fn handle_door_contact(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    let is_player = frame
        .world
        .get::<&Tag>(contact.other)
        .map(|t| *t == Tag::Player)
        .unwrap_or(false);
    if !is_player {
        return;
    }
    let Some(mut door) = frame.world.get::<&Door>(me).ok().map(|d| (*d).clone()) else {
        return;
    };
    door.contact(frame, contact.phase, contact.other);
    if let Ok(mut slot) = frame.world.get::<&mut Door>(me) {
        *slot = door;
    }
}
