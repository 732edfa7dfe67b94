use hecs::Entity;
use log::info;

use super::{DoorBehaviour, DoorMechanism, DoorType};
use crate::components::{KeyColor, KeyRing};
use crate::context::Frame;

/// Needs a key colour (or all three) held by the player. Stays unlocked
/// after the first successful use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locked {
    pub color: KeyColor,
    pub already_open: bool,
}

impl Locked {
    pub fn new(color: KeyColor) -> Self {
        Self {
            color,
            already_open: false,
        }
    }
}

impl DoorBehaviour for Locked {
    fn door_type(&self) -> DoorType {
        DoorType::Locked
    }

    fn update(&mut self, _frame: &mut Frame<'_>, _door: &mut DoorMechanism) {}

    fn on_enter(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism, player: Entity) {
        if !self.already_open {
            let held = frame
                .world
                .get::<&KeyRing>(player)
                .map(|ring| ring.has(self.color))
                .unwrap_or(false);
            let all = self.color == KeyColor::All;
            if !held {
                if all {
                    frame.message("All keys needed");
                } else {
                    frame.message(&format!("{} key needed", self.color));
                }
                return;
            }
            if all {
                frame.message("All keys used");
            } else {
                frame.message(&format!("{} key used", self.color));
            }
            info!("{} door unlocked", self.color);
            self.already_open = true;
        }
        door.open();
    }

    fn on_stay(&mut self, _frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        if self.already_open {
            door.open();
        }
    }

    fn on_exit(&mut self, _frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        if self.already_open {
            door.close();
        }
    }
}
