use hecs::Entity;
use log::info;

use super::{DoorBehaviour, DoorMechanism, DoorType};
use crate::context::Frame;

/// Opens once every guarding enemy has been destroyed, then behaves like an
/// automatic door for good.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyEnemies {
    pub enemies: Vec<Entity>,
    pub already_open: bool,
}

impl DestroyEnemies {
    pub fn new(enemies: Vec<Entity>) -> Self {
        Self {
            enemies,
            already_open: false,
        }
    }

    /// Guards that still exist. A corpse counts until it is despawned.
    pub fn remaining(&self, frame: &Frame<'_>) -> usize {
        self.enemies
            .iter()
            .filter(|e| frame.world.contains(**e))
            .count()
    }
}

impl DoorBehaviour for DestroyEnemies {
    fn door_type(&self) -> DoorType {
        DoorType::DestroyEnemies
    }

    fn update(&mut self, _frame: &mut Frame<'_>, _door: &mut DoorMechanism) {}

    fn on_enter(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        if !self.already_open {
            if self.remaining(frame) > 0 {
                frame.message("You need to destroy all the enemies");
                return;
            }
            frame.message("Enemies destroyed");
            info!("destroy-enemies door cleared");
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
