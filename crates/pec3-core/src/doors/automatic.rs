use hecs::Entity;

use super::{DoorBehaviour, DoorMechanism, DoorType};
use crate::context::Frame;

/// Open while the player stands in the doorway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Automatic;

impl DoorBehaviour for Automatic {
    fn door_type(&self) -> DoorType {
        DoorType::Automatic
    }

    fn update(&mut self, _frame: &mut Frame<'_>, _door: &mut DoorMechanism) {}

    fn on_enter(&mut self, _frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        door.open();
    }

    fn on_stay(&mut self, _frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        door.open();
    }

    fn on_exit(&mut self, _frame: &mut Frame<'_>, door: &mut DoorMechanism, _player: Entity) {
        door.close();
    }
}
