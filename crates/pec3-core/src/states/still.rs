//! Inert props. Everything is a no-op except exploding.

use hecs::Entity;
use pec3_logic::Vec3;

use super::CharacterState;
use crate::combat;
use crate::components::{CharacterKind, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::Contact;

pub struct Still;

impl CharacterState for Still {
    fn kind(&self) -> CharacterKind {
        CharacterKind::Still
    }

    fn target_tags(&self) -> &'static [Tag] {
        &[]
    }

    fn start_state(&self, _frame: &mut Frame<'_>, _me: Entity) -> Result<(), InitError> {
        Ok(())
    }

    fn update_state(&self, _frame: &mut Frame<'_>, _me: Entity) -> GameResult<()> {
        Ok(())
    }

    fn navigate(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn wander(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn chase(&self, _frame: &mut Frame<'_>, _me: Entity, _target: Vec3) {}

    fn flee(&self, _frame: &mut Frame<'_>, _me: Entity, _threat: Vec3) {}

    fn attack(&self, _frame: &mut Frame<'_>, _me: Entity) -> bool {
        false
    }

    fn attack_finished(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn shoot(
        &self,
        _frame: &mut Frame<'_>,
        _me: Entity,
        _spawn: Vec3,
        _direction: Vec3,
    ) -> GameResult<bool> {
        Ok(false)
    }

    fn take_damage(&self, _frame: &mut Frame<'_>, _me: Entity, _amount: f32) {}

    fn restore_health(&self, _frame: &mut Frame<'_>, _me: Entity, _multiplier: f32) {}

    fn restore_shield(&self, _frame: &mut Frame<'_>, _me: Entity, _multiplier: f32) {}

    fn die(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn dead_finished(&self, _frame: &mut Frame<'_>, _me: Entity) -> GameResult<()> {
        Ok(())
    }

    fn explode(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::explode(frame, me);
    }

    fn drop_item(&self, _frame: &mut Frame<'_>, _me: Entity) -> GameResult<()> {
        Ok(())
    }

    fn input_attack(&self, _frame: &mut Frame<'_>, _me: Entity, _pressed: bool) {}

    fn input_aim(&self, _frame: &mut Frame<'_>, _me: Entity, _pressed: bool) {}

    fn input_shoot(&self, _frame: &mut Frame<'_>, _me: Entity, _pressed: bool) {}

    fn input_enter_ship(
        &self,
        _frame: &mut Frame<'_>,
        _me: Entity,
        _pressed: bool,
    ) -> GameResult<()> {
        Ok(())
    }

    fn handle_trigger(&self, _frame: &mut Frame<'_>, _me: Entity, _contact: Contact) {}

    fn handle_collision(&self, _frame: &mut Frame<'_>, _me: Entity, _contact: Contact) {}
}
