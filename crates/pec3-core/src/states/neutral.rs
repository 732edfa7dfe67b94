//! Non-combatant variant: wanders, and runs from enemies after a short
//! delay. Killed neutrals come back as enemies.

use hecs::Entity;
use pec3_logic::Vec3;

use super::{shared, CharacterState};
use crate::combat;
use crate::components::{Character, CharacterKind, CharacterStats, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::Contact;
use crate::targeting::handle_sensing;

pub struct Neutral;

impl CharacterState for Neutral {
    fn kind(&self) -> CharacterKind {
        CharacterKind::Neutral
    }

    fn target_tags(&self) -> &'static [Tag] {
        &[Tag::Enemy]
    }

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError> {
        shared::start_ai(frame, me, false)?;
        // Primed so the first threat is fled from on the next update
        let flee_time = frame
            .world
            .get::<&CharacterStats>(me)
            .map(|s| s.flee_time)
            .unwrap_or_default();
        if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
            c.flee_timer = flee_time;
        }
        Ok(())
    }

    fn update_state(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
        if shared::is_dead(frame, me) {
            return Ok(());
        }
        self.navigate(frame, me);
        shared::report_speed(frame, me);
        Ok(())
    }

    fn navigate(&self, frame: &mut Frame<'_>, me: Entity) {
        shared::evade(self, frame, me);
    }

    fn wander(&self, frame: &mut Frame<'_>, me: Entity) {
        shared::wander(frame, me);
    }

    fn chase(&self, _frame: &mut Frame<'_>, _me: Entity, _target: Vec3) {}

    fn flee(&self, frame: &mut Frame<'_>, me: Entity, threat: Vec3) {
        shared::flee(frame, me, threat);
    }

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

    fn take_damage(&self, frame: &mut Frame<'_>, me: Entity, amount: f32) {
        combat::apply_damage(frame, me, amount);
    }

    fn restore_health(&self, _frame: &mut Frame<'_>, _me: Entity, _multiplier: f32) {}

    fn restore_shield(&self, _frame: &mut Frame<'_>, _me: Entity, _multiplier: f32) {}

    fn die(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::die(frame, me);
    }

    fn dead_finished(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
        if !combat::finish_death(frame, me) {
            return Ok(());
        }
        shared::rebirth(frame, me)
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

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        handle_sensing(frame, me, contact);
    }

    fn handle_collision(&self, _frame: &mut Frame<'_>, _me: Entity, _contact: Contact) {}
}
