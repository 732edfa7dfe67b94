//! Melee variants: enemy, boss and ally.
//!
//! All three wander until something they hunt comes into range, then chase
//! and strike. They differ in what they hunt, whether difficulty scales
//! them, and what happens once the death animation is over: hostiles leave
//! loot and shrink away, allies rise again as enemies.

use hecs::Entity;
use pec3_logic::Vec3;

use super::{shared, CharacterState};
use crate::combat;
use crate::components::{CharacterKind, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::Contact;
use crate::targeting::handle_sensing;

const HOSTILE_PREY: &[Tag] = &[Tag::Player, Tag::Ally, Tag::Neutral];
const FRIENDLY_PREY: &[Tag] = &[Tag::Enemy];

pub struct Melee {
    kind: CharacterKind,
    prey: &'static [Tag],
    hostile: bool,
}

impl Melee {
    pub const ENEMY: Melee = Melee {
        kind: CharacterKind::Enemy,
        prey: HOSTILE_PREY,
        hostile: true,
    };

    /// Same behaviour as an enemy under its own kind, so hosts can dress it
    /// differently.
    pub const BOSS: Melee = Melee {
        kind: CharacterKind::Boss,
        prey: HOSTILE_PREY,
        hostile: true,
    };

    pub const ALLY: Melee = Melee {
        kind: CharacterKind::Ally,
        prey: FRIENDLY_PREY,
        hostile: false,
    };
}

impl CharacterState for Melee {
    fn kind(&self) -> CharacterKind {
        self.kind
    }

    fn target_tags(&self) -> &'static [Tag] {
        self.prey
    }

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError> {
        shared::start_ai(frame, me, self.hostile)
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
        shared::hunt(self, frame, me);
    }

    fn wander(&self, frame: &mut Frame<'_>, me: Entity) {
        shared::wander(frame, me);
    }

    fn chase(&self, frame: &mut Frame<'_>, me: Entity, target: Vec3) {
        shared::chase(self, frame, me, target);
    }

    fn flee(&self, _frame: &mut Frame<'_>, _me: Entity, _threat: Vec3) {}

    fn attack(&self, frame: &mut Frame<'_>, me: Entity) -> bool {
        combat::try_attack(frame, me)
    }

    fn attack_finished(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::melee_hit_scan(frame, me);
    }

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
        if !self.hostile {
            return shared::rebirth(frame, me);
        }
        self.drop_item(frame, me)?;
        combat::begin_death_shrink(frame, me);
        Ok(())
    }

    fn explode(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::explode(frame, me);
    }

    fn drop_item(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
        if self.hostile {
            combat::drop_item(frame, me)
        } else {
            Ok(())
        }
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
