//! Player-driven variant. Locomotion belongs to the host's controller; this
//! state turns edge-triggered input into melee swings, charged shots, aim
//! rig blends and ship boarding, and tracks nearby items and ships.

use hecs::{Entity, World};
use log::debug;
use pec3_logic::motion::face_towards;
use pec3_logic::targeting::resolve_nearest;
use pec3_logic::Vec3;

use super::{shared, CharacterState};
use crate::combat;
use crate::components::{
    Capabilities, Character, CharacterKind, CharacterStats, KeyRing, PlayerSenses, Ship, Tag,
    Transform,
};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::{Contact, ContactPhase, Zone};
use crate::host::{AnimParam, CameraRig, Rig};
use crate::sequences::{schedule, Sequences, Task};
use crate::ships::ship_state_for;
use crate::targeting::locate_live;

pub struct Player;

/// How fast the body turns toward the aim point, per second.
const AIM_TURN_RATE: f32 = 20.0;

const BODY_AIM_WEIGHT: f32 = 0.7;
const FIST_AIM_WEIGHT: f32 = 1.0;

impl Player {
    /// World position of the projectile spawn point.
    fn muzzle(frame: &Frame<'_>, me: Entity) -> Result<Vec3, InitError> {
        let offset = frame
            .world
            .get::<&CharacterStats>(me)
            .ok()
            .and_then(|s| s.projectile_spawn)
            .ok_or(InitError::MissingProjectileSpawn(me))?;
        let transform = frame
            .world
            .get::<&Transform>(me)
            .map(|t| *t)
            .map_err(|_| InitError::MissingComponent {
                entity: me,
                component: "Transform",
            })?;
        Ok(transform.position + offset.rotate_yaw(transform.yaw_degrees()))
    }

    fn blend_rigs(frame: &mut Frame<'_>, me: Entity, aiming: bool) {
        let duration = frame.settings().rig_lerp_duration;
        let blends = [
            (Rig::AimBody, BODY_AIM_WEIGHT),
            (Rig::AimFist, FIST_AIM_WEIGHT),
        ];
        if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(me) {
            for (rig, _) in blends {
                sequences.cancel_rig(rig);
            }
        }
        for (rig, weight) in blends {
            let (from, to) = if aiming { (0.0, weight) } else { (weight, 0.0) };
            schedule(
                frame,
                me,
                Task::RigBlend {
                    rig,
                    from,
                    to,
                    duration,
                    elapsed: 0.0,
                },
            );
        }
    }

    /// Point the look-at rig at the nearest item still around.
    fn look_at_closest_item(frame: &mut Frame<'_>, me: Entity) {
        let Ok(origin) = frame.world.get::<&Transform>(me).map(|t| t.position) else {
            return;
        };
        let Ok(items) = frame.world.get::<&PlayerSenses>(me).map(|s| s.items.clone()) else {
            return;
        };
        let world: &World = frame.world;
        let (nearest, pruned) = resolve_nearest(origin, &items, |item| locate_live(world, item));
        if let Ok(mut senses) = frame.world.get::<&mut PlayerSenses>(me) {
            senses.items = pruned;
            senses.looking_at = nearest;
        }
        frame.host.set_look_at(me, nearest);
    }

    fn sense_item(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        let changed = match frame.world.get::<&mut PlayerSenses>(me) {
            Ok(mut senses) => match contact.phase {
                ContactPhase::Enter if !senses.items.contains(&contact.other) => {
                    senses.items.push(contact.other);
                    true
                }
                ContactPhase::Exit => {
                    let before = senses.items.len();
                    senses.items.retain(|i| *i != contact.other);
                    senses.items.len() != before
                }
                _ => false,
            },
            Err(_) => false,
        };
        if changed {
            Self::look_at_closest_item(frame, me);
        }
    }

    fn sense_ship(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        if let Ok(mut senses) = frame.world.get::<&mut PlayerSenses>(me) {
            match contact.phase {
                ContactPhase::Enter | ContactPhase::Stay => {
                    senses.ship_in_range = Some(contact.other);
                }
                ContactPhase::Exit => {
                    if senses.ship_in_range == Some(contact.other) {
                        senses.ship_in_range = None;
                    }
                }
            }
        }
    }
}

impl CharacterState for Player {
    fn kind(&self) -> CharacterKind {
        CharacterKind::Player
    }

    /// What the player's swings and shots can hurt.
    fn target_tags(&self) -> &'static [Tag] {
        &[Tag::Enemy]
    }

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError> {
        Self::muzzle(frame, me)?;
        if frame.world.get::<&PlayerSenses>(me).is_err() {
            let _ = frame.world.insert_one(me, PlayerSenses::default());
        }
        if frame.world.get::<&KeyRing>(me).is_err() {
            let _ = frame.world.insert_one(me, KeyRing::default());
        }
        if let Ok(mut caps) = frame.world.get::<&mut Capabilities>(me) {
            caps.remove(Capabilities::AI_NAVIGATION);
            caps.insert(Capabilities::PLAYER_CONTROLS);
        }
        let vitals = frame
            .world
            .get::<&Character>(me)
            .map(|c| c.vitals)
            .map_err(|_| InitError::MissingComponent {
                entity: me,
                component: "Character",
            })?;
        frame.host.rebind(me);
        frame.host.focus_camera(CameraRig::PlayerFollow, me);
        frame
            .host
            .update_health_shield_bars(vitals.health, vitals.shield);
        Ok(())
    }

    fn update_state(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
        let Ok(c) = frame.world.get::<&Character>(me).map(|c| (*c).clone()) else {
            return Ok(());
        };
        if c.dead {
            return Ok(());
        }

        if !c.aiming {
            frame.host.set_bool(me, AnimParam::Charging, false);
            let swing = match frame.world.get::<&mut Character>(me) {
                Ok(mut record) => {
                    record.charging_finished = false;
                    std::mem::take(&mut record.attack_requested)
                }
                Err(_) => false,
            };
            if swing {
                self.attack(frame, me);
            }
            return Ok(());
        }

        frame.host.set_bool(me, AnimParam::Charging, true);
        let turn = (frame.delta() * AIM_TURN_RATE).min(1.0);
        if let (Some(point), Ok(mut transform)) =
            (c.aim_point, frame.world.get::<&mut Transform>(me))
        {
            let aim = face_towards(transform.position, point, transform.forward);
            let turned = transform.forward.lerp(aim, turn).horizontal().normalize();
            if turned != Vec3::ZERO {
                transform.forward = turned;
            }
        }

        if c.charging_finished && c.shooting && !c.shooting_started {
            let muzzle = Self::muzzle(frame, me)?;
            let forward = frame
                .world
                .get::<&Transform>(me)
                .map(|t| t.forward)
                .unwrap_or(Vec3::FORWARD);
            let direction = c
                .aim_point
                .map(|p| (p - muzzle).normalize())
                .filter(|d| *d != Vec3::ZERO)
                .unwrap_or(forward);
            self.shoot(frame, me, muzzle, direction)?;
        } else if c.shooting && !c.shooting_started {
            // Pressed before the charge completed
            if let Ok(mut record) = frame.world.get::<&mut Character>(me) {
                record.shooting = false;
            }
        }
        Ok(())
    }

    fn navigate(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn wander(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn chase(&self, _frame: &mut Frame<'_>, _me: Entity, _target: Vec3) {}

    fn flee(&self, _frame: &mut Frame<'_>, _me: Entity, _threat: Vec3) {}

    fn attack(&self, frame: &mut Frame<'_>, me: Entity) -> bool {
        combat::try_attack(frame, me)
    }

    fn attack_finished(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::melee_hit_scan(frame, me);
    }

    fn shoot(
        &self,
        frame: &mut Frame<'_>,
        me: Entity,
        spawn: Vec3,
        direction: Vec3,
    ) -> GameResult<bool> {
        let charged = frame
            .world
            .get::<&Character>(me)
            .map(|c| c.charging_finished)
            .unwrap_or(false);
        if !charged {
            return Ok(false);
        }
        combat::try_shoot(frame, me, spawn, direction)
    }

    fn take_damage(&self, frame: &mut Frame<'_>, me: Entity, amount: f32) {
        combat::apply_damage(frame, me, amount);
    }

    fn restore_health(&self, frame: &mut Frame<'_>, me: Entity, multiplier: f32) {
        combat::restore_health(frame, me, multiplier);
    }

    fn restore_shield(&self, frame: &mut Frame<'_>, me: Entity, multiplier: f32) {
        combat::restore_shield(frame, me, multiplier);
    }

    fn die(&self, frame: &mut Frame<'_>, me: Entity) {
        if combat::die(frame, me) {
            frame.host.set_bool(me, AnimParam::Charging, false);
            frame.host.set_bool(me, AnimParam::Shooting, false);
        }
    }

    fn dead_finished(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
        if !combat::finish_death(frame, me) {
            return Ok(());
        }
        shared::rebirth(frame, me)?;
        frame.host.show_game_over("Game Over");
        Ok(())
    }

    fn explode(&self, frame: &mut Frame<'_>, me: Entity) {
        combat::explode(frame, me);
    }

    fn drop_item(&self, _frame: &mut Frame<'_>, _me: Entity) -> GameResult<()> {
        Ok(())
    }

    fn input_attack(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) {
        if !pressed {
            return;
        }
        if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
            c.attack_requested = true;
        }
    }

    fn input_aim(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) {
        let changed = match frame.world.get::<&mut Character>(me) {
            Ok(mut c) if !c.dead && c.aiming != pressed => {
                c.aiming = pressed;
                true
            }
            _ => false,
        };
        if !changed {
            return;
        }
        Self::blend_rigs(frame, me, pressed);
        let rig = if pressed {
            CameraRig::PlayerAim
        } else {
            CameraRig::PlayerFollow
        };
        frame.host.focus_camera(rig, me);
    }

    fn input_shoot(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) {
        if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
            c.shooting = pressed;
        }
    }

    fn input_enter_ship(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) -> GameResult<()> {
        if !pressed || shared::is_dead(frame, me) {
            return Ok(());
        }
        let Some(ship) = frame
            .world
            .get::<&PlayerSenses>(me)
            .ok()
            .and_then(|s| s.ship_in_range)
        else {
            return Ok(());
        };
        let Ok(kind) = frame.world.get::<&Ship>(ship).map(|s| s.kind) else {
            debug!("{:?} lost track of ship {:?}", me, ship);
            return Ok(());
        };
        ship_state_for(kind).enter_ship(frame, ship, me)
    }

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        let Ok(tag) = frame.world.get::<&Tag>(contact.other).map(|t| *t) else {
            return;
        };
        match (tag, contact.zone) {
            (Tag::Item, Zone::Inner) => Self::sense_item(frame, me, contact),
            (Tag::Ship, Zone::Inner) => Self::sense_ship(frame, me, contact),
            _ => {}
        }
    }

    fn handle_collision(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        let is_item = frame
            .world
            .get::<&Tag>(contact.other)
            .map(|t| *t == Tag::Item)
            .unwrap_or(false);
        if is_item {
            debug!(
                "{:?} item collision {} on {}",
                me, contact.phase, contact.zone
            );
        }
    }
}
