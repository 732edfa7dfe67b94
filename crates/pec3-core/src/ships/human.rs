//! Player-piloted ship. Boarding hides the pilot and hands input to the
//! ship; disembarking puts the pilot back down at the dock in range.

use hecs::Entity;
use log::{info, warn};
use pec3_logic::Vec3;

use super::ShipState;
use crate::components::{Capabilities, Dock, Inactive, Ship, ShipKind, Tag, Transform};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::{Contact, ContactPhase, Zone};
use crate::host::CameraRig;

pub struct HumanShip;

impl ShipState for HumanShip {
    fn kind(&self) -> ShipKind {
        ShipKind::Human
    }

    fn target_tags(&self) -> &'static [Tag] {
        &[]
    }

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError> {
        if frame.world.get::<&Ship>(me).is_err() {
            return Err(InitError::MissingComponent {
                entity: me,
                component: "Ship",
            });
        }
        Ok(())
    }

    fn update_state(&self, _frame: &mut Frame<'_>, _me: Entity) {}

    fn enter_ship(&self, frame: &mut Frame<'_>, me: Entity, pilot: Entity) -> GameResult<()> {
        match frame.world.get::<&mut Ship>(me) {
            Ok(mut ship) => ship.pilot = Some(pilot),
            Err(_) => {
                return Err(InitError::MissingComponent {
                    entity: me,
                    component: "Ship",
                }
                .into())
            }
        }
        let _ = frame.world.insert_one(pilot, Inactive);
        if let Ok(mut caps) = frame.world.get::<&mut Capabilities>(me) {
            caps.insert(Capabilities::PLAYER_INPUT | Capabilities::VEHICLE_CONTROL);
        }
        frame.host.focus_camera(CameraRig::ShipFollow, me);
        info!("{:?} boarded ship {:?}", pilot, me);
        Ok(())
    }

    fn input_exit_ship(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) -> GameResult<()> {
        if !pressed {
            return Ok(());
        }
        let Ok((dock, pilot)) = frame
            .world
            .get::<&Ship>(me)
            .map(|s| (s.dock_in_range, s.pilot))
        else {
            return Ok(());
        };
        let Some(dock) = dock else {
            return Ok(());
        };
        let Some(pilot) = pilot else {
            warn!("ship {:?} has no pilot to put ashore", me);
            return Ok(());
        };
        let (spawn_point, yaw) = match frame.world.get::<&Dock>(dock) {
            Ok(d) => (d.spawn_point.ok_or(InitError::MissingDockSpawn(dock))?, d.yaw),
            Err(_) => return Err(InitError::MissingDockSpawn(dock).into()),
        };

        if let Ok(mut caps) = frame.world.get::<&mut Capabilities>(me) {
            caps.remove(Capabilities::PLAYER_INPUT | Capabilities::VEHICLE_CONTROL);
        }
        if let Ok(mut ship) = frame.world.get::<&mut Ship>(me) {
            ship.pilot = None;
        }
        if let Ok(mut transform) = frame.world.get::<&mut Transform>(pilot) {
            transform.position = spawn_point;
            transform.forward = Vec3::FORWARD.rotate_yaw(yaw);
        }
        let _ = frame.world.remove_one::<Inactive>(pilot);
        frame.host.focus_camera(CameraRig::PlayerFollow, pilot);
        info!("{:?} left ship {:?} at dock {:?}", pilot, me, dock);
        Ok(())
    }

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        if contact.zone != Zone::Inner {
            return;
        }
        let is_port = frame
            .world
            .get::<&Tag>(contact.other)
            .map(|t| *t == Tag::Port)
            .unwrap_or(false);
        if !is_port {
            return;
        }
        if let Ok(mut ship) = frame.world.get::<&mut Ship>(me) {
            match contact.phase {
                ContactPhase::Enter => ship.dock_in_range = Some(contact.other),
                ContactPhase::Stay if ship.dock_in_range.is_none() => {
                    ship.dock_in_range = Some(contact.other)
                }
                ContactPhase::Stay => {}
                ContactPhase::Exit => ship.dock_in_range = None,
            }
        }
    }

    fn handle_collision(&self, _frame: &mut Frame<'_>, _me: Entity, _contact: Contact) {}
}
