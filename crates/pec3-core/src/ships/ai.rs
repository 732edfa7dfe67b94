//! Autonomous ship: loops over its waypoints and blows up anything alive
//! it rams.

use hecs::Entity;
use log::debug;

use super::ShipState;
use crate::components::{Character, Ship, ShipKind, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::{Contact, ContactPhase, Zone};
use crate::states::state_for;

pub struct AiShip;

impl ShipState for AiShip {
    fn kind(&self) -> ShipKind {
        ShipKind::AI
    }

    fn target_tags(&self) -> &'static [Tag] {
        &[Tag::Ally, Tag::Enemy, Tag::Neutral, Tag::Still]
    }

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError> {
        let ship = frame
            .world
            .get::<&Ship>(me)
            .map(|s| (*s).clone())
            .map_err(|_| InitError::MissingComponent {
                entity: me,
                component: "Ship",
            })?;
        if ship.waypoints.is_empty() {
            return Err(InitError::MissingWaypoints(me));
        }
        let game_speed = frame.settings().game_speed;
        frame.host.set_speed(
            me,
            ship.max_speed * game_speed,
            ship.max_acceleration * game_speed,
        );
        frame.host.set_angular_speed(me, ship.max_angular_speed);
        Ok(())
    }

    fn update_state(&self, frame: &mut Frame<'_>, me: Entity) {
        let Ok((waypoint, count)) = frame
            .world
            .get::<&Ship>(me)
            .map(|s| (s.waypoints.get(s.next_waypoint).copied(), s.waypoints.len()))
        else {
            return;
        };
        let Some(waypoint) = waypoint else {
            return;
        };
        frame.host.set_destination(me, waypoint);
        if frame.host.remaining_distance(me) <= frame.host.stopping_distance(me) {
            if let Ok(mut ship) = frame.world.get::<&mut Ship>(me) {
                ship.next_waypoint = (ship.next_waypoint + 1) % count;
            }
        }
    }

    fn enter_ship(&self, _frame: &mut Frame<'_>, _me: Entity, _pilot: Entity) -> GameResult<()> {
        Ok(())
    }

    fn input_exit_ship(
        &self,
        _frame: &mut Frame<'_>,
        _me: Entity,
        _pressed: bool,
    ) -> GameResult<()> {
        Ok(())
    }

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact) {
        if contact.zone != Zone::Hull || contact.phase != ContactPhase::Enter {
            return;
        }
        let Ok(tag) = frame.world.get::<&Tag>(contact.other).map(|t| *t) else {
            return;
        };
        if !tag.is_any(self.target_tags()) {
            return;
        }
        let Ok(kind) = frame.world.get::<&Character>(contact.other).map(|c| c.kind) else {
            return;
        };
        debug!("ship {:?} rammed {:?}", me, contact.other);
        state_for(kind).explode(frame, contact.other);
    }

    fn handle_collision(&self, _frame: &mut Frame<'_>, _me: Entity, _contact: Contact) {}
}
