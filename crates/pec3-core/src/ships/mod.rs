//! Ship behaviour variants, selected by [`ShipKind`] like the character
//! variants.

mod ai;
mod human;

pub use ai::AiShip;
pub use human::HumanShip;

use hecs::Entity;

use crate::components::{ShipKind, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::Contact;

pub trait ShipState: Sync {
    fn kind(&self) -> ShipKind;

    /// Tags this ship reacts to on hull contact.
    fn target_tags(&self) -> &'static [Tag];

    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError>;

    fn update_state(&self, frame: &mut Frame<'_>, me: Entity);

    /// Hand control of the ship to `pilot`.
    fn enter_ship(&self, frame: &mut Frame<'_>, me: Entity, pilot: Entity) -> GameResult<()>;

    fn input_exit_ship(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool) -> GameResult<()>;

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact);

    fn handle_collision(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact);
}

static HUMAN: HumanShip = HumanShip;
static AI: AiShip = AiShip;

pub fn ship_state_for(kind: ShipKind) -> &'static dyn ShipState {
    match kind {
        ShipKind::Human => &HUMAN,
        ShipKind::AI => &AI,
    }
}
