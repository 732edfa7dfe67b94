//! Character behaviour variants.
//!
//! One zero-sized state object per [`CharacterKind`], held in a fixed table
//! and selected by the entity's current kind. Variants own no data: all
//! per-life state lives in the entity's components, so a kind change only
//! swaps which table entry drives it. Every operation is implemented by
//! every variant, with explicit no-ops where a kind does not act.

mod melee;
mod neutral;
mod player;
mod shared;
mod still;

pub use melee::Melee;
pub use neutral::Neutral;
pub use player::Player;
pub use still::Still;

use hecs::Entity;
use pec3_logic::Vec3;

use crate::components::{CharacterKind, Tag};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::events::Contact;

pub trait CharacterState: Sync {
    fn kind(&self) -> CharacterKind;

    /// Tags this variant hunts, flees from, or hits.
    fn target_tags(&self) -> &'static [Tag];

    /// (Re)acquire collaborators and apply scaling for a fresh life.
    fn start_state(&self, frame: &mut Frame<'_>, me: Entity) -> Result<(), InitError>;

    /// Per-frame behaviour.
    fn update_state(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()>;

    /// Pick between wandering, chasing and fleeing.
    fn navigate(&self, frame: &mut Frame<'_>, me: Entity);

    fn wander(&self, frame: &mut Frame<'_>, me: Entity);

    fn chase(&self, frame: &mut Frame<'_>, me: Entity, target: Vec3);

    fn flee(&self, frame: &mut Frame<'_>, me: Entity, threat: Vec3);

    /// Try to start a melee attack. `false` when rejected.
    fn attack(&self, frame: &mut Frame<'_>, me: Entity) -> bool;

    /// The attack animation reached its hit frame.
    fn attack_finished(&self, frame: &mut Frame<'_>, me: Entity);

    /// Try to fire. `Ok(false)` when rejected.
    fn shoot(
        &self,
        frame: &mut Frame<'_>,
        me: Entity,
        spawn: Vec3,
        direction: Vec3,
    ) -> GameResult<bool>;

    fn take_damage(&self, frame: &mut Frame<'_>, me: Entity, amount: f32);

    fn restore_health(&self, frame: &mut Frame<'_>, me: Entity, multiplier: f32);

    fn restore_shield(&self, frame: &mut Frame<'_>, me: Entity, multiplier: f32);

    fn die(&self, frame: &mut Frame<'_>, me: Entity);

    /// The death animation completed.
    fn dead_finished(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()>;

    fn explode(&self, frame: &mut Frame<'_>, me: Entity);

    fn drop_item(&self, frame: &mut Frame<'_>, me: Entity) -> GameResult<()>;

    fn input_attack(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool);

    fn input_aim(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool);

    fn input_shoot(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool);

    fn input_enter_ship(&self, frame: &mut Frame<'_>, me: Entity, pressed: bool)
        -> GameResult<()>;

    fn handle_trigger(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact);

    fn handle_collision(&self, frame: &mut Frame<'_>, me: Entity, contact: Contact);
}

static ALLY: Melee = Melee::ALLY;
static BOSS: Melee = Melee::BOSS;
static ENEMY: Melee = Melee::ENEMY;
static NEUTRAL: Neutral = Neutral;
static PLAYER: Player = Player;
static STILL: Still = Still;

/// The pre-constructed variant driving `kind`.
pub fn state_for(kind: CharacterKind) -> &'static dyn CharacterState {
    match kind {
        CharacterKind::Ally => &ALLY,
        CharacterKind::Boss => &BOSS,
        CharacterKind::Enemy => &ENEMY,
        CharacterKind::Neutral => &NEUTRAL,
        CharacterKind::Player => &PLAYER,
        CharacterKind::Still => &STILL,
    }
}
