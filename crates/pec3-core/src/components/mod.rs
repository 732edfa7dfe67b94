//! Component definitions for the arena simulation.
//!
//! Components are plain data attached to entities. Behaviour lives in the
//! state objects (`states`, `ships`) and the frame systems.

mod character;
mod common;
mod items;
mod ship;
mod threat;

pub use character::*;
pub use common::*;
pub use items::*;
pub use ship::*;
pub use threat::*;
