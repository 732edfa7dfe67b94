//! Item drop decision on death.

use rand::Rng;

/// What a dying combatant leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDecision<'a, T> {
    /// The configured mandatory drop. Optional drops are skipped entirely.
    Mandatory(&'a T),
    /// One uniformly chosen optional drop.
    Optional(&'a T),
    Nothing,
}

impl<'a, T> DropDecision<'a, T> {
    pub fn item(&self) -> Option<&'a T> {
        match *self {
            Self::Mandatory(item) | Self::Optional(item) => Some(item),
            Self::Nothing => None,
        }
    }
}

/// Decide the drop for one death.
///
/// A mandatory drop always wins. Otherwise, with probability `chance`, one
/// entry of `optional` is picked uniformly.
pub fn decide_drop<'a, T>(
    mandatory: Option<&'a T>,
    optional: &'a [T],
    chance: f32,
    rng: &mut impl Rng,
) -> DropDecision<'a, T> {
    if let Some(item) = mandatory {
        return DropDecision::Mandatory(item);
    }
    if optional.is_empty() || rng.gen::<f32>() >= chance {
        return DropDecision::Nothing;
    }
    DropDecision::Optional(&optional[rng.gen_range(0..optional.len())])
}
