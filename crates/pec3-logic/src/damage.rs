//! Pure health/shield accounting.
//!
//! Incoming damage is split between shield and health: the shield soaks
//! [`SHIELD_SHARE`] of every hit up to what it has left, health takes the rest
//! plus any shortfall the shield could not cover. Total loss always equals
//! the damage dealt.

use serde::{Deserialize, Serialize};

/// Fraction of each hit routed to the shield.
pub const SHIELD_SHARE: f32 = 0.9;

/// Fraction of each hit routed straight to health.
pub const HEALTH_SHARE: f32 = 1.0 - SHIELD_SHARE;

/// Health and shield pools of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self::full(100.0, 100.0)
    }
}

impl Vitals {
    /// Both pools at capacity.
    pub fn full(max_health: f32, max_shield: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            shield: max_shield,
            max_shield,
        }
    }

    /// Apply one hit. Health may go negative; the caller decides on death.
    pub fn absorb(&mut self, amount: f32) {
        let (health, shield) = split_damage(self.health, self.shield, amount);
        self.health = health;
        self.shield = shield;
    }

    /// Add `multiplier * max_health`, clamped to `[0, max_health]`.
    pub fn restore_health(&mut self, multiplier: f32) {
        self.health = (self.health + self.max_health * multiplier).clamp(0.0, self.max_health);
    }

    /// Add `multiplier * max_shield`, clamped to `[0, max_shield]`.
    pub fn restore_shield(&mut self, multiplier: f32) {
        self.shield = (self.shield + self.max_shield * multiplier).clamp(0.0, self.max_shield);
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_full(&self) -> bool {
        self.health >= self.max_health
    }

    pub fn shield_full(&self) -> bool {
        self.shield >= self.max_shield
    }

    /// Every pool and capacity multiplied by `factor` (difficulty scaling).
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            health: self.health * factor,
            max_health: self.max_health * factor,
            shield: self.shield * factor,
            max_shield: self.max_shield * factor,
        }
    }
}

/// Split `amount` across `(health, shield)` and return the new pools.
///
/// ```text
/// health -= amount * 0.1
/// shield -= amount * 0.9
/// if shield < 0 { health += shield; shield = 0 }
/// ```
pub fn split_damage(health: f32, shield: f32, amount: f32) -> (f32, f32) {
    let mut health = health - amount * HEALTH_SHARE;
    let mut shield = shield - amount * SHIELD_SHARE;
    if shield < 0.0 {
        health += shield;
        shield = 0.0;
    }
    (health, shield)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_shield_covers_its_share() {
        let (h, s) = split_damage(100.0, 100.0, 50.0);
        assert_abs_diff_eq!(h, 95.0, epsilon = 1e-4);
        assert_abs_diff_eq!(s, 55.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shortfall_spills_onto_health() {
        // 150 damage: shield takes 100 of its 135 share, health 15 + 35
        let (h, s) = split_damage(100.0, 100.0, 150.0);
        assert_eq!(s, 0.0);
        assert_abs_diff_eq!(h, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_no_shield_goes_negative() {
        let (h, s) = split_damage(20.0, 0.0, 50.0);
        assert_eq!(s, 0.0);
        assert_abs_diff_eq!(h, -30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_loss_is_conserved() {
        for &(h, s, d) in &[
            (100.0, 100.0, 1.0),
            (100.0, 10.0, 40.0),
            (50.0, 0.0, 25.0),
            (80.0, 200.0, 199.0),
        ] {
            let (nh, ns) = split_damage(h, s, d);
            assert_abs_diff_eq!((h + s) - (nh + ns), d, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_restore_clamps_to_max() {
        let mut v = Vitals::full(100.0, 50.0);
        v.health = 90.0;
        v.shield = 0.0;
        v.restore_health(0.25);
        v.restore_shield(0.25);
        assert_eq!(v.health, 100.0);
        assert_abs_diff_eq!(v.shield, 12.5, epsilon = 1e-5);
    }

    #[test]
    fn test_scaled_keeps_ratio() {
        let v = Vitals::full(100.0, 40.0).scaled(1.5);
        assert_eq!(v.health, v.max_health);
        assert_eq!(v.max_shield, 60.0);
    }
}
