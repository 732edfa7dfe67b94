//! Pure gameplay logic for PEC3.
//!
//! This crate contains the math behind combat, targeting and movement that
//! does not need an entity store. Functions take plain data and return
//! results, so they are unit-testable on their own and reused by
//! `pec3-core` and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`damage`] | Health/shield split absorption and restoration |
//! | [`drops`] | Mandatory/optional item drop decision |
//! | [`motion`] | Wander, chase and flee geometry, interval timers, weight blends |
//! | [`targeting`] | Nearest-candidate resolution with stale pruning |
//! | [`timer`] | Countdowns and the `mm:ss:ffff` timer format |
//! | [`vector`] | `Vec3` and yaw rotation |
//! | [`weighted`] | Cumulative-weight random selection |

pub mod damage;
pub mod drops;
pub mod motion;
pub mod targeting;
pub mod timer;
pub mod vector;
pub mod weighted;

pub use vector::Vec3;
