//! Weighted random selection (enemy wave composition).
//!
//! A draw is a uniform integer in `[0, total)`. Entries are walked in order,
//! accumulating weights, and the first entry whose running total exceeds the
//! draw wins. O(n) per draw, which is fine for the handful of entries a
//! spawn table holds.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An ordered list of `(item, weight)` pairs with a precomputed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T> WeightedTable<T> {
    /// Build a table. Returns `None` when there is nothing to draw from
    /// (no entries, or every weight is zero).
    pub fn new(entries: Vec<(T, u32)>) -> Option<Self> {
        let total: u32 = entries.iter().map(|(_, w)| *w).sum();
        if total == 0 {
            return None;
        }
        Some(Self { entries, total })
    }

    pub fn total_weight(&self) -> u32 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    /// Index selected by `draw`. `None` when `draw >= total_weight()`.
    pub fn pick_index(&self, draw: u32) -> Option<usize> {
        let mut cumulative = 0;
        for (idx, (_, weight)) in self.entries.iter().enumerate() {
            cumulative += weight;
            if cumulative > draw {
                return Some(idx);
            }
        }
        None
    }

    /// Item selected by `draw`.
    pub fn pick(&self, draw: u32) -> Option<&T> {
        self.pick_index(draw).map(|idx| &self.entries[idx].0)
    }

    /// Draw uniformly from `[0, total)` and return the selected item.
    pub fn sample(&self, rng: &mut impl Rng) -> &T {
        let draw = rng.gen_range(0..self.total);
        // The walk always terminates inside the table for draw < total
        let idx = self.pick_index(draw).unwrap_or(self.entries.len() - 1);
        &self.entries[idx].0
    }
}
