//! Per-entity threat registry.

use hecs::Entity;

/// Candidate targets sensed by the inner zone, the resolved nearest target
/// and the aggro override.
///
/// `target` and `forced_target` are independent slots: clearing one never
/// touches the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatRegistry {
    pub candidates: Vec<Entity>,
    pub target: Option<Entity>,
    pub forced_target: Option<Entity>,
}

impl ThreatRegistry {
    pub fn contains(&self, entity: Entity) -> bool {
        self.candidates.contains(&entity)
    }

    /// Returns `false` if the candidate was already registered.
    pub fn add(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.candidates.push(entity);
        true
    }

    /// Returns `false` if the candidate was not registered.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| *c != entity);
        self.candidates.len() != before
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.target = None;
        self.forced_target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    #[test]
    fn test_add_is_deduplicated() {
        let mut world = World::new();
        let a = world.spawn(());
        let mut registry = ThreatRegistry::default();
        assert!(registry.add(a));
        assert!(!registry.add(a));
        assert_eq!(registry.candidates.len(), 1);
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
    }

    #[test]
    fn test_clear_empties_both_slots() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut registry = ThreatRegistry {
            candidates: vec![a],
            target: Some(a),
            forced_target: Some(b),
        };
        registry.clear();
        assert_eq!(registry, ThreatRegistry::default());
    }
}
