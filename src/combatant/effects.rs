//! Reversible attribute changes from buffs and debuffs

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeName, AttributeValues};
use crate::combatant::entity::Combatant;

/// A temporary attribute change waiting to be undone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffect {
    /// Name of the action that caused it
    pub source: String,
    pub attribute: AttributeName,
    pub delta: i64,
}

impl Combatant {
    /// Apply `deltas` to this combatant's attributes and remember how to
    /// undo them
    pub fn apply_temporary_effect(&mut self, source: &str, deltas: &AttributeValues) {
        for (attribute, delta) in deltas.iter() {
            self.attributes.get_mut(attribute).value += delta;
            self.pending_effects.push(PendingEffect {
                source: source.to_string(),
                attribute,
                delta,
            });
        }
    }

    /// Undo every pending effect, oldest first; returns how many were undone
    pub fn revert_pending_effects(&mut self) -> usize {
        let effects = std::mem::take(&mut self.pending_effects);
        for effect in &effects {
            self.attributes.get_mut(effect.attribute).value -= effect.delta;
        }
        effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionCatalog;
    use crate::attributes::AttributeSet;
    use std::sync::Arc;

    #[test]
    fn test_effects_apply_and_revert_in_order() {
        let mut c = Combatant::new_enemy(
            "dummy",
            "Dummy",
            AttributeSet::from_raw([5, 0, 0, 2, 0, 0]),
            Arc::new(ActionCatalog::new()),
        );

        c.apply_temporary_effect("Focus", &AttributeValues::new().with(AttributeName::Phy, 2));
        c.apply_temporary_effect(
            "Hex",
            &AttributeValues::new()
                .with(AttributeName::Agl, -3)
                .with(AttributeName::Phy, 1),
        );

        assert_eq!(c.attributes.phy.value, 8);
        assert_eq!(c.attributes.agl.value, -1);
        assert_eq!(c.pending_effects.len(), 3);
        assert_eq!(c.pending_effects[0].source, "Focus");
        assert!(c.has_pending_effects());

        assert_eq!(c.revert_pending_effects(), 3);
        assert_eq!(c.attributes.phy.value, 5);
        assert_eq!(c.attributes.agl.value, 2);
        assert!(!c.has_pending_effects());

        // Draining twice is harmless
        assert_eq!(c.revert_pending_effects(), 0);
    }
}
