//! Encounter lifecycle state

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::core::types::{CombatantId, EncounterIndex};
use crate::encounter::rewards::Reward;

/// Where the current encounter is in its lifecycle
///
/// `Inactive -> Active -> Settling -> Inactive`. `Settling` only exists for
/// the duration of a settlement call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPhase {
    #[default]
    Inactive,
    Active,
    Settling,
}

/// The current (or last) encounter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterState {
    /// Number of encounters started so far
    pub index: EncounterIndex,
    pub phase: EncounterPhase,
    /// Whether the AI plays every participant, party included
    pub is_simulated: bool,
    pub rewards: Vec<Reward>,
    /// Roster ids of the participating party members
    pub party: Vec<CombatantId>,
    /// Enemies are owned by the encounter and dropped at settlement
    pub enemies: Vec<Combatant>,
}

impl EncounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.phase == EncounterPhase::Active
    }

    /// Does `id` take part in this encounter?
    pub fn involves(&self, id: CombatantId) -> bool {
        self.party.contains(&id) || self.enemies.iter().any(|e| e.id == id)
    }

    /// Back to an empty, inactive encounter; the index is kept
    pub fn clear(&mut self) {
        self.party.clear();
        self.enemies.clear();
        self.rewards.clear();
        self.is_simulated = false;
        self.phase = EncounterPhase::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionCatalog;
    use crate::attributes::AttributeSet;
    use std::sync::Arc;

    #[test]
    fn test_clear_keeps_index() {
        let mut state = EncounterState::new();
        let goblin = Combatant::new_enemy(
            "goblin",
            "Goblin",
            AttributeSet::default(),
            Arc::new(ActionCatalog::new()),
        );
        let member = CombatantId::new();
        state.index = 4;
        state.phase = EncounterPhase::Active;
        state.party.push(member);
        state.enemies.push(goblin.clone());

        assert!(state.is_active());
        assert!(state.involves(member));
        assert!(state.involves(goblin.id));
        assert!(!state.involves(CombatantId::new()));

        state.clear();
        assert_eq!(state.index, 4);
        assert_eq!(state.phase, EncounterPhase::Inactive);
        assert!(state.party.is_empty() && state.enemies.is_empty());
    }
}
