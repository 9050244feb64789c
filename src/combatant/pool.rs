//! Lookup of combatants by id

use crate::combatant::entity::Combatant;
use crate::core::types::CombatantId;

/// Anything that can hand out combatants by id
///
/// Action resolution works against this so the same code runs on a plain
/// list in tests and on a live session (roster plus encounter enemies).
pub trait CombatantPool {
    fn combatant(&self, id: CombatantId) -> Option<&Combatant>;

    fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant>;
}

impl CombatantPool for [Combatant] {
    fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.iter().find(|c| c.id == id)
    }

    fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.iter_mut().find(|c| c.id == id)
    }
}

impl CombatantPool for Vec<Combatant> {
    fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.as_slice().combatant(id)
    }

    fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.as_mut_slice().combatant_mut(id)
    }
}
