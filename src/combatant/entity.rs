//! The combatant record shared by party members and enemies
//!
//! Party and enemy specific data lives in [`CombatantRole`]; everything else
//! is common and handled by plain methods on [`Combatant`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::actions::{Action, ActionCatalog, CostPool};
use crate::attributes::{AttributeName, AttributeSet};
use crate::combat::constants::{BASE_HP, BASE_MAX_XP, BASE_MP};
use crate::combatant::effects::PendingEffect;
use crate::core::types::{CombatantId, Team};

/// Party-only progression state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDetails {
    /// Encounters to sit out before being available again
    pub encounters_until_available: u32,
    /// Level-up points not yet assigned to attributes
    pub attribute_points_available: u32,
}

/// Enemy-only data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDetails {
    /// Archetype id, e.g. "goblin"
    pub kind: String,
}

/// Variant data of a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantRole {
    Party(PartyDetails),
    Enemy(EnemyDetails),
}

/// Character that can take part in a combat encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub team: Team,
    pub attributes: AttributeSet,

    /// Shared action catalog
    pub actions: Arc<ActionCatalog>,
    /// Temporary attribute changes to undo at settlement, oldest first
    pub pending_effects: Vec<PendingEffect>,

    /// AI-controlled?
    pub is_simulated: bool,

    pub level: u32,
    pub xp: u64,
    pub max_xp: u64,

    // Pools are signed: action costs are not clamped
    pub hp: i64,
    pub max_hp: i64,
    pub mp: i64,
    pub max_mp: i64,

    pub role: CombatantRole,
}

impl Combatant {
    fn base(
        name: String,
        attributes: AttributeSet,
        actions: Arc<ActionCatalog>,
        role: CombatantRole,
    ) -> Self {
        Self {
            id: CombatantId::new(),
            name,
            team: Team::None,
            attributes,
            actions,
            pending_effects: Vec::new(),
            is_simulated: true,
            level: 1,
            xp: 0,
            max_xp: BASE_MAX_XP,
            hp: BASE_HP,
            max_hp: BASE_HP,
            mp: BASE_MP,
            max_mp: BASE_MP,
            role,
        }
    }

    /// New level 1 party member, player-controlled
    ///
    /// Starting attributes count as growth, so e.g. starting endurance
    /// raises max HP and MP.
    pub fn new_party(
        name: impl Into<String>,
        attributes: AttributeSet,
        actions: Arc<ActionCatalog>,
    ) -> Self {
        let mut combatant = Self::base(
            name.into(),
            attributes,
            actions,
            CombatantRole::Party(PartyDetails::default()),
        );
        combatant.team = Team::Party;
        combatant.is_simulated = false;

        for name in AttributeName::ALL {
            let value = combatant.attributes.value(name);
            if value > 0 {
                combatant.apply_growth_side_effects(name, value);
            }
        }

        combatant
    }

    /// New level 1 enemy of the given archetype, AI-controlled
    pub fn new_enemy(
        kind: impl Into<String>,
        name: impl Into<String>,
        attributes: AttributeSet,
        actions: Arc<ActionCatalog>,
    ) -> Self {
        let mut combatant = Self::base(
            name.into(),
            attributes,
            actions,
            CombatantRole::Enemy(EnemyDetails { kind: kind.into() }),
        );
        combatant.team = Team::Enemy;
        combatant
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_party(&self) -> bool {
        matches!(self.role, CombatantRole::Party(_))
    }

    pub fn party_details(&self) -> Option<&PartyDetails> {
        match &self.role {
            CombatantRole::Party(details) => Some(details),
            CombatantRole::Enemy(_) => None,
        }
    }

    pub fn party_details_mut(&mut self) -> Option<&mut PartyDetails> {
        match &mut self.role {
            CombatantRole::Party(details) => Some(details),
            CombatantRole::Enemy(_) => None,
        }
    }

    /// Enemy archetype id, if this is an enemy
    pub fn enemy_kind(&self) -> Option<&str> {
        match &self.role {
            CombatantRole::Enemy(details) => Some(&details.kind),
            CombatantRole::Party(_) => None,
        }
    }

    /// Party members with a cooldown are not available for encounters
    pub fn is_available(&self) -> bool {
        self.party_details()
            .is_some_and(|d| d.encounters_until_available == 0)
    }

    /// Attributes with some value, strongest first
    pub fn attribute_affinities(&self) -> Vec<AttributeName> {
        self.attributes.ranked()
    }

    /// Strongest attribute, physical when nothing has a value
    pub fn primary_affinity(&self) -> AttributeName {
        self.attribute_affinities()
            .first()
            .copied()
            .unwrap_or(AttributeName::Phy)
    }

    pub fn pool(&self, pool: CostPool) -> i64 {
        match pool {
            CostPool::Hp => self.hp,
            CostPool::Mp => self.mp,
        }
    }

    pub fn pool_mut(&mut self, pool: CostPool) -> &mut i64 {
        match pool {
            CostPool::Hp => &mut self.hp,
            CostPool::Mp => &mut self.mp,
        }
    }

    /// Can this combatant pay for the action?
    pub fn can_afford(&self, action: &Action) -> bool {
        action
            .cost
            .map_or(true, |cost| self.pool(cost.pool) >= cost.value)
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.pending_effects.is_empty()
    }
}
