//! Game session: the party roster and the encounter it is fighting
//!
//! The session owns every party member. An active encounter refers to its
//! party members by id and owns its enemies outright.

pub mod rounds;
pub mod settlement;

pub use rounds::{RoundLog, TurnRecord, TurnResult};
pub use settlement::{SettlementReport, XpAward};

use rand::Rng;
use std::sync::Arc;

use crate::actions::{Action, ActionCatalog, ActionOutcome, ActionSelection};
use crate::ai;
use crate::attributes::AttributeSet;
use crate::combat;
use crate::combatant::{Combatant, CombatantPool};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, EncounterIndex, Team};
use crate::encounter::{
    generate_enemies, EncounterCatalog, EncounterPhase, EncounterState, EnemyTypeList, Reward,
};

/// Roster plus current encounter
#[derive(Debug, Clone)]
pub struct GameSession {
    roster: Vec<Combatant>,
    encounter: EncounterState,
    catalog: Arc<ActionCatalog>,
    config: EngineConfig,
}

impl GameSession {
    pub fn new(catalog: Arc<ActionCatalog>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            roster: Vec::new(),
            encounter: EncounterState::new(),
            catalog,
            config,
        })
    }

    /// Session with the default configuration
    pub fn with_catalog(catalog: Arc<ActionCatalog>) -> Self {
        Self {
            roster: Vec::new(),
            encounter: EncounterState::new(),
            catalog,
            config: EngineConfig::default(),
        }
    }

    pub fn catalog(&self) -> &Arc<ActionCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &[Combatant] {
        &self.roster
    }

    pub fn encounter(&self) -> &EncounterState {
        &self.encounter
    }

    pub fn member(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.combatant(id)
    }

    pub fn member_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster.combatant_mut(id)
    }

    /// Create a level 1 party member using the session's action catalog
    pub fn create_party_member(
        &mut self,
        name: impl Into<String>,
        attributes: AttributeSet,
    ) -> Result<CombatantId> {
        let member = Combatant::new_party(name, attributes, Arc::clone(&self.catalog));
        self.add_party_member(member)
    }

    /// Add an existing party member to the roster
    ///
    /// The roster belongs to the caller only between encounters.
    pub fn add_party_member(&mut self, member: Combatant) -> Result<CombatantId> {
        if self.encounter.is_active() {
            return Err(EngineError::EncounterAlreadyActive);
        }
        if !member.is_party() {
            return Err(EngineError::InvalidArgument(format!(
                "{} is not a party member",
                member.name
            )));
        }
        if self.roster.combatant(member.id).is_some() {
            return Err(EngineError::InvalidArgument(format!(
                "{} is already in the roster",
                member.name
            )));
        }

        let id = member.id;
        tracing::debug!("{} joins the roster", member.name);
        self.roster.push(member);
        Ok(id)
    }

    /// Roster members not sitting out a cooldown
    pub fn available_party(&self) -> Vec<&Combatant> {
        self.roster.iter().filter(|c| c.is_available()).collect()
    }

    /// Begin a new encounter
    ///
    /// Fails without changing anything if an encounter is already running
    /// or a party id is not in the roster.
    pub fn start_encounter(
        &mut self,
        party: &[CombatantId],
        enemies: Vec<Combatant>,
        rewards: Vec<Reward>,
        simulated: bool,
    ) -> Result<EncounterIndex> {
        if self.encounter.is_active() {
            return Err(EngineError::EncounterAlreadyActive);
        }
        self.check_party(party)?;
        if let Some(stray) = enemies.iter().find(|e| e.team != Team::Enemy) {
            return Err(EngineError::InvalidArgument(format!("{} is not an enemy", stray.name)));
        }

        self.encounter.index += 1;
        self.encounter.party = party.to_vec();
        self.encounter.enemies = enemies;
        self.encounter.rewards = rewards;
        self.encounter.is_simulated = simulated;
        self.encounter.phase = EncounterPhase::Active;

        tracing::info!(
            "Encounter {} started: {} party members vs {} enemies",
            self.encounter.index,
            self.encounter.party.len(),
            self.encounter.enemies.len()
        );
        Ok(self.encounter.index)
    }

    /// Begin an encounter drawn from `encounters`
    ///
    /// Enemies are generated at the party's average level, rounded up.
    pub fn start_generated_encounter<R: Rng + ?Sized>(
        &mut self,
        party: &[CombatantId],
        encounters: &EncounterCatalog,
        types: &EnemyTypeList,
        simulated: bool,
        rng: &mut R,
    ) -> Result<EncounterIndex> {
        if self.encounter.is_active() {
            return Err(EngineError::EncounterAlreadyActive);
        }
        self.check_party(party)?;

        let next = self.encounter.index + 1;
        let set = encounters
            .choose(next, rng)
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!(
                    "no encounter set available for encounter {}",
                    next
                ))
            })?;

        let level = self.average_level(party).ceil().max(1.0) as u32;
        let enemies = generate_enemies(set, types, level, &self.catalog, rng)?;
        self.start_encounter(party, enemies, set.rewards.clone(), simulated)
    }

    /// Party members first, in encounter order, then enemies
    pub fn participants(&self) -> Vec<&Combatant> {
        self.encounter
            .party
            .iter()
            .filter_map(|id| self.roster.combatant(*id))
            .chain(self.encounter.enemies.iter())
            .collect()
    }

    pub fn participant(&self, id: CombatantId) -> Option<&Combatant> {
        if self.encounter.party.contains(&id) {
            self.roster.combatant(id)
        } else {
            self.encounter.enemies.combatant(id)
        }
    }

    /// What the AI would have `actor_id` do right now
    pub fn selected_action<R: Rng + ?Sized>(
        &self,
        actor_id: CombatantId,
        rng: &mut R,
    ) -> Result<ActionSelection> {
        if !self.encounter.is_active() {
            return Err(EngineError::EncounterNotActive);
        }
        let actor = self
            .participant(actor_id)
            .ok_or(EngineError::CombatantNotFound(actor_id))?;

        ai::select_action(actor, &self.participants(), self.config.selection_variance, rng)
    }

    /// Resolve an action between encounter participants
    pub fn take_action<R: Rng + ?Sized>(
        &mut self,
        actor_id: CombatantId,
        action: &Action,
        targets: &[CombatantId],
        ignore_cost: bool,
        rng: &mut R,
    ) -> Result<Vec<ActionOutcome>> {
        if !self.encounter.is_active() {
            return Err(EngineError::EncounterNotActive);
        }

        let mut pool = EncounterPool {
            roster: &mut self.roster,
            party: &self.encounter.party,
            enemies: &mut self.encounter.enemies,
        };
        combat::take_action(&mut pool, actor_id, action, targets, ignore_cost, rng)
    }

    /// Which team has won the active encounter, if any
    ///
    /// A wiped party loses even when every enemy is down too. Without an
    /// active encounter nobody has won.
    pub fn winning_team(&self) -> Team {
        if !self.encounter.is_active() {
            return Team::None;
        }

        let party_down = self
            .encounter
            .party
            .iter()
            .all(|id| self.roster.combatant(*id).map_or(true, |c| !c.is_alive()));
        if party_down {
            return Team::Enemy;
        }

        if self.encounter.enemies.iter().all(|e| !e.is_alive()) {
            return Team::Party;
        }

        Team::None
    }

    fn check_party(&self, party: &[CombatantId]) -> Result<()> {
        for (i, id) in party.iter().enumerate() {
            if self.roster.combatant(*id).is_none() {
                return Err(EngineError::CombatantNotFound(*id));
            }
            if party[..i].contains(id) {
                return Err(EngineError::InvalidArgument(format!("{} listed twice", id)));
            }
        }
        Ok(())
    }

    fn average_level(&self, party: &[CombatantId]) -> f64 {
        let levels: Vec<u32> = party
            .iter()
            .filter_map(|id| self.roster.combatant(*id))
            .map(|c| c.level)
            .collect();
        if levels.is_empty() {
            return 1.0;
        }
        levels.iter().map(|&l| l as f64).sum::<f64>() / levels.len() as f64
    }
}

/// Encounter participants as a lookup pool: party members from the roster,
/// enemies from the encounter
struct EncounterPool<'a> {
    roster: &'a mut [Combatant],
    party: &'a [CombatantId],
    enemies: &'a mut [Combatant],
}

impl CombatantPool for EncounterPool<'_> {
    fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        if self.party.contains(&id) {
            self.roster.combatant(id)
        } else {
            self.enemies.combatant(id)
        }
    }

    fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        if self.party.contains(&id) {
            self.roster.combatant_mut(id)
        } else {
            self.enemies.combatant_mut(id)
        }
    }
}
