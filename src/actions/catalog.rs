//! Action definitions and catalog
//!
//! Actions are declarative data shared by every combatant that can use
//! them. The catalog is loaded from TOML and handed to combatants behind an
//! `Arc`, never copied per instance.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::attributes::{AttributeName, AttributeValues};
use crate::data::{LoadError, DEFAULT_ACTIONS};

/// Kind of action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Attack,
    Buff,
    Debuff,
}

impl ActionType {
    /// Does this action harm whoever it lands on?
    pub fn is_hostile(&self) -> bool {
        matches!(self, ActionType::Attack | ActionType::Debuff)
    }
}

/// Who an action may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "Self")]
    SelfTarget,
    Single,
    All,
}

impl TargetType {
    /// Can an action of this target type be used on an option of `option` type?
    ///
    /// Single-target actions may also be aimed at the actor itself.
    pub fn accepts(&self, option: TargetType) -> bool {
        *self == option || (*self == TargetType::Single && option == TargetType::SelfTarget)
    }
}

/// Resource pool an action draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostPool {
    Hp,
    Mp,
}

/// Price paid by the actor when the action is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCost {
    pub pool: CostPool,
    pub value: i64,
}

/// How many times an action is expected to land per use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCount {
    pub min: u32,
    pub max: u32,
}

impl Default for ExecutionCount {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

impl ExecutionCount {
    /// Expected executions used by AI scoring: `floor(min + max / 2)`
    pub fn average(&self) -> i64 {
        (self.min as f64 + self.max as f64 / 2.0).floor() as i64
    }
}

/// Hit and dodge probabilities of an attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRates {
    pub hit: f64,
    pub dodge: f64,
}

/// Variant-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEffect {
    Attack { damage: u32, rates: HitRates },
    Buff { attributes: AttributeValues },
    Debuff { attributes: AttributeValues },
}

/// An action a combatant can take during an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub description: String,
    pub target_type: TargetType,
    /// Most significant first
    pub affinities: Vec<AttributeName>,
    pub cost: Option<ActionCost>,
    pub execution_count: ExecutionCount,
    pub effect: ActionEffect,
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self.effect {
            ActionEffect::Attack { .. } => ActionType::Attack,
            ActionEffect::Buff { .. } => ActionType::Buff,
            ActionEffect::Debuff { .. } => ActionType::Debuff,
        }
    }

    /// Simple single-target attack, mostly useful for tests and tooling
    pub fn attack(
        name: impl Into<String>,
        affinity: AttributeName,
        damage: u32,
        rates: HitRates,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            target_type: TargetType::Single,
            affinities: vec![affinity],
            cost: None,
            execution_count: ExecutionCount::default(),
            effect: ActionEffect::Attack { damage, rates },
        }
    }

    /// Self-targeted buff
    pub fn buff(name: impl Into<String>, attributes: AttributeValues) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            target_type: TargetType::SelfTarget,
            affinities: Vec::new(),
            cost: None,
            execution_count: ExecutionCount::default(),
            effect: ActionEffect::Buff { attributes },
        }
    }

    pub fn with_cost(mut self, pool: CostPool, value: i64) -> Self {
        self.cost = Some(ActionCost { pool, value });
        self
    }

    pub fn with_target(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    pub fn with_affinities(mut self, affinities: Vec<AttributeName>) -> Self {
        self.affinities = affinities;
        self
    }

    pub fn with_executions(mut self, min: u32, max: u32) -> Self {
        self.execution_count = ExecutionCount { min, max };
        self
    }
}

/// Catalog of all defined actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCatalog {
    actions: Vec<Action>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog shipped in `data/actions.toml`
    pub fn with_defaults() -> Result<Self, LoadError> {
        Self::parse_toml(DEFAULT_ACTIONS)
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Add an action to the catalog
    pub fn add(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Get an action by name
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Get all actions
    pub fn all(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Load actions from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse actions from TOML string
    pub fn parse_toml(content: &str) -> Result<Self, LoadError> {
        let toml_data: TomlActions = toml::from_str(content)?;

        let mut catalog = Self::new();
        for action in toml_data.actions {
            catalog.add(action.into_action()?);
        }
        Ok(catalog)
    }
}

/// TOML representation of the actions file
#[derive(Debug, Deserialize)]
struct TomlActions {
    actions: Vec<TomlAction>,
}

/// TOML representation of a single action
#[derive(Debug, Deserialize)]
struct TomlAction {
    name: String,
    #[serde(rename = "type")]
    kind: ActionType,
    target: TargetType,
    #[serde(default)]
    description: String,
    #[serde(default)]
    affinities: Vec<AttributeName>,
    cost: Option<ActionCost>,
    #[serde(default)]
    execution: ExecutionCount,
    damage: Option<u32>,
    rates: Option<HitRates>,
    attributes: Option<AttributeValues>,
}

impl TomlAction {
    fn into_action(self) -> Result<Action, LoadError> {
        let invalid =
            |reason: &str| LoadError::InvalidDefinition(format!("{}: {}", self.name, reason));

        if self.execution.min > self.execution.max {
            return Err(invalid("execution min exceeds max"));
        }
        if let Some(cost) = &self.cost {
            if cost.value < 0 {
                return Err(invalid("cost must not be negative"));
            }
        }

        let effect = match self.kind {
            ActionType::Attack => {
                let damage = self.damage.ok_or_else(|| invalid("attack needs damage"))?;
                let rates = self.rates.ok_or_else(|| invalid("attack needs rates"))?;
                if !(0.0..=1.0).contains(&rates.hit) || !(0.0..=1.0).contains(&rates.dodge) {
                    return Err(invalid("rates must be within [0, 1]"));
                }
                if self.affinities.is_empty() {
                    return Err(invalid("attack needs at least one affinity"));
                }
                ActionEffect::Attack { damage, rates }
            }
            ActionType::Buff | ActionType::Debuff => {
                let attributes = self
                    .attributes
                    .clone()
                    .ok_or_else(|| invalid("buffs and debuffs need attributes"))?;
                if self.kind == ActionType::Buff {
                    ActionEffect::Buff { attributes }
                } else {
                    ActionEffect::Debuff { attributes }
                }
            }
        };

        Ok(Action {
            name: self.name,
            description: self.description,
            target_type: self.target,
            affinities: self.affinities,
            cost: self.cost,
            execution_count: self.execution,
            effect,
        })
    }
}
