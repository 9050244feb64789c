//! Enemy archetypes, encounter sets and enemy generation
//!
//! Loaded from TOML the same way as the action catalog: a raw file shape is
//! deserialized first and then checked before it becomes a catalog.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::actions::ActionCatalog;
use crate::attributes::{AttributeSet, AttributeValues};
use crate::combatant::Combatant;
use crate::core::error::{EngineError, Result};
use crate::core::types::EncounterIndex;
use crate::data::{LoadError, DEFAULT_ENCOUNTERS, DEFAULT_ENEMY_TYPES};
use crate::encounter::rewards::Reward;

/// Enemy archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeValues,
}

/// Enemy archetypes keyed by type id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyTypeList {
    types: AHashMap<String, EnemyType>,
}

impl EnemyTypeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archetypes shipped in `data/enemies.toml`
    pub fn with_defaults() -> std::result::Result<Self, LoadError> {
        Self::parse_toml(DEFAULT_ENEMY_TYPES)
    }

    pub fn insert(&mut self, id: impl Into<String>, enemy_type: EnemyType) {
        self.types.insert(id.into(), enemy_type);
    }

    pub fn get(&self, id: &str) -> Option<&EnemyType> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn load_from_toml(path: &Path) -> std::result::Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> std::result::Result<Self, LoadError> {
        let list: Self = toml::from_str(content)?;
        for (id, enemy_type) in &list.types {
            if enemy_type.name.trim().is_empty() {
                return Err(LoadError::InvalidDefinition(format!("enemy type {} has no name", id)));
            }
        }
        Ok(list)
    }
}

/// A group of enemies of one type, possibly with a unique name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyCombatantSet {
    /// Enemy type id
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub min: u32,
    pub max: u32,
}

/// Inclusive range of encounter indices; a missing end is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceRange {
    #[serde(default)]
    pub min: Option<EncounterIndex>,
    #[serde(default)]
    pub max: Option<EncounterIndex>,
}

impl AppearanceRange {
    pub fn contains(&self, index: EncounterIndex) -> bool {
        self.min.map_or(true, |min| index >= min) && self.max.map_or(true, |max| index <= max)
    }
}

/// Enemies that appear together, when they may appear and what beating
/// them may yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSet {
    #[serde(default)]
    pub ranges: Vec<AppearanceRange>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    pub enemies: Vec<EnemyCombatantSet>,
}

impl EncounterSet {
    /// May this set appear as encounter number `index`? A set without
    /// ranges always may.
    pub fn is_available(&self, index: EncounterIndex) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(index))
    }

    fn validate(&self, position: usize) -> std::result::Result<(), LoadError> {
        let invalid = |reason: String| {
            LoadError::InvalidDefinition(format!("encounter set {}: {}", position, reason))
        };

        if self.enemies.is_empty() {
            return Err(invalid("no enemies".to_string()));
        }
        for group in &self.enemies {
            if group.min > group.max {
                return Err(invalid(format!("{} min exceeds max", group.kind)));
            }
        }
        for range in &self.ranges {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(invalid(format!("range {}..={} is empty", min, max)));
                }
            }
        }
        for reward in &self.rewards {
            if !(0.0..=1.0).contains(&reward.chance) {
                return Err(invalid(format!("reward chance {} outside [0, 1]", reward.chance)));
            }
        }
        Ok(())
    }
}

/// All encounter sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterCatalog {
    sets: Vec<EncounterSet>,
}

impl EncounterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets shipped in `data/encounters.toml`
    pub fn with_defaults() -> std::result::Result<Self, LoadError> {
        Self::parse_toml(DEFAULT_ENCOUNTERS)
    }

    pub fn from_sets(sets: Vec<EncounterSet>) -> Self {
        Self { sets }
    }

    pub fn add(&mut self, set: EncounterSet) {
        self.sets.push(set);
    }

    pub fn all(&self) -> &[EncounterSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Sets that may appear as encounter number `index`
    pub fn available(&self, index: EncounterIndex) -> Vec<&EncounterSet> {
        self.sets.iter().filter(|s| s.is_available(index)).collect()
    }

    /// Pick one available set uniformly at random
    pub fn choose<R: Rng + ?Sized>(
        &self,
        index: EncounterIndex,
        rng: &mut R,
    ) -> Option<&EncounterSet> {
        self.available(index).choose(rng).copied()
    }

    /// Check that every referenced enemy type exists
    pub fn check_types(&self, types: &EnemyTypeList) -> std::result::Result<(), LoadError> {
        for group in self.sets.iter().flat_map(|s| &s.enemies) {
            if !types.contains(&group.kind) {
                return Err(LoadError::InvalidDefinition(format!(
                    "unknown enemy type {}",
                    group.kind
                )));
            }
        }
        Ok(())
    }

    pub fn load_from_toml(path: &Path) -> std::result::Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> std::result::Result<Self, LoadError> {
        let toml_data: TomlEncounters = toml::from_str(content)?;

        let mut catalog = Self::new();
        for (position, set) in toml_data.sets.into_iter().enumerate() {
            set.validate(position)?;
            catalog.add(set);
        }
        Ok(catalog)
    }
}

/// TOML representation of the encounters file
#[derive(Debug, Deserialize)]
struct TomlEncounters {
    sets: Vec<EncounterSet>,
}

/// Create the enemies of an encounter set at `level`
///
/// Each group spawns between `min` and `max` enemies (inclusive). Groups of
/// more than one get numbered names. Fails before rolling anything if the
/// set refers to an unknown type.
pub fn generate_enemies<R: Rng + ?Sized>(
    set: &EncounterSet,
    types: &EnemyTypeList,
    level: u32,
    catalog: &Arc<ActionCatalog>,
    rng: &mut R,
) -> Result<Vec<Combatant>> {
    let mut groups = Vec::with_capacity(set.enemies.len());
    for group in &set.enemies {
        let enemy_type = types
            .get(&group.kind)
            .ok_or_else(|| EngineError::UnknownEnemyType(group.kind.clone()))?;
        if group.min > group.max {
            return Err(EngineError::InvalidArgument(format!(
                "{} group min {} exceeds max {}",
                group.kind, group.min, group.max
            )));
        }
        groups.push((group, enemy_type));
    }

    let mut enemies = Vec::new();
    for (group, enemy_type) in groups {
        let count = rng.gen_range(group.min..=group.max);
        let base_name = group.name.as_deref().unwrap_or(&enemy_type.name);

        for i in 0..count {
            let name = if count > 1 {
                format!("{} {}", base_name, i + 1)
            } else {
                base_name.to_string()
            };
            let enemy = Combatant::new_enemy(
                group.kind.clone(),
                name,
                AttributeSet::from_values(&enemy_type.attributes),
                Arc::clone(catalog),
            )
            .with_level(level, rng);
            enemies.push(enemy);
        }
    }

    tracing::debug!("Generated {} enemies at level {}", enemies.len(), level);
    Ok(enemies)
}
