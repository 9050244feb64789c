//! Results of resolving and selecting actions

use serde::{Deserialize, Serialize};

use crate::actions::catalog::Action;
use crate::core::types::CombatantId;

/// Per-target result of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOutcome {
    Success,
    Miss,
    Dodge,
}

/// An action paired with the targets it should be used on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSelection {
    pub action: Action,
    pub targets: Vec<CombatantId>,
}
