use thiserror::Error;

use crate::core::types::CombatantId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("An encounter is already active")]
    EncounterAlreadyActive,

    #[error("No encounter is active")]
    EncounterNotActive,

    #[error("Combatant {0:?} has no legal action")]
    NoLegalAction(CombatantId),

    #[error("Combatant not found: {0:?}")]
    CombatantNotFound(CombatantId),

    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("Unknown enemy type: {0}")]
    UnknownEnemyType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
