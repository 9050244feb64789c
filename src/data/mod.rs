//! Static game data shipped with the engine and the errors raised while
//! loading it

use thiserror::Error;

/// Default action catalog
pub const DEFAULT_ACTIONS: &str = include_str!("../../data/actions.toml");

/// Default enemy archetypes
pub const DEFAULT_ENEMY_TYPES: &str = include_str!("../../data/enemies.toml");

/// Default encounter sets
pub const DEFAULT_ENCOUNTERS: &str = include_str!("../../data/encounters.toml");

/// Errors that can occur when loading data files
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A definition parsed but breaks an engine rule
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
}
