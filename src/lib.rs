//! Encounter Engine - turn-based party vs enemy combat
//!
//! Resolves attacks, buffs and debuffs, drives AI-controlled combatants,
//! grows and levels characters and settles finished encounters.

pub mod actions;
pub mod ai;
pub mod attributes;
pub mod combat;
pub mod combatant;
pub mod core;
pub mod data;
pub mod encounter;
pub mod session;

pub use crate::actions::{Action, ActionCatalog, ActionOutcome, ActionSelection};
pub use crate::combatant::Combatant;
pub use crate::core::{CombatantId, EngineConfig, EngineError, Result, Team};
pub use crate::session::GameSession;
