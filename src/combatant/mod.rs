//! Combatants: party members and enemies
//!
//! A single [`Combatant`] record covers both sides; the variant specific
//! bits live in [`CombatantRole`].

pub mod effects;
pub mod entity;
pub mod growth;
pub mod leveling;
pub mod pool;

pub use effects::PendingEffect;
pub use entity::{Combatant, CombatantRole, EnemyDetails, PartyDetails};
pub use pool::CombatantPool;
