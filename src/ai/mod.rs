//! Action selection for AI-controlled combatants
//!
//! Every living combatant, and every team as a whole, is a possible target
//! option with a weight. Each option is paired with the best legal action
//! for it, and the option with the highest combined weight wins, with some
//! randomness so the AI is not perfectly optimal.

pub mod options;
pub mod scoring;
pub mod selection;

pub use options::{build_target_options, is_legal, TargetOption};
pub use scoring::{score_action, ScoredAction};
pub use selection::select_action;
