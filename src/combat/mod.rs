pub mod constants;
pub mod resolution;

pub use resolution::{dodge_bias, resolve_attack, roll_damage, take_action};
