pub mod catalog;
pub mod outcome;

pub use catalog::{
    Action, ActionCatalog, ActionCost, ActionEffect, ActionType, CostPool, ExecutionCount,
    HitRates, TargetType,
};
pub use outcome::{ActionOutcome, ActionSelection};
