//! Encounter data: lifecycle state, rewards and enemy generation

pub mod generation;
pub mod rewards;
pub mod state;

pub use generation::{
    generate_enemies, AppearanceRange, EncounterCatalog, EncounterSet, EnemyCombatantSet,
    EnemyType, EnemyTypeList,
};
pub use rewards::{recruit_level, roll_reward, PartyMemberReward, Reward, RewardType};
pub use state::{EncounterPhase, EncounterState};
