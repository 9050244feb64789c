//! Encounter rewards and how they are rolled

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeValues;
use crate::combat::constants::{RECRUIT_LEVEL_MAX, RECRUIT_LEVEL_MIN, RECRUIT_LEVEL_OFFSET};

/// Kind of reward an encounter can yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardType {
    PartyMember,
}

/// A new party member joining the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMemberReward {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeValues,
}

/// A possible reward for winning an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Probability in `[0, 1]` before the luck bonus
    pub chance: f64,
    #[serde(rename = "type")]
    pub kind: RewardType,
    pub value: PartyMemberReward,
}

impl Reward {
    pub fn party_member(chance: f64, name: impl Into<String>, attributes: AttributeValues) -> Self {
        Self {
            chance,
            kind: RewardType::PartyMember,
            value: PartyMemberReward {
                name: name.into(),
                attributes,
            },
        }
    }
}

/// Roll rewards in order and return the first one granted
///
/// Each reward gets its own roll of `U(0, 1) + luck_bonus * luck` and is
/// granted when the roll exceeds `1 - chance`. At most one reward is
/// granted.
pub fn roll_reward<'a, R: Rng + ?Sized>(
    rewards: &'a [Reward],
    luck: i64,
    luck_bonus: f64,
    rng: &mut R,
) -> Option<&'a Reward> {
    rewards.iter().find(|reward| {
        let roll = rng.gen::<f64>() + luck_bonus * luck as f64;
        roll > 1.0 - reward.chance
    })
}

/// Level of a recruited member: `ceil(avg * clamp(U + 0.5, 0.5, 1.5))`
pub fn recruit_level<R: Rng + ?Sized>(average_level: f64, rng: &mut R) -> u32 {
    let factor = (rng.gen::<f64>() + RECRUIT_LEVEL_OFFSET)
        .clamp(RECRUIT_LEVEL_MIN, RECRUIT_LEVEL_MAX);
    ((average_level * factor).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeName;
    use rand::rngs::mock::StepRng;

    fn fixed_roll(p: f64) -> StepRng {
        StepRng::new(((p * (1u64 << 53) as f64) as u64) << 11, 0)
    }

    fn rewards() -> Vec<Reward> {
        vec![
            Reward::party_member(0.2, "Squire", AttributeValues::new().with(AttributeName::Phy, 2)),
            Reward::party_member(
                0.5,
                "Scholar",
                AttributeValues::new().with(AttributeName::Mag, 2),
            ),
        ]
    }

    #[test]
    fn test_first_passing_reward_wins() {
        let rewards = rewards();

        let granted = roll_reward(&rewards, 0, 0.05, &mut fixed_roll(0.6));
        assert_eq!(granted.map(|r| r.value.name.as_str()), Some("Scholar"));

        let granted = roll_reward(&rewards, 0, 0.05, &mut fixed_roll(0.9));
        assert_eq!(granted.map(|r| r.value.name.as_str()), Some("Squire"));
    }

    #[test]
    fn test_luck_tips_the_roll() {
        let rewards = rewards();

        assert!(roll_reward(&rewards, 0, 0.05, &mut fixed_roll(0.4)).is_none());
        let granted = roll_reward(&rewards, 4, 0.05, &mut fixed_roll(0.4));
        assert_eq!(granted.map(|r| r.value.name.as_str()), Some("Scholar"));
    }

    #[test]
    fn test_no_rewards() {
        assert!(roll_reward(&[], 10, 0.05, &mut fixed_roll(0.99)).is_none());
    }

    #[test]
    fn test_recruit_level_bounds() {
        assert_eq!(recruit_level(2.0, &mut fixed_roll(0.0)), 1);
        assert_eq!(recruit_level(2.0, &mut fixed_roll(0.5)), 2);
        assert_eq!(recruit_level(2.0, &mut fixed_roll(0.99)), 3);
        assert_eq!(recruit_level(1.0, &mut fixed_roll(0.0)), 1);
    }

    #[test]
    fn test_reward_toml_shape() {
        let reward: Reward = toml::from_str(
            r#"
            chance = 0.35
            type = "PartyMember"
            value = { name = "Wandering Scholar", attributes = { mag = 4, lck = 1 } }
            "#,
        )
        .unwrap();

        assert_eq!(reward.kind, RewardType::PartyMember);
        assert_eq!(reward.value.attributes.get(AttributeName::Mag), Some(4));
    }
}
