//! How good an action is for a given actor, independent of its targets

use crate::actions::{Action, ActionEffect};
use crate::attributes::AttributeName;
use crate::combat::constants::RATE_WEIGHT;

/// A legal action paired with its score
#[derive(Debug, Clone, Copy)]
pub struct ScoredAction<'a> {
    pub action: &'a Action,
    pub score: i64,
}

/// Score an action for an actor whose attribute ranking is `ranking`
///
/// Cheaper actions and actions matching the actor's strongest attributes
/// score higher. Attacks also score their expected damage and hit chance.
pub fn score_action(ranking: &[AttributeName], action: &Action) -> i64 {
    let mut score = 0;

    if let Some(cost) = action.cost {
        score -= cost.value;
    }

    for affinity in &action.affinities {
        if let Some(rank) = ranking.iter().position(|name| name == affinity) {
            score += AttributeName::ALL.len() as i64 - rank as i64;
        }
    }

    if let ActionEffect::Attack { damage, rates } = &action.effect {
        let avg = action.execution_count.average();
        score += *damage as i64 * avg;
        score += (rates.hit * RATE_WEIGHT * avg as f64).floor() as i64;
        score -= (rates.dodge * RATE_WEIGHT * avg as f64).floor() as i64;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CostPool, HitRates};
    use crate::attributes::AttributeValues;

    const RANKING: [AttributeName; 3] =
        [AttributeName::Phy, AttributeName::Agl, AttributeName::Mag];

    #[test]
    fn test_basic_attack_score() {
        let attack = Action::attack(
            "Attack",
            AttributeName::Phy,
            5,
            HitRates { hit: 0.95, dodge: 0.05 },
        );
        // 6 for phy at rank 0, 5 damage, floor(4.75), floor(0.25)
        assert_eq!(score_action(&RANKING, &attack), 6 + 5 + 4);
    }

    #[test]
    fn test_multi_execution_and_secondary_affinity() {
        let flurry = Action::attack(
            "Flurry",
            AttributeName::Agl,
            2,
            HitRates { hit: 0.9, dodge: 0.1 },
        )
        .with_affinities(vec![AttributeName::Agl, AttributeName::Phy])
        .with_executions(1, 3)
        .with_cost(CostPool::Mp, 3);
        // avg = floor(1 + 1.5) = 2
        // -3 cost, 5 + 6 affinities, 4 damage, floor(9.0), floor(1.0)
        assert_eq!(score_action(&RANKING, &flurry), -3 + 11 + 4 + 9 - 1);
    }

    #[test]
    fn test_unranked_affinity_scores_nothing() {
        let buff = Action::buff("Ward", AttributeValues::new().with(AttributeName::End, 2))
            .with_affinities(vec![AttributeName::End])
            .with_cost(CostPool::Hp, 4);
        assert_eq!(score_action(&RANKING, &buff), -4);
        assert_eq!(score_action(&[], &buff), -4);
    }
}
