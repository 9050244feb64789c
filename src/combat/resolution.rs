//! Action resolution
//!
//! One action from one actor onto an ordered list of targets. Attacks roll
//! hit, then dodge, then damage per target. Buffs and debuffs change the
//! actor's own attributes and queue the matching undo.

use rand::Rng;

use crate::actions::{Action, ActionEffect, ActionOutcome, HitRates};
use crate::attributes::{AttributeName, AttributeSet};
use crate::combat::constants::{
    AFFINITY_DAMAGE_BONUS, AGILITY_BIAS_SCALE, DAMAGE_JITTER_MAX, DAMAGE_JITTER_MIN,
    DAMAGE_JITTER_OFFSET,
};
use crate::combatant::{Combatant, CombatantPool};
use crate::core::error::{EngineError, Result};
use crate::core::types::CombatantId;

/// Resolve `action` taken by `actor_id` against `targets`
///
/// Returns one outcome per target, in target order. Unless `ignore_cost`,
/// the action's cost is taken from the actor first; pools are not clamped
/// at zero. Fails without changing anything when `targets` is empty or an
/// id is unknown.
pub fn take_action<P, R>(
    pool: &mut P,
    actor_id: CombatantId,
    action: &Action,
    targets: &[CombatantId],
    ignore_cost: bool,
    rng: &mut R,
) -> Result<Vec<ActionOutcome>>
where
    P: CombatantPool + ?Sized,
    R: Rng + ?Sized,
{
    if targets.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{} needs at least one target",
            action.name
        )));
    }
    for &id in std::iter::once(&actor_id).chain(targets) {
        if pool.combatant(id).is_none() {
            return Err(EngineError::CombatantNotFound(id));
        }
    }

    let actor = pool
        .combatant_mut(actor_id)
        .ok_or(EngineError::CombatantNotFound(actor_id))?;
    if !ignore_cost {
        if let Some(cost) = action.cost {
            *actor.pool_mut(cost.pool) -= cost.value;
        }
    }
    let actor_name = actor.name.clone();

    let mut outcomes = Vec::with_capacity(targets.len());
    for &target_id in targets {
        let outcome = match &action.effect {
            ActionEffect::Attack { damage, rates } => {
                let attacker = pool
                    .combatant(actor_id)
                    .map(|a| a.attributes)
                    .ok_or(EngineError::CombatantNotFound(actor_id))?;
                let target = pool
                    .combatant_mut(target_id)
                    .ok_or(EngineError::CombatantNotFound(target_id))?;
                resolve_attack(&attacker, &action.affinities, *damage, rates, target, rng)
            }
            // Buffs and debuffs land on the actor, whoever the target is
            ActionEffect::Buff { attributes } | ActionEffect::Debuff { attributes } => {
                let actor = pool
                    .combatant_mut(actor_id)
                    .ok_or(EngineError::CombatantNotFound(actor_id))?;
                actor.apply_temporary_effect(&action.name, attributes);
                ActionOutcome::Success
            }
        };
        outcomes.push(outcome);
    }

    tracing::debug!("{} used {}: {:?}", actor_name, action.name, outcomes);
    Ok(outcomes)
}

/// Roll one attack against one target, applying any damage
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &AttributeSet,
    affinities: &[AttributeName],
    damage: u32,
    rates: &HitRates,
    target: &mut Combatant,
    rng: &mut R,
) -> ActionOutcome {
    // Roll for hit
    let roll: f64 = rng.gen();
    if roll > rates.hit {
        return ActionOutcome::Miss;
    }

    // Roll for dodge, shifted by relative agility
    let roll: f64 = rng.gen();
    let bias = dodge_bias(attacker.agl.value, target.attributes.agl.value, rates.dodge);
    if roll + bias < rates.dodge {
        return ActionOutcome::Dodge;
    }

    let dealt = roll_damage(attacker, affinities, damage, &target.attributes, rng);
    target.hp = (target.hp - dealt).max(0);
    ActionOutcome::Success
}

/// Shift applied to the dodge roll
///
/// Approaches `±(1 - dodge_rate)` as the agility gap grows; a faster
/// attacker pushes the roll up (harder to dodge), a slower one pulls it down.
pub fn dodge_bias(attacker_agility: i64, target_agility: i64, dodge_rate: f64) -> f64 {
    let diff = (attacker_agility - target_agility) as f64;
    let sign = if diff > 0.0 {
        1.0
    } else if diff < 0.0 {
        -1.0
    } else {
        0.0
    };
    let max_change = 1.0 - dodge_rate;
    (max_change - max_change / ((diff / AGILITY_BIAS_SCALE).abs() + 1.0)) * sign
}

/// Damage dealt by a landed attack, before it is subtracted from HP
pub fn roll_damage<R: Rng + ?Sized>(
    attacker: &AttributeSet,
    affinities: &[AttributeName],
    damage: u32,
    defender: &AttributeSet,
    rng: &mut R,
) -> i64 {
    let primary = affinities.first().copied().unwrap_or(AttributeName::Phy);

    // Base damage is our primary attribute over the target's endurance
    let mut base = damage as f64 * (attacker.value(primary) - defender.end.value).max(1) as f64;

    let jitter = (rng.gen::<f64>() + DAMAGE_JITTER_OFFSET)
        .clamp(DAMAGE_JITTER_MIN, DAMAGE_JITTER_MAX);
    base *= jitter;

    // Each affinity counts for less than the one before it
    for (i, &affinity) in affinities.iter().enumerate() {
        let weight = 1.0 / (i + 1) as f64;
        base *= 1.0 + weight * attacker.value(affinity) as f64 * AFFINITY_DAMAGE_BONUS;
    }

    base.ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionCatalog, CostPool};
    use crate::attributes::AttributeValues;
    use rand::rngs::mock::StepRng;
    use std::sync::Arc;

    /// An rng whose every f64 roll is `p`
    fn fixed_roll(p: f64) -> StepRng {
        StepRng::new(((p * (1u64 << 53) as f64) as u64) << 11, 0)
    }

    fn fighters(attacker: [i64; 6], defender: [i64; 6]) -> Vec<Combatant> {
        let catalog = Arc::new(ActionCatalog::new());
        vec![
            Combatant::new_party("Hero", AttributeSet::from_raw(attacker), catalog.clone()),
            Combatant::new_enemy("dummy", "Dummy", AttributeSet::from_raw(defender), catalog),
        ]
    }

    fn sure_hit() -> HitRates {
        HitRates { hit: 1.0, dodge: 0.0 }
    }

    #[test]
    fn test_fixed_roll_helper() {
        let mut rng = fixed_roll(0.2);
        let roll: f64 = rng.gen();
        assert!((roll - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_attack_deals_exact_damage_with_low_rolls() {
        let mut pool = fighters([10, 0, 0, 0, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let attack = Action::attack("Strike", AttributeName::Phy, 5, sure_hit());
        let mut rng = fixed_roll(0.0);

        let outcomes = take_action(&mut pool, hero, &attack, &[dummy], false, &mut rng).unwrap();

        // 5 * 10 = 50, jitter clamps to 0.9 -> 45, phy bonus 1.5 -> 67.5 -> 68
        assert_eq!(outcomes, vec![ActionOutcome::Success]);
        assert_eq!(pool[1].hp, 100 - 68);
    }

    #[test]
    fn test_endurance_reduces_base_but_never_below_one() {
        let attacker = AttributeSet::from_raw([2, 0, 0, 0, 0, 0]);
        let defender = AttributeSet::from_raw([0, 0, 9, 0, 0, 0]);
        let mut rng = fixed_roll(0.6);

        // jitter clamps to 1.1: 3 * 1 * 1.1 * 1.1 = 3.63 -> 4
        let dealt = roll_damage(&attacker, &[AttributeName::Phy], 3, &defender, &mut rng);
        assert_eq!(dealt, 4);
    }

    #[test]
    fn test_secondary_affinities_weigh_less() {
        let attacker = AttributeSet::from_raw([0, 0, 0, 10, 0, 10]);
        let defender = AttributeSet::default();
        let mut rng = fixed_roll(0.5);

        // 1 * 10 * 1.0 * (1 + 10 * 0.05) * (1 + 0.5 * 10 * 0.05) = 18.75 -> 19
        let dealt = roll_damage(
            &attacker,
            &[AttributeName::Agl, AttributeName::Lck],
            1,
            &defender,
            &mut rng,
        );
        assert_eq!(dealt, 19);
    }

    #[test]
    fn test_high_roll_misses() {
        let mut pool = fighters([10, 0, 0, 0, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let attack = Action::attack(
            "Wild Swing",
            AttributeName::Phy,
            5,
            HitRates { hit: 0.5, dodge: 0.0 },
        );
        let mut rng = fixed_roll(0.9);

        let outcomes = take_action(&mut pool, hero, &attack, &[dummy], false, &mut rng).unwrap();

        assert_eq!(outcomes, vec![ActionOutcome::Miss]);
        assert_eq!(pool[1].hp, 100);
    }

    #[test]
    fn test_agility_advantage_prevents_dodge() {
        let rates = HitRates { hit: 1.0, dodge: 0.5 };
        let attack = Action::attack("Jab", AttributeName::Phy, 1, rates);

        // Even agility: roll 0.2 < 0.5 dodges
        let mut pool = fighters([1, 0, 0, 0, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let outcomes =
            take_action(&mut pool, hero, &attack, &[dummy], false, &mut fixed_roll(0.2)).unwrap();
        assert_eq!(outcomes, vec![ActionOutcome::Dodge]);

        // 30 more agility adds 0.5 - 0.5 / 3 to the roll
        let mut pool = fighters([1, 0, 0, 30, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let outcomes =
            take_action(&mut pool, hero, &attack, &[dummy], false, &mut fixed_roll(0.2)).unwrap();
        assert_eq!(outcomes, vec![ActionOutcome::Success]);
    }

    #[test]
    fn test_dodge_bias_shape() {
        assert_eq!(dodge_bias(5, 5, 0.1), 0.0);
        assert!((dodge_bias(15, 0, 0.0) - 0.5).abs() < 1e-9);
        assert!((dodge_bias(0, 15, 0.0) + 0.5).abs() < 1e-9);
        assert!(dodge_bias(1000, 0, 0.2) < 0.8);
    }

    #[test]
    fn test_cost_is_not_clamped() {
        let mut pool = fighters([1, 0, 0, 0, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let attack = Action::attack("Overdraw", AttributeName::Phy, 1, sure_hit())
            .with_cost(CostPool::Mp, 25);

        take_action(&mut pool, hero, &attack, &[dummy], false, &mut fixed_roll(0.0)).unwrap();
        assert_eq!(pool[0].mp, 10 - 25);

        take_action(&mut pool, hero, &attack, &[dummy], true, &mut fixed_roll(0.0)).unwrap();
        assert_eq!(pool[0].mp, -15);
    }

    #[test]
    fn test_buff_lands_on_actor_once_per_target() {
        let mut pool = fighters([2, 0, 0, 0, 0, 0], [0; 6]);
        let (hero, dummy) = (pool[0].id, pool[1].id);
        let buff = Action::buff("Focus", AttributeValues::new().with(AttributeName::Phy, 3));

        let outcomes = take_action(
            &mut pool,
            hero,
            &buff,
            &[dummy, hero],
            false,
            &mut fixed_roll(0.0),
        )
        .unwrap();

        assert_eq!(outcomes, vec![ActionOutcome::Success, ActionOutcome::Success]);
        assert_eq!(pool[0].attributes.phy.value, 8);
        assert_eq!(pool[0].pending_effects.len(), 2);
        assert_eq!(pool[1].attributes.phy.value, 0);
        assert!(pool[1].pending_effects.is_empty());
    }

    #[test]
    fn test_outcomes_align_with_targets() {
        let catalog = Arc::new(ActionCatalog::new());
        let mut pool = fighters([10, 0, 0, 0, 0, 0], [0; 6]);
        pool.push(Combatant::new_enemy("dummy", "Dummy 2", AttributeSet::default(), catalog));
        let ids: Vec<CombatantId> = pool.iter().map(|c| c.id).collect();
        let attack = Action::attack("Sweep", AttributeName::Phy, 1, sure_hit());

        let outcomes = take_action(
            &mut pool,
            ids[0],
            &attack,
            &ids[1..],
            false,
            &mut fixed_roll(0.0),
        )
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(pool[1].hp < 100 && pool[2].hp < 100);
    }

    #[test]
    fn test_empty_targets_rejected_without_paying() {
        let mut pool = fighters([1, 0, 0, 0, 0, 0], [0; 6]);
        let hero = pool[0].id;
        let attack =
            Action::attack("Jab", AttributeName::Phy, 1, sure_hit()).with_cost(CostPool::Hp, 5);

        let result = take_action(&mut pool, hero, &attack, &[], false, &mut fixed_roll(0.0));

        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
        assert_eq!(pool[0].hp, pool[0].max_hp);
    }

    #[test]
    fn test_unknown_target_rejected_without_paying() {
        let mut pool = fighters([1, 0, 0, 0, 0, 0], [0; 6]);
        let hero = pool[0].id;
        let ghost = CombatantId::new();
        let attack =
            Action::attack("Jab", AttributeName::Phy, 1, sure_hit()).with_cost(CostPool::Mp, 5);

        let result = take_action(&mut pool, hero, &attack, &[ghost], false, &mut fixed_roll(0.0));

        assert_eq!(result, Err(EngineError::CombatantNotFound(ghost)));
        assert_eq!(pool[0].mp, 10);
    }
}
