//! Target options and which actions may be used on them

use crate::actions::{Action, ActionType, TargetType};
use crate::ai::scoring::ScoredAction;
use crate::combat::constants::MISSING_HEALTH_WEIGHT;
use crate::combatant::Combatant;
use crate::core::types::Team;

/// A possible set of targets with its priority weight
#[derive(Debug, Clone)]
pub struct TargetOption<'a> {
    pub target_type: TargetType,
    pub team: Team,
    pub targets: Vec<&'a Combatant>,
    pub weight: i64,
    /// Legal actions for this option, best first
    pub actions: Vec<ScoredAction<'a>>,
}

impl<'a> TargetOption<'a> {
    /// Option weight plus the score of its best action
    pub fn combined_weight(&self) -> Option<i64> {
        self.actions.first().map(|best| self.weight + best.score)
    }
}

/// Priority of a single target from `actor`'s point of view
///
/// Previously buffed or debuffed targets, wounded targets and targets whose
/// endurance is low against the actor's strongest attribute rank higher.
pub fn target_weight(actor: &Combatant, target: &Combatant) -> i64 {
    let mut weight = 0;

    if target.has_pending_effects() {
        weight += 1;
    }

    if target.max_hp > 0 {
        let missing = (target.max_hp - target.hp) as f64 / target.max_hp as f64;
        weight += (missing * MISSING_HEALTH_WEIGHT).floor() as i64;
    }

    if target.id != actor.id {
        weight += actor.attributes.value(actor.primary_affinity()) - target.attributes.end.value;
    }

    weight
}

/// One option per living combatant plus one per team
///
/// Team options carry every living member of the team and the sum of the
/// members' individual weights. Teams with no living members get no option.
pub fn build_target_options<'a>(
    actor: &Combatant,
    combatants: &[&'a Combatant],
) -> Vec<TargetOption<'a>> {
    let mut options: Vec<TargetOption<'a>> = combatants
        .iter()
        .filter(|c| c.is_alive())
        .map(|&c| TargetOption {
            target_type: if c.id == actor.id {
                TargetType::SelfTarget
            } else {
                TargetType::Single
            },
            team: c.team,
            targets: vec![c],
            weight: target_weight(actor, c),
            actions: Vec::new(),
        })
        .collect();

    for team in Team::SIDES {
        let members: Vec<&'a Combatant> = options
            .iter()
            .filter(|o| o.team == team)
            .map(|o| o.targets[0])
            .collect();
        if members.is_empty() {
            continue;
        }
        let weight = options.iter().filter(|o| o.team == team).map(|o| o.weight).sum();
        options.push(TargetOption {
            target_type: TargetType::All,
            team,
            targets: members,
            weight,
            actions: Vec::new(),
        });
    }

    options
}

/// May `actor` use `action` on `option`?
///
/// The target type must fit, the actor must be able to pay, buffs never go
/// to the other side and attacks or debuffs never go to our own.
pub fn is_legal(actor: &Combatant, action: &Action, option: &TargetOption) -> bool {
    if !action.target_type.accepts(option.target_type) {
        return false;
    }

    if !actor.can_afford(action) {
        return false;
    }

    let action_type = action.action_type();
    if option.team != actor.team && action_type == ActionType::Buff {
        return false;
    }
    if option.team == actor.team && action_type.is_hostile() {
        return false;
    }

    true
}
