//! Picking the action an AI-controlled combatant takes

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::ActionSelection;
use crate::ai::options::{build_target_options, is_legal, TargetOption};
use crate::ai::scoring::{score_action, ScoredAction};
use crate::combatant::Combatant;
use crate::core::error::{EngineError, Result};

/// Choose an action and its targets for `actor`
///
/// `combatants` is everyone in the encounter, the actor included. Options
/// are shuffled first so ties and rejected upgrades do not always favour
/// the same target. A strictly better option only replaces the current
/// best when a fresh roll exceeds `variance`.
pub fn select_action<R: Rng + ?Sized>(
    actor: &Combatant,
    combatants: &[&Combatant],
    variance: f64,
    rng: &mut R,
) -> Result<ActionSelection> {
    let mut options = build_target_options(actor, combatants);
    options.shuffle(rng);

    let ranking = actor.attribute_affinities();
    for option in &mut options {
        let mut legal: Vec<ScoredAction> = actor
            .actions
            .iter()
            .filter(|action| is_legal(actor, action, option))
            .map(|action| ScoredAction {
                action,
                score: score_action(&ranking, action),
            })
            .collect();
        legal.sort_by(|a, b| b.score.cmp(&a.score));
        option.actions = legal;
    }

    let Some((option, weight)) = pick_option(&options, variance, rng) else {
        tracing::debug!("{} has no legal action", actor.name);
        return Err(EngineError::NoLegalAction(actor.id));
    };
    let chosen = option.actions[0].action;

    tracing::debug!(
        "{} selects {} on {} target(s) (weight {})",
        actor.name,
        chosen.name,
        option.targets.len(),
        weight
    );

    Ok(ActionSelection {
        action: chosen.clone(),
        targets: option.targets.iter().map(|c| c.id).collect(),
    })
}

/// Walk `options` in order, keeping the first one with a legal action
///
/// A later option with a strictly higher combined weight takes over only
/// when a fresh uniform roll exceeds `variance`.
fn pick_option<'o, 'a, R: Rng + ?Sized>(
    options: &'o [TargetOption<'a>],
    variance: f64,
    rng: &mut R,
) -> Option<(&'o TargetOption<'a>, i64)> {
    let mut best: Option<(&TargetOption, i64)> = None;
    for option in options {
        let Some(weight) = option.combined_weight() else {
            continue;
        };
        match best {
            None => best = Some((option, weight)),
            Some((_, best_weight)) if weight > best_weight => {
                if rng.gen::<f64>() > variance {
                    best = Some((option, weight));
                }
            }
            Some(_) => {}
        }
    }
    best
}
