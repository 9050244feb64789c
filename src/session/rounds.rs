//! Letting the AI play out rounds of an encounter

use rand::Rng;
use serde::Serialize;

use crate::actions::ActionOutcome;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, Team};
use crate::session::GameSession;

/// What one participant did with their turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TurnResult {
    Acted {
        action: String,
        targets: Vec<CombatantId>,
        outcomes: Vec<ActionOutcome>,
    },
    /// Player-controlled; the caller has to act for them
    AwaitingInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub actor: CombatantId,
    pub actor_name: String,
    pub result: TurnResult,
}

/// Every turn taken in a round and who had won when it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundLog {
    pub turns: Vec<TurnRecord>,
    pub winner: Team,
}

impl GameSession {
    /// Give every living participant one turn, party first
    ///
    /// AI-controlled participants pick and take their own action. In a
    /// simulated encounter that covers the whole party too. The round stops
    /// early once a team has won. An AI participant with no legal action
    /// fails the round with `NoLegalAction`; turns already taken stand.
    pub fn simulate_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoundLog> {
        if !self.encounter.is_active() {
            return Err(EngineError::EncounterNotActive);
        }

        let order: Vec<CombatantId> = self.participants().iter().map(|c| c.id).collect();
        let mut turns = Vec::with_capacity(order.len());

        for id in order {
            if self.winning_team() != Team::None {
                break;
            }
            let Some(actor) = self.participant(id) else {
                continue;
            };
            if !actor.is_alive() {
                continue;
            }
            let actor_name = actor.name.clone();

            if !self.encounter.is_simulated && !actor.is_simulated {
                turns.push(TurnRecord {
                    actor: id,
                    actor_name,
                    result: TurnResult::AwaitingInput,
                });
                continue;
            }

            let selection = self.selected_action(id, rng)?;
            let outcomes =
                self.take_action(id, &selection.action, &selection.targets, false, rng)?;

            turns.push(TurnRecord {
                actor: id,
                actor_name,
                result: TurnResult::Acted {
                    action: selection.action.name,
                    targets: selection.targets,
                    outcomes,
                },
            });
        }

        Ok(RoundLog {
            turns,
            winner: self.winning_team(),
        })
    }
}
