//! Settling a finished encounter
//!
//! Settlement buries the fallen and pays out experience. Members who sat
//! the fight out recover. A surviving party may also be joined by a new
//! recruit.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::attributes::AttributeSet;
use crate::combatant::{Combatant, CombatantPool};
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, EncounterIndex};
use crate::encounter::{recruit_level, roll_reward, EncounterPhase, RewardType};
use crate::session::GameSession;

/// Experience paid to one surviving member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XpAward {
    pub id: CombatantId,
    pub name: String,
    pub xp: u64,
    pub levels_gained: u32,
}

/// What happened when an encounter was settled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub index: EncounterIndex,
    /// Party members removed from the roster
    pub fallen: Vec<CombatantId>,
    pub awards: Vec<XpAward>,
    /// Roster id of a member gained as a reward
    pub recruit: Option<CombatantId>,
}

impl GameSession {
    /// Close the active encounter and apply its consequences
    ///
    /// Fails without changing anything when no encounter is active or an
    /// encounter party member has gone missing from the roster.
    pub fn finish_encounter<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SettlementReport> {
        if !self.encounter.is_active() {
            return Err(EngineError::EncounterNotActive);
        }
        for id in &self.encounter.party {
            if self.roster.combatant(*id).is_none() {
                return Err(EngineError::DataInconsistency(format!(
                    "encounter party member {} is not in the roster",
                    id
                )));
            }
        }
        self.encounter.phase = EncounterPhase::Settling;

        let mut report = SettlementReport {
            index: self.encounter.index,
            ..SettlementReport::default()
        };

        let roster = &self.roster;
        let (fallen, living): (Vec<CombatantId>, Vec<CombatantId>) = self
            .encounter
            .party
            .iter()
            .copied()
            .partition(|id| roster.combatant(*id).is_some_and(|c| !c.is_alive()));
        self.roster.retain(|c| !fallen.contains(&c.id));
        report.fallen = fallen;

        if !living.is_empty() {
            let enemy_total: i64 = self
                .encounter
                .enemies
                .iter()
                .map(|e| e.attributes.total())
                .sum();
            let xp = (self.config.xp_per_enemy_attribute as i64 * enemy_total).max(0) as f64;
            let share = xp / living.len() as f64;

            for id in &living {
                let Some(member) = self.roster.combatant_mut(*id) else {
                    continue;
                };
                let bonus =
                    1.0 + self.config.leadership_xp_bonus * member.attributes.ldr.value as f64;
                let amount = (share * bonus).floor().max(0.0) as u64;
                let levels_gained = member.increase_xp(amount);

                if let Some(details) = member.party_details_mut() {
                    details.encounters_until_available = self.config.encounter_cooldown;
                }
                member.revert_pending_effects();

                report.awards.push(XpAward {
                    id: *id,
                    name: member.name.clone(),
                    xp: amount,
                    levels_gained,
                });
            }
        }

        for member in self.roster.iter_mut().filter(|c| !living.contains(&c.id)) {
            if let Some(details) = member.party_details_mut() {
                details.encounters_until_available =
                    details.encounters_until_available.saturating_sub(1);
            }
            member.hp = regenerate(member.hp, member.max_hp, self.config.hp_regen_rate);
            member.mp = regenerate(member.mp, member.max_mp, self.config.mp_regen_rate);
        }

        if !living.is_empty() {
            report.recruit = self.grant_reward(&living, rng);
        }

        self.encounter.clear();
        tracing::info!(
            "Encounter {} settled: {} fallen, {} survivors{}",
            report.index,
            report.fallen.len(),
            living.len(),
            if report.recruit.is_some() { ", new recruit" } else { "" }
        );
        Ok(report)
    }

    /// Close the active encounter without a winner
    ///
    /// Nobody falls, earns experience or rolls for rewards. The party keeps
    /// its current vitals and cooldowns; only temporary effects are undone.
    pub fn abandon_encounter(&mut self) -> Result<EncounterIndex> {
        if !self.encounter.is_active() {
            return Err(EngineError::EncounterNotActive);
        }
        let index = self.encounter.index;
        for id in &self.encounter.party {
            if let Some(member) = self.roster.combatant_mut(*id) {
                member.revert_pending_effects();
            }
        }

        self.encounter.clear();
        tracing::info!("Encounter {} abandoned", index);
        Ok(index)
    }

    /// Roll the encounter's rewards for the survivors in `living`
    fn grant_reward<R: Rng + ?Sized>(
        &mut self,
        living: &[CombatantId],
        rng: &mut R,
    ) -> Option<CombatantId> {
        let survivors: Vec<&Combatant> = living
            .iter()
            .filter_map(|id| self.roster.combatant(*id))
            .collect();
        if survivors.is_empty() {
            return None;
        }
        let luck = survivors.iter().map(|c| c.attributes.lck.value).max().unwrap_or(0);
        let average_level =
            survivors.iter().map(|c| c.level as f64).sum::<f64>() / survivors.len() as f64;

        let reward =
            roll_reward(&self.encounter.rewards, luck, self.config.luck_reward_bonus, rng)?.clone();
        match reward.kind {
            RewardType::PartyMember => {
                let level = recruit_level(average_level, rng);
                let recruit = Combatant::new_party(
                    reward.value.name,
                    AttributeSet::from_values(&reward.value.attributes),
                    Arc::clone(&self.catalog),
                )
                .with_level(level, rng);

                tracing::info!("{} joins the party at level {}", recruit.name, recruit.level);
                let id = recruit.id;
                self.roster.push(recruit);
                Some(id)
            }
        }
    }
}

/// Recover `rate` of `max`, rounded up, never past `max`
fn regenerate(current: i64, max: i64, rate: f64) -> i64 {
    let recovered = (current as f64 + max as f64 * rate).ceil() as i64;
    recovered.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionCatalog;
    use crate::attributes::{AttributeName, AttributeValues};
    use crate::encounter::Reward;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_roll(p: f64) -> StepRng {
        StepRng::new(((p * (1u64 << 53) as f64) as u64) << 11, 0)
    }

    fn session() -> GameSession {
        GameSession::with_catalog(Arc::new(ActionCatalog::new()))
    }

    fn enemy(session: &GameSession, values: [i64; 6]) -> Combatant {
        Combatant::new_enemy(
            "dummy",
            "Dummy",
            AttributeSet::from_raw(values),
            Arc::clone(session.catalog()),
        )
    }

    #[test]
    fn test_regenerate_rounds_up_and_caps() {
        assert_eq!(regenerate(50, 100, 0.10), 60);
        assert_eq!(regenerate(95, 100, 0.10), 100);
        assert_eq!(regenerate(3, 15, 0.05), 4);
        assert_eq!(regenerate(15, 15, 0.05), 15);
    }

    #[test]
    fn test_finish_without_encounter_fails() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(session.finish_encounter(&mut rng), Err(EngineError::EncounterNotActive));
    }

    #[test]
    fn test_xp_split_with_leadership_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut session = session();
        let leader = session
            .create_party_member("Leader", AttributeSet::from_raw([0, 0, 0, 0, 10, 0]))
            .unwrap();
        let grunt = session.create_party_member("Grunt", AttributeSet::default()).unwrap();
        let foe = enemy(&session, [4, 0, 2, 0, 0, 0]);

        session.start_encounter(&[leader, grunt], vec![foe], Vec::new(), false).unwrap();
        session.encounter.enemies[0].hp = 0;
        let report = session.finish_encounter(&mut rng).unwrap();

        // 60 XP split two ways; leader earns 50% more
        assert_eq!(report.awards.len(), 2);
        assert_eq!(report.awards[0].xp, 45);
        assert_eq!(report.awards[1].xp, 30);
        assert_eq!(session.member(leader).unwrap().xp, 45);
        assert_eq!(
            session.member(grunt).unwrap().party_details().unwrap().encounters_until_available,
            1
        );
    }

    #[test]
    fn test_fallen_are_removed_and_bench_recovers() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut session = session();
        let fighter = session.create_party_member("Fighter", AttributeSet::default()).unwrap();
        let doomed = session.create_party_member("Doomed", AttributeSet::default()).unwrap();
        let bench = session.create_party_member("Bench", AttributeSet::default()).unwrap();
        {
            let benched = session.member_mut(bench).unwrap();
            benched.hp = 50;
            benched.mp = 3;
            benched.party_details_mut().unwrap().encounters_until_available = 2;
        }

        session.start_encounter(&[fighter, doomed], Vec::new(), Vec::new(), false).unwrap();
        session.member_mut(doomed).unwrap().hp = 0;
        session.member_mut(fighter).unwrap().hp = 30;

        let report = session.finish_encounter(&mut rng).unwrap();

        assert_eq!(report.fallen, vec![doomed]);
        assert!(session.member(doomed).is_none());
        assert_eq!(session.roster().len(), 2);

        let benched = session.member(bench).unwrap();
        assert_eq!(benched.hp, 60);
        assert_eq!(benched.mp, 4);
        assert_eq!(benched.party_details().unwrap().encounters_until_available, 1);

        // Survivors do not regenerate
        assert_eq!(session.member(fighter).unwrap().hp, 30);
        assert!(!session.encounter().is_active());
    }

    #[test]
    fn test_survivor_effects_are_reverted() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut session = session();
        let hero = session
            .create_party_member("Hero", AttributeSet::from_raw([2, 0, 0, 0, 0, 0]))
            .unwrap();
        session.start_encounter(&[hero], Vec::new(), Vec::new(), false).unwrap();
        session
            .member_mut(hero)
            .unwrap()
            .apply_temporary_effect("Focus", &AttributeValues::new().with(AttributeName::Phy, 3));

        session.finish_encounter(&mut rng).unwrap();

        let hero = session.member(hero).unwrap();
        assert_eq!(hero.attributes.phy.value, 2);
        assert!(!hero.has_pending_effects());
    }

    #[test]
    fn test_missing_member_leaves_state_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut session = session();
        let hero = session.create_party_member("Hero", AttributeSet::default()).unwrap();
        session.start_encounter(&[hero], Vec::new(), Vec::new(), false).unwrap();
        session.roster.clear();

        assert!(matches!(
            session.finish_encounter(&mut rng),
            Err(EngineError::DataInconsistency(_))
        ));
        assert!(session.encounter().is_active());
    }

    #[test]
    fn test_reward_recruits_member() {
        let mut session = session();
        let hero = session.create_party_member("Hero", AttributeSet::default()).unwrap();
        let reward = Reward::party_member(
            1.0,
            "Recruit",
            AttributeValues::new().with(AttributeName::Phy, 3),
        );
        session.start_encounter(&[hero], Vec::new(), vec![reward], false).unwrap();

        // Every roll is 0.5: the reward passes and the level factor is 1
        let report = session.finish_encounter(&mut fixed_roll(0.5)).unwrap();

        let recruit = session.member(report.recruit.unwrap()).unwrap();
        assert_eq!(recruit.name, "Recruit");
        assert_eq!(recruit.level, 1);
        assert!(recruit.is_available());
        assert_eq!(session.roster().len(), 2);
    }

    #[test]
    fn test_no_reward_without_survivors() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut session = session();
        let hero = session.create_party_member("Hero", AttributeSet::default()).unwrap();
        let reward = Reward::party_member(1.0, "Recruit", AttributeValues::new());
        session.start_encounter(&[hero], Vec::new(), vec![reward], false).unwrap();
        session.member_mut(hero).unwrap().hp = 0;

        let report = session.finish_encounter(&mut rng).unwrap();

        assert!(report.recruit.is_none());
        assert!(session.roster().is_empty());
    }

    #[test]
    fn test_abandon_pays_nothing() {
        let mut session = session();
        let hero = session
            .create_party_member("Hero", AttributeSet::from_raw([2, 0, 0, 0, 0, 0]))
            .unwrap();
        let reward = Reward::party_member(1.0, "Recruit", AttributeValues::new());
        let foe = enemy(&session, [4, 0, 2, 0, 0, 0]);
        let index = session
            .start_encounter(&[hero], vec![foe], vec![reward], false)
            .unwrap();
        {
            let member = session.member_mut(hero).unwrap();
            member.hp = 40;
            member.apply_temporary_effect(
                "Focus",
                &AttributeValues::new().with(AttributeName::Phy, 3),
            );
        }

        assert_eq!(session.abandon_encounter(), Ok(index));

        let member = session.member(hero).unwrap();
        assert_eq!(member.xp, 0);
        assert_eq!(member.hp, 40);
        assert_eq!(member.attributes.phy.value, 2);
        assert!(member.is_available());
        assert_eq!(session.roster().len(), 1);
        assert!(!session.encounter().is_active());
        assert_eq!(session.abandon_encounter(), Err(EngineError::EncounterNotActive));
    }
}
