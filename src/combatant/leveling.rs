//! Experience, levels and attribute point assignment

use rand::seq::SliceRandom;
use rand::Rng;

use crate::attributes::AttributeName;
use crate::combat::constants::{
    BASE_POINTS_PER_LEVEL, ENEMY_GROWTH_PER_LEVEL, MAX_XP_PER_LEVEL, POINT_CYCLE,
};
use crate::combatant::entity::{Combatant, CombatantRole};

impl Combatant {
    /// Add experience and roll over into new levels; returns levels gained
    ///
    /// Each level grants party members `2 + level % 3` attribute points.
    /// Afterwards `xp < max_xp` always holds.
    pub fn increase_xp(&mut self, amount: u64) -> u32 {
        self.xp += amount;

        let mut gained = 0;
        while self.xp >= self.max_xp {
            self.xp -= self.max_xp;
            self.level += 1;
            if let CombatantRole::Party(details) = &mut self.role {
                details.attribute_points_available +=
                    BASE_POINTS_PER_LEVEL + self.level % POINT_CYCLE;
            }
            self.max_xp = MAX_XP_PER_LEVEL * self.level as u64;
            gained += 1;
        }

        if gained > 0 {
            tracing::debug!("{} reached level {} (+{})", self.name, self.level, gained);
        }
        gained
    }

    /// Force exactly `levels` level-ups by topping experience up to the limit
    pub fn gain_levels(&mut self, levels: u32) {
        for _ in 0..levels {
            self.increase_xp(self.max_xp - self.xp);
        }
    }

    /// Spend all pending attribute points; returns how many were spent
    ///
    /// Attributes are scaled proportionally first. Points lost to rounding
    /// go one at a time to the strongest attributes in turn, or to all
    /// attributes in random order when every attribute is still zero.
    pub fn assign_attribute_points<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let points = match self.party_details() {
            Some(details) if details.attribute_points_available > 0 => {
                details.attribute_points_available
            }
            _ => return 0,
        };

        let total = self.attributes.total();
        let factor = if total > 0 {
            1.0 + points as f64 / total as f64
        } else {
            1.0
        };
        let diff = self.scale_attributes(factor);

        let mut remaining = points as i64 - diff;
        if remaining > 0 {
            let mut order = self.attributes.ranked();
            if order.is_empty() {
                order = AttributeName::ALL.to_vec();
                order.shuffle(rng);
            }

            while remaining > 0 {
                for &name in &order {
                    if remaining == 0 {
                        break;
                    }
                    self.attributes.get_mut(name).value += 1;
                    self.apply_growth_side_effects(name, 1);
                    remaining -= 1;
                }
            }
        }

        if let Some(details) = self.party_details_mut() {
            details.attribute_points_available = 0;
        }
        points
    }

    /// Raise the combatant by `levels` levels
    ///
    /// Party members gain the levels through experience and then spend the
    /// earned points. Enemies scale every attribute by `levels * 1.25`.
    pub fn level_up<R: Rng + ?Sized>(&mut self, levels: u32, rng: &mut R) {
        if levels < 1 {
            return;
        }

        match self.role {
            CombatantRole::Party(_) => {
                self.gain_levels(levels);
                self.assign_attribute_points(rng);
            }
            CombatantRole::Enemy(_) => {
                self.level += levels;
                self.scale_attributes(levels as f64 * ENEMY_GROWTH_PER_LEVEL);
            }
        }
    }

    /// Builder-style level up from level 1 to `level`
    pub fn with_level<R: Rng + ?Sized>(mut self, level: u32, rng: &mut R) -> Self {
        if level > 1 {
            self.level_up(level - 1, rng);
        }
        self
    }
}
