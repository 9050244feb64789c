//! Attribute growth and its side effects

use crate::attributes::AttributeName;
use crate::combat::constants::{POOL_GROWTH_MIN, POOL_GROWTH_PER_STEP};
use crate::combatant::entity::Combatant;
use crate::core::error::{EngineError, Result};

impl Combatant {
    /// Increase an attribute by `amount` and apply its side effects
    ///
    /// With `side_effects_only` the value is assumed to be raised already
    /// and only the side effects fire. Fails without mutating anything when
    /// `amount < 1`.
    pub fn increase_attribute(
        &mut self,
        name: AttributeName,
        amount: i64,
        side_effects_only: bool,
    ) -> Result<()> {
        if amount < 1 {
            return Err(EngineError::InvalidArgument(format!(
                "attribute increase must be positive, got {}",
                amount
            )));
        }

        if !side_effects_only {
            self.attributes.get_mut(name).value += amount;
        }

        self.apply_growth_side_effects(name, amount);
        Ok(())
    }

    /// Side effects of the last `amount` points of `name`
    ///
    /// Endurance grows both pools per point gained and then fully restores
    /// them.
    pub(crate) fn apply_growth_side_effects(&mut self, name: AttributeName, amount: i64) {
        if name != AttributeName::End {
            return;
        }

        let value = self.attributes.value(name);
        for step in (value - amount)..value {
            let growth = POOL_GROWTH_MIN.max((step as f64 * POOL_GROWTH_PER_STEP).floor() as i64);
            self.max_hp += growth;
            self.max_mp += growth;
        }

        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }

    /// Scale every attribute by `factor`; returns the summed change
    ///
    /// Attributes that grew fire their side effects without being raised a
    /// second time.
    pub fn scale_attributes(&mut self, factor: f64) -> i64 {
        let mut total_diff = 0;

        for name in AttributeName::ALL {
            let diff = self.attributes.get_mut(name).scale(factor);
            if diff > 0 {
                self.apply_growth_side_effects(name, diff);
            }
            total_diff += diff;
        }

        total_diff
    }
}
