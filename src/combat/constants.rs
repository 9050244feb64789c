//! Combat and growth constants - fixed formula values in one place
//!
//! Session tunables (settlement, AI variance) live in `core::config`.

// Base vitals for a freshly created combatant
pub const BASE_HP: i64 = 100;
pub const BASE_MP: i64 = 10;
pub const BASE_MAX_XP: u64 = 100;

// Endurance growth: each step adds max(MIN, floor(step * RATE)) to both pools
pub const POOL_GROWTH_MIN: i64 = 5;
pub const POOL_GROWTH_PER_STEP: f64 = 0.75;

// Leveling: max XP is 100 * level * 1.3, kept integral
pub const MAX_XP_PER_LEVEL: u64 = 130;
pub const BASE_POINTS_PER_LEVEL: u32 = 2;
pub const POINT_CYCLE: u32 = 3;

/// Attribute scale factor per enemy level gained
pub const ENEMY_GROWTH_PER_LEVEL: f64 = 1.25;

// Dodge roll: agility difference that yields half the maximum bias
pub const AGILITY_BIAS_SCALE: f64 = 15.0;

// Damage jitter: clamp(U(0,1) + OFFSET, MIN, MAX)
pub const DAMAGE_JITTER_OFFSET: f64 = 0.5;
pub const DAMAGE_JITTER_MIN: f64 = 0.9;
pub const DAMAGE_JITTER_MAX: f64 = 1.1;

/// Damage bonus per affinity attribute point, divided by affinity rank
pub const AFFINITY_DAMAGE_BONUS: f64 = 0.05;

// AI weighting
pub const MISSING_HEALTH_WEIGHT: f64 = 10.0;
pub const RATE_WEIGHT: f64 = 5.0;

// New party member level spread: clamp(U(0,1) + OFFSET, MIN, MAX)
pub const RECRUIT_LEVEL_OFFSET: f64 = 0.5;
pub const RECRUIT_LEVEL_MIN: f64 = 0.5;
pub const RECRUIT_LEVEL_MAX: f64 = 1.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_bounds_centered_on_one() {
        assert!(DAMAGE_JITTER_MIN < 1.0 && DAMAGE_JITTER_MAX > 1.0);
        assert!((DAMAGE_JITTER_MIN + DAMAGE_JITTER_MAX - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_constants_reasonable() {
        assert!(POOL_GROWTH_MIN > 0);
        assert!(ENEMY_GROWTH_PER_LEVEL > 1.0);
        assert_eq!(MAX_XP_PER_LEVEL, 130);
    }
}
