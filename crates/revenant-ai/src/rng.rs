//! Deterministic random number generation for combat rolls.
//!
//! Stagger triggers are probabilistic; a seeded LCG keeps encounter replays
//! and tests reproducible without pulling OS entropy into the simulation.

use serde::{Deserialize, Serialize};

/// Simple LCG random number generator for deterministic combat rolls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatRng {
    state: u64,
}

impl CombatRng {
    /// Creates a new RNG with seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Gets next random u64.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Gets random f32 in [0, 1]. Rounding can yield exactly 1.0.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() as f32) / (u64::MAX as f32)
    }

    /// Rolls against a probability in [0, 1].
    ///
    /// A chance of 0.0 (or less) never succeeds and consumes no state;
    /// a chance of 1.0 (or more) always succeeds.
    pub fn roll(&mut self, chance: f32) -> bool {
        if chance <= 0.0 {
            return false;
        }
        if chance >= 1.0 {
            return true;
        }
        self.next_f32() <= chance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = CombatRng::new(12345);
        let mut rng2 = CombatRng::new(12345);

        for _ in 0..10 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = CombatRng::new(1);
        let mut rng2 = CombatRng::new(2);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_rng_f32_range() {
        let mut rng = CombatRng::new(777);

        for _ in 0..100 {
            let val = rng.next_f32();
            assert!((0.0..=1.0).contains(&val));
        }
    }

    #[test]
    fn test_roll_zero_never_succeeds() {
        let mut rng = CombatRng::new(42);

        for _ in 0..1000 {
            assert!(!rng.roll(0.0));
        }
    }

    #[test]
    fn test_roll_one_always_succeeds() {
        let mut rng = CombatRng::new(42);

        for _ in 0..1000 {
            assert!(rng.roll(1.0));
        }
    }

    #[test]
    fn test_roll_half_mixed() {
        let mut rng = CombatRng::new(42);
        let successes = (0..1000).filter(|_| rng.roll(0.5)).count();

        // Loose bounds; the LCG is uniform enough for gameplay.
        assert!(successes > 300);
        assert!(successes < 700);
    }
}
