//! Health pool and the pain model's timers.
//!
//! Damage resolution itself (aggro grant, stagger roll, death transition)
//! lives on the agent; this module owns the invariant-bearing pieces: the
//! clamped health pool and the stagger/stagger-cooldown countdowns.

use crate::profile::BehaviorProfile;
use serde::{Deserialize, Serialize};

/// A clamped health pool: `0 <= current <= max` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates a full health pool.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns current health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns whether health is depleted.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Returns health as a fraction in [0, 1].
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Applies damage, floored at zero. Negative amounts are ignored.
    /// Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let dealt = amount.min(self.current);
        self.current -= dealt;
        dealt
    }
}

/// Outcome of a damage application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// The hit triggered a stagger.
    pub staggered: bool,
    /// The hit was lethal.
    pub died: bool,
}

/// Stagger timers: how long the current stagger lasts and how soon the next
/// one may trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PainState {
    stagger_remaining: f32,
    stagger_cooldown_remaining: f32,
}

impl PainState {
    /// Creates a calm pain state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a stagger is currently active.
    #[must_use]
    pub fn is_staggered(&self) -> bool {
        self.stagger_remaining > 0.0
    }

    /// Returns time left on the active stagger (seconds).
    #[must_use]
    pub const fn stagger_remaining(&self) -> f32 {
        self.stagger_remaining
    }

    /// Returns whether a new stagger may trigger: not currently staggered
    /// and the per-trigger cooldown has elapsed.
    #[must_use]
    pub fn can_stagger(&self) -> bool {
        !self.is_staggered() && self.stagger_cooldown_remaining <= 0.0
    }

    /// Starts a stagger and its frequency-gate cooldown.
    pub fn trigger(&mut self, profile: &BehaviorProfile) {
        self.stagger_remaining = profile.stagger_duration;
        self.stagger_cooldown_remaining = profile.stagger_cooldown;
    }

    /// Counts both timers down, clamped at zero.
    ///
    /// Returns true exactly on the tick the active stagger expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        let was_staggered = self.is_staggered();
        self.stagger_remaining = (self.stagger_remaining - dt).max(0.0);
        self.stagger_cooldown_remaining = (self.stagger_cooldown_remaining - dt).max(0.0);
        was_staggered && !self.is_staggered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_health_starts_full() {
        let health = Health::new(100.0);
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.max(), 100.0);
        assert!(!health.is_dead());
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(40.0), 40.0);
        assert_eq!(health.take_damage(40.0), 40.0);
        // Third hit overkills; only the remaining 20 is dealt.
        assert_eq!(health.take_damage(40.0), 20.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_negative_damage_ignored() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(-10.0), 0.0);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_health_percent() {
        let mut health = Health::new(200.0);
        health.take_damage(50.0);
        assert!((health.percent() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_pain_trigger_and_decay() {
        let profile = BehaviorProfile::new()
            .with_stagger_duration(0.6)
            .with_stagger_cooldown(2.0);
        let mut pain = PainState::new();

        assert!(pain.can_stagger());
        pain.trigger(&profile);
        assert!(pain.is_staggered());
        assert!(!pain.can_stagger());

        // Decay below the duration: still staggered.
        assert!(!pain.tick(0.5));
        assert!(pain.is_staggered());

        // Expiry tick reports exactly once.
        assert!(pain.tick(0.2));
        assert!(!pain.is_staggered());
        assert!(!pain.tick(0.2));
    }

    #[test]
    fn test_stagger_cooldown_gates_retrigger() {
        let profile = BehaviorProfile::new()
            .with_stagger_duration(0.1)
            .with_stagger_cooldown(1.0);
        let mut pain = PainState::new();

        pain.trigger(&profile);
        pain.tick(0.2); // stagger over, cooldown still running
        assert!(!pain.is_staggered());
        assert!(!pain.can_stagger());

        pain.tick(1.0);
        assert!(pain.can_stagger());
    }

    #[test]
    fn test_zero_cooldown_allows_immediate_retrigger() {
        let profile = BehaviorProfile::new()
            .with_stagger_duration(0.1)
            .with_stagger_cooldown(0.0);
        let mut pain = PainState::new();

        pain.trigger(&profile);
        pain.tick(0.2);
        assert!(pain.can_stagger());
    }

    proptest! {
        #[test]
        fn prop_health_stays_clamped(
            max in 1.0f32..1000.0,
            hits in proptest::collection::vec(-50.0f32..500.0, 0..32),
        ) {
            let mut health = Health::new(max);
            for hit in hits {
                health.take_damage(hit);
                prop_assert!(health.current() >= 0.0);
                prop_assert!(health.current() <= health.max());
            }
        }

        #[test]
        fn prop_death_is_absorbing(
            max in 1.0f32..500.0,
            trailing in proptest::collection::vec(0.0f32..100.0, 1..16),
        ) {
            let mut health = Health::new(max);
            health.take_damage(max);
            prop_assert!(health.is_dead());
            for hit in trailing {
                health.take_damage(hit);
                prop_assert!(health.is_dead());
                prop_assert_eq!(health.current(), 0.0);
            }
        }

        #[test]
        fn prop_timers_never_negative(
            duration in 0.0f32..5.0,
            cooldown in 0.0f32..5.0,
            steps in proptest::collection::vec(0.0f32..1.0, 1..64),
        ) {
            let profile = BehaviorProfile::new()
                .with_stagger_duration(duration)
                .with_stagger_cooldown(cooldown);
            let mut pain = PainState::new();
            pain.trigger(&profile);
            for dt in steps {
                pain.tick(dt);
                prop_assert!(pain.stagger_remaining() >= 0.0);
            }
        }
    }
}
