//! Behavior profiles: immutable per-agent configuration.
//!
//! A profile describes how an agent senses, moves, and fights. It is fixed
//! at spawn and validated there; an invalid profile aborts the spawn rather
//! than producing a half-configured agent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Behavior profile error types.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// Maximum health must be positive
    #[error("max health must be positive, got {value}")]
    NonPositiveMaxHealth {
        /// Configured value
        value: f32,
    },
    /// Sight range must be positive
    #[error("sight range must be positive, got {value}")]
    NonPositiveSightRange {
        /// Configured value
        value: f32,
    },
    /// Attack range must be positive
    #[error("attack range must be positive, got {value}")]
    NonPositiveAttackRange {
        /// Configured value
        value: f32,
    },
    /// Field of view must be in (0, tau]
    #[error("field of view must be in (0, tau], got {value}")]
    FieldOfViewOutOfRange {
        /// Configured value in radians
        value: f32,
    },
    /// Stagger chance must be in [0, 1]
    #[error("stagger chance must be in [0, 1], got {value}")]
    StaggerChanceOutOfRange {
        /// Configured value
        value: f32,
    },
    /// A timer or speed field must not be negative
    #[error("{name} must not be negative, got {value}")]
    NegativeValue {
        /// Field name
        name: &'static str,
        /// Configured value
        value: f32,
    },
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Immutable behavior configuration for an enemy agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Maximum health.
    pub max_health: f32,
    /// Maximum distance at which the target can be seen.
    pub sight_range: f32,
    /// Full field-of-view angle in radians.
    pub field_of_view: f32,
    /// Minimum time between gated vision checks (seconds).
    pub vision_check_interval: f32,
    /// Distance at which the agent may attack.
    pub attack_range: f32,
    /// Cooldown between attacks (seconds).
    pub attack_cooldown: f32,
    /// Probability in [0, 1] that a non-lethal hit staggers.
    pub stagger_chance: f32,
    /// Duration of a stagger (seconds).
    pub stagger_duration: f32,
    /// Minimum gap between stagger triggers (seconds); 0 disables the gate.
    pub stagger_cooldown: f32,
    /// Movement speed while chasing.
    pub chase_speed: f32,
    /// Movement speed while patrolling.
    pub patrol_speed: f32,
    /// Time without sight of the target before the agent forgets it (seconds).
    pub lost_sight_time: f32,
    /// Grace period between death and removal from the simulation (seconds).
    pub despawn_delay: f32,
    /// Interval between zone detection retries (seconds).
    pub zone_retry_interval: f32,
    /// Zone detection attempts before giving up permanently.
    pub max_zone_retries: u32,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            sight_range: 10.0,
            field_of_view: 120.0_f32.to_radians(),
            vision_check_interval: 0.2,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            stagger_chance: 0.25,
            stagger_duration: 0.6,
            stagger_cooldown: 0.0,
            chase_speed: 4.5,
            patrol_speed: 2.0,
            lost_sight_time: 4.0,
            despawn_delay: 5.0,
            zone_retry_interval: 0.5,
            max_zone_retries: 10,
        }
    }
}

impl BehaviorProfile {
    /// Creates a profile with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets maximum health.
    #[must_use]
    pub const fn with_max_health(mut self, health: f32) -> Self {
        self.max_health = health;
        self
    }

    /// Sets sight range.
    #[must_use]
    pub const fn with_sight_range(mut self, range: f32) -> Self {
        self.sight_range = range;
        self
    }

    /// Sets the full field-of-view angle in radians.
    #[must_use]
    pub const fn with_field_of_view(mut self, radians: f32) -> Self {
        self.field_of_view = radians;
        self
    }

    /// Sets the gated vision check interval.
    #[must_use]
    pub const fn with_vision_check_interval(mut self, seconds: f32) -> Self {
        self.vision_check_interval = seconds;
        self
    }

    /// Sets attack range.
    #[must_use]
    pub const fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range;
        self
    }

    /// Sets attack cooldown.
    #[must_use]
    pub const fn with_attack_cooldown(mut self, seconds: f32) -> Self {
        self.attack_cooldown = seconds;
        self
    }

    /// Sets stagger chance.
    #[must_use]
    pub const fn with_stagger_chance(mut self, chance: f32) -> Self {
        self.stagger_chance = chance;
        self
    }

    /// Sets stagger duration.
    #[must_use]
    pub const fn with_stagger_duration(mut self, seconds: f32) -> Self {
        self.stagger_duration = seconds;
        self
    }

    /// Sets the minimum gap between stagger triggers.
    #[must_use]
    pub const fn with_stagger_cooldown(mut self, seconds: f32) -> Self {
        self.stagger_cooldown = seconds;
        self
    }

    /// Sets chase speed.
    #[must_use]
    pub const fn with_chase_speed(mut self, speed: f32) -> Self {
        self.chase_speed = speed;
        self
    }

    /// Sets patrol speed.
    #[must_use]
    pub const fn with_patrol_speed(mut self, speed: f32) -> Self {
        self.patrol_speed = speed;
        self
    }

    /// Sets how long the target can stay unseen before it is forgotten.
    #[must_use]
    pub const fn with_lost_sight_time(mut self, seconds: f32) -> Self {
        self.lost_sight_time = seconds;
        self
    }

    /// Sets the death-to-removal grace period.
    #[must_use]
    pub const fn with_despawn_delay(mut self, seconds: f32) -> Self {
        self.despawn_delay = seconds;
        self
    }

    /// Sets zone detection retry pacing.
    #[must_use]
    pub const fn with_zone_retries(mut self, interval: f32, max_attempts: u32) -> Self {
        self.zone_retry_interval = interval;
        self.max_zone_retries = max_attempts;
        self
    }

    /// Validates the profile, failing fast on nonsensical configuration.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.max_health <= 0.0 {
            return Err(ProfileError::NonPositiveMaxHealth {
                value: self.max_health,
            });
        }
        if self.sight_range <= 0.0 {
            return Err(ProfileError::NonPositiveSightRange {
                value: self.sight_range,
            });
        }
        if self.attack_range <= 0.0 {
            return Err(ProfileError::NonPositiveAttackRange {
                value: self.attack_range,
            });
        }
        if self.field_of_view <= 0.0 || self.field_of_view > std::f32::consts::TAU {
            return Err(ProfileError::FieldOfViewOutOfRange {
                value: self.field_of_view,
            });
        }
        if !(0.0..=1.0).contains(&self.stagger_chance) {
            return Err(ProfileError::StaggerChanceOutOfRange {
                value: self.stagger_chance,
            });
        }
        for (name, value) in [
            ("vision_check_interval", self.vision_check_interval),
            ("attack_cooldown", self.attack_cooldown),
            ("stagger_duration", self.stagger_duration),
            ("stagger_cooldown", self.stagger_cooldown),
            ("chase_speed", self.chase_speed),
            ("patrol_speed", self.patrol_speed),
            ("lost_sight_time", self.lost_sight_time),
            ("despawn_delay", self.despawn_delay),
            ("zone_retry_interval", self.zone_retry_interval),
        ] {
            if value < 0.0 {
                return Err(ProfileError::NegativeValue { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = BehaviorProfile::default();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_profile_builders() {
        let profile = BehaviorProfile::new()
            .with_max_health(50.0)
            .with_sight_range(12.0)
            .with_attack_range(1.5)
            .with_stagger_chance(0.5);

        assert_eq!(profile.max_health, 50.0);
        assert_eq!(profile.sight_range, 12.0);
        assert_eq!(profile.attack_range, 1.5);
        assert_eq!(profile.stagger_chance, 0.5);
    }

    #[test]
    fn test_zero_max_health_rejected() {
        let profile = BehaviorProfile::new().with_max_health(0.0);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::NonPositiveMaxHealth { .. })
        ));
    }

    #[test]
    fn test_negative_sight_range_rejected() {
        let profile = BehaviorProfile::new().with_sight_range(-1.0);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::NonPositiveSightRange { .. })
        ));
    }

    #[test]
    fn test_field_of_view_bounds() {
        let zero = BehaviorProfile::new().with_field_of_view(0.0);
        assert!(matches!(
            zero.validate(),
            Err(ProfileError::FieldOfViewOutOfRange { .. })
        ));

        let over = BehaviorProfile::new().with_field_of_view(7.0);
        assert!(matches!(
            over.validate(),
            Err(ProfileError::FieldOfViewOutOfRange { .. })
        ));

        let full = BehaviorProfile::new().with_field_of_view(std::f32::consts::TAU);
        assert!(full.validate().is_ok());
    }

    #[test]
    fn test_stagger_chance_bounds() {
        let low = BehaviorProfile::new().with_stagger_chance(-0.1);
        assert!(matches!(
            low.validate(),
            Err(ProfileError::StaggerChanceOutOfRange { .. })
        ));

        let high = BehaviorProfile::new().with_stagger_chance(1.1);
        assert!(matches!(
            high.validate(),
            Err(ProfileError::StaggerChanceOutOfRange { .. })
        ));

        let edge = BehaviorProfile::new().with_stagger_chance(1.0);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_negative_timer_rejected() {
        let profile = BehaviorProfile::new().with_attack_cooldown(-0.5);
        let err = profile.validate().expect_err("should reject");
        assert!(matches!(
            err,
            ProfileError::NegativeValue {
                name: "attack_cooldown",
                ..
            }
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ProfileError::NonPositiveMaxHealth { value: 0.0 };
        assert!(err.to_string().contains("max health"));
    }
}
