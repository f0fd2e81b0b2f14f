//! Revenant AI: enemy combat behavior for a real-time action game.
//!
//! Each enemy agent runs a compact state machine (Patrol, Chase, Attack,
//! Stagger, Dead) fed by rate-limited perception, a containment-zone aggro
//! gate, and a health/pain pipeline with probabilistic stagger. Movement and
//! attack execution are abstracted behind the [`adapter::CombatMotor`]
//! trait, so the crate carries no dependency on any particular navigation
//! or animation backend.
//!
//! [`sim::Simulation`] is the host-facing driver: spawn agents with a
//! [`profile::BehaviorProfile`], feed it the target position and a tick
//! cadence, apply damage between ticks, and drain animation events for the
//! presentation layer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod adapter;
pub mod agent;
pub mod events;
pub mod health;
pub mod perception;
pub mod profile;
pub mod rng;
pub mod sim;
pub mod zone;

/// Commonly used types re-exported for convenience.
pub mod prelude {
    pub use crate::adapter::{AttackHandle, CombatMotor};
    pub use crate::agent::{Agent, AgentState};
    pub use crate::events::{AnimationBus, AnimationEvent};
    pub use crate::health::{DamageOutcome, Health};
    pub use crate::perception::LineOfSight;
    pub use crate::profile::{BehaviorProfile, ProfileError};
    pub use crate::sim::{SimError, SimResult, Simulation};
    pub use crate::zone::{ZoneBinding, ZoneMap, ZoneRegistry};
    pub use revenant_common::{AgentId, ZoneId};
}

#[cfg(test)]
mod tests {
    use crate::adapter::MockMotor;
    use crate::perception::MockLineOfSight;
    use crate::prelude::*;
    use crate::zone::MockZoneMap;

    /// End-to-end: spawn, aggro through the gate, close in, attack, die.
    #[test]
    fn test_full_combat_arc() {
        let mut zones = ZoneRegistry::new();
        zones.register(ZoneId::new(1));
        let mut map = MockZoneMap::new();
        map.insert_rect((-50.0, -50.0), (50.0, 50.0), ZoneId::new(1));
        let los = MockLineOfSight::clear();
        let mut motor = MockMotor::new();

        let mut sim = Simulation::new(zones, 99);
        let profile = BehaviorProfile::new()
            .with_vision_check_interval(0.1)
            .with_stagger_chance(0.0)
            .with_despawn_delay(0.5);
        let id = sim.spawn_agent(profile, (0.0, 0.0)).expect("valid profile");

        sim.set_target_position((5.0, 0.0));
        sim.on_target_entered(ZoneId::new(1));

        sim.tick(0.2, &map, &los, &mut motor);
        assert_eq!(sim.get(id).expect("alive").state(), AgentState::Chase);

        // The target is cornered: range check passes, the attack begins.
        motor.set_in_range(id, true);
        sim.tick(0.1, &map, &los, &mut motor);
        assert_eq!(sim.get(id).expect("alive").state(), AgentState::Attack);

        let events = sim.drain_events();
        assert!(events.contains(&AnimationEvent::AttackStarted { agent: id }));

        // Lethal retaliation, then the corpse despawns after its grace.
        let outcome = sim.apply_damage(id, 1000.0, None).expect("alive");
        assert!(outcome.died);
        sim.tick(0.5, &map, &los, &mut motor);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_prelude_exports() {
        let profile = BehaviorProfile::default();
        assert!(profile.validate().is_ok());

        let health = Health::new(50.0);
        assert!(!health.is_dead());

        let outcome = DamageOutcome::default();
        assert!(!outcome.staggered && !outcome.died);
    }
}
