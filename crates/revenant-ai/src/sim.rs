//! Simulation driver: owns the agents, the zone registry, the event bus,
//! and the damage RNG.
//!
//! One `tick` advances every agent in ascending ID order, so a run with the
//! same seed and the same inputs replays identically. Health and pain
//! resolution happen through [`Simulation::apply_damage`] between ticks;
//! there is no cross-tick interleaving to reason about.

use crate::adapter::CombatMotor;
use crate::agent::{Agent, AgentState};
use crate::events::{AnimationBus, AnimationEvent};
use crate::health::DamageOutcome;
use crate::perception::{distance, LineOfSight};
use crate::profile::{BehaviorProfile, ProfileError};
use crate::rng::CombatRng;
use crate::zone::{ZoneMap, ZoneRegistry};
use revenant_common::{AgentId, ZoneId};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Simulation error types.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// The referenced agent does not exist (or was already removed).
    #[error("unknown agent {0:?}")]
    UnknownAgent(AgentId),
    /// An agent profile failed validation at spawn.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// The combat AI simulation: all live agents plus shared services.
#[derive(Debug)]
pub struct Simulation {
    agents: HashMap<AgentId, Agent>,
    zones: ZoneRegistry,
    bus: AnimationBus,
    rng: CombatRng,
    target_position: (f32, f32),
}

impl Simulation {
    /// Creates a simulation over a zone registry, seeded for determinism.
    #[must_use]
    pub fn new(zones: ZoneRegistry, seed: u64) -> Self {
        Self {
            agents: HashMap::new(),
            zones,
            bus: AnimationBus::default(),
            rng: CombatRng::new(seed),
            target_position: (0.0, 0.0),
        }
    }

    /// Updates the tracked target's position (fed in each frame).
    pub fn set_target_position(&mut self, position: (f32, f32)) {
        self.target_position = position;
    }

    /// Returns the tracked target's position.
    #[must_use]
    pub const fn target_position(&self) -> (f32, f32) {
        self.target_position
    }

    /// Returns the zone registry.
    #[must_use]
    pub const fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    /// Registers a containment zone.
    pub fn register_zone(&mut self, zone: ZoneId) {
        self.zones.register(zone);
    }

    /// Entry-trigger hook: the target entered a zone. One-way.
    pub fn on_target_entered(&mut self, zone: ZoneId) {
        self.zones.on_target_entered(zone);
    }

    /// Spawns an agent with a freshly allocated ID.
    pub fn spawn_agent(
        &mut self,
        profile: BehaviorProfile,
        position: (f32, f32),
    ) -> SimResult<AgentId> {
        let agent = Agent::spawn(AgentId::new(), profile, position)?;
        let id = agent.id();
        debug!(agent = id.raw(), "agent spawned");
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Inserts a pre-built agent (waypoints, zone binding already set).
    pub fn insert_agent(&mut self, agent: Agent) -> AgentId {
        let id = agent.id();
        self.agents.insert(id, agent);
        id
    }

    /// Applies damage to an agent, resolving stagger and death.
    pub fn apply_damage(
        &mut self,
        agent: AgentId,
        amount: f32,
        source: Option<(f32, f32)>,
    ) -> SimResult<DamageOutcome> {
        let entry = self
            .agents
            .get_mut(&agent)
            .ok_or(SimError::UnknownAgent(agent))?;
        Ok(entry.apply_damage(amount, source, &mut self.rng, &self.bus))
    }

    /// Advances every agent by one tick, in ascending ID order.
    ///
    /// Agents whose death grace period has fully elapsed are removed after
    /// their tick.
    pub fn tick<Z: ZoneMap, L: LineOfSight, M: CombatMotor>(
        &mut self,
        dt: f32,
        zone_map: &Z,
        los: &L,
        motor: &mut M,
    ) {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            agent.tick(
                dt,
                self.target_position,
                &self.zones,
                zone_map,
                los,
                motor,
                &self.bus,
            );
            if agent.despawn_due() {
                debug!(agent = id.raw(), "removing despawned agent");
                self.agents.remove(&id);
            }
        }
    }

    /// Returns an agent by ID.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> Option<&Agent> {
        self.agents.get(&agent)
    }

    /// Returns a mutable agent by ID.
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&agent)
    }

    /// Updates an agent's position (fed back from the navigation service).
    pub fn set_agent_position(&mut self, agent: AgentId, position: (f32, f32)) -> SimResult<()> {
        let entry = self
            .agents
            .get_mut(&agent)
            .ok_or(SimError::UnknownAgent(agent))?;
        entry.set_position(position);
        Ok(())
    }

    /// Returns the number of live agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns whether the simulation holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterates over all agents, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Returns IDs of agents currently in a given state.
    #[must_use]
    pub fn agents_in_state(&self, state: AgentState) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .agents
            .values()
            .filter(|agent| agent.state() == state)
            .map(Agent::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns IDs of agents within `range` of a point.
    #[must_use]
    pub fn agents_in_range(&self, point: (f32, f32), range: f32) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .agents
            .values()
            .filter(|agent| distance(agent.position(), point) <= range)
            .map(Agent::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drains all pending animation events.
    #[must_use]
    pub fn drain_events(&self) -> Vec<AnimationEvent> {
        self.bus.drain()
    }
}
