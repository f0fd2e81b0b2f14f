//! Movement/combat capability the state machine drives.
//!
//! The agent never touches navigation internals: it issues commands
//! (`move_to`, `stop`, `face_towards`, `begin_attack`) and polls predicates
//! (`is_in_range`, `is_attack_complete`, `is_stuck`). Any pathing or
//! animation backend that implements [`CombatMotor`] plugs in unchanged.

use revenant_common::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Handle to an in-flight attack windup.
///
/// Discarding the handle cancels interest in the attack; it is never awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackHandle(u64);

impl AttackHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Abstract movement and attack capability for one simulation.
pub trait CombatMotor {
    /// Requests navigation toward a point at the given speed.
    fn move_to(&mut self, agent: AgentId, point: (f32, f32), speed: f32);

    /// Halts navigation.
    fn stop(&mut self, agent: AgentId);

    /// Turns the agent toward a point.
    fn face_towards(&mut self, agent: AgentId, point: (f32, f32));

    /// Returns whether the agent is within `range` of a point.
    fn is_in_range(&self, agent: AgentId, point: (f32, f32), range: f32) -> bool;

    /// Starts an attack action; returns a handle to poll for completion.
    fn begin_attack(&mut self, agent: AgentId) -> AttackHandle;

    /// Returns whether an attack action has finished.
    fn is_attack_complete(&self, handle: AttackHandle) -> bool;

    /// Returns whether navigation is stuck (no path / no progress).
    fn is_stuck(&self, agent: AgentId) -> bool;
}

/// Mock motor for testing: records commands, answers predicates from
/// test-controlled switches.
#[derive(Debug, Default)]
pub struct MockMotor {
    moves: Vec<(AgentId, (f32, f32), f32)>,
    stops: Vec<AgentId>,
    faced: Vec<(AgentId, (f32, f32))>,
    in_range: HashSet<AgentId>,
    stuck: HashSet<AgentId>,
    begun: Vec<(AgentId, AttackHandle)>,
    completed: HashSet<AttackHandle>,
    auto_complete: bool,
    next_handle: u64,
}

impl MockMotor {
    /// Creates a mock motor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every attack report complete as soon as it is polled.
    #[must_use]
    pub fn with_auto_complete(mut self) -> Self {
        self.auto_complete = true;
        self
    }

    /// Marks an agent as within range of any point.
    pub fn set_in_range(&mut self, agent: AgentId, in_range: bool) {
        if in_range {
            self.in_range.insert(agent);
        } else {
            self.in_range.remove(&agent);
        }
    }

    /// Marks an agent's navigation as stuck.
    pub fn set_stuck(&mut self, agent: AgentId, stuck: bool) {
        if stuck {
            self.stuck.insert(agent);
        } else {
            self.stuck.remove(&agent);
        }
    }

    /// Marks a specific attack as finished.
    pub fn complete_attack(&mut self, handle: AttackHandle) {
        self.completed.insert(handle);
    }

    /// Returns the last move command issued for an agent.
    #[must_use]
    pub fn last_move(&self, agent: AgentId) -> Option<((f32, f32), f32)> {
        self.moves
            .iter()
            .rev()
            .find(|(id, _, _)| *id == agent)
            .map(|(_, point, speed)| (*point, *speed))
    }

    /// Returns how many move commands were issued in total.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns how many stop commands an agent received.
    #[must_use]
    pub fn stop_count(&self, agent: AgentId) -> usize {
        self.stops.iter().filter(|id| **id == agent).count()
    }

    /// Returns the attacks begun by an agent.
    #[must_use]
    pub fn attacks_begun(&self, agent: AgentId) -> Vec<AttackHandle> {
        self.begun
            .iter()
            .filter(|(id, _)| *id == agent)
            .map(|(_, handle)| *handle)
            .collect()
    }

    /// Returns the last face command issued for an agent.
    #[must_use]
    pub fn last_faced(&self, agent: AgentId) -> Option<(f32, f32)> {
        self.faced
            .iter()
            .rev()
            .find(|(id, _)| *id == agent)
            .map(|(_, point)| *point)
    }
}

impl CombatMotor for MockMotor {
    fn move_to(&mut self, agent: AgentId, point: (f32, f32), speed: f32) {
        self.moves.push((agent, point, speed));
    }

    fn stop(&mut self, agent: AgentId) {
        self.stops.push(agent);
    }

    fn face_towards(&mut self, agent: AgentId, point: (f32, f32)) {
        self.faced.push((agent, point));
    }

    fn is_in_range(&self, agent: AgentId, _point: (f32, f32), _range: f32) -> bool {
        self.in_range.contains(&agent)
    }

    fn begin_attack(&mut self, agent: AgentId) -> AttackHandle {
        self.next_handle += 1;
        let handle = AttackHandle::new(self.next_handle);
        self.begun.push((agent, handle));
        handle
    }

    fn is_attack_complete(&self, handle: AttackHandle) -> bool {
        self.auto_complete || self.completed.contains(&handle)
    }

    fn is_stuck(&self, agent: AgentId) -> bool {
        self.stuck.contains(&agent)
    }
}
