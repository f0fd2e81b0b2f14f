//! Fire-and-forget animation/VFX event bus.
//!
//! The state machine publishes discrete triggers the presentation layer may
//! consume. Publishing never blocks: a full channel drops the event, because
//! a slow renderer must not stall the simulation tick.

use crossbeam_channel::{bounded, Receiver, Sender};
use revenant_common::AgentId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Animation triggers emitted by the combat AI core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationEvent {
    /// Locomotion started or stopped.
    Moving {
        /// Agent concerned
        agent: AgentId,
        /// Whether the agent is now moving
        moving: bool,
    },
    /// Chase pursuit started or stopped.
    Chasing {
        /// Agent concerned
        agent: AgentId,
        /// Whether the agent is now chasing
        chasing: bool,
    },
    /// An attack windup began.
    AttackStarted {
        /// Agent concerned
        agent: AgentId,
    },
    /// A stagger interrupted the agent.
    Staggered {
        /// Agent concerned
        agent: AgentId,
    },
    /// The agent died.
    Died {
        /// Agent concerned
        agent: AgentId,
    },
    /// The agent jumped. The AI core never emits this; the host's traversal
    /// layer publishes it through [`AnimationBus::sender`] so jump animations
    /// flow through the same sink.
    Jump {
        /// Agent concerned
        agent: AgentId,
    },
}

/// Bounded broadcast bus for animation events.
#[derive(Debug)]
pub struct AnimationBus {
    /// Sender for publishing events
    sender: Sender<AnimationEvent>,
    /// Receiver for collecting events
    receiver: Receiver<AnimationEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for AnimationBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl AnimationBus {
    /// Creates a bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event without blocking; a full bus drops it.
    pub fn publish(&self, event: AnimationEvent) {
        if self.sender.try_send(event).is_err() {
            debug!(?event, "animation bus full, dropping event");
        }
    }

    /// Drains all pending events.
    #[must_use]
    pub fn drain(&self) -> Vec<AnimationEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<AnimationEvent> {
        self.sender.clone()
    }
}
