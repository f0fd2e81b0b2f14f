//! ID types for agents and zones.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for agent IDs.
static AGENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an enemy agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates a new unique agent ID.
    #[must_use]
    pub fn new() -> Self {
        Self(AGENT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an agent ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid agent ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) agent ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a containment zone (room or corridor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a zone ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_agent_id_unique() {
        let a = AgentId::new();
        let b = AgentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_agent_id_null() {
        assert!(!AgentId::NULL.is_valid());
        assert_eq!(AgentId::NULL.raw(), 0);
    }

    #[test]
    fn test_agent_id_from_raw() {
        let id = AgentId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert!(id.is_valid());
    }

    #[test]
    fn test_zone_id_equality() {
        assert_eq!(ZoneId::new(3), ZoneId::new(3));
        assert_ne!(ZoneId::new(3), ZoneId::new(4));
    }

    proptest! {
        #[test]
        fn prop_agent_id_raw_roundtrip(raw in 1u64..u64::MAX) {
            let id = AgentId::from_raw(raw);
            prop_assert_eq!(id.raw(), raw);
            prop_assert!(id.is_valid());
        }

        #[test]
        fn prop_zone_id_raw_roundtrip(raw in any::<u32>()) {
            prop_assert_eq!(ZoneId::new(raw).raw(), raw);
        }
    }
}
