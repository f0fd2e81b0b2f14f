//! Containment zones and the aggro gate.
//!
//! Zones partition the level into rooms and corridors. Each zone remembers
//! whether the tracked target has ever entered it; perception-based aggro is
//! gated on that flag, so only agents co-located with the target may acquire
//! it by sight. The flag is one-way: once set it stays set for the zone's
//! lifetime.

use revenant_common::ZoneId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Registry of containment zones and their target-entered flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneRegistry {
    /// Entered flag per zone.
    zones: HashMap<ZoneId, bool>,
}

impl ZoneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zone. Re-registering an existing zone keeps its flag.
    pub fn register(&mut self, zone: ZoneId) {
        self.zones.entry(zone).or_insert(false);
    }

    /// Returns whether a zone is known to the registry.
    #[must_use]
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.zones.contains_key(&zone)
    }

    /// Marks a zone as entered by the tracked target.
    ///
    /// Called exactly once per zone by the entry trigger system; the flag is
    /// never cleared afterwards. Calling again is a harmless no-op.
    pub fn on_target_entered(&mut self, zone: ZoneId) {
        match self.zones.get_mut(&zone) {
            Some(entered) if *entered => {}
            Some(entered) => {
                *entered = true;
                debug!(zone = zone.raw(), "target entered zone");
            }
            None => {
                warn!(zone = zone.raw(), "entry trigger for unregistered zone");
            }
        }
    }

    /// Returns whether the target has ever entered a zone.
    ///
    /// Unknown zones report false: an unresolved gate stays closed.
    #[must_use]
    pub fn target_entered(&self, zone: ZoneId) -> bool {
        self.zones.get(&zone).copied().unwrap_or(false)
    }

    /// Returns the number of registered zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns whether no zones are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Spatial lookup interface resolving a position to its containing zone.
pub trait ZoneMap {
    /// Returns the zone containing a position, if any.
    fn zone_at(&self, position: (f32, f32)) -> Option<ZoneId>;
}

/// An agent's binding to its containment zone.
///
/// Resolution is lazy: a freshly spawned agent retries detection on a timer
/// for a bounded number of attempts, then gives up permanently. An agent
/// without a resolved zone never opens its aggro gate (direct damage still
/// grants aggro).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneBinding {
    /// Bound to a detected zone.
    Resolved(ZoneId),
    /// Detection still retrying.
    Pending {
        /// Attempts made so far.
        attempts: u32,
        /// Time until the next attempt (seconds).
        retry_in: f32,
    },
    /// Detection gave up; the gate stays closed for this agent's lifetime.
    Undetected,
}

impl ZoneBinding {
    /// Creates an unresolved binding that will retry detection.
    #[must_use]
    pub const fn pending() -> Self {
        Self::Pending {
            attempts: 0,
            retry_in: 0.0,
        }
    }

    /// Returns the bound zone, if resolved.
    #[must_use]
    pub const fn zone(&self) -> Option<ZoneId> {
        match self {
            Self::Resolved(zone) => Some(*zone),
            _ => None,
        }
    }

    /// Returns whether detection has permanently failed.
    #[must_use]
    pub const fn is_undetected(&self) -> bool {
        matches!(self, Self::Undetected)
    }

    /// Advances pending detection by one tick.
    ///
    /// Retries every `retry_interval` seconds up to `max_retries` attempts,
    /// then settles on [`ZoneBinding::Undetected`].
    pub fn tick<Z: ZoneMap>(
        &mut self,
        dt: f32,
        position: (f32, f32),
        map: &Z,
        retry_interval: f32,
        max_retries: u32,
    ) {
        let Self::Pending { attempts, retry_in } = self else {
            return;
        };

        *retry_in -= dt;
        if *retry_in > 0.0 {
            return;
        }

        *attempts += 1;
        if let Some(zone) = map.zone_at(position) {
            debug!(zone = zone.raw(), "zone detected");
            *self = Self::Resolved(zone);
        } else if *attempts >= max_retries {
            warn!(
                attempts = *attempts,
                "zone detection gave up; agent will never gain gated aggro"
            );
            *self = Self::Undetected;
        } else {
            *retry_in = retry_interval;
        }
    }

    /// Returns whether this binding's aggro gate is open.
    #[must_use]
    pub fn gate_open(&self, registry: &ZoneRegistry) -> bool {
        match self.zone() {
            Some(zone) => registry.target_entered(zone),
            None => false,
        }
    }
}

impl Default for ZoneBinding {
    fn default() -> Self {
        Self::pending()
    }
}

/// Mock zone map for testing: axis-aligned rectangles.
#[derive(Debug, Default)]
pub struct MockZoneMap {
    rects: Vec<((f32, f32), (f32, f32), ZoneId)>,
}

impl MockZoneMap {
    /// Creates an empty mock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rectangular zone from `min` to `max` (inclusive).
    pub fn insert_rect(&mut self, min: (f32, f32), max: (f32, f32), zone: ZoneId) {
        self.rects.push((min, max, zone));
    }
}

impl ZoneMap for MockZoneMap {
    fn zone_at(&self, position: (f32, f32)) -> Option<ZoneId> {
        self.rects
            .iter()
            .find(|(min, max, _)| {
                position.0 >= min.0
                    && position.0 <= max.0
                    && position.1 >= min.1
                    && position.1 <= max.1
            })
            .map(|(_, _, zone)| *zone)
    }
}
