//! # Revenant Common
//!
//! Common types shared across Revenant subsystems.
//!
//! This crate provides the foundational identifier types used by the combat
//! AI core and its collaborators:
//! - `AgentId` for enemy agents
//! - `ZoneId` for containment zones
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
}

pub use prelude::*;
