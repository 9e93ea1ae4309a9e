//! # Meridian Common
//!
//! Common types, utilities, and shared abstractions for Project Meridian.
//!
//! This crate provides foundational types used across all Meridian subsystems:
//! - ID types (EntityId, SkillId, AugmentId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
