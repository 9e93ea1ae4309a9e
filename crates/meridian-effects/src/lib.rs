//! # Meridian Effects
//!
//! The per-creature effect list engine for Project Meridian.
//!
//! Every creature carries an [`list::EffectList`] that owns all effect
//! instances currently applied to it: buffs, triggered effects,
//! dances/songs, toggles, debuffs, passives and item augmentation
//! options. The list enforces abnormal-type stacking, slot limits with
//! FIFO eviction, blocking rules, an aggregated flag word for O(1)
//! state queries, and publishes presentation updates over a
//! [`channel::StatusChannel`].
//!
//! The engine is safe under concurrent mutation: mutating operations
//! serialize per list while queries stay lock-free or take short read
//! locks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod abnormal;
pub mod channel;
pub mod config;
pub mod effect;
pub mod instance;
pub mod list;
pub mod owner;
pub mod skill;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::abnormal::AbnormalType;
    pub use crate::channel::{
        ChannelError, StatusBus, StatusChannel, StatusIcon, StatusUpdate,
    };
    pub use crate::config::EffectListConfig;
    pub use crate::effect::{Effect, EffectContext, EffectFlags};
    pub use crate::instance::{EffectInstance, EffectSource};
    pub use crate::list::{EffectCategory, EffectList};
    pub use crate::owner::Creature;
    pub use crate::skill::{AugmentOption, Skill, SkillCondition};
}

pub use prelude::*;
