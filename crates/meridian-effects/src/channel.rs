//! Presentation updates and the channel they are published on.
//!
//! The effect list emits logical icon/status events; an external
//! transport serializes and broadcasts them. The engine never blocks on
//! the transport and never propagates its failures.

use crate::instance::EffectInstance;
use crossbeam_channel::{bounded, Receiver, Sender};
use meridian_common::{EntityId, SkillId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One displayable effect entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusIcon {
    /// Source skill ID.
    pub skill: SkillId,
    /// Skill level.
    pub level: u16,
    /// Skill enchant sub-level.
    pub sub_level: u16,
    /// Remaining duration in scheduler ticks.
    pub time_left: u32,
    /// Whether the effect currently contributes to stats.
    pub in_use: bool,
}

impl StatusIcon {
    /// Builds an icon from an effect instance backed by a skill.
    ///
    /// Returns `None` for augmentation options, which have no icon.
    #[must_use]
    pub fn from_instance(info: &EffectInstance) -> Option<Self> {
        let skill = info.skill()?;
        Some(Self {
            skill: skill.id(),
            level: skill.level(),
            sub_level: skill.sub_level(),
            time_left: info.time_left(),
            in_use: info.is_in_use(),
        })
    }
}

/// A logical presentation update emitted by the effect list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusUpdate {
    /// Full icon list for the owner's own client.
    Icons {
        /// Effect list owner.
        owner: EntityId,
        /// Visible icons in display order.
        icons: Vec<StatusIcon>,
    },
    /// Icon list broadcast to the owner's party (toggles excluded).
    PartyIcons {
        /// Effect list owner.
        owner: EntityId,
        /// Visible icons in display order.
        icons: Vec<StatusIcon>,
    },
    /// Icon list broadcast to ranked-match spectators.
    ObserverIcons {
        /// Effect list owner.
        owner: EntityId,
        /// Visible icons in display order.
        icons: Vec<StatusIcon>,
    },
    /// Status list for every creature currently targeting the owner.
    TargetStatus {
        /// Effect list owner.
        owner: EntityId,
        /// Visible icons in display order.
        icons: Vec<StatusIcon>,
    },
    /// The dedicated single short-buff slot changed.
    ShortBuff {
        /// Effect list owner.
        owner: EntityId,
        /// New slot content; `None` resets the slot.
        icon: Option<StatusIcon>,
    },
}

/// Errors raised by a presentation transport.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// The transport refused or dropped the update.
    #[error("status update rejected: {0}")]
    Rejected(String),
    /// The transport is no longer reachable.
    #[error("status channel closed")]
    Closed,
}

/// Transport-facing side of the presentation notifier.
///
/// Implementations route updates to clients; failures are logged and
/// swallowed by the engine.
pub trait StatusChannel: Send + Sync {
    /// Publishes one logical update.
    fn publish(&self, update: StatusUpdate) -> Result<(), ChannelError>;
}

/// Bounded in-process status bus.
///
/// Non-blocking: when the bus is full the update is dropped. Consumers
/// drain on their own schedule.
#[derive(Debug)]
pub struct StatusBus {
    sender: Sender<StatusUpdate>,
    receiver: Receiver<StatusUpdate>,
    capacity: usize,
}

impl Default for StatusBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl StatusBus {
    /// Creates a new bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Drains all pending updates.
    pub fn drain(&self) -> Vec<StatusUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.receiver.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Returns the number of pending updates.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the bus capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing updates.
    #[must_use]
    pub fn sender(&self) -> Sender<StatusUpdate> {
        self.sender.clone()
    }
}

impl StatusChannel for StatusBus {
    fn publish(&self, update: StatusUpdate) -> Result<(), ChannelError> {
        // Non-blocking send - if full, the update is dropped.
        let _ = self.sender.try_send(update);
        Ok(())
    }
}
