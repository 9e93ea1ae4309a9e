//! Owner capability trait.
//!
//! The effect list holds a back-reference to the creature that owns it
//! and calls back into it for stat recalculation and routing decisions.
//! That back-reference is this trait, so the engine can be driven by a
//! fake owner in tests.

use meridian_common::EntityId;

/// Capabilities the effect list requires from its owner and from the
/// creatures that apply effects to it.
pub trait Creature: Send + Sync {
    /// Unique identity of this creature.
    fn id(&self) -> EntityId;

    /// Checks if the creature is dead. Dead creatures accept no effects.
    fn is_dead(&self) -> bool;

    /// Checks if this is a player character.
    fn is_player(&self) -> bool {
        false
    }

    /// Checks if this is a player or a player-controlled pet/summon.
    fn is_playable(&self) -> bool {
        false
    }

    /// Checks if the creature has privileged (GM) access.
    fn is_gm(&self) -> bool {
        false
    }

    /// Checks if a privileged creature is permitted to deal harm.
    fn can_give_damage(&self) -> bool {
        true
    }

    /// Checks if incoming debuffs are blocked.
    fn is_debuff_blocked(&self) -> bool {
        false
    }

    /// Checks if incoming beneficial effects are blocked.
    fn is_buff_blocked(&self) -> bool {
        false
    }

    /// Checks if the creature (or its controlling player) is in a party.
    fn is_in_party(&self) -> bool {
        false
    }

    /// Checks if the creature is a ranked-match participant currently
    /// being observed by spectators.
    fn is_observed(&self) -> bool {
        false
    }

    /// The registered duel opponent, while a face-off is active.
    fn duel_opponent(&self) -> Option<EntityId> {
        None
    }

    /// Maximum number of ordinary buff slots for this creature.
    fn max_buff_count(&self) -> usize;

    /// Triggers a full stat recalculation after effect changes.
    fn recalculate_stats(&self);
}
