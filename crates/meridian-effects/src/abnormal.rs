//! Abnormal types: mutually-exclusive effect groups.
//!
//! Two skills sharing an abnormal type can never both be active on the
//! same creature; the abnormal level decides which one wins.

use serde::{Deserialize, Serialize};

/// Category tag grouping mutually-exclusive effects.
///
/// Only one effect of a given type (other than [`AbnormalType::None`])
/// may be in use on a creature at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbnormalType {
    /// No abnormal grouping; the effect stacks freely with anything.
    None,
    /// Fire elemental empowerment.
    Fire,
    /// Water elemental empowerment.
    Water,
    /// Wind elemental empowerment.
    Wind,
    /// Earth elemental empowerment.
    Earth,
    /// Poison damage over time.
    Poison,
    /// Bleed damage over time.
    Bleed,
    /// Movement lock.
    Root,
    /// Full action lock.
    Stun,
    /// Forced sleep.
    Sleep,
    /// Cast lock.
    Silence,
    /// Health regeneration boost.
    Regen,
    /// Mana regeneration boost.
    ManaRegen,
    /// Physical attack boost.
    PhysPower,
    /// Magical attack boost.
    MagicPower,
    /// Physical defense boost.
    PhysShield,
    /// Magical defense boost.
    MagicShield,
    /// Movement/attack speed boost.
    Haste,
    /// Movement/attack speed reduction.
    Slow,
    /// Evasion boost.
    Evasion,
    /// Critical rate boost.
    CritRate,
    /// Maximum HP boost.
    VitalForce,
}

impl AbnormalType {
    /// Checks if this is the stackless [`AbnormalType::None`] tag.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl Default for AbnormalType {
    fn default() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_detection() {
        assert!(AbnormalType::None.is_none());
        assert!(!AbnormalType::Poison.is_none());
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(AbnormalType::default(), AbnormalType::None);
    }
}
