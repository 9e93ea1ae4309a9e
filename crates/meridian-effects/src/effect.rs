//! Atomic effects: the concrete stat/behavior modifiers carried by an
//! effect instance, plus the special-behavior flag bitset aggregated
//! from them.

use crate::owner::Creature;
use crate::skill::Skill;
use bitflags::bitflags;

bitflags! {
    /// Special-behavior flags contributed by active effects.
    ///
    /// The effect list keeps an OR-combined word of these over all
    /// in-use, non-passive, non-augment instances.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectFlags: u64 {
        /// Cannot act at all.
        const STUNNED       = 1 << 0;
        /// Cannot move.
        const ROOTED        = 1 << 1;
        /// Cannot cast.
        const SILENCED      = 1 << 2;
        /// Sight blocked.
        const BLINDED       = 1 << 3;
        /// Immune to damage.
        const INVULNERABLE  = 1 << 4;
        /// Locked in a one-on-one duel; outside attackers are refused.
        const FACEOFF       = 1 << 5;
        /// Cannot be targeted.
        const UNTARGETABLE  = 1 << 6;
        /// Forced to flee.
        const FEARED        = 1 << 7;
        /// Cannot speak/chat.
        const MUTED         = 1 << 8;
        /// Cannot use weapon attacks.
        const DISARMED      = 1 << 9;
        /// Asleep until damaged.
        const ASLEEP        = 1 << 10;
    }
}

/// Borrowed view of the parties involved in an effect application.
///
/// Handed to [`Effect`] callbacks so they can modify the effected
/// creature and consult the effector or the source skill.
pub struct EffectContext<'a> {
    /// The creature that applied the effect, if any.
    pub effector: Option<&'a dyn Creature>,
    /// The creature the effect is applied to.
    pub effected: &'a dyn Creature,
    /// The source skill; `None` for augmentation options.
    pub skill: Option<&'a Skill>,
}

/// A single concrete stat or behavior modifier.
///
/// Skills and augmentation options bundle one or more of these into an
/// effect instance. `on_start` applies the modification when the
/// instance is initialized; `on_exit` rolls it back when the instance
/// is stopped.
pub trait Effect: Send + Sync {
    /// Flags this effect contributes while active.
    fn flags(&self) -> EffectFlags {
        EffectFlags::empty()
    }

    /// Applies the modification.
    fn on_start(&self, ctx: &EffectContext<'_>);

    /// Rolls the modification back.
    fn on_exit(&self, ctx: &EffectContext<'_>);
}
