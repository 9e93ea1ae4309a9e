//! Skill and augmentation-option descriptors.
//!
//! A [`Skill`] is the static template an effect instance is created
//! from: identity, abnormal stacking data, and the predicate surface the
//! effect list consults when deciding how to slot, stack and remove the
//! resulting effects. An [`AugmentOption`] is the skill-less equivalent
//! for item augmentation effects.

use crate::abnormal::AbnormalType;
use crate::effect::{Effect, EffectContext};
use crate::owner::Creature;
use meridian_common::{AugmentId, SkillId};
use std::fmt;
use std::sync::Arc;

/// Activation condition evaluated against effector/effected.
pub type SkillCondition =
    Arc<dyn Fn(Option<&dyn Creature>, &dyn Creature) -> bool + Send + Sync>;

/// Static skill template consumed by the effect list.
#[derive(Clone)]
pub struct Skill {
    id: SkillId,
    level: u16,
    sub_level: u16,
    name: String,
    abnormal_type: AbnormalType,
    abnormal_level: u8,
    passive: bool,
    debuff: bool,
    toggle: bool,
    dance: bool,
    triggered: bool,
    bad: bool,
    abnormal_instant: bool,
    healing_potion: bool,
    removed_on_action: bool,
    removed_on_damage: bool,
    stay_after_death: bool,
    irreplacable: bool,
    necessary_toggle: bool,
    ignores_slot_limit: bool,
    toggle_group: i32,
    condition: Option<SkillCondition>,
    end_effects: Vec<Arc<dyn Effect>>,
}

impl Skill {
    /// Creates a new skill template with the given identity.
    ///
    /// All predicates default to false; the skill routes to the buff
    /// slot until flagged otherwise.
    #[must_use]
    pub fn new(id: SkillId, level: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            level,
            sub_level: 0,
            name: name.into(),
            abnormal_type: AbnormalType::None,
            abnormal_level: 0,
            passive: false,
            debuff: false,
            toggle: false,
            dance: false,
            triggered: false,
            bad: false,
            abnormal_instant: false,
            healing_potion: false,
            removed_on_action: false,
            removed_on_damage: false,
            stay_after_death: false,
            irreplacable: false,
            necessary_toggle: false,
            ignores_slot_limit: false,
            toggle_group: 0,
            condition: None,
            end_effects: Vec::new(),
        }
    }

    /// Sets the enchant sub-level.
    #[must_use]
    pub fn with_sub_level(mut self, sub_level: u16) -> Self {
        self.sub_level = sub_level;
        self
    }

    /// Sets the abnormal stacking group and level.
    #[must_use]
    pub fn with_abnormal(mut self, abnormal_type: AbnormalType, level: u8) -> Self {
        self.abnormal_type = abnormal_type;
        self.abnormal_level = level;
        self
    }

    /// Marks the skill as passive.
    #[must_use]
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Marks the skill as a debuff.
    #[must_use]
    pub fn debuff(mut self) -> Self {
        self.debuff = true;
        self
    }

    /// Marks the skill as a toggle, optionally assigning a toggle group.
    #[must_use]
    pub fn toggle(mut self, group: i32) -> Self {
        self.toggle = true;
        self.toggle_group = group;
        self
    }

    /// Marks the skill as a dance/song.
    #[must_use]
    pub fn dance(mut self) -> Self {
        self.dance = true;
        self
    }

    /// Marks the skill as a triggered skill.
    #[must_use]
    pub fn triggered(mut self) -> Self {
        self.triggered = true;
        self
    }

    /// Marks the skill as harmful.
    #[must_use]
    pub fn bad(mut self) -> Self {
        self.bad = true;
        self
    }

    /// Marks the skill as an instant/"herb" effect: when superseded by a
    /// same-type effect it hides instead of being destroyed.
    #[must_use]
    pub fn abnormal_instant(mut self) -> Self {
        self.abnormal_instant = true;
        self
    }

    /// Marks the skill as a healing-potion/short-buff skill.
    #[must_use]
    pub fn healing_potion(mut self) -> Self {
        self.healing_potion = true;
        self
    }

    /// Removes the resulting effect on any action except movement.
    #[must_use]
    pub fn removed_on_action(mut self) -> Self {
        self.removed_on_action = true;
        self
    }

    /// Removes the resulting effect when the owner takes damage.
    #[must_use]
    pub fn removed_on_damage(mut self) -> Self {
        self.removed_on_damage = true;
        self
    }

    /// Keeps the resulting effect through the owner's death.
    #[must_use]
    pub fn stay_after_death(mut self) -> Self {
        self.stay_after_death = true;
        self
    }

    /// Marks the buff as irreplacable (survives profile swaps).
    #[must_use]
    pub fn irreplacable(mut self) -> Self {
        self.irreplacable = true;
        self
    }

    /// Marks the toggle as necessary: bulk toggle removal spares it.
    #[must_use]
    pub fn necessary_toggle(mut self) -> Self {
        self.necessary_toggle = true;
        self
    }

    /// Exempts the skill from slot-limit eviction entirely.
    #[must_use]
    pub fn ignores_slot_limit(mut self) -> Self {
        self.ignores_slot_limit = true;
        self
    }

    /// Sets the activation condition checked before passives attach.
    #[must_use]
    pub fn with_condition(mut self, condition: SkillCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Adds effects applied only when the instance expires naturally.
    #[must_use]
    pub fn with_end_effects(mut self, effects: Vec<Arc<dyn Effect>>) -> Self {
        self.end_effects = effects;
        self
    }

    /// Skill identity.
    #[must_use]
    pub const fn id(&self) -> SkillId {
        self.id
    }

    /// Skill level.
    #[must_use]
    pub const fn level(&self) -> u16 {
        self.level
    }

    /// Skill enchant sub-level.
    #[must_use]
    pub const fn sub_level(&self) -> u16 {
        self.sub_level
    }

    /// Skill display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abnormal stacking group.
    #[must_use]
    pub const fn abnormal_type(&self) -> AbnormalType {
        self.abnormal_type
    }

    /// Abnormal strength tier within the stacking group.
    #[must_use]
    pub const fn abnormal_level(&self) -> u8 {
        self.abnormal_level
    }

    /// Checks if the skill is passive.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        self.passive
    }

    /// Checks if the skill is a debuff.
    #[must_use]
    pub const fn is_debuff(&self) -> bool {
        self.debuff
    }

    /// Checks if the skill is a toggle.
    #[must_use]
    pub const fn is_toggle(&self) -> bool {
        self.toggle
    }

    /// Checks if the skill is a dance/song.
    #[must_use]
    pub const fn is_dance(&self) -> bool {
        self.dance
    }

    /// Checks if the skill is a triggered skill.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Checks if the skill is harmful.
    #[must_use]
    pub const fn is_bad(&self) -> bool {
        self.bad
    }

    /// Checks if the skill is an instant/"herb" effect.
    #[must_use]
    pub const fn is_abnormal_instant(&self) -> bool {
        self.abnormal_instant
    }

    /// Checks if the skill is a healing-potion/short-buff skill.
    #[must_use]
    pub const fn is_healing_potion(&self) -> bool {
        self.healing_potion
    }

    /// Checks if the effect is removed on any action except movement.
    #[must_use]
    pub const fn is_removed_on_action(&self) -> bool {
        self.removed_on_action
    }

    /// Checks if the effect is removed when the owner takes damage.
    #[must_use]
    pub const fn is_removed_on_damage(&self) -> bool {
        self.removed_on_damage
    }

    /// Checks if the effect persists through death.
    #[must_use]
    pub const fn is_stay_after_death(&self) -> bool {
        self.stay_after_death
    }

    /// Checks if the buff is irreplacable.
    #[must_use]
    pub const fn is_irreplacable(&self) -> bool {
        self.irreplacable
    }

    /// Checks if the toggle is necessary.
    #[must_use]
    pub const fn is_necessary_toggle(&self) -> bool {
        self.necessary_toggle
    }

    /// Checks if the skill is exempt from slot-limit eviction.
    #[must_use]
    pub const fn is_slot_limit_exempt(&self) -> bool {
        self.ignores_slot_limit
    }

    /// Toggle group this skill belongs to (0 = ungrouped).
    #[must_use]
    pub const fn toggle_group(&self) -> i32 {
        self.toggle_group
    }

    /// Evaluates the activation condition; unconditioned skills pass.
    #[must_use]
    pub fn check_condition(
        &self,
        effector: Option<&dyn Creature>,
        effected: &dyn Creature,
    ) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |cond| cond(effector, effected))
    }

    /// Applies the END-scope effects, used on natural expiry only.
    pub fn apply_end_effects(&self, ctx: &EffectContext<'_>) {
        for effect in &self.end_effects {
            effect.on_start(ctx);
        }
    }
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("id", &self.id)
            .field("level", &self.level)
            .field("name", &self.name)
            .field("abnormal_type", &self.abnormal_type)
            .field("abnormal_level", &self.abnormal_level)
            .finish_non_exhaustive()
    }
}

/// Item augmentation option descriptor: a skill-less effect source.
#[derive(Debug, Clone)]
pub struct AugmentOption {
    id: AugmentId,
    name: String,
}

impl AugmentOption {
    /// Creates a new augmentation option descriptor.
    #[must_use]
    pub fn new(id: AugmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Option identity.
    #[must_use]
    pub const fn id(&self) -> AugmentId {
        self.id
    }

    /// Option display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
