//! Effect instances: one application of a skill or augmentation option
//! to a creature.

use crate::effect::{Effect, EffectContext, EffectFlags};
use crate::owner::Creature;
use crate::skill::{AugmentOption, Skill};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// What produced an effect instance.
///
/// Exactly one source exists per instance; the old null-skill-means-
/// option discrimination is replaced by this sum type.
#[derive(Clone)]
pub enum EffectSource {
    /// A cast or triggered skill.
    Skill(Arc<Skill>),
    /// An item augmentation option.
    Augment(Arc<AugmentOption>),
}

impl fmt::Debug for EffectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(skill) => f.debug_tuple("Skill").field(&skill.id()).finish(),
            Self::Augment(option) => f.debug_tuple("Augment").field(&option.id()).finish(),
        }
    }
}

/// One application of a skill/option effect to a creature.
///
/// Owned by the effect list once added. The in-use flag distinguishes
/// active instances from hidden ones that only keep their timer running
/// while a stronger same-type effect is in front of them.
pub struct EffectInstance {
    source: EffectSource,
    effector: Option<Arc<dyn Creature>>,
    effected: Arc<dyn Creature>,
    effects: Vec<Arc<dyn Effect>>,
    in_use: AtomicBool,
    time_left: AtomicU32,
    finished: AtomicBool,
}

impl EffectInstance {
    /// Creates an instance from a skill application.
    #[must_use]
    pub fn of_skill(
        skill: Arc<Skill>,
        effector: Option<Arc<dyn Creature>>,
        effected: Arc<dyn Creature>,
        effects: Vec<Arc<dyn Effect>>,
        duration_ticks: u32,
    ) -> Self {
        Self {
            source: EffectSource::Skill(skill),
            effector,
            effected,
            effects,
            in_use: AtomicBool::new(false),
            time_left: AtomicU32::new(duration_ticks),
            finished: AtomicBool::new(false),
        }
    }

    /// Creates an instance from an augmentation option.
    #[must_use]
    pub fn of_augment(
        option: Arc<AugmentOption>,
        effected: Arc<dyn Creature>,
        effects: Vec<Arc<dyn Effect>>,
    ) -> Self {
        Self {
            source: EffectSource::Augment(option),
            effector: None,
            effected,
            effects,
            in_use: AtomicBool::new(false),
            time_left: AtomicU32::new(0),
            finished: AtomicBool::new(false),
        }
    }

    /// The source of this instance.
    #[must_use]
    pub const fn source(&self) -> &EffectSource {
        &self.source
    }

    /// The source skill, if this instance came from one.
    #[must_use]
    pub fn skill(&self) -> Option<&Arc<Skill>> {
        match &self.source {
            EffectSource::Skill(skill) => Some(skill),
            EffectSource::Augment(_) => None,
        }
    }

    /// The augmentation option, if this instance came from one.
    #[must_use]
    pub fn augment(&self) -> Option<&Arc<AugmentOption>> {
        match &self.source {
            EffectSource::Skill(_) => None,
            EffectSource::Augment(option) => Some(option),
        }
    }

    /// The creature that applied this effect, if any.
    #[must_use]
    pub fn effector(&self) -> Option<&Arc<dyn Creature>> {
        self.effector.as_ref()
    }

    /// The creature this effect is applied to.
    #[must_use]
    pub fn effected(&self) -> &Arc<dyn Creature> {
        &self.effected
    }

    /// The atomic effects carried by this instance.
    #[must_use]
    pub fn effects(&self) -> &[Arc<dyn Effect>] {
        &self.effects
    }

    /// Checks whether the instance currently contributes to stats/flags.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }

    /// Switches the instance between active and hidden.
    pub fn set_in_use(&self, in_use: bool) {
        self.in_use.store(in_use, Ordering::Release);
    }

    /// Remaining duration in scheduler ticks.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left.load(Ordering::Relaxed)
    }

    /// Updates the remaining duration; driven by the external scheduler.
    pub fn set_time_left(&self, ticks: u32) {
        self.time_left.store(ticks, Ordering::Relaxed);
    }

    /// OR of the flag masks of all carried atomic effects.
    #[must_use]
    pub fn flags(&self) -> EffectFlags {
        self.effects
            .iter()
            .fold(EffectFlags::empty(), |acc, e| acc | e.flags())
    }

    /// Marks the instance active and applies its atomic effects.
    pub fn initialize_effects(&self) {
        self.set_in_use(true);
        let ctx = self.context();
        for effect in &self.effects {
            effect.on_start(&ctx);
        }
    }

    /// Rolls back the atomic effects exactly once.
    ///
    /// `removed` distinguishes explicit removal/cancellation from
    /// natural expiry; only natural expiry runs the skill's END-scope
    /// side effects. Repeat calls are no-ops.
    pub fn stop_effects(&self, removed: bool) {
        if self.finished.swap(true, Ordering::AcqRel) {
            return;
        }
        let ctx = self.context();
        for effect in &self.effects {
            effect.on_exit(&ctx);
        }
        if !removed {
            if let Some(skill) = self.skill() {
                skill.apply_end_effects(&ctx);
            }
        }
    }

    fn context(&self) -> EffectContext<'_> {
        EffectContext {
            effector: self.effector.as_deref(),
            effected: self.effected.as_ref(),
            skill: self.skill().map(Arc::as_ref),
        }
    }
}

impl fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectInstance")
            .field("source", &self.source)
            .field("effected", &self.effected.id())
            .field("in_use", &self.is_in_use())
            .field("time_left", &self.time_left())
            .finish_non_exhaustive()
    }
}
