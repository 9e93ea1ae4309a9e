//! The per-creature effect list.
//!
//! Holds every effect instance affecting one creature and manages the
//! logic that controls whether an incoming effect is added, removed,
//! replaced or set inactive. Seven slot categories are kept in insertion
//! order (display order), a stack index gives O(1) lookups per abnormal
//! type, and a flag word plus icon updates are refreshed once per
//! logical operation.
//!
//! Multiple worker threads may mutate the same list concurrently;
//! mutating operations serialize on an internal operation lock while
//! queries stay lock-free or take short read locks only.

use crate::abnormal::AbnormalType;
use crate::channel::{StatusChannel, StatusIcon, StatusUpdate};
use crate::config::EffectListConfig;
use crate::effect::EffectFlags;
use crate::instance::{EffectInstance, EffectSource};
use crate::owner::Creature;
use crate::skill::Skill;
use dashmap::{DashMap, DashSet};
use meridian_common::SkillId;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// The seven effect slot categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Ordinary beneficial buffs.
    Buff,
    /// Effects from triggered skills.
    Triggered,
    /// Dances and songs.
    Dance,
    /// Toggle skills.
    Toggle,
    /// Harmful effects.
    Debuff,
    /// Passive skills; bypass most list operations.
    Passive,
    /// Item augmentation options; bypass most list operations.
    Augment,
}

impl EffectCategory {
    /// The categories that contribute to flags, icons and counts.
    pub const ACTIVE: [Self; 5] = [
        Self::Buff,
        Self::Triggered,
        Self::Dance,
        Self::Toggle,
        Self::Debuff,
    ];

    /// Routes a skill to its slot category. Pure and total.
    #[must_use]
    pub fn of_skill(skill: &Skill) -> Self {
        if skill.is_passive() {
            Self::Passive
        } else if skill.is_debuff() {
            Self::Debuff
        } else if skill.is_triggered() {
            Self::Triggered
        } else if skill.is_dance() {
            Self::Dance
        } else if skill.is_toggle() {
            Self::Toggle
        } else {
            Self::Buff
        }
    }

    /// Routes an effect source to its slot category. Pure and total.
    #[must_use]
    pub fn of_source(source: &EffectSource) -> Self {
        match source {
            EffectSource::Skill(skill) => Self::of_skill(skill),
            EffectSource::Augment(_) => Self::Augment,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Seven ordered, independently locked instance collections.
///
/// Vectors are constructed eagerly but empty; a never-populated category
/// answers without allocating. Iteration is snapshot-based so concurrent
/// removal never faults an iterating thread.
struct SlotStore {
    slots: [RwLock<Vec<Arc<EffectInstance>>>; 7],
}

impl SlotStore {
    fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| RwLock::new(Vec::new())),
        }
    }

    fn snapshot(&self, category: EffectCategory) -> Vec<Arc<EffectInstance>> {
        self.slots[category.index()].read().clone()
    }

    fn len(&self, category: EffectCategory) -> usize {
        self.slots[category.index()].read().len()
    }

    fn is_empty(&self, category: EffectCategory) -> bool {
        self.slots[category.index()].read().is_empty()
    }

    fn push(&self, category: EffectCategory, info: Arc<EffectInstance>) {
        self.slots[category.index()].write().push(info);
    }

    /// Removes by identity. Returns false when the instance was absent,
    /// which makes repeated stops no-ops.
    fn remove(&self, category: EffectCategory, info: &Arc<EffectInstance>) -> bool {
        let mut slot = self.slots[category.index()].write();
        match slot.iter().position(|i| Arc::ptr_eq(i, info)) {
            Some(idx) => {
                slot.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Effect list of one creature.
pub struct EffectList {
    owner: Arc<dyn Creature>,
    channel: Arc<dyn StatusChannel>,
    config: EffectListConfig,
    slots: SlotStore,
    /// Currently dominant instance per abnormal type.
    stacked: DashMap<AbnormalType, Arc<EffectInstance>>,
    /// Abnormal types this creature is forbidden from receiving.
    blocked: DashSet<AbnormalType>,
    /// Dedicated single-slot display for healing-potion skills.
    short_buff: RwLock<Option<Arc<EffectInstance>>>,
    hidden_buffs: AtomicU32,
    removed_on_action: AtomicI32,
    removed_on_damage: AtomicI32,
    flags: AtomicU64,
    /// When set, the next refresh suppresses the owner's personal icons.
    party_only: AtomicBool,
    /// Serializes mutating operations; queries never take it.
    op: Mutex<()>,
}

impl EffectList {
    /// Creates the effect list for `owner`, publishing presentation
    /// updates on `channel`.
    #[must_use]
    pub fn new(owner: Arc<dyn Creature>, channel: Arc<dyn StatusChannel>) -> Self {
        Self::with_config(owner, channel, EffectListConfig::default())
    }

    /// Creates the effect list with explicit slot caps.
    #[must_use]
    pub fn with_config(
        owner: Arc<dyn Creature>,
        channel: Arc<dyn StatusChannel>,
        config: EffectListConfig,
    ) -> Self {
        Self {
            owner,
            channel,
            config,
            slots: SlotStore::new(),
            stacked: DashMap::new(),
            blocked: DashSet::new(),
            short_buff: RwLock::new(None),
            hidden_buffs: AtomicU32::new(0),
            removed_on_action: AtomicI32::new(0),
            removed_on_damage: AtomicI32::new(0),
            flags: AtomicU64::new(0),
            party_only: AtomicBool::new(false),
            op: Mutex::new(()),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Snapshot of one slot category in display order.
    #[must_use]
    pub fn snapshot(&self, category: EffectCategory) -> Vec<Arc<EffectInstance>> {
        self.slots.snapshot(category)
    }

    /// All instances across the five active categories, hidden included.
    #[must_use]
    pub fn active_effects(&self) -> Vec<Arc<EffectInstance>> {
        let mut all = Vec::new();
        for category in EffectCategory::ACTIVE {
            all.extend(self.slots.snapshot(category));
        }
        all
    }

    /// Checks if a category currently holds any instances.
    #[must_use]
    pub fn has(&self, category: EffectCategory) -> bool {
        !self.slots.is_empty(category)
    }

    /// Checks if all five active categories are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        EffectCategory::ACTIVE
            .into_iter()
            .all(|category| self.slots.is_empty(category))
    }

    /// Buff count excluding hidden buffs and the short-buff slot.
    #[must_use]
    pub fn buff_count(&self) -> usize {
        let hidden = self.hidden_buffs.load(Ordering::SeqCst) as usize;
        let short = usize::from(self.short_buff.read().is_some());
        self.slots
            .len(EffectCategory::Buff)
            .saturating_sub(hidden + short)
    }

    /// Number of active dances/songs.
    #[must_use]
    pub fn dance_count(&self) -> usize {
        self.slots.len(EffectCategory::Dance)
    }

    /// Number of active triggered-skill buffs.
    #[must_use]
    pub fn triggered_count(&self) -> usize {
        self.slots.len(EffectCategory::Triggered)
    }

    /// Number of hidden (not-in-use) buffs.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.hidden_buffs.load(Ordering::SeqCst) as usize
    }

    /// Finds the first instance created by the given skill ID.
    ///
    /// Searches the active categories and passives; augments have no
    /// skill and are never returned.
    #[must_use]
    pub fn find_by_skill_id(&self, skill_id: SkillId) -> Option<Arc<EffectInstance>> {
        const SEARCH: [EffectCategory; 6] = [
            EffectCategory::Buff,
            EffectCategory::Triggered,
            EffectCategory::Dance,
            EffectCategory::Toggle,
            EffectCategory::Debuff,
            EffectCategory::Passive,
        ];
        for category in SEARCH {
            if let Some(info) = self
                .slots
                .snapshot(category)
                .into_iter()
                .find(|i| i.skill().is_some_and(|s| s.id() == skill_id))
            {
                return Some(info);
            }
        }
        None
    }

    /// Checks if any instance was created by the given skill ID.
    #[must_use]
    pub fn is_affected_by_skill(&self, skill_id: SkillId) -> bool {
        self.find_by_skill_id(skill_id).is_some()
    }

    /// Checks if the stack index holds the given abnormal type.
    #[must_use]
    pub fn has_abnormal(&self, abnormal: AbnormalType) -> bool {
        self.stacked.contains_key(&abnormal)
    }

    /// The dominant instance for an abnormal type, in O(1).
    #[must_use]
    pub fn find_by_abnormal(&self, abnormal: AbnormalType) -> Option<Arc<EffectInstance>> {
        self.stacked.get(&abnormal).map(|e| Arc::clone(e.value()))
    }

    /// Tests the aggregated flag word.
    #[must_use]
    pub fn is_affected(&self, flags: EffectFlags) -> bool {
        self.flags.load(Ordering::SeqCst) & flags.bits() != 0
    }

    /// Current short-buff slot content.
    #[must_use]
    pub fn short_buff(&self) -> Option<Arc<EffectInstance>> {
        self.short_buff.read().clone()
    }

    // ------------------------------------------------------------------
    // Blocked abnormal types
    // ------------------------------------------------------------------

    /// Forbids the given abnormal types from being added.
    pub fn add_blocked_types(&self, types: &[AbnormalType]) {
        for abnormal in types {
            self.blocked.insert(*abnormal);
        }
    }

    /// Lifts the block for the given abnormal types.
    ///
    /// Returns true if the blocked set changed.
    pub fn remove_blocked_types(&self, types: &[AbnormalType]) -> bool {
        let mut changed = false;
        for abnormal in types {
            changed |= self.blocked.remove(abnormal).is_some();
        }
        changed
    }

    /// Snapshot of the blocked abnormal types.
    #[must_use]
    pub fn blocked_types(&self) -> Vec<AbnormalType> {
        self.blocked.iter().map(|entry| *entry.key()).collect()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Adds an effect instance to this list.
    ///
    /// Blocked, out-leveled, dead-target and condition-failed additions
    /// are silent no-ops; "the effect did not take hold" is a normal
    /// game outcome, not an error.
    pub fn add(&self, info: Arc<EffectInstance>) {
        let _guard = self.op.lock();

        let skill = match info.source() {
            EffectSource::Augment(_) => {
                // Augment options bypass stacking, slots and icons.
                self.slots.push(EffectCategory::Augment, Arc::clone(&info));
                info.initialize_effects();
                return;
            }
            EffectSource::Skill(skill) => Arc::clone(skill),
        };

        if let Some(effector) = info.effector() {
            let effected = info.effected();
            if effector.id() != effected.id() && skill.is_bad() {
                if effected.is_debuff_blocked()
                    || (effector.is_gm() && !effector.can_give_damage())
                {
                    return;
                }
                if effector.is_player()
                    && effected.is_player()
                    && self.is_affected(EffectFlags::FACEOFF)
                    && effected.duel_opponent() != Some(effector.id())
                {
                    return;
                }
            }
            if effected.is_buff_blocked() && !skill.is_bad() {
                return;
            }
        }

        if self.blocked.contains(&skill.abnormal_type()) {
            return;
        }

        if skill.is_passive() {
            self.add_passive(&info, &skill);
            return;
        }

        // No buffs on corpses.
        if info.effected().is_dead() {
            return;
        }

        if skill.abnormal_type().is_none() {
            // Same-skill replacement goes through explicit deletion so
            // the new instance lands at the end of the display order.
            self.stop_skill_effects_locked(true, skill.id());
        } else if !self.stack_with_existing(&info, &skill) {
            return;
        }

        let category = EffectCategory::of_skill(&skill);
        if !skill.is_debuff()
            && !skill.is_toggle()
            && !skill.is_slot_limit_exempt()
            && !self.does_stack(&skill)
        {
            self.evict_overflow(&skill, category);
        }

        if skill.is_removed_on_action() {
            self.removed_on_action.fetch_add(1, Ordering::SeqCst);
        }
        if skill.is_removed_on_damage() {
            self.removed_on_damage.fetch_add(1, Ordering::SeqCst);
        }

        self.slots.push(category, Arc::clone(&info));
        info.initialize_effects();
        self.update_effect_list(true);
    }

    /// Passive path: dedup by skill ID, no stacking, no slot limits.
    fn add_passive(&self, info: &Arc<EffectInstance>, skill: &Arc<Skill>) {
        if !skill.abnormal_type().is_none() {
            warn!(
                skill_id = skill.id().raw(),
                abnormal = ?skill.abnormal_type(),
                "passive skill configured with an abnormal type"
            );
        }

        if !skill.check_condition(
            info.effector().map(|a| a.as_ref() as &dyn Creature),
            info.effected().as_ref(),
        ) {
            return;
        }

        for existing in self.slots.snapshot(EffectCategory::Passive) {
            if existing.skill().is_some_and(|s| s.id() == skill.id()) {
                existing.set_in_use(false);
                self.slots.remove(EffectCategory::Passive, &existing);
            }
        }

        self.slots.push(EffectCategory::Passive, Arc::clone(info));
        info.initialize_effects();
    }

    /// Stacked path: resolves the abnormal-type contest and registers
    /// the incoming instance as the new dominant one.
    ///
    /// Returns false when the incoming instance lost and must be
    /// discarded.
    fn stack_with_existing(&self, info: &Arc<EffectInstance>, skill: &Arc<Skill>) -> bool {
        let abnormal = skill.abnormal_type();
        if let Some(existing) = self.find_by_abnormal(abnormal) {
            let existing_level = existing.skill().map_or(0, |s| s.abnormal_level());
            if skill.abnormal_level() < existing_level {
                return false;
            }

            if skill.is_abnormal_instant() {
                // Instant consumables queue behind the current holder:
                // it hides, keeps ticking, and is revived later.
                existing.set_in_use(false);
                self.hidden_buffs.fetch_add(1, Ordering::SeqCst);
                self.owner.recalculate_stats();
            } else {
                // Stopping an instant holder can promote a hidden buff
                // of the same type; stop again so the incoming effect
                // ends up the sole holder.
                if existing.skill().is_some_and(|s| s.is_abnormal_instant()) {
                    self.stop_abnormal_locked(true, abnormal);
                }
                self.stop_abnormal_locked(true, abnormal);
            }
        }
        self.stacked.insert(abnormal, Arc::clone(info));
        true
    }

    /// FIFO slot-limit eviction: walks the category in insertion order
    /// and stops the oldest in-use entries until back under the cap.
    /// Hidden entries are skipped and never evicted.
    fn evict_overflow(&self, skill: &Arc<Skill>, category: EffectCategory) {
        let mut to_remove: i64 = if skill.is_dance() {
            self.dance_count() as i64 - self.config.max_dances as i64
        } else if skill.is_triggered() {
            self.triggered_count() as i64 - self.config.max_triggered as i64
        } else if !skill.is_healing_potion() {
            self.buff_count() as i64 - self.owner.max_buff_count() as i64
        } else {
            -1
        };

        for info in self.slots.snapshot(category) {
            if to_remove < 0 {
                break;
            }
            if !info.is_in_use() {
                continue;
            }
            self.stop_and_remove(true, &info, category);
            to_remove -= 1;
        }
    }

    /// Checks if the skill already stacks with a present instance; such
    /// skills replace via the stack index and never evict other slots.
    fn does_stack(&self, skill: &Skill) -> bool {
        let abnormal = skill.abnormal_type();
        if abnormal.is_none() || self.is_empty() {
            return false;
        }
        self.slots
            .snapshot(EffectCategory::of_skill(skill))
            .iter()
            .any(|i| i.skill().is_some_and(|s| s.abnormal_type() == abnormal))
    }

    /// Removes one instance, rolls back its effects and refreshes
    /// flags/icons.
    ///
    /// `removed` distinguishes cancellation from natural expiry; only
    /// expiry runs END-scope side effects.
    pub fn remove(&self, removed: bool, info: &Arc<EffectInstance>) {
        let _guard = self.op.lock();
        let category = EffectCategory::of_source(info.source());
        self.stop_and_remove(removed, info, category);
        self.update_effect_list(true);
    }

    /// Stops all effects created by the given skill ID.
    pub fn stop_skill_effects(&self, removed: bool, skill_id: SkillId) {
        let _guard = self.op.lock();
        if self.stop_skill_effects_locked(removed, skill_id) {
            self.update_effect_list(true);
        }
    }

    /// Stops the dominant effect of an abnormal type, in O(1).
    ///
    /// Returns true if an instance of that type was present.
    pub fn stop_abnormal(&self, removed: bool, abnormal: AbnormalType) -> bool {
        let _guard = self.op.lock();
        let stopped = self.stop_abnormal_locked(removed, abnormal);
        if stopped {
            self.update_effect_list(true);
        }
        stopped
    }

    /// Exits all active effects, clears the stack index and refreshes.
    ///
    /// Necessary toggles are spared, as in any bulk toggle removal.
    pub fn stop_all_effects(&self) {
        let _guard = self.op.lock();
        self.stop_all_in_locked(EffectCategory::Buff, |_| true);
        self.stop_all_in_locked(EffectCategory::Triggered, |_| true);
        self.stop_all_in_locked(EffectCategory::Dance, |_| true);
        self.stop_all_in_locked(EffectCategory::Toggle, |skill| !skill.is_necessary_toggle());
        self.stop_all_in_locked(EffectCategory::Debuff, |_| true);
        self.stacked.clear();
        self.update_effect_list(true);
    }

    /// Death transition: removes everything that does not persist
    /// through death.
    pub fn stop_non_death_persistent(&self) {
        let _guard = self.op.lock();
        let update = !self.is_empty();
        for category in EffectCategory::ACTIVE {
            self.stop_all_in_locked(category, |skill| !skill.is_stay_after_death());
        }
        self.update_effect_list(update);
    }

    /// Profile-swap transition: removes everything replaceable.
    pub fn stop_non_irreplacable(&self) {
        let _guard = self.op.lock();
        let update = !self.is_empty();
        for category in EffectCategory::ACTIVE {
            self.stop_all_in_locked(category, |skill| !skill.is_irreplacable());
        }
        self.update_effect_list(update);
    }

    /// Stops all active buffs, optionally including triggered skills.
    pub fn stop_all_buffs(&self, update: bool, include_triggered: bool) {
        let _guard = self.op.lock();
        self.stop_all_in_locked(EffectCategory::Buff, |_| true);
        if include_triggered {
            self.stop_all_in_locked(EffectCategory::Triggered, |_| true);
        }
        self.update_effect_list(update);
    }

    /// Stops all toggles except necessary ones.
    pub fn stop_all_toggles(&self, update: bool) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Toggle) {
            self.stop_all_in_locked(EffectCategory::Toggle, |skill| {
                !skill.is_necessary_toggle()
            });
            self.update_effect_list(update);
        }
    }

    /// Stops every toggle of one toggle group.
    ///
    /// Unlike [`Self::stop_all_toggles`] this does not spare necessary
    /// toggles; the asymmetry is preserved from the modeled behavior.
    pub fn stop_toggles_of_group(&self, group: i32) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Toggle) {
            for info in self.slots.snapshot(EffectCategory::Toggle) {
                let in_group = info
                    .skill()
                    .filter(|s| s.toggle_group() == group)
                    .map(|s| s.id());
                if let Some(id) = in_group {
                    self.stop_skill_effects_locked(true, id);
                }
            }
            self.update_effect_list(true);
        }
    }

    /// Stops all dances/songs.
    pub fn stop_all_dances(&self, update: bool) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Dance) {
            self.stop_all_in_locked(EffectCategory::Dance, |_| true);
            self.update_effect_list(update);
        }
    }

    /// Stops all debuffs.
    pub fn stop_all_debuffs(&self, update: bool) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Debuff) {
            self.stop_all_in_locked(EffectCategory::Debuff, |_| true);
            self.update_effect_list(update);
        }
    }

    /// Stops all passives.
    pub fn stop_all_passives(&self, update: bool) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Passive) {
            self.stop_all_in_locked(EffectCategory::Passive, |_| true);
            self.update_effect_list(update);
        }
    }

    /// Stops all augmentation options.
    pub fn stop_all_augments(&self, update: bool) {
        let _guard = self.op.lock();
        if self.has(EffectCategory::Augment) {
            for info in self.slots.snapshot(EffectCategory::Augment) {
                self.stop_and_remove(true, &info, EffectCategory::Augment);
            }
            self.update_effect_list(update);
        }
    }

    /// Stops every instance carrying an effect with the given flag.
    pub fn stop_effects_with_flag(&self, flag: EffectFlags) {
        let _guard = self.op.lock();
        if !self.is_affected(flag) {
            return;
        }
        for category in EffectCategory::ACTIVE {
            for info in self.slots.snapshot(category) {
                if info.effects().iter().any(|e| e.flags().intersects(flag)) {
                    self.stop_and_remove(true, &info, category);
                }
            }
        }
        self.update_effect_list(true);
    }

    /// Called on any action except movement: drops effects flagged
    /// removed-on-action.
    pub fn stop_effects_on_action(&self) {
        let _guard = self.op.lock();
        if self.removed_on_action.load(Ordering::SeqCst) > 0 {
            let update = !self.is_empty();
            for category in EffectCategory::ACTIVE {
                self.stop_all_in_locked(category, Skill::is_removed_on_action);
            }
            self.update_effect_list(update);
        }
    }

    /// Called when the owner takes damage: drops effects flagged
    /// removed-on-damage.
    pub fn stop_effects_on_damage(&self) {
        let _guard = self.op.lock();
        if self.removed_on_damage.load(Ordering::SeqCst) > 0 {
            let update = !self.is_empty();
            for category in EffectCategory::ACTIVE {
                self.stop_all_in_locked(category, Skill::is_removed_on_damage);
            }
            self.update_effect_list(update);
        }
    }

    /// Refreshes flags and icons; with `party_only` the owner's own
    /// full icon list is suppressed for this one refresh.
    pub fn update_icons(&self, party_only: bool) {
        let _guard = self.op.lock();
        if party_only {
            self.party_only.store(true, Ordering::SeqCst);
        }
        self.update_effect_list(true);
    }

    /// Applies `f` to every instance in the active categories and
    /// refreshes once if any call requested it.
    pub fn for_each_active<F>(&self, f: F, include_dances: bool)
    where
        F: Fn(&Arc<EffectInstance>) -> bool,
    {
        let _guard = self.op.lock();
        let mut update = false;
        for category in EffectCategory::ACTIVE {
            if category == EffectCategory::Dance && !include_dances {
                continue;
            }
            for info in self.slots.snapshot(category) {
                update |= f(&info);
            }
        }
        self.update_effect_list(update);
    }

    /// Sets the short-buff slot and notifies; `None` resets it.
    pub fn short_buff_update(&self, info: Option<Arc<EffectInstance>>) {
        self.short_buff_set(info);
    }

    // ------------------------------------------------------------------
    // Internals (operation lock held)
    // ------------------------------------------------------------------

    fn stop_skill_effects_locked(&self, removed: bool, skill_id: SkillId) -> bool {
        match self.find_by_skill_id(skill_id) {
            Some(info) => {
                let category = EffectCategory::of_source(info.source());
                self.stop_and_remove(removed, &info, category)
            }
            None => false,
        }
    }

    fn stop_abnormal_locked(&self, removed: bool, abnormal: AbnormalType) -> bool {
        if let Some((_, old)) = self.stacked.remove(&abnormal) {
            if let Some(skill) = old.skill() {
                let id = skill.id();
                self.stop_skill_effects_locked(removed, id);
            }
            true
        } else {
            false
        }
    }

    fn stop_all_in_locked<F>(&self, category: EffectCategory, filter: F)
    where
        F: Fn(&Skill) -> bool,
    {
        for info in self.slots.snapshot(category) {
            if info.skill().is_some_and(|s| filter(s)) {
                self.stop_and_remove(true, &info, category);
            }
        }
    }

    /// Removes an instance from its slot, rolls back its effects and
    /// maintains the stack index, hidden counter and removal counters.
    ///
    /// Returns false if the instance was not present (repeat stops are
    /// no-ops, counters untouched).
    fn stop_and_remove(
        &self,
        removed: bool,
        info: &Arc<EffectInstance>,
        category: EffectCategory,
    ) -> bool {
        if !self.slots.remove(category, info) {
            return false;
        }

        info.stop_effects(removed);

        // Augment options carry no skill and no further bookkeeping.
        let Some(skill) = info.skill().map(Arc::clone) else {
            return true;
        };

        if info.is_in_use() {
            self.stacked.remove(&skill.abnormal_type());
        } else {
            // A hidden buff ending only adjusts the hidden counter.
            self.hidden_buffs.fetch_sub(1, Ordering::SeqCst);
        }

        // When an instant effect ends, the next hidden buff of the same
        // abnormal type steps forward.
        if skill.is_abnormal_instant() {
            let mut promoted = false;
            for buff in self.slots.snapshot(EffectCategory::Buff) {
                let same_type = buff
                    .skill()
                    .is_some_and(|s| s.abnormal_type() == skill.abnormal_type());
                if same_type && !buff.is_in_use() {
                    buff.set_in_use(true);
                    self.stacked.insert(skill.abnormal_type(), Arc::clone(&buff));
                    self.hidden_buffs.fetch_sub(1, Ordering::SeqCst);
                    promoted = true;
                    break;
                }
            }
            if promoted {
                self.owner.recalculate_stats();
            }
        }

        if skill.is_removed_on_action() {
            self.removed_on_action.fetch_sub(1, Ordering::SeqCst);
        }
        if skill.is_removed_on_damage() {
            self.removed_on_damage.fetch_sub(1, Ordering::SeqCst);
        }
        true
    }

    /// Once per logical operation: recompute flags, then publish icons.
    fn update_effect_list(&self, update: bool) {
        if update {
            self.compute_flags();
            self.publish_icons();
        }
    }

    /// OR-combines flags of all in-use instances in the active
    /// categories; passives, augments and hidden instances contribute
    /// nothing.
    fn compute_flags(&self) {
        let mut flags = EffectFlags::empty();
        for category in EffectCategory::ACTIVE {
            for info in self.slots.snapshot(category) {
                if info.is_in_use() {
                    flags |= info.flags();
                }
            }
        }
        self.flags.store(flags.bits(), Ordering::SeqCst);
    }

    /// Builds and dispatches the presentation updates for the current
    /// slot contents. Hidden instances never show; healing-potion
    /// skills route through the dedicated short-buff slot.
    fn publish_icons(&self) {
        if self.owner.is_playable() {
            let personal =
                self.owner.is_player() && !self.party_only.swap(false, Ordering::SeqCst);
            let mut personal_icons = personal.then(Vec::new);
            let mut party_icons = self.owner.is_in_party().then(Vec::new);
            let mut observer_icons = self.owner.is_observed().then(Vec::new);

            for category in EffectCategory::ACTIVE {
                for info in self.slots.snapshot(category) {
                    let Some(skill) = info.skill().map(Arc::clone) else {
                        continue;
                    };
                    if skill.is_healing_potion() {
                        self.short_buff_set(Some(info));
                        continue;
                    }
                    if !info.is_in_use() {
                        continue;
                    }
                    let Some(icon) = StatusIcon::from_instance(&info) else {
                        continue;
                    };
                    if let Some(icons) = personal_icons.as_mut() {
                        icons.push(icon.clone());
                    }
                    if let Some(icons) = party_icons.as_mut() {
                        if !skill.is_toggle() {
                            icons.push(icon.clone());
                        }
                    }
                    if let Some(icons) = observer_icons.as_mut() {
                        icons.push(icon);
                    }
                }
            }

            if let Some(icons) = personal_icons {
                self.publish(StatusUpdate::Icons {
                    owner: self.owner.id(),
                    icons,
                });
            }
            if let Some(icons) = party_icons {
                self.publish(StatusUpdate::PartyIcons {
                    owner: self.owner.id(),
                    icons,
                });
            }
            if let Some(icons) = observer_icons {
                self.publish(StatusUpdate::ObserverIcons {
                    owner: self.owner.id(),
                    icons,
                });
            }
        }

        // Everyone currently targeting the owner; the transport resolves
        // the recipients.
        let mut icons = Vec::new();
        for category in EffectCategory::ACTIVE {
            for info in self.slots.snapshot(category) {
                if !info.is_in_use() {
                    continue;
                }
                if info.skill().is_some_and(|skill| skill.is_healing_potion()) {
                    continue;
                }
                if let Some(icon) = StatusIcon::from_instance(&info) {
                    icons.push(icon);
                }
            }
        }
        self.publish(StatusUpdate::TargetStatus {
            owner: self.owner.id(),
            icons,
        });
    }

    fn short_buff_set(&self, info: Option<Arc<EffectInstance>>) {
        if !self.owner.is_player() {
            return;
        }
        let icon = info.as_ref().and_then(|i| StatusIcon::from_instance(i));
        *self.short_buff.write() = info;
        self.publish(StatusUpdate::ShortBuff {
            owner: self.owner.id(),
            icon,
        });
    }

    /// Transport failures are logged here and never escape into the
    /// game loop.
    fn publish(&self, update: StatusUpdate) {
        if let Err(err) = self.channel.publish(update) {
            warn!(owner = self.owner.id().raw(), %err, "dropping status update");
        }
    }
}
