//! Effect list configuration.

use serde::{Deserialize, Serialize};

/// Global slot caps for an effect list.
///
/// The ordinary buff cap is per-owner and comes from
/// [`crate::owner::Creature::max_buff_count`]; dances and triggered
/// skills share these server-wide limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectListConfig {
    /// Maximum concurrent dances/songs.
    pub max_dances: usize,
    /// Maximum concurrent triggered-skill buffs.
    pub max_triggered: usize,
}

impl Default for EffectListConfig {
    fn default() -> Self {
        Self {
            max_dances: 12,
            max_triggered: 12,
        }
    }
}
