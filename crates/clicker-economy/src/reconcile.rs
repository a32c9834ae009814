//! Normalising state restored from save data.
//!
//! Save data is trusted (there is no anti-cheat validation) but it may come
//! from an older catalog. Reconciliation restores the level invariants
//! against the current catalog:
//!
//! - zero-level entries are dropped, since absence already means level 0;
//! - levels above a known upgrade's `max_level` are clamped to the cap;
//! - ids the catalog does not know are kept or dropped per
//!   [`UnknownUpgradePolicy`]. Kept ids contribute nothing to rates.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use clicker_types::EconomyState;

use crate::catalog::UpgradeCatalog;

/// What to do with upgrade ids the catalog does not define.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownUpgradePolicy {
    /// Keep them in `upgrade_levels`; they are written back on save.
    #[default]
    Preserve,
    /// Drop them while loading.
    Prune,
}

/// Bring restored state in line with `catalog`.
pub fn reconcile(
    mut state: EconomyState,
    catalog: &UpgradeCatalog,
    policy: UnknownUpgradePolicy,
) -> EconomyState {
    state.upgrade_levels.retain(|id, level| {
        if *level == 0 {
            return false;
        }
        match catalog.lookup(id.as_str()) {
            Some(def) => {
                if *level > def.max_level {
                    warn!(
                        upgrade = %id,
                        level = *level,
                        max_level = def.max_level,
                        "Clamping restored upgrade level to cap"
                    );
                    *level = def.max_level;
                }
                true
            }
            None => match policy {
                UnknownUpgradePolicy::Preserve => {
                    info!(upgrade = %id, level = *level, "Keeping unknown upgrade from save data");
                    true
                }
                UnknownUpgradePolicy::Prune => {
                    info!(upgrade = %id, level = *level, "Pruning unknown upgrade from save data");
                    false
                }
            },
        }
    });
    state
}
