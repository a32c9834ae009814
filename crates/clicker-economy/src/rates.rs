//! Derived yield computation.
//!
//! Rates are always recomputed from the full `upgrade_levels` map rather
//! than patched incrementally after a purchase, so a rate can never drift
//! from the levels it is derived from.

use clicker_types::{DerivedRates, EconomyState, UpgradeKind};
use tracing::trace;

use crate::catalog::UpgradeCatalog;

/// Compute per-action and per-interval yields from owned levels.
///
/// Starts from [`DerivedRates::BASE`] and adds `effect_per_level * level`
/// for every owned upgrade. Ids the catalog does not know are skipped: save
/// data from an older catalog keeps loading and simply contributes nothing.
pub fn compute_rates(state: &EconomyState, catalog: &UpgradeCatalog) -> DerivedRates {
    let mut rates = DerivedRates::BASE;

    for (id, &level) in &state.upgrade_levels {
        let Some(def) = catalog.lookup(id.as_str()) else {
            trace!(upgrade = %id, level, "Skipping unknown upgrade in rate computation");
            continue;
        };
        let contribution = def.effect_per_level.saturating_mul(u64::from(level));
        match def.kind {
            UpgradeKind::PerActionYield => {
                rates.per_action_yield = rates.per_action_yield.saturating_add(contribution);
            }
            UpgradeKind::PerIntervalYield => {
                rates.per_interval_yield = rates.per_interval_yield.saturating_add(contribution);
            }
        }
    }

    rates
}
