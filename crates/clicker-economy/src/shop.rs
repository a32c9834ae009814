//! Per-upgrade shop view.

use clicker_types::{EconomyState, UpgradeStatus};

use crate::catalog::UpgradeCatalog;
use crate::cost::next_cost;

/// Project `state` onto every catalog entry, in catalog order.
pub fn upgrade_statuses(state: &EconomyState, catalog: &UpgradeCatalog) -> Vec<UpgradeStatus> {
    catalog
        .definitions()
        .iter()
        .map(|def| {
            let level = state.level_of(def.id.as_str());
            let next_cost = next_cost(def, level);
            UpgradeStatus {
                id: def.id.clone(),
                name: def.name.clone(),
                kind: def.kind,
                level,
                max_level: def.max_level,
                next_cost,
                affordable: next_cost.is_some_and(|cost| state.balance >= cost),
                maxed: next_cost.is_none(),
            }
        })
        .collect()
}
