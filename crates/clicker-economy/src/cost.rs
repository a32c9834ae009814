//! The geometric cost curve.
//!
//! The cost of buying the level after `level` is
//!
//! ```text
//! floor(base_cost * cost_growth_factor ^ level)
//! ```
//!
//! evaluated in `f64` and truncated toward zero. Keeping the floating-point
//! evaluation means costs match what existing save data was priced against;
//! results beyond `u64::MAX` saturate.

use clicker_types::UpgradeDefinition;

/// Cost of the next level for an upgrade currently owned at `level`.
///
/// Level 0 costs exactly `base_cost`. The curve is non-decreasing in
/// `level` because the catalog guarantees `cost_growth_factor > 1`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn cost_at_level(def: &UpgradeDefinition, level: u32) -> u64 {
    let raw = (def.base_cost as f64) * def.cost_growth_factor.powf(f64::from(level));
    // `as` saturates at u64::MAX and maps NaN to 0; the catalog rules out
    // the inputs that would produce NaN.
    raw.floor() as u64
}

/// Cost of the next level, or `None` once `level` has reached the cap.
pub fn next_cost(def: &UpgradeDefinition, level: u32) -> Option<u64> {
    (level < def.max_level).then(|| cost_at_level(def, level))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clicker_types::{UpgradeId, UpgradeKind};

    use super::*;
    use crate::catalog::UpgradeCatalog;

    fn clicker() -> UpgradeDefinition {
        UpgradeDefinition {
            id: UpgradeId::from("upgrade1_cpc"),
            name: String::new(),
            description: String::new(),
            kind: UpgradeKind::PerActionYield,
            effect_per_level: 1,
            base_cost: 10,
            cost_growth_factor: 1.2,
            max_level: 50,
        }
    }

    #[test]
    fn level_zero_costs_base() {
        assert_eq!(cost_at_level(&clicker(), 0), 10);
    }

    #[test]
    fn truncates_toward_zero() {
        let def = clicker();
        assert_eq!(cost_at_level(&def, 1), 12);
        // 10 * 1.44 = 14.4
        assert_eq!(cost_at_level(&def, 2), 14);
        // 10 * 1.728 = 17.28
        assert_eq!(cost_at_level(&def, 3), 17);
    }

    #[test]
    fn builtin_first_costs() {
        let catalog = UpgradeCatalog::builtin();
        let first: Vec<u64> = catalog
            .definitions()
            .iter()
            .map(|def| cost_at_level(def, 0))
            .collect();
        assert_eq!(first, vec![10, 100, 200, 1500]);

        let factory = catalog.lookup("upgrade2_cps").unwrap();
        // 1500 * 1.4 = 2100
        assert_eq!(cost_at_level(factory, 1), 2100);
    }

    #[test]
    fn non_decreasing_across_all_levels() {
        let catalog = UpgradeCatalog::builtin();
        for def in catalog.definitions() {
            let mut previous = 0;
            for level in 0..=def.max_level {
                let cost = cost_at_level(def, level);
                assert!(cost >= previous, "{} level {level}", def.id);
                previous = cost;
            }
        }
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut def = clicker();
        def.base_cost = u64::MAX;
        def.cost_growth_factor = 10.0;
        assert_eq!(cost_at_level(&def, 400), u64::MAX);
    }

    #[test]
    fn next_cost_stops_at_cap() {
        let def = clicker();
        assert_eq!(next_cost(&def, 49), Some(cost_at_level(&def, 49)));
        assert_eq!(next_cost(&def, 50), None);
        assert_eq!(next_cost(&def, 60), None);
    }
}
