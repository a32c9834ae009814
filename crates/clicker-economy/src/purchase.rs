//! Upgrade purchase validation and application.
//!
//! [`purchase`] is a pure transition: it never mutates its input and the
//! caller decides whether to commit the returned state. A rejected purchase
//! returns the reason and leaves nothing to commit.
//!
//! # Validation order
//!
//! 1. The id must resolve in the catalog ([`PurchaseError::UnknownUpgrade`]).
//! 2. The owned level must be below `max_level`
//!    ([`PurchaseError::MaxLevelReached`]), checked before the balance so a
//!    capped upgrade reports the cap no matter how rich the player is.
//! 3. The balance must cover the next-level cost
//!    ([`PurchaseError::InsufficientBalance`], which carries the cost).

use clicker_types::{EconomyState, UpgradeId};
use tracing::debug;

use crate::catalog::UpgradeCatalog;
use crate::cost::cost_at_level;

/// Reasons a purchase is rejected. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    /// The id is not in the catalog.
    #[error("unknown upgrade: {id}")]
    UnknownUpgrade {
        /// The requested id.
        id: UpgradeId,
    },

    /// The upgrade is already at its cap.
    #[error("{id} is already at max level {max_level}")]
    MaxLevelReached {
        /// The requested id.
        id: UpgradeId,
        /// The cap that was reached.
        max_level: u32,
    },

    /// The balance does not cover the next level.
    #[error("not enough cubes for {id}: need {cost}, have {balance}")]
    InsufficientBalance {
        /// The requested id.
        id: UpgradeId,
        /// Cost of the next level.
        cost: u64,
        /// Balance at the time of the attempt.
        balance: u64,
    },
}

/// A successful purchase: the state to commit and what was paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// State after deducting the cost and raising the level.
    pub new_state: EconomyState,
    /// Cubes deducted from the balance.
    pub cost_paid: u64,
    /// Level owned after the purchase.
    pub new_level: u32,
}

/// Validate and apply one purchase of `upgrade_id` against `state`.
///
/// On success the returned state has `balance` reduced by the cost and
/// the upgrade's level raised by one. `lifetime_earned` is untouched.
///
/// # Errors
///
/// Returns [`PurchaseError`] when the id is unknown, the upgrade is
/// capped, or the balance is short.
pub fn purchase(
    state: &EconomyState,
    catalog: &UpgradeCatalog,
    upgrade_id: &str,
) -> Result<PurchaseReceipt, PurchaseError> {
    let def = catalog
        .lookup(upgrade_id)
        .ok_or_else(|| PurchaseError::UnknownUpgrade {
            id: UpgradeId::from(upgrade_id),
        })?;

    let current_level = state.level_of(upgrade_id);
    if current_level >= def.max_level {
        return Err(PurchaseError::MaxLevelReached {
            id: def.id.clone(),
            max_level: def.max_level,
        });
    }

    let cost = cost_at_level(def, current_level);
    let Some(balance) = state.balance.checked_sub(cost) else {
        return Err(PurchaseError::InsufficientBalance {
            id: def.id.clone(),
            cost,
            balance: state.balance,
        });
    };

    // current_level < max_level <= u32::MAX, so this cannot saturate.
    let new_level = current_level.saturating_add(1);
    let mut new_state = state.clone();
    new_state.balance = balance;
    new_state.upgrade_levels.insert(def.id.clone(), new_level);

    debug!(upgrade = %def.id, cost, new_level, balance, "Upgrade purchased");

    Ok(PurchaseReceipt {
        new_state,
        cost_paid: cost,
        new_level,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clicker_types::{UpgradeDefinition, UpgradeKind};

    use super::*;
    use crate::cost::next_cost;

    /// Single-entry catalog with the scaling used in the worked examples.
    fn clicker_catalog() -> UpgradeCatalog {
        UpgradeCatalog::new(vec![UpgradeDefinition {
            id: UpgradeId::from("clicker"),
            name: "Clicker".to_owned(),
            description: String::new(),
            kind: UpgradeKind::PerActionYield,
            effect_per_level: 1,
            base_cost: 10,
            cost_growth_factor: 1.2,
            max_level: 50,
        }])
        .unwrap()
    }

    fn with_balance(balance: u64) -> EconomyState {
        EconomyState {
            balance,
            lifetime_earned: balance,
            ..EconomyState::default()
        }
    }

    #[test]
    fn exact_balance_buys_first_level() {
        let catalog = clicker_catalog();
        let receipt = purchase(&with_balance(10), &catalog, "clicker").unwrap();

        assert_eq!(receipt.cost_paid, 10);
        assert_eq!(receipt.new_level, 1);
        assert_eq!(receipt.new_state.balance, 0);
        assert_eq!(receipt.new_state.level_of("clicker"), 1);
        assert_eq!(receipt.new_state.lifetime_earned, 10);

        let def = catalog.lookup("clicker").unwrap();
        assert_eq!(next_cost(def, 1), Some(12));
    }

    #[test]
    fn short_balance_reports_cost() {
        let catalog = clicker_catalog();
        let state = with_balance(9);
        let err = purchase(&state, &catalog, "clicker").unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientBalance {
                id: UpgradeId::from("clicker"),
                cost: 10,
                balance: 9,
            }
        );
        assert_eq!(state.balance, 9);
        assert_eq!(state.level_of("clicker"), 0);
    }

    #[test]
    fn capped_upgrade_rejected_regardless_of_balance() {
        let catalog = clicker_catalog();
        let mut state = with_balance(u64::MAX);
        state.upgrade_levels.insert(UpgradeId::from("clicker"), 50);

        let err = purchase(&state, &catalog, "clicker").unwrap_err();
        assert_eq!(
            err,
            PurchaseError::MaxLevelReached {
                id: UpgradeId::from("clicker"),
                max_level: 50,
            }
        );
    }

    #[test]
    fn unknown_id_rejected() {
        let err = purchase(&with_balance(1_000), &clicker_catalog(), "nope").unwrap_err();
        assert_eq!(
            err,
            PurchaseError::UnknownUpgrade {
                id: UpgradeId::from("nope")
            }
        );
    }

    #[test]
    fn repeated_purchases_never_exceed_cap() {
        let catalog = UpgradeCatalog::builtin();
        let mut state = with_balance(u64::MAX / 2);
        let mut attempts = 0_u32;
        while attempts < 100 {
            attempts = attempts.saturating_add(1);
            match purchase(&state, &catalog, "upgrade2_cps") {
                Ok(receipt) => state = receipt.new_state,
                Err(err) => {
                    assert!(
                        matches!(err, PurchaseError::MaxLevelReached { max_level: 5, .. }),
                        "unexpected error: {err}"
                    );
                    break;
                }
            }
        }
        assert_eq!(state.level_of("upgrade2_cps"), 5);
    }

    #[test]
    fn lifetime_untouched_and_costs_follow_curve() {
        let catalog = clicker_catalog();
        let mut state = with_balance(1_000);
        let mut paid = Vec::new();
        for _ in 0..4 {
            let receipt = purchase(&state, &catalog, "clicker").unwrap();
            paid.push(receipt.cost_paid);
            state = receipt.new_state;
        }
        assert_eq!(paid, vec![10, 12, 14, 17]);
        // 1000 - (10 + 12 + 14 + 17)
        assert_eq!(state.balance, 947);
        assert_eq!(state.lifetime_earned, 1_000);
    }
}
