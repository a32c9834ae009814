//! The single-owner session context.
//!
//! [`Game`] holds the live [`EconomyState`], the rates derived from it, and
//! the playtime counter. It is the only place the session's state lives:
//! the session loop owns exactly one `Game` and every mutation goes through
//! its methods, which commit the values returned by the pure functions in
//! `clicker-economy`.
//!
//! Rates are recomputed from scratch whenever `upgrade_levels` changes
//! (purchase, reset, restore) and are never persisted.

use std::sync::Arc;

use clicker_economy::purchase::{self, PurchaseError};
use clicker_economy::reconcile::{self, UnknownUpgradePolicy};
use clicker_economy::{accrual, compute_rates, shop, UpgradeCatalog};
use clicker_types::{DerivedRates, EconomySnapshot, EconomyState, PersistedState, UpgradeId};
use tracing::{debug, info};

/// Result of one manual action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Cubes credited by the action.
    pub gained: u64,
    /// Balance after the action.
    pub balance: u64,
    /// Lifetime total after the action.
    pub lifetime_earned: u64,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchased {
    /// The upgrade bought.
    pub upgrade_id: UpgradeId,
    /// Cubes deducted.
    pub cost_paid: u64,
    /// Level owned after the purchase.
    pub new_level: u32,
    /// Balance after the purchase.
    pub balance: u64,
    /// Rates after the purchase.
    pub rates: DerivedRates,
}

/// Live state of one player session.
#[derive(Debug, Clone)]
pub struct Game {
    catalog: Arc<UpgradeCatalog>,
    pub(crate) state: EconomyState,
    pub(crate) rates: DerivedRates,
    pub(crate) playtime_seconds: u64,
}

impl Game {
    /// Start a fresh game: zero balance, nothing owned.
    pub fn new(catalog: Arc<UpgradeCatalog>) -> Self {
        Self {
            catalog,
            state: EconomyState::default(),
            rates: DerivedRates::BASE,
            playtime_seconds: 0,
        }
    }

    /// Resume from a persisted record, reconciled against `catalog`.
    pub fn restore(
        catalog: Arc<UpgradeCatalog>,
        record: PersistedState,
        policy: UnknownUpgradePolicy,
    ) -> Self {
        let (state, playtime_seconds) = record.into_parts();
        let state = reconcile::reconcile(state, &catalog, policy);
        let rates = compute_rates(&state, &catalog);
        info!(
            balance = state.balance,
            lifetime_earned = state.lifetime_earned,
            owned_upgrades = state.upgrade_levels.len(),
            per_action_yield = rates.per_action_yield,
            per_interval_yield = rates.per_interval_yield,
            "Game restored"
        );
        Self {
            catalog,
            state,
            rates,
            playtime_seconds,
        }
    }

    /// Apply one manual action at the current per-action yield.
    pub fn trigger_action(&mut self) -> ActionOutcome {
        let gained = self.rates.per_action_yield;
        self.state = accrual::apply_action(std::mem::take(&mut self.state), gained);
        ActionOutcome {
            gained,
            balance: self.state.balance,
            lifetime_earned: self.state.lifetime_earned,
        }
    }

    /// Buy one level of `upgrade_id`.
    ///
    /// On success the new state is committed and rates are recomputed. On
    /// failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseError`] when the id is unknown, the upgrade is
    /// capped, or the balance is short.
    pub fn purchase_upgrade(&mut self, upgrade_id: &str) -> Result<Purchased, PurchaseError> {
        let receipt = purchase::purchase(&self.state, &self.catalog, upgrade_id).inspect_err(
            |err| debug!(upgrade = upgrade_id, error = %err, "Purchase rejected"),
        )?;
        self.state = receipt.new_state;
        self.rates = compute_rates(&self.state, &self.catalog);
        Ok(Purchased {
            upgrade_id: UpgradeId::from(upgrade_id),
            cost_paid: receipt.cost_paid,
            new_level: receipt.new_level,
            balance: self.state.balance,
            rates: self.rates,
        })
    }

    /// Replace everything with a fresh game. The catalog is kept.
    pub fn reset(&mut self) {
        info!(
            balance = self.state.balance,
            lifetime_earned = self.state.lifetime_earned,
            playtime_seconds = self.playtime_seconds,
            "Game reset"
        );
        self.state = EconomyState::default();
        self.rates = compute_rates(&self.state, &self.catalog);
        self.playtime_seconds = 0;
    }

    /// Read-only view of the whole economy.
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            balance: self.state.balance,
            lifetime_earned: self.state.lifetime_earned,
            derived_rates: self.rates,
            upgrade_levels: self.state.upgrade_levels.clone(),
            playtime_seconds: self.playtime_seconds,
            upgrades: shop::upgrade_statuses(&self.state, &self.catalog),
        }
    }

    /// The record to hand to persistence.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState::capture(&self.state, self.playtime_seconds)
    }

    /// The live ledger.
    pub const fn state(&self) -> &EconomyState {
        &self.state
    }

    /// Current derived rates.
    pub const fn rates(&self) -> DerivedRates {
        self.rates
    }

    /// Elapsed time units.
    pub const fn playtime_seconds(&self) -> u64 {
        self.playtime_seconds
    }
}
