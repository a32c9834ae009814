//! Resource-economy rules for the cube clicker.
//!
//! Everything in this crate is a pure function over an
//! [`EconomyState`](clicker_types::EconomyState) and an [`UpgradeCatalog`].
//! Nothing here owns state, schedules work, or touches storage; the session
//! runner in `clicker-core` commits the values these functions return.
//!
//! # Modules
//!
//! - [`catalog`] -- The validated, immutable [`UpgradeCatalog`].
//! - [`cost`] -- The geometric cost curve.
//! - [`rates`] -- [`compute_rates`]: per-action and per-interval yields.
//! - [`purchase`] -- [`purchase`]: validate and apply an upgrade purchase.
//! - [`accrual`] -- Manual-action and tick credits.
//! - [`reconcile`] -- Normalising state restored from save data.
//! - [`shop`] -- Per-upgrade shop view for snapshots.
//!
//! # Ledger rules
//!
//! | Operation | `balance` | `lifetime_earned` | `upgrade_levels` |
//! |-----------|-----------|-------------------|------------------|
//! | Action | `+ per_action_yield` | `+ per_action_yield` | -- |
//! | Tick | `+ per_interval_yield` | `+ per_interval_yield` | -- |
//! | Purchase | `- cost` | -- | `+1` on one id |
//!
//! [`purchase`] is the only writer of `upgrade_levels` and the only
//! operation that lowers `balance`.
//!
//! [`compute_rates`]: rates::compute_rates
//! [`purchase`]: purchase::purchase

pub mod accrual;
pub mod catalog;
pub mod cost;
pub mod purchase;
pub mod rates;
pub mod reconcile;
pub mod shop;

// Re-export primary types at crate root.
pub use catalog::{CatalogError, UpgradeCatalog};
pub use purchase::{PurchaseError, PurchaseReceipt};
pub use rates::compute_rates;
pub use reconcile::UnknownUpgradePolicy;
