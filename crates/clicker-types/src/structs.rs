//! Core structs: catalog entries, the resource ledger, and its projections.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::UpgradeKind;
use crate::ids::UpgradeId;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One purchasable upgrade type and its scaling rules.
///
/// Definitions are owned by the catalog and never mutated after startup.
/// The catalog validates `base_cost > 0`, `cost_growth_factor > 1`,
/// `max_level > 0` and `effect_per_level > 0` when it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeDefinition {
    /// Unique key, also used in save data.
    pub id: UpgradeId,
    /// Display name. Not used by economy logic.
    #[serde(default)]
    pub name: String,
    /// Display description. Not used by economy logic.
    #[serde(default)]
    pub description: String,
    /// Which derived rate this upgrade feeds.
    pub kind: UpgradeKind,
    /// Yield added per owned level.
    pub effect_per_level: u64,
    /// Cost of the first level.
    pub base_cost: u64,
    /// Geometric cost growth per owned level.
    pub cost_growth_factor: f64,
    /// Purchase cap.
    pub max_level: u32,
}

// ---------------------------------------------------------------------------
// Mutable ledger
// ---------------------------------------------------------------------------

/// The mutable resource ledger for one player session.
///
/// `balance` is what can be spent right now. `lifetime_earned` counts gross
/// gains and is never decremented by spending, so
/// `lifetime_earned >= total_spent + balance` always holds.
///
/// `upgrade_levels` only contains owned upgrades; a missing key means
/// level 0. Keys that the catalog does not know may be present when they
/// came from older save data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyState {
    /// Currently spendable cubes.
    pub balance: u64,
    /// Total cubes ever gained.
    pub lifetime_earned: u64,
    /// Owned level per upgrade id.
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
}

impl EconomyState {
    /// Owned level of `id`, or 0 when not owned.
    pub fn level_of(&self, id: &str) -> u32 {
        self.upgrade_levels.get(id).copied().unwrap_or(0)
    }
}

/// Yields derived from owned upgrade levels. Recomputed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct DerivedRates {
    /// Cubes gained per manual action. Always at least 1.
    pub per_action_yield: u64,
    /// Cubes gained per tick.
    pub per_interval_yield: u64,
}

impl Default for DerivedRates {
    fn default() -> Self {
        Self::BASE
    }
}

impl DerivedRates {
    /// Rates with no upgrades owned.
    pub const BASE: Self = Self {
        per_action_yield: 1,
        per_interval_yield: 0,
    };
}

// ---------------------------------------------------------------------------
// Read-side projections
// ---------------------------------------------------------------------------

/// Shop view of a single catalog entry against the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStatus {
    /// Upgrade key.
    pub id: UpgradeId,
    /// Display name.
    pub name: String,
    /// Which rate the upgrade feeds.
    pub kind: UpgradeKind,
    /// Currently owned level.
    pub level: u32,
    /// Purchase cap.
    pub max_level: u32,
    /// Cost of the next level, absent once the cap is reached.
    pub next_cost: Option<u64>,
    /// Whether the current balance covers `next_cost`.
    pub affordable: bool,
    /// Whether the cap has been reached.
    pub maxed: bool,
}

/// Everything the UI needs to render the economy at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct EconomySnapshot {
    /// Currently spendable cubes.
    pub balance: u64,
    /// Total cubes ever gained.
    pub lifetime_earned: u64,
    /// Yields derived from the owned levels.
    pub derived_rates: DerivedRates,
    /// Owned level per upgrade id, including ids unknown to the catalog.
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
    /// Elapsed time units in this save.
    pub playtime_seconds: u64,
    /// Per-upgrade shop view in catalog order.
    pub upgrades: Vec<UpgradeStatus>,
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// The record written to and read from persistent storage.
///
/// Field names are the persisted contract. Every field defaults, so a
/// partial record still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Currently spendable cubes.
    #[serde(default)]
    pub balance: u64,
    /// Total cubes ever gained.
    #[serde(default)]
    pub lifetime_earned: u64,
    /// Owned level per upgrade id.
    #[serde(default)]
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
    /// Elapsed time units in this save.
    #[serde(default)]
    pub playtime_seconds: u64,
    /// When the record was written. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedState {
    /// Build a record from the live ledger and the playtime counter.
    pub fn capture(state: &EconomyState, playtime_seconds: u64) -> Self {
        Self {
            balance: state.balance,
            lifetime_earned: state.lifetime_earned,
            upgrade_levels: state.upgrade_levels.clone(),
            playtime_seconds,
            saved_at: None,
        }
    }

    /// Split the record back into the economy ledger and the playtime.
    pub fn into_parts(self) -> (EconomyState, u64) {
        (
            EconomyState {
                balance: self.balance,
                lifetime_earned: self.lifetime_earned,
                upgrade_levels: self.upgrade_levels,
            },
            self.playtime_seconds,
        )
    }
}
