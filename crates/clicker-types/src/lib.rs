//! Shared type definitions for the cube clicker economy.
//!
//! This crate is the single source of truth for the data that flows between
//! the economy rules, the persistence layer, and the session runner. Types
//! that the UI layer consumes are exported to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- The [`UpgradeId`] string key
//! - [`enums`] -- [`UpgradeKind`], which rate bucket an upgrade feeds
//! - [`structs`] -- Catalog entries, the mutable ledger, derived rates,
//!   snapshots, and the persisted record

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::UpgradeKind;
pub use ids::UpgradeId;
pub use structs::{
    DerivedRates, EconomySnapshot, EconomyState, PersistedState, UpgradeDefinition, UpgradeStatus,
};
