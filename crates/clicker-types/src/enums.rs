//! Enumeration types for the cube clicker economy.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which derived rate an upgrade contributes to.
///
/// The wire names (`cpc`, `cps`) are the ones used by save data and
/// catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeKind {
    /// Adds to the cubes gained per manual action (CPC).
    #[serde(rename = "cpc")]
    PerActionYield,
    /// Adds to the cubes gained per tick (CPS).
    #[serde(rename = "cps")]
    PerIntervalYield,
}

impl core::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PerActionYield => f.write_str("cpc"),
            Self::PerIntervalYield => f.write_str("cps"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&UpgradeKind::PerActionYield).ok().as_deref(),
            Some("\"cpc\"")
        );
        let parsed: Result<UpgradeKind, _> = serde_json::from_str("\"cps\"");
        assert_eq!(parsed.ok(), Some(UpgradeKind::PerIntervalYield));
    }
}
