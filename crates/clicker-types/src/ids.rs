//! The string key that identifies an upgrade.
//!
//! Upgrade ids are stable strings (`upgrade1_cpc`, `upgrade2_cps`, ...)
//! because they are written verbatim into save data. The newtype keeps them
//! from being mixed up with display names or other free-form text.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique key of an [`UpgradeDefinition`](crate::UpgradeDefinition).
///
/// Serializes as a bare string so save files and the UI see the raw key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeId(pub String);

impl UpgradeId {
    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UpgradeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UpgradeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Lets `BTreeMap<UpgradeId, _>` be queried with a plain `&str`.
impl Borrow<str> for UpgradeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let id = UpgradeId::from("upgrade1_cpc");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"upgrade1_cpc\""));
    }

    #[test]
    fn map_lookup_by_str() {
        let mut levels = BTreeMap::new();
        levels.insert(UpgradeId::from("upgrade1_cps"), 3_u32);
        assert_eq!(levels.get("upgrade1_cps"), Some(&3));
        assert_eq!(levels.get("upgrade2_cps"), None);
    }

    #[test]
    fn display_matches_key() {
        assert_eq!(UpgradeId::from("upgrade2_cpc").to_string(), "upgrade2_cpc");
    }
}
