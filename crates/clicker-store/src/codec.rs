//! JSON encoding of [`PersistedState`].
//!
//! Encoding is plain `serde_json`. Decoding is lenient field by field: a
//! field that is missing or has the wrong shape falls back to its default
//! and is logged, so one bad value never throws away the rest of a save.
//! Integer fields also accept numeric strings, which is how older saves
//! stored them.
//!
//! | Field | Type | Fallback |
//! |-------|------|----------|
//! | `balance` | integer | 0 |
//! | `lifetimeEarned` | integer | 0 |
//! | `upgradeLevels` | object of id -> integer | empty; bad entries skipped |
//! | `playtimeSeconds` | integer | 0 |
//! | `savedAt` | RFC 3339 timestamp | absent |

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use clicker_types::{PersistedState, UpgradeId};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StoreError;

/// Encode a record as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if encoding fails.
pub fn encode(record: &PersistedState) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(record)?)
}

/// Decode a record, defaulting any field that is missing or malformed.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the bytes are not JSON, or
/// [`StoreError::Malformed`] if the document is not an object.
pub fn decode(bytes: &[u8]) -> Result<PersistedState, StoreError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(fields) = value else {
        return Err(StoreError::Malformed(format!(
            "expected a JSON object, found {}",
            kind_of(&value)
        )));
    };

    Ok(PersistedState {
        balance: integer_field(&fields, "balance"),
        lifetime_earned: integer_field(&fields, "lifetimeEarned"),
        upgrade_levels: levels_field(&fields),
        playtime_seconds: integer_field(&fields, "playtimeSeconds"),
        saved_at: timestamp_field(&fields),
    })
}

fn integer_field(fields: &Map<String, Value>, name: &str) -> u64 {
    match fields.get(name) {
        None | Some(Value::Null) => 0,
        Some(value) => as_u64(value).unwrap_or_else(|| {
            warn!(field = name, value = %value, "Ignoring malformed save field");
            0
        }),
    }
}

fn levels_field(fields: &Map<String, Value>) -> BTreeMap<UpgradeId, u32> {
    let mut levels = BTreeMap::new();
    match fields.get("upgradeLevels") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (id, raw) in entries {
                match as_u64(raw).and_then(|level| u32::try_from(level).ok()) {
                    Some(level) => {
                        levels.insert(UpgradeId::from(id.as_str()), level);
                    }
                    None => {
                        warn!(upgrade = id.as_str(), value = %raw, "Ignoring malformed upgrade level");
                    }
                }
            }
        }
        Some(other) => {
            warn!(value = %other, "Ignoring malformed upgradeLevels field");
        }
    }
    levels
}

fn timestamp_field(fields: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let raw = fields.get("savedAt")?;
    if raw.is_null() {
        return None;
    }
    raw.as_str()
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|| {
            warn!(value = %raw, "Ignoring malformed savedAt field");
            None
        })
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_keeps_values() {
        let mut record = PersistedState {
            balance: 321,
            lifetime_earned: 4_000,
            playtime_seconds: 90,
            ..PersistedState::default()
        };
        record
            .upgrade_levels
            .insert(UpgradeId::from("upgrade1_cps"), 4);
        record.saved_at = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .ok()
            .map(|ts| ts.with_timezone(&Utc));

        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn missing_fields_default() {
        let decoded = decode(br#"{"lifetimeEarned": 77}"#).unwrap();
        assert_eq!(decoded.balance, 0);
        assert_eq!(decoded.lifetime_earned, 77);
        assert!(decoded.upgrade_levels.is_empty());
        assert_eq!(decoded.playtime_seconds, 0);
        assert_eq!(decoded.saved_at, None);
    }

    #[test]
    fn bad_fields_default_without_losing_the_rest() {
        let decoded = decode(
            br#"{
                "balance": -5,
                "lifetimeEarned": "1200",
                "upgradeLevels": {"upgrade1_cpc": 3, "upgrade2_cpc": "x", "old": 2.5},
                "playtimeSeconds": true,
                "savedAt": "yesterday"
            }"#,
        )
        .unwrap();
        assert_eq!(decoded.balance, 0);
        assert_eq!(decoded.lifetime_earned, 1200);
        assert_eq!(decoded.upgrade_levels.len(), 1);
        assert_eq!(decoded.upgrade_levels.get("upgrade1_cpc"), Some(&3));
        assert_eq!(decoded.playtime_seconds, 0);
        assert_eq!(decoded.saved_at, None);
    }

    #[test]
    fn unknown_ids_are_kept() {
        let decoded = decode(br#"{"upgradeLevels": {"legacy_cursor": 2}}"#).unwrap();
        assert_eq!(decoded.upgrade_levels.get("legacy_cursor"), Some(&2));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(decode(b"[1, 2]"), Err(StoreError::Malformed(_))));
        assert!(matches!(decode(b"not json"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn oversized_level_is_skipped() {
        let decoded = decode(br#"{"upgradeLevels": {"upgrade1_cpc": 99999999999}}"#).unwrap();
        assert!(decoded.upgrade_levels.is_empty());
    }
}
