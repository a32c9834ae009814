//! The immutable upgrade catalog.
//!
//! The catalog is built once at process start, either from the built-in
//! definitions or from a configured list, and is never mutated afterwards.
//! Construction validates every definition so the rest of the economy can
//! rely on `base_cost > 0`, `cost_growth_factor > 1`, `max_level > 0` and
//! `effect_per_level > 0` without re-checking.

use std::collections::BTreeMap;

use clicker_types::{UpgradeDefinition, UpgradeId, UpgradeKind};

/// Errors that can occur when building a catalog.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    /// Two definitions share the same id.
    #[error("duplicate upgrade id: {id}")]
    DuplicateId {
        /// The repeated id.
        id: UpgradeId,
    },

    /// A definition breaks one of the scaling invariants.
    #[error("invalid upgrade {id}: {reason}")]
    InvalidDefinition {
        /// The offending definition.
        id: UpgradeId,
        /// Which invariant is broken.
        reason: &'static str,
    },
}

/// Ordered, validated set of [`UpgradeDefinition`]s.
///
/// Order is insertion order. It matters for display only; economy logic
/// always resolves definitions by id.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeCatalog {
    /// Definitions in display order.
    definitions: Vec<UpgradeDefinition>,
    /// Position of each id in `definitions`.
    index: BTreeMap<UpgradeId, usize>,
}

impl UpgradeCatalog {
    /// Build a catalog from a list of definitions.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if an id repeats, or
    /// [`CatalogError::InvalidDefinition`] if any definition breaks a
    /// scaling invariant.
    pub fn new(definitions: Vec<UpgradeDefinition>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, def) in definitions.iter().enumerate() {
            validate(def)?;
            if index.insert(def.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId { id: def.id.clone() });
            }
        }
        Ok(Self { definitions, index })
    }

    /// The built-in catalog: two per-action and two per-interval upgrades.
    pub fn builtin() -> Self {
        let definitions = builtin_definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(position, def)| (def.id.clone(), position))
            .collect();
        Self { definitions, index }
    }

    /// All definitions in display order.
    pub fn definitions(&self) -> &[UpgradeDefinition] {
        &self.definitions
    }

    /// Resolve an id to its definition.
    pub fn lookup(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.index
            .get(id)
            .and_then(|&position| self.definitions.get(position))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for UpgradeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(def: &UpgradeDefinition) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidDefinition {
        id: def.id.clone(),
        reason,
    };
    if def.id.as_str().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if def.base_cost == 0 {
        return Err(invalid("base_cost must be positive"));
    }
    // Negated comparison so NaN is rejected too.
    if !(def.cost_growth_factor > 1.0) || !def.cost_growth_factor.is_finite() {
        return Err(invalid("cost_growth_factor must be a finite number above 1"));
    }
    if def.max_level == 0 {
        return Err(invalid("max_level must be positive"));
    }
    if def.effect_per_level == 0 {
        return Err(invalid("effect_per_level must be positive"));
    }
    Ok(())
}

fn builtin_definitions() -> Vec<UpgradeDefinition> {
    vec![
        UpgradeDefinition {
            id: UpgradeId::from("upgrade1_cpc"),
            name: "Better Clicker".to_owned(),
            description: "Increases Cubes per Click by 1.".to_owned(),
            kind: UpgradeKind::PerActionYield,
            effect_per_level: 1,
            base_cost: 10,
            cost_growth_factor: 1.2,
            max_level: 50,
        },
        UpgradeDefinition {
            id: UpgradeId::from("upgrade2_cpc"),
            name: "Advanced Ergonomics".to_owned(),
            description: "Increases Cubes per Click by 5.".to_owned(),
            kind: UpgradeKind::PerActionYield,
            effect_per_level: 5,
            base_cost: 100,
            cost_growth_factor: 1.25,
            max_level: 25,
        },
        UpgradeDefinition {
            id: UpgradeId::from("upgrade1_cps"),
            name: "Tiny Robot Miner".to_owned(),
            description: "Generates 1 Cube per Second automatically.".to_owned(),
            kind: UpgradeKind::PerIntervalYield,
            effect_per_level: 1,
            base_cost: 200,
            cost_growth_factor: 1.3,
            max_level: 10,
        },
        UpgradeDefinition {
            id: UpgradeId::from("upgrade2_cps"),
            name: "Automated Factory".to_owned(),
            description: "Generates 10 Cubes per Second automatically.".to_owned(),
            kind: UpgradeKind::PerIntervalYield,
            effect_per_level: 10,
            base_cost: 1500,
            cost_growth_factor: 1.4,
            max_level: 5,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn def(id: &str) -> UpgradeDefinition {
        UpgradeDefinition {
            id: UpgradeId::from(id),
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
    fn builtin_passes_validation() {
        let rebuilt = UpgradeCatalog::new(builtin_definitions()).unwrap();
        assert_eq!(rebuilt, UpgradeCatalog::builtin());
        assert_eq!(rebuilt.len(), 4);
    }

    #[test]
    fn builtin_order_is_preserved() {
        let catalog = UpgradeCatalog::builtin();
        let ids: Vec<&str> = catalog.definitions().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["upgrade1_cpc", "upgrade2_cpc", "upgrade1_cps", "upgrade2_cps"]
        );
    }

    #[test]
    fn lookup_resolves_and_misses() {
        let catalog = UpgradeCatalog::builtin();
        let found = catalog.lookup("upgrade2_cps").unwrap();
        assert_eq!(found.effect_per_level, 10);
        assert_eq!(found.kind, UpgradeKind::PerIntervalYield);
        assert!(catalog.lookup("golden_cursor").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = UpgradeCatalog::new(vec![def("a"), def("a")]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateId {
                id: UpgradeId::from("a")
            }
        );
    }

    #[test]
    fn rejects_zero_base_cost() {
        let mut bad = def("a");
        bad.base_cost = 0;
        assert!(UpgradeCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn rejects_non_growing_cost() {
        for factor in [1.0, 0.5, f64::NAN, f64::INFINITY] {
            let mut bad = def("a");
            bad.cost_growth_factor = factor;
            assert!(UpgradeCatalog::new(vec![bad]).is_err(), "factor {factor}");
        }
    }

    #[test]
    fn rejects_zero_max_level_and_effect() {
        let mut no_levels = def("a");
        no_levels.max_level = 0;
        assert!(UpgradeCatalog::new(vec![no_levels]).is_err());

        let mut no_effect = def("b");
        no_effect.effect_per_level = 0;
        assert!(UpgradeCatalog::new(vec![no_effect]).is_err());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = UpgradeCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }
}
