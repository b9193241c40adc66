use std::collections::HashMap;

use crate::condition::Condition;
use crate::property::{PropertyMergeStrategyType, PropertyType, DEFAULT_MERGE_STRATEGY};

/// Definition-lookup interface consumed by the merge engine and the
/// condition matcher.
///
/// Maps property names to their declared merge strategy and resolves
/// condition sub-trees by scope tag. Implementations are expected to be
/// populated at process start; the engine never mutates the catalog.
pub trait PropertyCatalog: Send + Sync {
    /// Returns the declared type for a property name, if any.
    fn property_type(&self, name: &str) -> Option<PropertyType>;

    /// Resolves a strategy id to its registered definition.
    fn strategy_type(&self, id: &str) -> Option<PropertyMergeStrategyType>;

    /// Returns the merge-strategy id for a property: the declared one if the
    /// property type exists and declares one, otherwise the well-known
    /// default.
    fn strategy_id_for_property(&self, name: &str) -> String {
        self.property_type(name)
            .map(|pt| pt.merge_strategy_id().to_string())
            .unwrap_or_else(|| DEFAULT_MERGE_STRATEGY.to_string())
    }

    /// Extracts the sub-condition scoped to the given tag.
    fn extract_condition_by_tag(&self, condition: &Condition, tag: &str) -> Option<Condition> {
        condition.extract_by_tag(tag)
    }
}

/// In-process catalog backed by hash maps, populated at startup.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    property_types: HashMap<String, PropertyType>,
    strategy_types: HashMap<String, PropertyMergeStrategyType>,
}

impl StaticCatalog {
    /// Creates an empty catalog: no property types, no strategy types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the built-in strategy types registered:
    /// `default`, `mostRecent` and `adding`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for id in [DEFAULT_MERGE_STRATEGY, "mostRecent", "adding"] {
            catalog.register_strategy_type(PropertyMergeStrategyType::new(id));
        }
        catalog
    }

    /// Registers (or replaces) a property type.
    pub fn register_property_type(&mut self, property_type: PropertyType) {
        self.property_types
            .insert(property_type.id.clone(), property_type);
    }

    /// Registers (or replaces) a strategy type.
    pub fn register_strategy_type(&mut self, strategy_type: PropertyMergeStrategyType) {
        self.strategy_types
            .insert(strategy_type.id.clone(), strategy_type);
    }
}

impl PropertyCatalog for StaticCatalog {
    fn property_type(&self, name: &str) -> Option<PropertyType> {
        self.property_types.get(name).cloned()
    }

    fn strategy_type(&self, id: &str) -> Option<PropertyMergeStrategyType> {
        self.strategy_types.get(id).cloned()
    }
}
