use serde::{Deserialize, Serialize};

/// The well-known strategy id used when a property declares none.
pub const DEFAULT_MERGE_STRATEGY: &str = "default";

/// Declares how a named property behaves during merges.
///
/// The `id` matches the property name in `Profile::properties`. A missing
/// `merge_strategy` means the well-known default strategy applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<String>,
}

impl PropertyType {
    /// Creates a property type using the default merge strategy.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            merge_strategy: None,
        }
    }

    /// Creates a property type with an explicit merge strategy.
    pub fn with_strategy(id: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            merge_strategy: Some(strategy.into()),
        }
    }

    /// Returns the declared strategy id, or the well-known default.
    #[must_use]
    pub fn merge_strategy_id(&self) -> &str {
        self.merge_strategy.as_deref().unwrap_or(DEFAULT_MERGE_STRATEGY)
    }
}

/// A registered merge-strategy definition.
///
/// Executors are looked up through the typed [`crate::MergeStrategyExecutor`]
/// registry by this id; the runtime capability-filter query of the original
/// design is intentionally gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMergeStrategyType {
    pub id: String,
}

impl PropertyMergeStrategyType {
    /// Creates a strategy type with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
