//! Typed registry of merge-strategy executors.
//!
//! Replaces the runtime capability-filter discovery of the original design:
//! executors are registered against a strategy id at process start and the
//! orchestrator iterates the registered list in order. An unknown strategy
//! id resolves to zero executors, which the orchestrator treats as "nothing
//! to do for this property", never as a failure.

use std::collections::HashMap;
use std::sync::Arc;

use stitch_model::{MergeStrategyExecutor, DEFAULT_MERGE_STRATEGY};

use crate::strategies::{AddingMergeStrategy, DefaultMergeStrategy, MostRecentMergeStrategy};

/// Maps strategy ids to ordered lists of executor implementations.
#[derive(Default)]
pub struct StrategyRegistry {
    executors: HashMap<String, Vec<Arc<dyn MergeStrategyExecutor>>>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in executors registered:
    /// `default`, `mostRecent` and `adding`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_MERGE_STRATEGY, Arc::new(DefaultMergeStrategy));
        registry.register("mostRecent", Arc::new(MostRecentMergeStrategy));
        registry.register("adding", Arc::new(AddingMergeStrategy));
        registry
    }

    /// Registers an executor for a strategy id. Multiple executors may be
    /// registered for one strategy; all are invoked, in registration order.
    pub fn register(
        &mut self,
        strategy_id: impl Into<String>,
        executor: Arc<dyn MergeStrategyExecutor>,
    ) {
        self.executors
            .entry(strategy_id.into())
            .or_default()
            .push(executor);
    }

    /// Returns the executors registered for a strategy id, in registration
    /// order. Empty when the id is unknown.
    #[must_use]
    pub fn executors_for(&self, strategy_id: &str) -> &[Arc<dyn MergeStrategyExecutor>] {
        self.executors
            .get(strategy_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
