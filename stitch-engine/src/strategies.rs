//! Built-in merge-strategy executors.
//!
//! All executors receive the superseded profiles in first-seen order and
//! must be commutative and idempotent: property enumeration order across a
//! merge is not guaranteed, and a re-run over the same inputs must report
//! no change.

use serde_json::Value;
use stitch_model::{MergeStrategyExecutor, Profile, PropertyType};

/// The well-known default strategy: the master keeps its own value, gaps
/// are filled from the first (oldest) source that carries the property.
pub struct DefaultMergeStrategy;

impl MergeStrategyExecutor for DefaultMergeStrategy {
    fn merge_property(
        &self,
        property_name: &str,
        _property_type: Option<&PropertyType>,
        sources: &[Profile],
        master: &mut Profile,
    ) -> bool {
        if master.property(property_name).is_some() {
            return false;
        }
        for source in sources {
            if let Some(value) = source.property(property_name) {
                return master.set_property(property_name, value.clone());
            }
        }
        false
    }
}

/// The value carried by the most recently first-seen profile wins,
/// overwriting the master's value when it differs.
pub struct MostRecentMergeStrategy;

impl MergeStrategyExecutor for MostRecentMergeStrategy {
    fn merge_property(
        &self,
        property_name: &str,
        _property_type: Option<&PropertyType>,
        sources: &[Profile],
        master: &mut Profile,
    ) -> bool {
        // Sources arrive oldest-first; the newest carrier wins.
        match sources
            .iter()
            .rev()
            .find_map(|s| s.property(property_name))
        {
            Some(value) => master.set_property(property_name, value.clone()),
            None => false,
        }
    }
}

/// Numeric values are summed across the master and every source.
///
/// Non-numeric carriers are ignored. Safe under re-entry because a repeated
/// merge sees an empty source list (already-tombstoned candidates are
/// filtered out before dispatch).
pub struct AddingMergeStrategy;

impl MergeStrategyExecutor for AddingMergeStrategy {
    fn merge_property(
        &self,
        property_name: &str,
        _property_type: Option<&PropertyType>,
        sources: &[Profile],
        master: &mut Profile,
    ) -> bool {
        let source_values: Vec<f64> = sources
            .iter()
            .filter_map(|s| s.property(property_name).and_then(Value::as_f64))
            .collect();
        if source_values.is_empty() {
            return false;
        }
        let total = master
            .property(property_name)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            + source_values.iter().sum::<f64>();
        match serde_json::Number::from_f64(total) {
            Some(number) => master.set_property(property_name, Value::Number(number)),
            None => false,
        }
    }
}
