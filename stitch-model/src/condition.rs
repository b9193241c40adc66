use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::event::Event;
use crate::profile::Profile;
use crate::session::Session;

/// Tag marking a sub-condition as profile-scoped.
pub const PROFILE_CONDITION_TAG: &str = "profileCondition";

/// Tag marking a sub-condition as session-scoped.
pub const SESSION_CONDITION_TAG: &str = "sessionCondition";

/// A tagged, composable predicate tree over profile and session attributes.
///
/// Tags partition the tree into scopes: the matcher extracts the
/// profile-scoped and session-scoped sub-trees and evaluates each against
/// its own target. A node with no tags inherits its scope from the extraction
/// performed on its ancestors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(flatten)]
    pub predicate: Predicate,
}

/// The predicate variants a condition node can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Predicate {
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
    PropertyEquals { property: String, value: Value },
    PropertyExists { property: String },
    InSegment { segment: String },
}

impl Condition {
    /// Creates an untagged condition around a predicate.
    #[must_use]
    pub fn new(predicate: Predicate) -> Self {
        Self {
            tags: BTreeSet::new(),
            predicate,
        }
    }

    /// Adds a scope tag to this node.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Extracts the sub-condition scoped to the given tag.
    ///
    /// A node carrying the tag is returned whole. Otherwise `And` composites
    /// are searched recursively and every tagged descendant is re-joined
    /// under a fresh `And`. Returns `None` when no node in the tree carries
    /// the tag — the scope is simply absent from this condition.
    #[must_use]
    pub fn extract_by_tag(&self, tag: &str) -> Option<Condition> {
        if self.tags.contains(tag) {
            return Some(self.clone());
        }
        let Predicate::And { conditions } = &self.predicate else {
            return None;
        };
        let mut matched: Vec<Condition> = conditions
            .iter()
            .filter_map(|c| c.extract_by_tag(tag))
            .collect();
        match matched.len() {
            0 => None,
            1 => Some(matched.remove(0)),
            _ => Some(
                Condition::new(Predicate::And {
                    conditions: matched,
                })
                .tagged(tag),
            ),
        }
    }

    /// Evaluates this condition against a target.
    #[must_use]
    pub fn matches<T: ConditionTarget + ?Sized>(&self, target: &T) -> bool {
        match &self.predicate {
            Predicate::And { conditions } => conditions.iter().all(|c| c.matches(target)),
            Predicate::Or { conditions } => conditions.iter().any(|c| c.matches(target)),
            Predicate::Not { condition } => !condition.matches(target),
            Predicate::PropertyEquals { property, value } => {
                target.property(property) == Some(value)
            }
            Predicate::PropertyExists { property } => target.property(property).is_some(),
            Predicate::InSegment { segment } => target.in_segment(segment),
        }
    }
}

/// Something a condition can be evaluated against.
pub trait ConditionTarget {
    /// Returns the named attribute, if present.
    fn property(&self, name: &str) -> Option<&Value>;

    /// Returns true if the target belongs to the named segment.
    /// Targets without segment membership (sessions, events) report false.
    fn in_segment(&self, _segment: &str) -> bool {
        false
    }
}

impl ConditionTarget for Profile {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    fn in_segment(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }
}

impl ConditionTarget for Session {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

impl ConditionTarget for Event {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}
