use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use stitch_types::{ProfileId, Timestamp};

use crate::session::Session;

/// A tracked visitor identity.
///
/// Properties hold arbitrary JSON values keyed by property name; segments are
/// audience-membership tags. `merged_with` is a tombstone marker: when set,
/// this record has been superseded by the referenced master profile and must
/// be treated as logically absent by every reader except the merge engine
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub segments: BTreeSet<String>,
    /// Tombstone marker — the id of the master this profile was merged into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_with: Option<ProfileId>,
    /// First-seen timestamp; the oldest-first ordering key for master
    /// selection.
    pub first_visit: Timestamp,
}

impl Profile {
    /// Creates a new live profile with the current first-visit timestamp.
    pub fn new(id: impl Into<ProfileId>) -> Self {
        Self {
            id: id.into(),
            properties: BTreeMap::new(),
            segments: BTreeSet::new(),
            merged_with: None,
            first_visit: Timestamp::now(),
        }
    }

    /// True if this profile has been tombstoned by a merge.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merged_with.is_some()
    }

    /// Returns a property value by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Sets a property, returning true if the stored value changed.
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        match self.properties.get(&name) {
            Some(existing) if *existing == value => false,
            _ => {
                self.properties.insert(name, value);
                true
            }
        }
    }

    /// Unions the given segments into this profile's segment set,
    /// returning true if any segment was newly added.
    pub fn union_segments<'a>(&mut self, segments: impl IntoIterator<Item = &'a String>) -> bool {
        let mut changed = false;
        for segment in segments {
            changed |= self.segments.insert(segment.clone());
        }
        changed
    }
}

/// A curated, synthetic profile used for simulation and testing.
///
/// Personas carry the same identity/property/segment shape as organic
/// profiles and are stored under their own record type so they never appear
/// in visitor queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(flatten)]
    pub profile: Profile,
}

impl Persona {
    /// Creates a new persona with the given id.
    pub fn new(id: impl Into<ProfileId>) -> Self {
        Self {
            profile: Profile::new(id),
        }
    }

    /// Returns the persona's id.
    #[must_use]
    pub fn id(&self) -> &ProfileId {
        &self.profile.id
    }
}

/// A persona bundled with its sessions — the read/write shape used for
/// bulk fixture seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaWithSessions {
    pub persona: Persona,
    #[serde(default)]
    pub sessions: Vec<Session>,
}
