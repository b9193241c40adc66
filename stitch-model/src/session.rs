use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use stitch_types::{ProfileId, SessionId, Timestamp};

use crate::profile::Profile;

/// A visit session owned by a profile.
///
/// `profile_id` is a relation, not ownership in the lifetime sense: the
/// session outlives any single merge and is reassigned to the surviving
/// master, never copied. `timestamp` doubles as the store's
/// partition/version hint on targeted updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    pub timestamp: Timestamp,
}

impl Session {
    /// Creates a new session owned by the given profile.
    pub fn new(id: impl Into<SessionId>, profile: &Profile) -> Self {
        Self {
            id: id.into(),
            profile_id: profile.id.clone(),
            properties: BTreeMap::new(),
            timestamp: Timestamp::now(),
        }
    }

    /// Returns a session property value by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Rebinds this session to a different owning profile.
    pub fn rebind(&mut self, profile_id: &ProfileId) {
        self.profile_id = profile_id.clone();
    }
}
