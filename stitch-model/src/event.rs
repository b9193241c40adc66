use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use stitch_types::{EventId, ProfileId, SessionId, Timestamp};

/// A tracked activity record attributed to a profile.
///
/// Same back-reference semantics as [`crate::Session`]: `profile_id` is
/// rewritten during reattachment, the record itself is never deleted by the
/// merge engine and its original timestamp is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: String,
    pub profile_id: ProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    pub timestamp: Timestamp,
}

impl Event {
    /// Creates a new event of the given type attributed to a profile.
    pub fn new(
        id: impl Into<EventId>,
        event_type: impl Into<String>,
        profile_id: &ProfileId,
    ) -> Self {
        Self {
            id: id.into(),
            event_type: event_type.into(),
            profile_id: profile_id.clone(),
            session_id: None,
            properties: BTreeMap::new(),
            timestamp: Timestamp::now(),
        }
    }

    /// Attaches the originating session.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
