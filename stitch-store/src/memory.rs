//! In-memory reference implementation of [`ProfileStore`].
//!
//! Mimics the search-backed store the engine runs against in production:
//! saves land in the record maps immediately (so loads by id are
//! read-your-writes) but only ids captured in the visibility snapshot at the
//! last [`refresh`](ProfileStore::refresh) appear in query results.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tracing::debug;

use stitch_model::{Condition, Event, Persona, Profile, Session};
use stitch_types::{EventId, ProfileId, SessionId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::ProfileStore;

#[derive(Default)]
struct Inner {
    profiles: HashMap<ProfileId, Profile>,
    sessions: HashMap<SessionId, Session>,
    events: HashMap<EventId, Event>,
    personas: HashMap<ProfileId, Persona>,
    visible_profiles: HashSet<ProfileId>,
    visible_sessions: HashSet<SessionId>,
    visible_events: HashSet<EventId>,
}

/// In-memory store with snapshot query visibility.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProfileStore for MemoryStore {
    // ── Profiles ─────────────────────────────────────────────────

    fn find_profiles_by_property(
        &self,
        name: &str,
        value: &Value,
    ) -> StoreResult<Vec<Profile>> {
        let inner = self.read();
        let mut matches: Vec<Profile> = inner
            .visible_profiles
            .iter()
            .filter_map(|id| inner.profiles.get(id))
            .filter(|p| p.properties.get(name) == Some(value))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.first_visit
                .cmp(&b.first_visit)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }

    fn all_profiles(&self) -> StoreResult<Vec<Profile>> {
        let inner = self.read();
        let mut profiles: Vec<Profile> = inner
            .visible_profiles
            .iter()
            .filter_map(|id| inner.profiles.get(id))
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    fn profile_count(&self) -> StoreResult<usize> {
        let inner = self.read();
        Ok(inner
            .visible_profiles
            .iter()
            .filter(|id| inner.profiles.contains_key(*id))
            .count())
    }

    fn load_profile(&self, id: &ProfileId) -> StoreResult<Option<Profile>> {
        Ok(self.read().profiles.get(id).cloned())
    }

    fn save_profile(&self, profile: &Profile) -> StoreResult<()> {
        self.write()
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    fn mark_profile_merged(&self, id: &ProfileId, master: &ProfileId) -> StoreResult<()> {
        let mut inner = self.write();
        let profile = inner
            .profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {id}")))?;
        profile.merged_with = Some(master.clone());
        Ok(())
    }

    fn remove_profile(&self, id: &ProfileId) -> StoreResult<()> {
        let mut inner = self.write();
        inner.profiles.remove(id);
        inner.visible_profiles.remove(id);
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────

    fn load_session(
        &self,
        id: &SessionId,
        _date_hint: Option<Timestamp>,
    ) -> StoreResult<Option<Session>> {
        // No partitions in memory; the hint is only meaningful for
        // date-partitioned backends.
        Ok(self.read().sessions.get(id).cloned())
    }

    fn save_session(&self, session: &Session) -> StoreResult<()> {
        self.write()
            .sessions
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn sessions_for_profile(&self, id: &ProfileId) -> StoreResult<Vec<Session>> {
        let inner = self.read();
        let mut sessions: Vec<Session> = inner
            .visible_sessions
            .iter()
            .filter_map(|sid| inner.sessions.get(sid))
            .filter(|s| s.profile_id == *id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(sessions)
    }

    fn reassign_session(
        &self,
        id: &SessionId,
        _timestamp: Timestamp,
        profile_id: &ProfileId,
    ) -> StoreResult<()> {
        let mut inner = self.write();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("session {id}")))?;
        session.profile_id = profile_id.clone();
        Ok(())
    }

    // ── Events ───────────────────────────────────────────────────

    fn save_event(&self, event: &Event) -> StoreResult<()> {
        self.write().events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    fn events_for_profile(&self, id: &ProfileId) -> StoreResult<Vec<Event>> {
        let inner = self.read();
        let mut events: Vec<Event> = inner
            .visible_events
            .iter()
            .filter_map(|eid| inner.events.get(eid))
            .filter(|e| e.profile_id == *id)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    fn reassign_event(
        &self,
        id: &EventId,
        _timestamp: Timestamp,
        profile_id: &ProfileId,
    ) -> StoreResult<()> {
        let mut inner = self.write();
        let event = inner
            .events
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("event {id}")))?;
        event.profile_id = profile_id.clone();
        Ok(())
    }

    // ── Personas ─────────────────────────────────────────────────

    fn save_persona(&self, persona: &Persona) -> StoreResult<()> {
        self.write()
            .personas
            .insert(persona.id().clone(), persona.clone());
        Ok(())
    }

    fn load_persona(&self, id: &ProfileId) -> StoreResult<Option<Persona>> {
        Ok(self.read().personas.get(id).cloned())
    }

    fn remove_persona(&self, id: &ProfileId) -> StoreResult<()> {
        self.write().personas.remove(id);
        Ok(())
    }

    fn personas(&self) -> StoreResult<Vec<Persona>> {
        let inner = self.read();
        let mut personas: Vec<Persona> = inner.personas.values().cloned().collect();
        personas.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(personas)
    }

    // ── Consistency & matching ───────────────────────────────────

    fn refresh(&self) -> StoreResult<()> {
        let mut inner = self.write();
        inner.visible_profiles = inner.profiles.keys().cloned().collect();
        inner.visible_sessions = inner.sessions.keys().cloned().collect();
        inner.visible_events = inner.events.keys().cloned().collect();
        debug!(
            profiles = inner.visible_profiles.len(),
            sessions = inner.visible_sessions.len(),
            events = inner.visible_events.len(),
            "memory store refreshed"
        );
        Ok(())
    }

    fn test_match_profile(&self, condition: &Condition, profile: &Profile) -> StoreResult<bool> {
        Ok(condition.matches(profile))
    }

    fn test_match_session(&self, condition: &Condition, session: &Session) -> StoreResult<bool> {
        Ok(condition.matches(session))
    }
}
