//! Storage interface for Stitch.
//!
//! Defines [`ProfileStore`], the document-store contract the merge engine is
//! written against, and [`MemoryStore`], an in-memory reference
//! implementation.
//!
//! # Consistency model
//!
//! The contract mirrors a search-backed document store:
//!
//! - Loads by id are read-your-writes — a saved record is immediately
//!   loadable.
//! - Queries run against an index snapshot. Newly saved records only become
//!   query-visible after [`ProfileStore::refresh`], the blocking consistency
//!   barrier the merge engine issues before reattachment.
//! - Targeted field updates (`mark_profile_merged`, `reassign_session`,
//!   `reassign_event`) patch a single field in place without rewriting the
//!   record.

mod error;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use serde_json::Value;
use stitch_model::{Condition, Event, Persona, Profile, Session};
use stitch_types::{EventId, ProfileId, SessionId, Timestamp};

/// The document-store contract for profiles, sessions, events and personas.
pub trait ProfileStore: Send + Sync {
    // ── Profiles ─────────────────────────────────────────────────

    /// Queries profiles whose named property equals the given value,
    /// ordered by first-visit ascending (ties broken by lexical id).
    /// Tombstoned profiles are included; filtering them is the merge
    /// engine's concern.
    fn find_profiles_by_property(&self, name: &str, value: &Value)
        -> StoreResult<Vec<Profile>>;

    /// Returns all query-visible profiles.
    fn all_profiles(&self) -> StoreResult<Vec<Profile>>;

    /// Returns the number of query-visible profiles.
    fn profile_count(&self) -> StoreResult<usize>;

    /// Loads a profile by id (read-your-writes).
    fn load_profile(&self, id: &ProfileId) -> StoreResult<Option<Profile>>;

    /// Saves (creates or replaces) a profile.
    fn save_profile(&self, profile: &Profile) -> StoreResult<()>;

    /// Targeted update: sets `merged_with` on the given profile, tombstoning
    /// it as superseded by the master.
    fn mark_profile_merged(&self, id: &ProfileId, master: &ProfileId) -> StoreResult<()>;

    /// Hard-deletes a profile.
    fn remove_profile(&self, id: &ProfileId) -> StoreResult<()>;

    // ── Sessions ─────────────────────────────────────────────────

    /// Loads a session by id. `date_hint` narrows the partition the store
    /// probes first; implementations without partitions may ignore it.
    fn load_session(
        &self,
        id: &SessionId,
        date_hint: Option<Timestamp>,
    ) -> StoreResult<Option<Session>>;

    /// Saves (creates or replaces) a session.
    fn save_session(&self, session: &Session) -> StoreResult<()>;

    /// Queries sessions owned by a profile, oldest first.
    fn sessions_for_profile(&self, id: &ProfileId) -> StoreResult<Vec<Session>>;

    /// Targeted update: rewrites a session's owning profile. `timestamp` is
    /// the record's partition/version hint.
    fn reassign_session(
        &self,
        id: &SessionId,
        timestamp: Timestamp,
        profile_id: &ProfileId,
    ) -> StoreResult<()>;

    // ── Events ───────────────────────────────────────────────────

    /// Saves (creates or replaces) an event.
    fn save_event(&self, event: &Event) -> StoreResult<()>;

    /// Queries events attributed to a profile, oldest first.
    fn events_for_profile(&self, id: &ProfileId) -> StoreResult<Vec<Event>>;

    /// Targeted update: rewrites an event's attributed profile.
    fn reassign_event(
        &self,
        id: &EventId,
        timestamp: Timestamp,
        profile_id: &ProfileId,
    ) -> StoreResult<()>;

    // ── Personas ─────────────────────────────────────────────────

    /// Saves (creates or replaces) a persona.
    fn save_persona(&self, persona: &Persona) -> StoreResult<()>;

    /// Loads a persona by id.
    fn load_persona(&self, id: &ProfileId) -> StoreResult<Option<Persona>>;

    /// Removes a persona.
    fn remove_persona(&self, id: &ProfileId) -> StoreResult<()>;

    /// Returns all personas.
    fn personas(&self) -> StoreResult<Vec<Persona>>;

    // ── Consistency & matching ───────────────────────────────────

    /// Blocking consistency barrier: after this returns, every prior write
    /// is visible to queries.
    fn refresh(&self) -> StoreResult<()>;

    /// Evaluates a condition against a profile using the store's matching
    /// facility.
    fn test_match_profile(&self, condition: &Condition, profile: &Profile) -> StoreResult<bool>;

    /// Evaluates a condition against a session.
    fn test_match_session(&self, condition: &Condition, session: &Session) -> StoreResult<bool>;
}
