//! Session/event reattachment — rewrites ownership from a superseded
//! profile to the master.

use std::sync::Arc;
use tracing::debug;

use stitch_model::{Profile, Session};
use stitch_store::{ProfileStore, StoreError};
use stitch_types::ProfileId;

use crate::error::EngineResult;

/// Rewrites the `profile_id` of every session and event attributed to a
/// superseded profile so that it points at the master.
///
/// Guarantee: after a successful call, every session/event ever attributed
/// to the superseded profile is attributed to the master; nothing is
/// duplicated or dropped and original timestamps are preserved (the rewrite
/// is a targeted field update, not a record rewrite).
pub struct ReattachmentEngine {
    store: Arc<dyn ProfileStore>,
}

impl ReattachmentEngine {
    /// Creates a reattachment engine over the given store.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Moves all sessions and events of `superseded` onto `master`.
    ///
    /// `current_session` may have been created after the store's last
    /// refresh and therefore be missing from the query results; if it is
    /// owned by the superseded profile it is reattached explicitly. A
    /// current session that is not persisted at all is treated as nothing
    /// extra to add.
    pub fn reattach(
        &self,
        superseded: &Profile,
        master: &ProfileId,
        current_session: &Session,
    ) -> EngineResult<()> {
        let sessions = self.store.sessions_for_profile(&superseded.id)?;
        let current_included = sessions.iter().any(|s| s.id == current_session.id);

        for session in &sessions {
            self.store
                .reassign_session(&session.id, session.timestamp, master)?;
        }

        if current_session.profile_id == superseded.id && !current_included {
            match self.store.reassign_session(
                &current_session.id,
                current_session.timestamp,
                master,
            ) {
                Ok(()) | Err(StoreError::NotFound(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        let events = self.store.events_for_profile(&superseded.id)?;
        for event in &events {
            self.store
                .reassign_event(&event.id, event.timestamp, master)?;
        }

        debug!(
            superseded = %superseded.id,
            master = %master,
            sessions = sessions.len(),
            events = events.len(),
            "reattached records to master"
        );
        Ok(())
    }
}
