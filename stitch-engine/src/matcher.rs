//! Scope-splitting condition matcher.

use std::sync::Arc;

use stitch_model::{
    Condition, Profile, PropertyCatalog, Session, PROFILE_CONDITION_TAG, SESSION_CONDITION_TAG,
};
use stitch_store::ProfileStore;

use crate::error::EngineResult;

/// Evaluates composite profile+session predicates.
///
/// The condition tree is split by tag into a profile-scoped and a
/// session-scoped sub-condition; each is evaluated against its own target
/// through the store's matching facility. An absent scope is trivially
/// satisfied — the result is an AND over only the scopes actually present.
pub struct ConditionMatcher {
    store: Arc<dyn ProfileStore>,
    catalog: Arc<dyn PropertyCatalog>,
}

impl ConditionMatcher {
    /// Creates a matcher over the given store and catalog.
    pub fn new(store: Arc<dyn ProfileStore>, catalog: Arc<dyn PropertyCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Returns true if the profile and session satisfy their scoped parts
    /// of the condition.
    pub fn match_condition(
        &self,
        condition: &Condition,
        profile: &Profile,
        session: &Session,
    ) -> EngineResult<bool> {
        if let Some(profile_condition) = self
            .catalog
            .extract_condition_by_tag(condition, PROFILE_CONDITION_TAG)
        {
            if !self.store.test_match_profile(&profile_condition, profile)? {
                return Ok(false);
            }
        }
        if let Some(session_condition) = self
            .catalog
            .extract_condition_by_tag(condition, SESSION_CONDITION_TAG)
        {
            if !self.store.test_match_session(&session_condition, session)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
