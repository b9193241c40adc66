//! Profile service facade — CRUD, sessions, personas and fixture seeding,
//! with merge and match delegated to the engine components.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use stitch_model::{
    Condition, Persona, PersonaWithSessions, Profile, PropertyCatalog, Session,
};
use stitch_store::ProfileStore;
use stitch_types::{ProfileId, SessionId, Timestamp};

use crate::error::EngineResult;
use crate::matcher::ConditionMatcher;
use crate::merger::{MergeConfig, ProfileMerger};
use crate::registry::StrategyRegistry;

/// Upper bound on `merged_with` hops when following lineage; guards against
/// tombstone cycles left by interleaved partial merges.
const MAX_LINEAGE_HOPS: usize = 10;

/// The entry point the tracking/delivery layer talks to.
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    merger: ProfileMerger,
    matcher: ConditionMatcher,
}

impl ProfileService {
    /// Creates a service with the default merge configuration.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        catalog: Arc<dyn PropertyCatalog>,
        registry: Arc<StrategyRegistry>,
    ) -> Self {
        Self::with_config(store, catalog, registry, MergeConfig::default())
    }

    /// Creates a service with an explicit merge configuration.
    pub fn with_config(
        store: Arc<dyn ProfileStore>,
        catalog: Arc<dyn PropertyCatalog>,
        registry: Arc<StrategyRegistry>,
        config: MergeConfig,
    ) -> Self {
        let merger = ProfileMerger::with_config(
            Arc::clone(&store),
            Arc::clone(&catalog),
            registry,
            config,
        );
        let matcher = ConditionMatcher::new(Arc::clone(&store), catalog);
        Self {
            store,
            merger,
            matcher,
        }
    }

    // ── Merge & match ────────────────────────────────────────────

    /// See [`ProfileMerger::merge_profiles_on_property`].
    pub fn merge_profiles_on_property(
        &self,
        current_profile: &Profile,
        current_session: &mut Session,
        property_name: &str,
        property_value: &Value,
    ) -> EngineResult<bool> {
        self.merger.merge_profiles_on_property(
            current_profile,
            current_session,
            property_name,
            property_value,
        )
    }

    /// See [`ConditionMatcher::match_condition`].
    pub fn match_condition(
        &self,
        condition: &Condition,
        profile: &Profile,
        session: &Session,
    ) -> EngineResult<bool> {
        self.matcher.match_condition(condition, profile, session)
    }

    // ── Profiles ─────────────────────────────────────────────────

    /// Loads a profile, following `merged_with` lineage to the canonical
    /// record: a reader asking for a tombstoned profile gets the master it
    /// was merged into, which is how partially applied merges resolve from
    /// the read side.
    pub fn load(&self, id: &ProfileId) -> EngineResult<Option<Profile>> {
        let Some(mut profile) = self.store.load_profile(id)? else {
            return Ok(None);
        };
        let mut hops = 0;
        while let Some(master_id) = profile.merged_with.clone() {
            if hops >= MAX_LINEAGE_HOPS {
                warn!(profile = %profile.id, "lineage chain too deep, returning last resolved");
                break;
            }
            match self.store.load_profile(&master_id)? {
                Some(master) => {
                    debug!(from = %profile.id, to = %master.id, "following merge lineage");
                    profile = master;
                    hops += 1;
                }
                None => {
                    warn!(profile = %profile.id, master = %master_id, "dangling merge lineage");
                    break;
                }
            }
        }
        Ok(Some(profile))
    }

    /// Saves a profile.
    pub fn save(&self, profile: &Profile) -> EngineResult<()> {
        Ok(self.store.save_profile(profile)?)
    }

    /// Hard-deletes a profile.
    pub fn delete(&self, id: &ProfileId) -> EngineResult<()> {
        Ok(self.store.remove_profile(id)?)
    }

    /// Returns all query-visible profiles.
    pub fn all_profiles(&self) -> EngineResult<Vec<Profile>> {
        Ok(self.store.all_profiles()?)
    }

    /// Returns the number of query-visible profiles.
    pub fn profile_count(&self) -> EngineResult<usize> {
        Ok(self.store.profile_count()?)
    }

    /// Queries profiles by property value, oldest first.
    pub fn find_profiles_by_property(
        &self,
        name: &str,
        value: &Value,
    ) -> EngineResult<Vec<Profile>> {
        Ok(self.store.find_profiles_by_property(name, value)?)
    }

    // ── Sessions ─────────────────────────────────────────────────

    /// Loads a session, probing the hinted partition, then the previous
    /// day's, then the whole store — sessions spanning midnight land in the
    /// previous day's partition.
    pub fn load_session(
        &self,
        id: &SessionId,
        date_hint: Option<Timestamp>,
    ) -> EngineResult<Option<Session>> {
        if let Some(hint) = date_hint {
            if let Some(session) = self.store.load_session(id, Some(hint))? {
                return Ok(Some(session));
            }
            if let Some(session) = self.store.load_session(id, Some(hint.previous_day()))? {
                return Ok(Some(session));
            }
        }
        Ok(self.store.load_session(id, None)?)
    }

    /// Saves a session.
    pub fn save_session(&self, session: &Session) -> EngineResult<()> {
        Ok(self.store.save_session(session)?)
    }

    /// Returns a profile's sessions, oldest first.
    pub fn profile_sessions(&self, id: &ProfileId) -> EngineResult<Vec<Session>> {
        Ok(self.store.sessions_for_profile(id)?)
    }

    // ── Personas ─────────────────────────────────────────────────

    /// Creates a persona with one seed session and persists both.
    pub fn create_persona(&self, id: impl Into<ProfileId>) -> EngineResult<Persona> {
        let persona = Persona::new(id);
        let session = Session::new(SessionId::random(), &persona.profile);
        self.store.save_persona(&persona)?;
        self.store.save_session(&session)?;
        Ok(persona)
    }

    /// Loads a persona by id.
    pub fn load_persona(&self, id: &ProfileId) -> EngineResult<Option<Persona>> {
        Ok(self.store.load_persona(id)?)
    }

    /// Loads a persona together with its sessions, newest last.
    pub fn load_persona_with_sessions(
        &self,
        id: &ProfileId,
    ) -> EngineResult<Option<PersonaWithSessions>> {
        let Some(persona) = self.store.load_persona(id)? else {
            return Ok(None);
        };
        let sessions = self.store.sessions_for_profile(persona.id())?;
        Ok(Some(PersonaWithSessions { persona, sessions }))
    }

    /// Removes a persona.
    pub fn delete_persona(&self, id: &ProfileId) -> EngineResult<()> {
        Ok(self.store.remove_persona(id)?)
    }

    /// Returns all personas.
    pub fn personas(&self) -> EngineResult<Vec<Persona>> {
        Ok(self.store.personas()?)
    }

    /// Seeds predefined personas from a directory of `*.json` fixtures in
    /// the [`PersonaWithSessions`] shape. Each session is rebound to its
    /// persona before saving. Malformed fixtures are logged and skipped;
    /// only filesystem-level failures abort the sweep. Returns the number
    /// of personas loaded.
    pub fn seed_personas_from_dir(&self, dir: &Path) -> EngineResult<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            debug!(path = %path.display(), "loading predefined persona");
            match self.load_persona_fixture(&path) {
                Ok(id) => {
                    info!(persona = %id, "predefined persona loaded");
                    loaded += 1;
                }
                Err(err) => {
                    error!(path = %path.display(), %err, "error while loading persona fixture");
                }
            }
        }
        self.store.refresh()?;
        Ok(loaded)
    }

    fn load_persona_fixture(&self, path: &Path) -> EngineResult<ProfileId> {
        let raw = fs::read_to_string(path)?;
        let mut bundle: PersonaWithSessions = serde_json::from_str(&raw)?;
        self.store.save_persona(&bundle.persona)?;
        let persona_id = bundle.persona.id().clone();
        for session in &mut bundle.sessions {
            session.rebind(&persona_id);
            self.store.save_session(session)?;
        }
        Ok(persona_id)
    }
}
