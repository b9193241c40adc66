//! Merge orchestration — consolidates duplicate profiles into one master.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use stitch_model::{Profile, PropertyCatalog, Session, DEFAULT_MERGE_STRATEGY};
use stitch_store::ProfileStore;

use crate::error::EngineResult;
use crate::reattach::ReattachmentEngine;
use crate::registry::StrategyRegistry;
use crate::singleflight::KeyedLock;

/// Behavioural knobs for the merge orchestrator.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// When the current profile loses the merge: hard-delete it (the
    /// historical behaviour — its identity cookie is rebound to the master
    /// and must not be resurrected) or tombstone it like any other
    /// candidate.
    pub delete_current_profile: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            delete_current_profile: true,
        }
    }
}

/// The merge orchestrator.
///
/// Selects the master (oldest first-seen, ties broken by lexical id),
/// dispatches per-property merge strategies, unions segments, reattaches
/// sessions and events, and tombstones the superseded profiles. The whole
/// operation runs under a per-merge-key lock derived from the candidate id
/// set, so two callers discovering the same duplicates serialize instead of
/// racing on the final delete.
pub struct ProfileMerger {
    store: Arc<dyn ProfileStore>,
    catalog: Arc<dyn PropertyCatalog>,
    registry: Arc<StrategyRegistry>,
    reattacher: ReattachmentEngine,
    config: MergeConfig,
    merge_locks: KeyedLock,
}

impl ProfileMerger {
    /// Creates a merger with the default configuration.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        catalog: Arc<dyn PropertyCatalog>,
        registry: Arc<StrategyRegistry>,
    ) -> Self {
        Self::with_config(store, catalog, registry, MergeConfig::default())
    }

    /// Creates a merger with an explicit configuration.
    pub fn with_config(
        store: Arc<dyn ProfileStore>,
        catalog: Arc<dyn PropertyCatalog>,
        registry: Arc<StrategyRegistry>,
        config: MergeConfig,
    ) -> Self {
        let reattacher = ReattachmentEngine::new(Arc::clone(&store));
        Self {
            store,
            catalog,
            registry,
            reattacher,
            config,
            merge_locks: KeyedLock::new(),
        }
    }

    /// Merges every profile sharing `property_name == property_value` into
    /// the oldest of them.
    ///
    /// Returns true if the master profile was modified. Safe to re-invoke:
    /// candidates already tombstoned into the master are skipped, so a
    /// partially applied merge is completed (or no-oped) on the next call.
    pub fn merge_profiles_on_property(
        &self,
        current_profile: &Profile,
        current_session: &mut Session,
        property_name: &str,
        property_value: &Value,
    ) -> EngineResult<bool> {
        let mut candidates = self
            .store
            .find_profiles_by_property(property_name, property_value)?;
        if !candidates.iter().any(|p| p.id == current_profile.id) {
            candidates.push(current_profile.clone());
            candidates.sort_by(|a, b| {
                a.first_visit
                    .cmp(&b.first_visit)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        if candidates.len() == 1 {
            return Ok(false);
        }

        // Serialize concurrent merges over the same duplicate set.
        let merge_key: Vec<&str> = candidates.iter().map(|p| p.id.as_str()).collect();
        let _guard = self.merge_locks.acquire(merge_key.join("+"));

        // Oldest live profile chairs the merge; a tombstone must never be
        // selected as master.
        let Some(master_index) = candidates.iter().position(|p| !p.is_merged()) else {
            warn!(
                property = property_name,
                "every merge candidate is already tombstoned, nothing to chair"
            );
            return Ok(false);
        };
        let mut master = candidates[master_index].clone();

        // Drop the master itself and anything already merged into it — the
        // idempotence guard that makes re-entry safe.
        let sources: Vec<Profile> = candidates
            .into_iter()
            .filter(|p| p.id != master.id && p.merged_with.as_ref() != Some(&master.id))
            .collect();

        let source_ids: BTreeSet<&str> = sources.iter().map(|p| p.id.as_str()).collect();
        info!(
            master = %master.id,
            sources = ?source_ids,
            property = property_name,
            "merging profiles into master"
        );

        let mut updated = false;

        // Per-property strategy dispatch over the union of source property
        // names.
        let all_property_names: BTreeSet<String> = sources
            .iter()
            .flat_map(|p| p.properties.keys().cloned())
            .collect();

        for name in &all_property_names {
            let property_type = self.catalog.property_type(name);
            let requested = self.catalog.strategy_id_for_property(name);

            let strategy_type = match self.catalog.strategy_type(&requested) {
                Some(strategy_type) => strategy_type,
                None if requested == DEFAULT_MERGE_STRATEGY => {
                    warn!(
                        property = %name,
                        "default merge strategy unresolvable, skipping property"
                    );
                    continue;
                }
                None => {
                    warn!(
                        property = %name,
                        strategy = %requested,
                        "merge strategy unresolvable, falling back to default"
                    );
                    match self.catalog.strategy_type(DEFAULT_MERGE_STRATEGY) {
                        Some(strategy_type) => strategy_type,
                        None => {
                            warn!(
                                property = %name,
                                "default merge strategy unresolvable, skipping property"
                            );
                            continue;
                        }
                    }
                }
            };

            let executors = self.registry.executors_for(&strategy_type.id);
            if executors.is_empty() {
                debug!(
                    property = %name,
                    strategy = %strategy_type.id,
                    "no executor registered for strategy"
                );
            }
            for executor in executors {
                updated |= executor.merge_property(name, property_type.as_ref(), &sources, &mut master);
            }
        }

        // Segment union: the master's segment set must end up a superset of
        // every source's.
        for source in &sources {
            updated |= master.union_segments(source.segments.iter());
        }

        if updated {
            self.store.save_profile(&master)?;
        }

        // Consistency barrier: reattachment queries below must observe every
        // session/event written before this merge.
        self.store.refresh()?;

        for source in &sources {
            self.reattacher
                .reattach(source, &master.id, current_session)?;
        }

        // Non-destructive supersede: keep the losers, marked, for lineage
        // and idempotent re-entry. A loser already hard-deleted by an
        // earlier run has nothing left to mark.
        for source in &sources {
            self.tombstone(&source.id, &master.id)?;
        }

        if current_profile.id != master.id {
            current_session.rebind(&master.id);
            self.store.save_session(current_session)?;
            if self.config.delete_current_profile {
                // The caller's request continues on the master; the current
                // profile's identity cookie must not be resurrected.
                self.store.remove_profile(&current_profile.id)?;
            } else {
                self.tombstone(&current_profile.id, &master.id)?;
            }
        }

        Ok(updated)
    }

    fn tombstone(&self, id: &stitch_types::ProfileId, master: &stitch_types::ProfileId) -> EngineResult<()> {
        match self.store.mark_profile_merged(id, master) {
            Ok(()) => Ok(()),
            Err(stitch_store::StoreError::NotFound(_)) => {
                debug!(profile = %id, "profile gone before tombstoning, skipping");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
