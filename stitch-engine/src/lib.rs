//! Profile identity-resolution engine for Stitch.
//!
//! When multiple profiles are discovered to represent the same person
//! (matched on a shared property such as an email address), this crate
//! consolidates them into one canonical master profile:
//!
//! - [`ProfileMerger`] — master selection, per-property strategy dispatch,
//!   segment union, tombstoning; the merge orchestrator.
//! - [`ReattachmentEngine`] — rewrites session/event ownership from
//!   superseded profiles to the master.
//! - [`ConditionMatcher`] — splits a tagged condition into profile- and
//!   session-scoped parts and evaluates each against its target.
//! - [`StrategyRegistry`] — typed lookup of pluggable
//!   [`MergeStrategyExecutor`](stitch_model::MergeStrategyExecutor)s by
//!   strategy id, with the built-in `default`, `mostRecent` and `adding`
//!   executors.
//! - [`ProfileService`] — the facade the delivery layer talks to: profile,
//!   session and persona CRUD plus fixture seeding, delegating merge and
//!   match to the components above.
//!
//! Merges are idempotent: tombstones (`merged_with`) left by a previous —
//! possibly partial — run are detected and not re-processed, so re-invoking
//! the same merge is always safe.

mod error;
mod matcher;
mod merger;
mod reattach;
mod registry;
mod service;
mod singleflight;
mod strategies;

pub use error::{EngineError, EngineResult};
pub use matcher::ConditionMatcher;
pub use merger::{MergeConfig, ProfileMerger};
pub use reattach::ReattachmentEngine;
pub use registry::StrategyRegistry;
pub use service::ProfileService;
pub use strategies::{AddingMergeStrategy, DefaultMergeStrategy, MostRecentMergeStrategy};
