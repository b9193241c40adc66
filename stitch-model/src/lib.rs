//! Domain model for Stitch.
//!
//! Defines the record types and contracts that all Stitch subsystems depend
//! on:
//! - [`Profile`], [`Persona`], [`Session`], [`Event`] — the tracked records
//! - [`PropertyType`] / [`PropertyMergeStrategyType`] — per-property merge
//!   strategy declarations
//! - [`Condition`] — the tagged, composable predicate tree over profiles and
//!   sessions
//! - [`MergeStrategyExecutor`] — the pluggable per-property merge contract
//! - [`PropertyCatalog`] — the definition-lookup interface, with
//!   [`StaticCatalog`] as the in-process implementation
//!
//! These types form the contract between the merge engine, the store, and
//! whatever delivery layer sits on top.

mod catalog;
mod condition;
mod event;
mod executor;
mod profile;
mod property;
mod session;

pub use catalog::{PropertyCatalog, StaticCatalog};
pub use condition::{Condition, ConditionTarget, Predicate, PROFILE_CONDITION_TAG, SESSION_CONDITION_TAG};
pub use event::Event;
pub use executor::MergeStrategyExecutor;
pub use profile::{Persona, PersonaWithSessions, Profile};
pub use property::{PropertyMergeStrategyType, PropertyType, DEFAULT_MERGE_STRATEGY};
pub use session::Session;
