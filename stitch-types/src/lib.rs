//! Core type definitions for Stitch.
//!
//! This crate defines the fundamental, store-agnostic types used throughout
//! the profile engine:
//! - Profile, Session and Event identifiers (UUID v7 backed, but any
//!   externally supplied string — cookie ids, persona names — round-trips)
//! - Wall-clock timestamps used for first-seen ordering and store
//!   partition hints
//!
//! All domain records (profiles, sessions, conditions, property types)
//! belong in `stitch-model`, not here. Construction here is infallible,
//! so there is no crate-level error type; fallible concerns start at the
//! storage layer.

mod ids;
mod timestamp;

pub use ids::{EventId, ProfileId, SessionId};
pub use timestamp::Timestamp;
