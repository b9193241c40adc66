//! Wall-clock timestamps for record ordering and store partition hints.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock timestamp in milliseconds since the Unix epoch.
///
/// Used for the profile first-visit ordering key and as the version/partition
/// hint the store expects on targeted session/event updates. Plain physical
/// time is sufficient here: causal ordering across peers is not a concern of
/// the profile engine, only a stable oldest-first sort.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp at the current time.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self(millis)
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the milliseconds since the Unix epoch.
    #[must_use]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Returns this timestamp shifted back by one day.
    ///
    /// The session-load fallback ladder probes the previous day's partition
    /// when a session is not found under its date hint.
    #[must_use]
    pub const fn previous_day(&self) -> Self {
        Self(self.0 - 24 * 60 * 60 * 1000)
    }

    /// Returns true if this timestamp is strictly before the other.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// Returns true if this timestamp is strictly after the other.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}
