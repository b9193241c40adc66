//! Identifier types used throughout the Stitch core.
//!
//! Generated identifiers use UUID v7 for time-ordered uniqueness, but the
//! wrappers are string-backed: profile ids arrive from visitor cookies and
//! persona ids are curated names, so arbitrary external strings must
//! round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random identifier (UUID v7, time-ordered).
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Wraps an externally supplied identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Unique identifier for a profile (or persona) record.
    /// Ordering is lexical; used as the deterministic master-selection
    /// tie-break when first-visit timestamps collide.
    ProfileId
}

string_id! {
    /// Unique identifier for a session record.
    SessionId
}

string_id! {
    /// Unique identifier for a tracked event record.
    EventId
}
