//! Identifier types.
//!
//! Backend ids are opaque, non-empty strings. [`LocalId`] is the client-side
//! identity of a draft item and never leaves the process.

use crate::error::DraftError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend id.
            ///
            /// # Errors
            ///
            /// Returns [`DraftError::EmptyId`] if `raw` is blank.
            pub fn try_new(raw: impl Into<String>) -> Result<Self, DraftError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(DraftError::EmptyId($label));
                }
                Ok(Self(raw))
            }

            /// The raw id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DraftError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::try_new(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

backend_id!(
    /// Backend id of an event.
    EventId,
    "event"
);

backend_id!(
    /// Backend id of a session.
    SessionId,
    "session"
);

backend_id!(
    /// Backend id of a speaker.
    SpeakerId,
    "speaker"
);

backend_id!(
    /// Backend id of a sponsor. Also identifies an event's link to that sponsor.
    SponsorId,
    "sponsor"
);

/// Client-generated identity of a draft item.
///
/// Allocated monotonically per collection and never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u64);

impl LocalId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
