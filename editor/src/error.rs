//! Error types for the event editor.
//!
//! Errors are split by blast radius:
//!
//! - [`ReconcileError`] is fatal and aborts a whole Save or Publish.
//! - [`ItemError`] is scoped to one session or sponsor link. It is captured
//!   in the report and never propagated.
//! - [`RemovalError`] belongs to the immediate delete path. The item stays in
//!   the draft when it is returned.

use crate::draft::RemovalTarget;
use thiserror::Error;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Result type alias for Entity Gateway calls.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failure reported by the backend or the transport underneath it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response (connection, timeout, decoding).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend refused the request.
    #[error("Rejected by backend ({status}): {message}")]
    Rejected {
        /// HTTP-like status code returned by the backend
        status: u16,
        /// Backend-supplied message
        message: String,
    },

    /// The addressed resource does not exist.
    #[error("Resource not found")]
    NotFound,

    /// The write collides with existing state (e.g. a duplicate sponsor link).
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Fatal errors for a Save or Publish.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The publish gate refused the draft. No backend call was made.
    #[error("Cannot publish, missing: {}", .missing_fields.join(", "))]
    PublishBlocked {
        /// Human-readable names of the missing or invalid fields
        missing_fields: Vec<String>,
    },

    /// Creating or updating the base event failed. No sub-resource was touched.
    #[error("Failed to save event: {0}")]
    EventUpsert(#[source] GatewayError),
}

/// Failure of a single session or sponsor link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The inline speaker could not be created, so the session was not written.
    #[error("Could not create speaker: {0}")]
    SpeakerCreation(#[source] GatewayError),

    /// The inline sponsor could not be created, so no link was written.
    #[error("Could not create sponsor: {0}")]
    SponsorCreation(#[source] GatewayError),

    /// Creating or updating the session failed.
    #[error("Could not save session: {0}")]
    SessionWrite(#[source] GatewayError),

    /// Adding the sponsor link or updating its tier failed.
    #[error("Could not link sponsor: {0}")]
    SponsorLink(#[source] GatewayError),

    /// The new sponsor was linked but the one it replaced could not be unlinked.
    ///
    /// The item keeps pointing at the old link, so the next Save retries.
    #[error("Could not unlink replaced sponsor {sponsor_id}: {source}")]
    SponsorUnlink {
        /// Sponsor that is still linked
        sponsor_id: crate::ids::SponsorId,
        /// Backend failure
        source: GatewayError,
    },

    /// The item is not eligible for reconciliation yet.
    #[error("Incomplete: {reason}")]
    Incomplete {
        /// What is missing
        reason: String,
    },
}

/// Errors from the immediate delete path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemovalError {
    /// The item is not part of the draft.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The item exists remotely but the event itself has no remote id.
    #[error("Event has not been saved yet")]
    EventNotPersisted,

    /// The backend delete failed. The item was kept.
    #[error("Failed to delete {target}: {source}")]
    Gateway {
        /// What was being deleted
        target: RemovalTarget,
        /// Backend failure
        source: GatewayError,
    },
}

/// Errors from draft mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// No item with this local id exists in the collection.
    #[error("No {kind} with local id {local_id}")]
    UnknownItem {
        /// Collection that was searched
        kind: crate::draft::ItemKind,
        /// The local id that was not found
        local_id: crate::ids::LocalId,
    },

    /// A backend id was blank.
    #[error("{0} id must not be empty")]
    EmptyId(&'static str),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// An environment variable held an unusable value.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnvValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// A value parsed but makes no sense.
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Anything the editor surfaces to the user outside of a report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A draft mutation referenced a missing item.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// An immediate delete failed.
    #[error(transparent)]
    Removal(#[from] RemovalError),

    /// Save or Publish failed as a whole.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl GatewayError {
    /// Returns `true` if retrying the same request could plausibly succeed.
    ///
    /// Nothing in this crate retries automatically. This only feeds user messaging.
    ///
    /// # Examples
    ///
    /// ```
    /// # use eventdesk_editor::GatewayError;
    /// assert!(GatewayError::Transport("reset".into()).is_transient());
    /// assert!(!GatewayError::NotFound.is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::NotFound | Self::Conflict(_) => false,
        }
    }
}
