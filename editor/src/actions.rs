//! Editor actions.
//!
//! Commands come from the user. Events are produced by effects and fed back
//! into the reducer by the store.

use crate::draft::{
    EventFields, ItemKind, SessionPatch, SpeakerReference, SponsorLinkPatch, SponsorReference,
};
use crate::error::{ReconcileError, RemovalError};
use crate::ids::LocalId;
use crate::outcome::ReconcileReport;

/// Input to the editor reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Draft edits
    // ═══════════════════════════════════════════════════════════════════════
    /// Append a blank item.
    AddItem {
        /// Collection to append to.
        kind: ItemKind,
    },

    /// Replace the scalar event fields.
    UpdateFields {
        /// New field values.
        fields: Box<EventFields>,
    },

    /// Merge a patch into a session.
    UpdateSession {
        /// Session to edit.
        local_id: LocalId,
        /// Fields to change.
        patch: SessionPatch,
    },

    /// Merge a patch into a sponsor link.
    UpdateSponsorLink {
        /// Link to edit.
        local_id: LocalId,
        /// Fields to change.
        patch: SponsorLinkPatch,
    },

    /// Choose or describe the speaker of a session.
    SetSessionSpeaker {
        /// Session to edit.
        local_id: LocalId,
        /// Existing speaker or inline fields.
        speaker: SpeakerReference,
    },

    /// Choose or describe the sponsor of a link.
    SetSponsor {
        /// Link to edit.
        local_id: LocalId,
        /// Existing sponsor or inline fields.
        sponsor: SponsorReference,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Removal
    // ═══════════════════════════════════════════════════════════════════════
    /// Remove an item. Persisted items may need confirmation first.
    RequestRemoval {
        /// Collection of the item.
        kind: ItemKind,
        /// Item to remove.
        local_id: LocalId,
    },

    /// The user confirmed the pending removal.
    ConfirmRemoval,

    /// The user dismissed the pending removal.
    CancelRemoval,

    /// The backend delete succeeded.
    RemovalCompleted {
        /// Collection of the item.
        kind: ItemKind,
        /// Item that was deleted.
        local_id: LocalId,
    },

    /// The backend delete failed. The item is kept.
    RemovalFailed {
        /// Collection of the item.
        kind: ItemKind,
        /// Item that was kept.
        local_id: LocalId,
        /// Why.
        error: RemovalError,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Save / Publish
    // ═══════════════════════════════════════════════════════════════════════
    /// Store the draft.
    Save,

    /// Store and publish the draft.
    Publish,

    /// A Save or Publish finished.
    SaveCompleted {
        /// What was written.
        report: Box<ReconcileReport>,
    },

    /// A Save or Publish was aborted.
    SaveFailed {
        /// Why.
        error: ReconcileError,
    },
}
