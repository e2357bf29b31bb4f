//! Results of a reconciliation pass.
//!
//! A Save or Publish that gets past the base-event upsert always yields a
//! [`ReconcileReport`]. Per-item failures live inside it, one
//! [`ItemOutcome`] per session or sponsor link, in draft order.

use crate::draft::{EventStatus, ItemKind};
use crate::error::ItemError;
use crate::ids::{EventId, LocalId, SessionId, SpeakerId, SponsorId};
use crate::providers::{Speaker, Sponsor};

/// Which user action started the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Store the draft as-is. Never gated.
    Save,
    /// Store and publish. Gated on required fields.
    Publish,
}

/// Kind of backend write an item ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// A new session was created.
    Created,
    /// An existing session was overwritten.
    Updated,
    /// A sponsor was linked to the event.
    Linked,
    /// The tier of an existing link was changed.
    TierUpdated,
}

/// A successful item write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWrite<Id> {
    /// What happened.
    pub kind: WriteKind,
    /// Backend id of the item after the write.
    pub remote_id: Id,
}

/// Outcome of one nested item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome<Id, EntityId> {
    /// Item the outcome belongs to.
    pub local_id: LocalId,
    /// User-facing name at the time of the pass.
    pub label: String,
    /// Speaker or sponsor created inline, kept even if the write failed.
    pub created_entity: Option<EntityId>,
    /// Write result.
    pub result: Result<ItemWrite<Id>, ItemError>,
}

impl<Id, EntityId> ItemOutcome<Id, EntityId> {
    /// Returns `true` if the item was written.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of one session.
pub type SessionOutcome = ItemOutcome<SessionId, SpeakerId>;

/// Outcome of one sponsor link. The link is addressed by its sponsor id.
pub type SponsorLinkOutcome = ItemOutcome<SponsorId, SponsorId>;

/// The committed base event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCommit {
    /// Backend id of the event.
    pub event_id: EventId,
    /// `true` if this pass created the event.
    pub created: bool,
    /// Status that was written.
    pub status: EventStatus,
    /// Publish flag that was written.
    pub is_published: bool,
}

/// How the linked-sponsor set was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// The draft had no sponsor links, so nothing was fetched.
    Skipped,
    /// Fetched right before the link writes.
    Fresh {
        /// Number of sponsors linked at fetch time
        linked: usize,
    },
    /// The fetch failed. Every link was treated as not yet linked.
    Unavailable {
        /// Why the fetch failed
        reason: String,
    },
}

/// Speakers and sponsors created during a pass.
///
/// Handed back to the caller so pickers can offer them right away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewlyCreated {
    /// Speakers created inline for sessions.
    pub speakers: Vec<Speaker>,
    /// Sponsors created inline for links.
    pub sponsors: Vec<Sponsor>,
}

impl NewlyCreated {
    /// Returns `true` if nothing was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty() && self.sponsors.is_empty()
    }
}

/// One failed item, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Collection the item lives in.
    pub kind: ItemKind,
    /// Item identity.
    pub local_id: LocalId,
    /// User-facing name.
    pub label: String,
    /// What went wrong.
    pub error: ItemError,
}

/// Everything a Save or Publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Save or Publish.
    pub intent: Intent,
    /// The base event write.
    pub event: EventCommit,
    /// Session outcomes in draft order.
    pub sessions: Vec<SessionOutcome>,
    /// Sponsor link outcomes in draft order.
    pub sponsor_links: Vec<SponsorLinkOutcome>,
    /// Entities created inline.
    pub newly_created: NewlyCreated,
    /// Linked-sponsor lookup result.
    pub precheck: Precheck,
}

impl ReconcileReport {
    /// Every item that failed, sessions first.
    #[must_use]
    pub fn failures(&self) -> Vec<ItemFailure> {
        let sessions = self.sessions.iter().filter_map(|outcome| {
            outcome.result.as_ref().err().map(|error| ItemFailure {
                kind: ItemKind::Session,
                local_id: outcome.local_id,
                label: outcome.label.clone(),
                error: error.clone(),
            })
        });
        let links = self.sponsor_links.iter().filter_map(|outcome| {
            outcome.result.as_ref().err().map(|error| ItemFailure {
                kind: ItemKind::SponsorLink,
                local_id: outcome.local_id,
                label: outcome.label.clone(),
                error: error.clone(),
            })
        });
        sessions.chain(links).collect()
    }

    /// Returns `true` if every item was written.
    #[must_use]
    pub fn is_fully_applied(&self) -> bool {
        self.sessions.iter().all(ItemOutcome::is_ok)
            && self.sponsor_links.iter().all(ItemOutcome::is_ok)
    }
}
