//! Draft model of an event being edited.
//!
//! The draft is owned by one editing session. It holds the base fields and
//! three ordered collections: sessions, legacy speaker links, and sponsor
//! links. Nothing in this module performs I/O. Removing a persisted item
//! only yields a [`RemovalPlan`], and the caller runs the remote delete.
//!
//! ```text
//! add_item ──▶ CreatedLocally / Draft ──(save ok)──▶ Persisted(id)
//! hydrate  ──▶ LoadedFromStore / Persisted(id)
//! remove   ──▶ Draft:     RemovalPlan::Local
//!              Persisted: RemovalPlan::Remote(target)   (delete first, then remove)
//! ```

mod collection;
mod items;

pub use collection::{
    Collection, ItemKind, Persistence, Provenance, Reference, SubResource, SubResourceDraft,
};
pub use items::{
    SessionDraft, SessionPatch, SessionPayload, SpeakerReference, SponsorLinkDraft,
    SponsorLinkPatch, SponsorLinkPayload, SponsorReference,
};

use crate::error::DraftError;
use crate::ids::{EventId, LocalId, SessionId, SpeakerId, SponsorId};
use crate::outcome::ReconcileReport;
use crate::providers::{EventPayload, RemoteEvent};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an event.
///
/// `Draft` is the unpublished state. The other three are derived from the
/// date range when the event is published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    /// Not published.
    #[default]
    Draft,
    /// Published, not started yet.
    Upcoming,
    /// Published and running.
    Active,
    /// Published and over.
    Completed,
}

/// Scalar fields of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    /// Event name.
    pub title: String,
    /// Long description.
    pub description: String,
    /// First day.
    pub start_date: Option<NaiveDate>,
    /// Last day (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Daily start time.
    pub start_time: Option<NaiveTime>,
    /// Daily end time.
    pub end_time: Option<NaiveTime>,
    /// Last day registrations are accepted.
    pub registration_deadline: Option<NaiveDate>,
    /// Venue address.
    pub location: String,
    /// Maximum attendees.
    pub capacity: Option<u32>,
    /// Organizing body.
    pub organizer: String,
    /// Organizer contact email.
    pub contact_email: String,
    /// Organizer contact phone.
    pub contact_phone: String,
    /// Ticket price in cents. `Some(0)` means free.
    pub price_cents: Option<u64>,
    /// Free-form category.
    #[serde(default)]
    pub category: String,
    /// Banner image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
}

/// What a remote delete has to address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalTarget {
    /// Delete this session.
    Session(SessionId),
    /// Unlink this sponsor.
    SponsorLink(SponsorId),
}

impl fmt::Display for RemovalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(id) => write!(f, "session {id}"),
            Self::SponsorLink(id) => write!(f, "sponsor link {id}"),
        }
    }
}

/// How removing an item has to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalPlan {
    /// Never saved: drop it from the draft.
    Local,
    /// Exists remotely: delete there first, remove locally on success.
    Remote(RemovalTarget),
}

/// An item taken out of the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovedItem {
    /// A removed session.
    Session(SessionDraft),
    /// A removed sponsor link.
    SponsorLink(SponsorLinkDraft),
}

/// In-memory event being authored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    /// Backend id once the event has been created.
    pub remote_id: Option<EventId>,
    /// Scalar fields.
    pub fields: EventFields,
    /// Last known status.
    pub status: EventStatus,
    /// Last known publish flag.
    pub is_published: bool,
    /// Sessions in display order.
    pub sessions: Collection<SessionPayload>,
    /// Speakers attached directly to the event (legacy path).
    pub speaker_links: Vec<SpeakerId>,
    /// Sponsor links in display order.
    pub sponsor_links: Collection<SponsorLinkPayload>,
}

impl EventDraft {
    /// Blank draft for a new event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft for editing a fetched event. Every item is persisted.
    #[must_use]
    pub fn hydrate(remote: RemoteEvent) -> Self {
        let mut draft = Self {
            remote_id: Some(remote.id),
            fields: remote.fields,
            status: remote.status,
            is_published: remote.is_published,
            speaker_links: remote.speaker_ids,
            ..Self::default()
        };

        for session in remote.sessions {
            let reference = session
                .fields
                .speaker_id
                .clone()
                .map_or(Reference::Unassigned, Reference::Existing);
            draft.sessions.hydrate(
                session.id,
                reference,
                SessionPayload::from_fields(&session.fields),
            );
        }
        for link in remote.sponsor_links {
            draft.sponsor_links.hydrate(
                link.sponsor_id.clone(),
                Reference::Existing(link.sponsor_id),
                SponsorLinkPayload { tier: link.tier },
            );
        }

        draft
    }

    /// Append a blank, locally created item of `kind`.
    pub fn add_item(&mut self, kind: ItemKind) -> LocalId {
        match kind {
            ItemKind::Session => self.sessions.add(),
            ItemKind::SponsorLink => self.sponsor_links.add(),
        }
    }

    /// Merge a patch into a session.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such session exists.
    pub fn update_session(&mut self, local_id: LocalId, patch: SessionPatch) -> Result<(), DraftError> {
        self.sessions.update(local_id, patch)
    }

    /// Merge a patch into a sponsor link.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such link exists.
    pub fn update_sponsor_link(
        &mut self,
        local_id: LocalId,
        patch: SponsorLinkPatch,
    ) -> Result<(), DraftError> {
        self.sponsor_links.update(local_id, patch)
    }

    /// Pick an existing speaker for a session, or describe a new one.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such session exists.
    pub fn set_session_speaker(
        &mut self,
        local_id: LocalId,
        speaker: SpeakerReference,
    ) -> Result<(), DraftError> {
        self.sessions.set_reference(local_id, speaker)
    }

    /// Pick an existing sponsor for a link, or describe a new one.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such link exists.
    pub fn set_sponsor(&mut self, local_id: LocalId, sponsor: SponsorReference) -> Result<(), DraftError> {
        self.sponsor_links.set_reference(local_id, sponsor)
    }

    /// Decide whether removing an item needs a remote delete.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such item exists.
    pub fn removal_plan(&self, kind: ItemKind, local_id: LocalId) -> Result<RemovalPlan, DraftError> {
        let unknown = DraftError::UnknownItem { kind, local_id };
        let target = match kind {
            ItemKind::Session => self
                .sessions
                .get(local_id)
                .ok_or(unknown)?
                .persistence
                .remote_id()
                .cloned()
                .map(RemovalTarget::Session),
            ItemKind::SponsorLink => self
                .sponsor_links
                .get(local_id)
                .ok_or(unknown)?
                .persistence
                .remote_id()
                .cloned()
                .map(RemovalTarget::SponsorLink),
        };
        Ok(target.map_or(RemovalPlan::Local, RemovalPlan::Remote))
    }

    /// Take an item out of the draft. No remote call is made.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such item exists.
    pub fn remove_item(&mut self, kind: ItemKind, local_id: LocalId) -> Result<RemovedItem, DraftError> {
        match kind {
            ItemKind::Session => self.sessions.remove(local_id).map(RemovedItem::Session),
            ItemKind::SponsorLink => self.sponsor_links.remove(local_id).map(RemovedItem::SponsorLink),
        }
    }

    /// User-facing name of an item.
    #[must_use]
    pub fn label_of(&self, kind: ItemKind, local_id: LocalId) -> Option<String> {
        match kind {
            ItemKind::Session => self.sessions.get(local_id).map(SubResourceDraft::label),
            ItemKind::SponsorLink => self.sponsor_links.get(local_id).map(SubResourceDraft::label),
        }
    }

    /// Payload for the base-event upsert.
    #[must_use]
    pub fn event_payload(&self, status: EventStatus, is_published: bool) -> EventPayload {
        EventPayload {
            fields: self.fields.clone(),
            status,
            is_published,
            speaker_ids: self.speaker_links.clone(),
        }
    }

    /// Fold a finished reconciliation back into the draft.
    ///
    /// Items that were written get their remote id. Items whose inline
    /// speaker or sponsor was created switch to referencing it.
    pub fn apply_report(&mut self, report: &ReconcileReport) {
        self.remote_id = Some(report.event.event_id.clone());
        self.status = report.event.status;
        self.is_published = report.event.is_published;

        for outcome in &report.sessions {
            self.sessions.absorb(outcome);
        }
        for outcome in &report.sponsor_links {
            self.sponsor_links.absorb(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{SessionFields, SessionRecord, SponsorLinkRecord, SponsorTier};

    #[allow(clippy::unwrap_used)]
    fn remote_event() -> RemoteEvent {
        RemoteEvent {
            id: EventId::try_new("evt-1").unwrap(),
            fields: EventFields {
                title: "RustConf".into(),
                ..EventFields::default()
            },
            status: EventStatus::Upcoming,
            is_published: true,
            speaker_ids: vec![SpeakerId::try_new("spk-9").unwrap()],
            sessions: vec![SessionRecord {
                id: SessionId::try_new("ses-1").unwrap(),
                fields: SessionFields {
                    title: "Opening".into(),
                    speaker_id: Some(SpeakerId::try_new("spk-1").unwrap()),
                    ..SessionFields::default()
                },
            }],
            sponsor_links: vec![SponsorLinkRecord {
                sponsor_id: SponsorId::try_new("sp1").unwrap(),
                tier: SponsorTier::Platinum,
            }],
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn hydrated_items_are_loaded_and_persisted() {
        let draft = EventDraft::hydrate(remote_event());

        let session = draft.sessions.iter().next().unwrap();
        assert_eq!(session.provenance, Provenance::LoadedFromStore);
        assert_eq!(session.persistence.remote_id().map(SessionId::as_str), Some("ses-1"));
        assert!(matches!(&session.reference, Reference::Existing(id) if id.as_str() == "spk-1"));

        let link = draft.sponsor_links.iter().next().unwrap();
        assert_eq!(link.payload.tier, SponsorTier::Platinum);
        assert_eq!(draft.speaker_links.len(), 1);
    }

    #[test]
    fn new_items_default_to_unassigned_drafts() {
        let mut draft = EventDraft::new();
        let id = draft.add_item(ItemKind::Session);

        let session = draft.sessions.get(id);
        assert!(matches!(
            session,
            Some(SubResourceDraft {
                provenance: Provenance::CreatedLocally,
                persistence: Persistence::Draft,
                reference: Reference::Unassigned,
                ..
            })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn removal_plan_follows_persistence() {
        let mut draft = EventDraft::hydrate(remote_event());
        let loaded = draft.sessions.iter().next().unwrap().local_id;
        let fresh = draft.add_item(ItemKind::Session);

        assert_eq!(draft.removal_plan(ItemKind::Session, fresh).unwrap(), RemovalPlan::Local);
        assert_eq!(
            draft.removal_plan(ItemKind::Session, loaded).unwrap(),
            RemovalPlan::Remote(RemovalTarget::Session(SessionId::try_new("ses-1").unwrap()))
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn local_ids_are_never_reused() {
        let mut draft = EventDraft::new();
        let first = draft.add_item(ItemKind::SponsorLink);
        draft.remove_item(ItemKind::SponsorLink, first).unwrap();
        let second = draft.add_item(ItemKind::SponsorLink);

        assert_ne!(first, second);
        assert_eq!(
            draft.remove_item(ItemKind::SponsorLink, first),
            Err(DraftError::UnknownItem {
                kind: ItemKind::SponsorLink,
                local_id: first
            })
        );
    }
}
