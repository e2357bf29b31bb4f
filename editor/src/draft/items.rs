//! Session and sponsor-link payloads.

use super::collection::{ItemKind, Reference, SubResource, SubResourceDraft};
use crate::ids::{SessionId, SpeakerId, SponsorId};
use crate::providers::{SessionFields, SpeakerFields, SponsorFields, SponsorTier};
use chrono::{NaiveDate, NaiveTime};

/// A session draft.
pub type SessionDraft = SubResourceDraft<SessionPayload>;

/// A sponsor-link draft.
pub type SponsorLinkDraft = SubResourceDraft<SponsorLinkPayload>;

/// Reference from a session to its speaker.
pub type SpeakerReference = Reference<SpeakerId, SpeakerFields>;

/// Reference from a sponsor link to its sponsor.
pub type SponsorReference = Reference<SponsorId, SponsorFields>;

/// Editable fields of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPayload {
    /// Session title.
    pub title: String,
    /// Abstract.
    pub description: String,
    /// Day of the session.
    pub date: Option<NaiveDate>,
    /// Start time.
    pub start_time: Option<NaiveTime>,
    /// End time.
    pub end_time: Option<NaiveTime>,
    /// Room or stage.
    pub venue: String,
}

/// Partial update of a session. `None` leaves a field unchanged.
///
/// The schedule fields are optional in the payload, so their patch carries
/// two levels: `Some(Some(v))` sets the value and `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    /// New title.
    pub title: Option<String>,
    /// New abstract.
    pub description: Option<String>,
    /// New day, or `Some(None)` to clear it.
    pub date: Option<Option<NaiveDate>>,
    /// New start time, or `Some(None)` to clear it.
    pub start_time: Option<Option<NaiveTime>>,
    /// New end time, or `Some(None)` to clear it.
    pub end_time: Option<Option<NaiveTime>>,
    /// New room.
    pub venue: Option<String>,
}

impl SessionPayload {
    /// Wire fields for a create or update, carrying the resolved speaker.
    #[must_use]
    pub fn to_fields(&self, speaker_id: Option<SpeakerId>) -> SessionFields {
        SessionFields {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            venue: self.venue.clone(),
            speaker_id,
        }
    }

    /// Payload from stored fields, discarding the speaker.
    #[must_use]
    pub fn from_fields(fields: &SessionFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            venue: fields.venue.clone(),
        }
    }
}

impl SubResource for SessionPayload {
    type RemoteId = SessionId;
    type EntityId = SpeakerId;
    type NewEntity = SpeakerFields;
    type Patch = SessionPatch;

    const KIND: ItemKind = ItemKind::Session;

    fn apply_patch(&mut self, patch: SessionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(venue) = patch.venue {
            self.venue = venue;
        }
    }

    fn label(&self, _reference: &SpeakerReference) -> Option<String> {
        let title = self.title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}

/// Editable fields of a sponsor link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SponsorLinkPayload {
    /// Sponsorship level.
    pub tier: SponsorTier,
}

/// Partial update of a sponsor link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SponsorLinkPatch {
    /// New tier.
    pub tier: Option<SponsorTier>,
}

impl SubResource for SponsorLinkPayload {
    type RemoteId = SponsorId;
    type EntityId = SponsorId;
    type NewEntity = SponsorFields;
    type Patch = SponsorLinkPatch;

    const KIND: ItemKind = ItemKind::SponsorLink;

    fn apply_patch(&mut self, patch: SponsorLinkPatch) {
        if let Some(tier) = patch.tier {
            self.tier = tier;
        }
    }

    fn label(&self, reference: &SponsorReference) -> Option<String> {
        match reference {
            Reference::New(fields) if !fields.name.trim().is_empty() => {
                Some(fields.name.trim().to_string())
            },
            Reference::Existing(id) => Some(format!("sponsor {id}")),
            Reference::New(_) | Reference::Unassigned => None,
        }
    }
}
