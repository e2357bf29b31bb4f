//! Entity Gateway contract and its payload types.
//!
//! The gateway is the only way the editor talks to the backend. It is an
//! **interface**: the production implementation (an HTTP client against the
//! REST API) lives with the application, and tests use
//! [`MockEntityGateway`](crate::mocks::MockEntityGateway).
//!
//! Payloads use camelCase field names on the wire, matching the REST backend.

use crate::draft::{EventFields, EventStatus};
use crate::ids::{EventId, SessionId, SpeakerId, SponsorId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub mod gateway;

pub use gateway::EntityGateway;

/// Base event payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Scalar event fields.
    #[serde(flatten)]
    pub fields: EventFields,

    /// Lifecycle status.
    pub status: EventStatus,

    /// Whether the event is visible on the public registration site.
    pub is_published: bool,

    /// Speakers attached directly to the event (legacy path).
    pub speaker_ids: Vec<SpeakerId>,
}

/// Inline fields for a speaker that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerFields {
    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    /// Employer or affiliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

impl SpeakerFields {
    /// A speaker is only created when both name and email are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// A speaker known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Backend id.
    pub id: SpeakerId,

    /// Profile fields.
    #[serde(flatten)]
    pub fields: SpeakerFields,
}

/// Inline fields for a sponsor that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorFields {
    /// Company name.
    pub name: String,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Company website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Short blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SponsorFields {
    /// Copy with the website normalized (see [`normalize_website`]).
    #[must_use]
    pub fn normalized(&self, scheme: &str) -> Self {
        Self {
            website: self
                .website
                .as_deref()
                .and_then(|raw| normalize_website(raw, scheme)),
            ..self.clone()
        }
    }
}

/// A sponsor known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    /// Backend id.
    pub id: SponsorId,

    /// Company fields.
    #[serde(flatten)]
    pub fields: SponsorFields,
}

/// Sponsorship level of a sponsor on one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorTier {
    /// Top tier.
    Platinum,
    /// Second tier.
    #[default]
    Gold,
    /// Third tier.
    Silver,
    /// Fourth tier.
    Bronze,
    /// Media or community partner.
    Partner,
}

/// Session payload for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFields {
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

    /// Presenting speaker. A session may have none.
    pub speaker_id: Option<SpeakerId>,
}

/// A session as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Backend id.
    pub id: SessionId,

    /// Stored fields.
    #[serde(flatten)]
    pub fields: SessionFields,
}

/// Body of an add-link call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorLinkFields {
    /// Sponsor to attach.
    pub sponsor_id: SponsorId,

    /// Sponsorship level.
    pub tier: SponsorTier,
}

/// Body of an update-tier call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUpdate {
    /// New sponsorship level.
    pub tier: SponsorTier,
}

/// One existing sponsor link as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorLinkRecord {
    /// Linked sponsor.
    pub sponsor_id: SponsorId,

    /// Current sponsorship level.
    pub tier: SponsorTier,
}

/// A fetched event with its nested resources, used to hydrate a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    /// Backend id.
    pub id: EventId,

    /// Stored scalar fields.
    #[serde(flatten)]
    pub fields: EventFields,

    /// Stored status.
    pub status: EventStatus,

    /// Stored publish flag.
    pub is_published: bool,

    /// Legacy directly-attached speakers.
    #[serde(default)]
    pub speaker_ids: Vec<SpeakerId>,

    /// Sessions in display order.
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,

    /// Sponsor links in display order.
    #[serde(default)]
    pub sponsor_links: Vec<SponsorLinkRecord>,
}

/// Prefix a bare host with `scheme`, leave full URLs alone, drop blanks.
///
/// # Examples
///
/// ```
/// # use eventdesk_editor::providers::normalize_website;
/// assert_eq!(normalize_website("acme.io", "https://").as_deref(), Some("https://acme.io"));
/// assert_eq!(normalize_website("http://acme.io", "https://").as_deref(), Some("http://acme.io"));
/// assert_eq!(normalize_website("   ", "https://"), None);
/// ```
#[must_use]
pub fn normalize_website(raw: &str, scheme: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("{scheme}{trimmed}"))
    }
}
