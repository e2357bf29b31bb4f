//! Shared fixtures for the editor integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveTime};
use eventdesk_editor::draft::{SessionPatch, SponsorLinkPatch};
use eventdesk_editor::mocks::{GatewayCall, MockEntityGateway};
use eventdesk_editor::providers::{
    RemoteEvent, SessionFields, SessionRecord, SpeakerFields, SponsorFields, SponsorLinkRecord,
    SponsorTier,
};
use eventdesk_editor::{
    EventDraft, EventFields, EventId, EventStatus, ItemKind, LocalId, Reconciler, Reference,
    RequiredFieldsValidator, SessionId, SpeakerId, SponsorId,
};
use eventdesk_testing::mocks::{test_clock, FixedClock};

pub type TestReconciler = Reconciler<MockEntityGateway, FixedClock>;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn reconciler(gateway: &MockEntityGateway) -> TestReconciler {
    Reconciler::new(gateway.clone(), test_clock(), RequiredFieldsValidator)
}

/// Every field the publish gate asks for, on a three-day event in May 2025.
pub fn complete_fields() -> EventFields {
    EventFields {
        title: "RustConf".into(),
        description: "Three days of Rust".into(),
        start_date: Some(date(2025, 5, 10)),
        end_date: Some(date(2025, 5, 12)),
        start_time: Some(time(9, 0)),
        end_time: Some(time(17, 0)),
        registration_deadline: Some(date(2025, 5, 1)),
        location: "Seattle".into(),
        capacity: Some(500),
        organizer: "Rust Foundation".into(),
        contact_email: "hello@rustconf.com".into(),
        contact_phone: "+1 555 0100".into(),
        price_cents: Some(0),
        ..EventFields::default()
    }
}

/// A complete session patch for the first day of [`complete_fields`].
pub fn session_patch(title: &str) -> SessionPatch {
    SessionPatch {
        title: Some(title.into()),
        description: Some(format!("{title} abstract")),
        date: Some(Some(date(2025, 5, 10))),
        start_time: Some(Some(time(10, 0))),
        end_time: Some(Some(time(11, 0))),
        venue: Some("Hall A".into()),
    }
}

pub fn new_speaker(name: &str) -> Reference<SpeakerId, SpeakerFields> {
    Reference::New(SpeakerFields {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        ..SpeakerFields::default()
    })
}

pub fn new_sponsor(name: &str, website: Option<&str>) -> Reference<SponsorId, SponsorFields> {
    Reference::New(SponsorFields {
        name: name.into(),
        website: website.map(str::to_string),
        ..SponsorFields::default()
    })
}

pub fn add_session(draft: &mut EventDraft, title: &str) -> LocalId {
    let id = draft.add_item(ItemKind::Session);
    draft.update_session(id, session_patch(title)).unwrap();
    id
}

pub fn add_link(
    draft: &mut EventDraft,
    sponsor: Reference<SponsorId, SponsorFields>,
    tier: SponsorTier,
) -> LocalId {
    let id = draft.add_item(ItemKind::SponsorLink);
    draft.set_sponsor(id, sponsor).unwrap();
    draft
        .update_sponsor_link(id, SponsorLinkPatch { tier: Some(tier) })
        .unwrap();
    id
}

/// A stored event with one session and one sponsor link (`sp1`, Gold).
pub fn stored_event() -> RemoteEvent {
    RemoteEvent {
        id: EventId::try_new("evt-42").unwrap(),
        fields: complete_fields(),
        status: EventStatus::Draft,
        is_published: false,
        speaker_ids: Vec::new(),
        sessions: vec![SessionRecord {
            id: SessionId::try_new("ses-1").unwrap(),
            fields: SessionFields {
                title: "Opening".into(),
                date: Some(date(2025, 5, 10)),
                start_time: Some(time(9, 0)),
                end_time: Some(time(9, 30)),
                venue: "Main stage".into(),
                ..SessionFields::default()
            },
        }],
        sponsor_links: vec![SponsorLinkRecord {
            sponsor_id: SponsorId::try_new("sp1").unwrap(),
            tier: SponsorTier::Gold,
        }],
    }
}

pub fn is_create(call: &GatewayCall) -> bool {
    matches!(
        call,
        GatewayCall::CreateEvent(_)
            | GatewayCall::CreateSpeaker(_)
            | GatewayCall::CreateSponsor(_)
            | GatewayCall::CreateSession(..)
            | GatewayCall::AddSponsorLink(..)
    )
}
