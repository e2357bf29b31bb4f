//! Integration tests for immediate removal of sessions and sponsor links.

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use eventdesk_editor::draft::{RemovalTarget, RemovedItem, SessionPayload};
use eventdesk_editor::mocks::{GatewayCall, MockEntityGateway};
use eventdesk_editor::providers::SponsorTier;
use eventdesk_editor::{
    DraftError, EventDraft, GatewayError, ItemKind, Reference, RemovalError, SessionId,
    SponsorId,
};

#[tokio::test]
async fn draft_item_is_removed_without_calls() {
    let gateway = MockEntityGateway::new();
    let mut draft = EventDraft::hydrate(stored_event());
    let fresh = add_session(&mut draft, "Unsaved");

    let removed = reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::Session, fresh)
        .await
        .unwrap();

    assert!(matches!(removed, RemovedItem::Session(s) if s.payload.title == "Unsaved"));
    assert!(gateway.calls().is_empty());
    assert_eq!(draft.sessions.len(), 1);
}

#[tokio::test]
async fn persisted_session_is_deleted_remotely_then_locally() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored);
    let mut draft = EventDraft::hydrate(stored.clone());
    let opening = draft.sessions.iter().next().unwrap().local_id;

    reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::Session, opening)
        .await
        .unwrap();

    assert!(draft.sessions.is_empty());
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::DeleteSession(
            stored.id.clone(),
            SessionId::try_new("ses-1").unwrap()
        )]
    );
    assert!(gateway.sessions_of(&stored.id).is_empty());
}

#[tokio::test]
async fn persisted_sponsor_link_is_unlinked() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored);
    let mut draft = EventDraft::hydrate(stored.clone());
    let link = draft.sponsor_links.iter().next().unwrap().local_id;

    reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::SponsorLink, link)
        .await
        .unwrap();

    assert!(draft.sponsor_links.is_empty());
    assert!(gateway.linked_sponsors(&stored.id).is_empty());
}

#[tokio::test]
async fn failed_delete_keeps_the_item() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored).fail_when(
        |c| matches!(c, GatewayCall::RemoveSponsorLink(..)),
        GatewayError::Rejected {
            status: 503,
            message: "maintenance".into(),
        },
    );
    let mut draft = EventDraft::hydrate(stored.clone());
    let link = draft.sponsor_links.iter().next().unwrap().local_id;

    let result = reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::SponsorLink, link)
        .await;

    let Err(RemovalError::Gateway { target, source }) = result else {
        unreachable!("expected a gateway failure");
    };
    assert_eq!(target, RemovalTarget::SponsorLink(SponsorId::try_new("sp1").unwrap()));
    assert!(source.is_transient());
    assert_eq!(draft.sponsor_links.len(), 1);
    assert_eq!(gateway.linked_sponsors(&stored.id).len(), 1);
}

#[tokio::test]
async fn persisted_item_under_unsaved_event_is_rejected() {
    let gateway = MockEntityGateway::new();
    let mut draft = EventDraft::new();
    let orphan = draft.sessions.hydrate(
        SessionId::try_new("ses-7").unwrap(),
        Reference::Unassigned,
        SessionPayload::default(),
    );

    let result = reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::Session, orphan)
        .await;

    assert_eq!(result, Err(RemovalError::EventNotPersisted));
    assert_eq!(draft.sessions.len(), 1);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn unknown_item_is_a_draft_error() {
    let gateway = MockEntityGateway::new();
    let mut draft = EventDraft::new();
    let ghost = add_link(&mut draft, Reference::Unassigned, SponsorTier::Gold);
    draft.remove_item(ItemKind::SponsorLink, ghost).unwrap();

    let result = reconciler(&gateway)
        .remove_item(&mut draft, ItemKind::SponsorLink, ghost)
        .await;

    assert_eq!(
        result,
        Err(RemovalError::Draft(DraftError::UnknownItem {
            kind: ItemKind::SponsorLink,
            local_id: ghost,
        }))
    );
}
