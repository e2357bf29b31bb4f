//! End-to-end tests driving the editor reducer through the runtime store.

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use eventdesk_editor::draft::{Persistence, SessionPatch};
use eventdesk_editor::mocks::{GatewayCall, MockEntityGateway};
use eventdesk_editor::providers::{Sponsor, SponsorFields, SponsorTier};
use eventdesk_editor::state::EditorPhase;
use eventdesk_editor::{
    EditorAction, EditorEnvironment, EditorReducer, EditorState, EventDraft, GatewayError,
    ItemKind, LocalId, Reference, ReconcilerConfig, Roster, SponsorId,
};
use eventdesk_runtime::Store;
use eventdesk_testing::mocks::FixedClock;

type EditorStore = Store<
    EditorState,
    EditorAction,
    EditorEnvironment<MockEntityGateway, FixedClock>,
    EditorReducer<MockEntityGateway, FixedClock>,
>;

fn store(gateway: &MockEntityGateway, draft: EventDraft, config: ReconcilerConfig) -> EditorStore {
    let env = EditorEnvironment::new(reconciler(gateway).with_config(config));
    Store::new(EditorState::new(draft), EditorReducer::new(), env)
}

async fn last_session(store: &EditorStore) -> LocalId {
    store
        .state(|s| s.draft.sessions.iter().last().map(|item| item.local_id))
        .await
        .unwrap()
}

#[tokio::test]
async fn edit_save_apply_round_trip() {
    eventdesk_testing::init_test_tracing();
    let gateway = MockEntityGateway::new();
    let store = store(&gateway, EventDraft::new(), ReconcilerConfig::default());

    store.send(EditorAction::AddItem { kind: ItemKind::Session }).await.unwrap();
    let keynote = last_session(&store).await;
    store
        .send(EditorAction::UpdateSession {
            local_id: keynote,
            patch: session_patch("Keynote"),
        })
        .await
        .unwrap();
    store
        .send(EditorAction::SetSessionSpeaker {
            local_id: keynote,
            speaker: new_speaker("Ada"),
        })
        .await
        .unwrap();
    store.send(EditorAction::AddItem { kind: ItemKind::SponsorLink }).await.unwrap();
    let link = store
        .state(|s| s.draft.sponsor_links.iter().last().map(|item| item.local_id))
        .await
        .unwrap();
    store
        .send(EditorAction::SetSponsor {
            local_id: link,
            sponsor: new_sponsor("Acme", Some("acme.io")),
        })
        .await
        .unwrap();

    let reduced = store.send(EditorAction::Save).await.unwrap();

    assert_eq!(reduced, 2);
    store
        .state(|s| {
            assert_eq!(s.phase, EditorPhase::Idle);
            assert!(s.last_error.is_none());
            assert!(s.draft.remote_id.is_some());
            assert!(s.draft.sessions.iter().all(|i| i.persistence.is_persisted()));
            assert!(s.draft.sponsor_links.iter().all(|i| i.persistence.is_persisted()));
            assert!(matches!(
                s.draft.sessions.get(keynote).unwrap().reference,
                Reference::Existing(_)
            ));
            assert_eq!(s.roster.speakers.len(), 1);
            assert_eq!(s.roster.sponsors[0].fields.name, "Acme");
        })
        .await;

    gateway.clear_calls();
    store.send(EditorAction::Save).await.unwrap();
    assert_eq!(gateway.count_calls(is_create), 0);
    assert_eq!(store.state(|s| s.roster.speakers.len()).await, 1);
}

#[tokio::test]
async fn blocked_publish_through_the_store_reduces_once() {
    let gateway = MockEntityGateway::new();
    let store = store(&gateway, EventDraft::new(), ReconcilerConfig::default());

    let reduced = store.send(EditorAction::Publish).await.unwrap();

    assert_eq!(reduced, 1);
    assert!(gateway.calls().is_empty());
    let missing = store.state(|s| s.missing_fields.clone()).await;
    assert!(missing.contains(&"Title".to_string()));
    assert!(missing.contains(&"Price".to_string()));
}

#[tokio::test]
async fn partial_failure_is_reported_by_name() {
    let gateway = MockEntityGateway::new().fail_when(
        |c| matches!(c, GatewayCall::CreateSession(_, f) if f.title == "Workshop"),
        GatewayError::Transport("reset".into()),
    );
    let mut draft = EventDraft::new();
    add_session(&mut draft, "Keynote");
    let workshop = add_session(&mut draft, "Workshop");
    let store = store(&gateway, draft, ReconcilerConfig::default());

    store.send(EditorAction::Save).await.unwrap();

    store
        .state(|s| {
            assert_eq!(s.phase, EditorPhase::Idle);
            assert_eq!(s.draft.sessions.get(workshop).unwrap().persistence, Persistence::Draft);
            let messages = s.failure_messages();
            assert_eq!(messages.len(), 1);
            assert!(messages[0].starts_with("session \"Workshop\""));
            assert!(s.last_error.as_deref().unwrap().contains("Workshop"));
        })
        .await;
}

#[tokio::test]
async fn confirmed_removal_deletes_remotely() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored);
    let store = store(&gateway, EventDraft::hydrate(stored.clone()), ReconcilerConfig::default());
    let opening = last_session(&store).await;

    let reduced = store
        .send(EditorAction::RequestRemoval {
            kind: ItemKind::Session,
            local_id: opening,
        })
        .await
        .unwrap();

    assert_eq!(reduced, 1);
    assert!(gateway.calls().is_empty());
    let label = store
        .state(|s| s.pending_removal.as_ref().map(|p| p.label.clone()))
        .await;
    assert_eq!(label.as_deref(), Some("Opening"));

    let reduced = store.send(EditorAction::ConfirmRemoval).await.unwrap();

    assert_eq!(reduced, 2);
    assert!(store.state(|s| s.draft.sessions.is_empty()).await);
    assert!(gateway.sessions_of(&stored.id).is_empty());
}

#[tokio::test]
async fn failed_removal_keeps_item_and_reports() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored).fail_when(
        |c| matches!(c, GatewayCall::DeleteSession(..)),
        GatewayError::NotFound,
    );
    let config = ReconcilerConfig::default().with_require_removal_confirmation(false);
    let store = store(&gateway, EventDraft::hydrate(stored.clone()), config);
    let opening = last_session(&store).await;

    store
        .send(EditorAction::RequestRemoval {
            kind: ItemKind::Session,
            local_id: opening,
        })
        .await
        .unwrap();

    store
        .state(|s| {
            assert!(s.draft.sessions.get(opening).is_some());
            assert!(s.pending_removal.is_none());
            assert!(s.last_error.as_deref().unwrap().contains("session ses-1"));
        })
        .await;
}

#[tokio::test]
async fn cancelled_removal_keeps_item() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored);
    let store = store(&gateway, EventDraft::hydrate(stored.clone()), ReconcilerConfig::default());
    let opening = last_session(&store).await;

    store
        .send(EditorAction::RequestRemoval {
            kind: ItemKind::Session,
            local_id: opening,
        })
        .await
        .unwrap();
    store.send(EditorAction::CancelRemoval).await.unwrap();
    store.send(EditorAction::ConfirmRemoval).await.unwrap();

    assert_eq!(store.state(|s| s.draft.sessions.len()).await, 1);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn tier_edit_after_save_is_an_update() {
    let stored = stored_event();
    let gateway = MockEntityGateway::new().with_event(&stored);
    let store = store(&gateway, EventDraft::hydrate(stored.clone()), ReconcilerConfig::default());
    let link = store
        .state(|s| s.draft.sponsor_links.iter().next().map(|l| l.local_id))
        .await
        .unwrap();

    store
        .send(EditorAction::UpdateSponsorLink {
            local_id: link,
            patch: eventdesk_editor::draft::SponsorLinkPatch {
                tier: Some(SponsorTier::Partner),
            },
        })
        .await
        .unwrap();
    store
        .send(EditorAction::UpdateSession {
            local_id: last_session(&store).await,
            patch: SessionPatch {
                title: Some("Welcome".into()),
                ..SessionPatch::default()
            },
        })
        .await
        .unwrap();
    store.send(EditorAction::Save).await.unwrap();

    assert_eq!(gateway.count_calls(is_create), 0);
    assert_eq!(gateway.linked_sponsors(&stored.id)[0].tier, SponsorTier::Partner);
    assert_eq!(gateway.sessions_of(&stored.id)[0].fields.title, "Welcome");
}

#[tokio::test]
async fn failed_link_to_existing_sponsor_is_named_from_the_roster() {
    let gateway = MockEntityGateway::new().fail_when(
        |c| matches!(c, GatewayCall::AddSponsorLink(..)),
        GatewayError::Rejected {
            status: 500,
            message: "boom".into(),
        },
    );
    let globex = SponsorId::try_new("sp7").unwrap();
    let roster = Roster {
        speakers: Vec::new(),
        sponsors: vec![Sponsor {
            id: globex.clone(),
            fields: SponsorFields {
                name: "Globex".into(),
                ..SponsorFields::default()
            },
        }],
    };
    let mut draft = EventDraft::new();
    add_link(&mut draft, Reference::Existing(globex), SponsorTier::Gold);
    let env = EditorEnvironment::new(reconciler(&gateway));
    let store: EditorStore = Store::new(
        EditorState::new(draft).with_roster(roster),
        EditorReducer::new(),
        env,
    );

    store.send(EditorAction::Save).await.unwrap();

    let messages = store.state(EditorState::failure_messages).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("sponsor link \"Globex\": Could not link sponsor"));
}
