//! Property tests for reconciliation.

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use eventdesk_editor::mocks::{GatewayCall, MockEntityGateway};
use eventdesk_editor::providers::SponsorTier;
use eventdesk_editor::{EventDraft, GatewayError, Reference, SponsorId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum LinkSpec {
    Existing(u8),
    New(String),
}

fn tier() -> impl Strategy<Value = SponsorTier> {
    prop_oneof![
        Just(SponsorTier::Platinum),
        Just(SponsorTier::Gold),
        Just(SponsorTier::Silver),
        Just(SponsorTier::Bronze),
        Just(SponsorTier::Partner),
    ]
}

fn link_spec() -> impl Strategy<Value = LinkSpec> {
    prop_oneof![
        (0u8..4).prop_map(LinkSpec::Existing),
        "[A-Z][a-z]{2,8}".prop_map(LinkSpec::New),
    ]
}

fn build_draft(sessions: &[(String, bool)], links: &[(LinkSpec, SponsorTier)]) -> EventDraft {
    let mut draft = EventDraft::new();
    for (title, with_speaker) in sessions {
        let id = add_session(&mut draft, title);
        if *with_speaker {
            draft.set_session_speaker(id, new_speaker(title)).unwrap();
        }
    }
    for (spec, tier) in links {
        let sponsor = match spec {
            LinkSpec::Existing(n) => Reference::Existing(SponsorId::try_new(format!("sp{n}")).unwrap()),
            LinkSpec::New(name) => new_sponsor(name, Some("example.org")),
        };
        add_link(&mut draft, sponsor, *tier);
    }
    draft
}

proptest! {
    #[test]
    fn second_save_without_edits_never_creates(
        sessions in prop::collection::vec(("[A-Z][a-z]{3,10}", any::<bool>()), 0..5),
        links in prop::collection::vec((link_spec(), tier()), 0..5),
    ) {
        let gateway = MockEntityGateway::new();
        let reconciler = reconciler(&gateway);
        let mut draft = build_draft(&sessions, &links);

        tokio_test::block_on(async {
            let first = reconciler.save(&draft).await.unwrap();
            prop_assert!(first.is_fully_applied());
            draft.apply_report(&first);
            gateway.clear_calls();

            let second = reconciler.save(&draft).await.unwrap();
            prop_assert!(second.is_fully_applied());
            prop_assert!(second.newly_created.is_empty());
            prop_assert_eq!(gateway.count_calls(is_create), 0);
            prop_assert_eq!(
                gateway.count_calls(|c| matches!(c, GatewayCall::UpdateSession(..))),
                sessions.len()
            );
            prop_assert_eq!(
                gateway.count_calls(|c| matches!(c, GatewayCall::UpdateSponsorLink(..))),
                links.len()
            );
            Ok(())
        })?;
    }

    #[test]
    fn one_failing_session_never_blocks_the_others(
        count in 1usize..6,
        failing in 0usize..6,
    ) {
        let failing = failing % count;
        let titles: Vec<String> = (0..count).map(|i| format!("Session {i}")).collect();
        let doomed = titles[failing].clone();
        let gateway = MockEntityGateway::new().fail_when(
            move |c| matches!(c, GatewayCall::CreateSession(_, f) if f.title == doomed),
            GatewayError::Transport("reset".into()),
        );
        let sessions: Vec<(String, bool)> = titles.iter().map(|t| (t.clone(), false)).collect();
        let draft = build_draft(&sessions, &[]);

        let report = tokio_test::block_on(reconciler(&gateway).save(&draft)).unwrap();

        prop_assert_eq!(report.sessions.len(), count);
        for (index, outcome) in report.sessions.iter().enumerate() {
            prop_assert_eq!(outcome.is_ok(), index != failing);
        }
        prop_assert_eq!(
            gateway.count_calls(|c| matches!(c, GatewayCall::CreateSession(..))),
            count
        );
    }
}
