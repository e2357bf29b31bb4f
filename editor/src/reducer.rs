//! Editor reducer.
//!
//! Applies draft edits synchronously and turns Save, Publish and confirmed
//! removals into effects that run against the [`Reconciler`].
//!
//! # Flow
//!
//! ```text
//! Save ──▶ phase = Saving ──▶ Effect::Future(run) ──▶ SaveCompleted ──▶ apply report, merge roster
//!                                                └─▶ SaveFailed    ──▶ last_error
//! RequestRemoval (draft)     ──▶ removed locally
//! RequestRemoval (persisted) ──▶ pending ──ConfirmRemoval──▶ Effect::Future(delete)
//!                                            ├─▶ RemovalCompleted ──▶ removed locally
//!                                            └─▶ RemovalFailed    ──▶ item kept, last_error
//! ```
//!
//! [`Reconciler`]: crate::reconciler::Reconciler

use crate::actions::EditorAction;
use crate::draft::RemovalPlan;
use crate::environment::EditorEnvironment;
use crate::error::{EditorError, ReconcileError, RemovalError, Result};
use crate::outcome::Intent;
use crate::providers::EntityGateway;
use crate::publish::{PublishDecision, PublishValidator, RequiredFieldsValidator};
use crate::state::{EditorPhase, EditorState, PendingRemoval};
use eventdesk_core::effect::Effect;
use eventdesk_core::environment::Clock;
use eventdesk_core::reducer::Reducer;
use eventdesk_core::{smallvec, SmallVec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<EditorAction>; 4]>;

/// Reducer for one editing session.
#[derive(Debug, Clone)]
pub struct EditorReducer<G, C, V = RequiredFieldsValidator> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(G, C, V)>,
}

impl<G, C, V> EditorReducer<G, C, V> {
    /// Create a new editor reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, C, V> Default for EditorReducer<G, C, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn fail(state: &mut EditorState, error: impl Into<EditorError>) -> Effects {
    let error = error.into();
    if let EditorError::Reconcile(ReconcileError::PublishBlocked { missing_fields }) = &error {
        state.missing_fields.clone_from(missing_fields);
    }
    state.last_error = Some(error.to_string());
    smallvec![Effect::None]
}

fn edited(state: &mut EditorState, result: Result<()>) -> Effects {
    match result {
        Ok(()) => smallvec![Effect::None],
        Err(error) => {
            tracing::warn!(%error, "Draft edit rejected");
            fail(state, error)
        },
    }
}

impl<G, C, V> EditorReducer<G, C, V>
where
    G: EntityGateway + 'static,
    C: Clock + 'static,
    V: PublishValidator + 'static,
{
    fn start_reconcile(
        state: &mut EditorState,
        intent: Intent,
        env: &EditorEnvironment<G, C, V>,
    ) -> Effects {
        if state.is_busy() {
            tracing::warn!(?intent, phase = ?state.phase, "Save already in flight, ignoring");
            return smallvec![Effect::None];
        }

        if intent == Intent::Publish {
            if let PublishDecision::Blocked { missing_fields } =
                env.reconciler.gate().can_publish(&state.draft)
            {
                return fail(state, ReconcileError::PublishBlocked { missing_fields });
            }
        }

        state.missing_fields.clear();
        state.last_error = None;
        state.phase = EditorPhase::Saving(intent);

        let reconciler = Arc::clone(&env.reconciler);
        let draft = state.draft.clone();

        smallvec![Effect::future(async move {
            match reconciler.run(&draft, intent).await {
                Ok(report) => Some(EditorAction::SaveCompleted {
                    report: Box::new(report),
                }),
                Err(error) => Some(EditorAction::SaveFailed { error }),
            }
        })]
    }

    fn start_removal(
        state: &mut EditorState,
        pending: PendingRemoval,
        env: &EditorEnvironment<G, C, V>,
    ) -> Effects {
        let Some(event_id) = state.draft.remote_id.clone() else {
            return fail(state, RemovalError::EventNotPersisted);
        };

        let reconciler = Arc::clone(&env.reconciler);
        let PendingRemoval {
            kind,
            local_id,
            target,
            ..
        } = pending;

        smallvec![Effect::future(async move {
            match reconciler.delete_remote(&event_id, &target).await {
                Ok(()) => Some(EditorAction::RemovalCompleted { kind, local_id }),
                Err(error) => Some(EditorAction::RemovalFailed {
                    kind,
                    local_id,
                    error,
                }),
            }
        })]
    }
}

impl<G, C, V> Reducer for EditorReducer<G, C, V>
where
    G: EntityGateway + 'static,
    C: Clock + 'static,
    V: PublishValidator + 'static,
{
    type State = EditorState;
    type Action = EditorAction;
    type Environment = EditorEnvironment<G, C, V>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Draft edits: synchronous, no effects
            // ═══════════════════════════════════════════════════════════════
            EditorAction::AddItem { kind } => {
                state.draft.add_item(kind);
                smallvec![Effect::None]
            },

            EditorAction::UpdateFields { fields } => {
                state.draft.fields = *fields;
                smallvec![Effect::None]
            },

            EditorAction::UpdateSession { local_id, patch } => {
                let result = state.draft.update_session(local_id, patch).map_err(Into::into);
                edited(state, result)
            },

            EditorAction::UpdateSponsorLink { local_id, patch } => {
                let result = state.draft.update_sponsor_link(local_id, patch).map_err(Into::into);
                edited(state, result)
            },

            EditorAction::SetSessionSpeaker { local_id, speaker } => {
                let result = state.draft.set_session_speaker(local_id, speaker).map_err(Into::into);
                edited(state, result)
            },

            EditorAction::SetSponsor { local_id, sponsor } => {
                let result = state.draft.set_sponsor(local_id, sponsor).map_err(Into::into);
                edited(state, result)
            },

            // ═══════════════════════════════════════════════════════════════
            // Removal
            // ═══════════════════════════════════════════════════════════════
            EditorAction::RequestRemoval { kind, local_id } => {
                let plan = match state.draft.removal_plan(kind, local_id) {
                    Ok(plan) => plan,
                    Err(error) => return edited(state, Err(error.into())),
                };

                match plan {
                    RemovalPlan::Local => {
                        let result = state
                            .draft
                            .remove_item(kind, local_id)
                            .map(|_| ())
                            .map_err(Into::into);
                        edited(state, result)
                    },
                    RemovalPlan::Remote(target) => {
                        let pending = PendingRemoval {
                            kind,
                            local_id,
                            target,
                            label: state.draft.label_of(kind, local_id).unwrap_or_default(),
                        };
                        if env.reconciler.config().require_removal_confirmation {
                            state.pending_removal = Some(pending);
                            smallvec![Effect::None]
                        } else {
                            Self::start_removal(state, pending, env)
                        }
                    },
                }
            },

            EditorAction::ConfirmRemoval => {
                let Some(pending) = state.pending_removal.take() else {
                    tracing::warn!("ConfirmRemoval without a pending removal");
                    return smallvec![Effect::None];
                };
                Self::start_removal(state, pending, env)
            },

            EditorAction::CancelRemoval => {
                state.pending_removal = None;
                smallvec![Effect::None]
            },

            EditorAction::RemovalCompleted { kind, local_id } => {
                if let Err(error) = state.draft.remove_item(kind, local_id) {
                    tracing::debug!(%error, "Deleted item was already gone from the draft");
                }
                smallvec![Effect::None]
            },

            EditorAction::RemovalFailed {
                kind,
                local_id,
                error,
            } => {
                tracing::warn!(%kind, %local_id, %error, "Removal failed, item kept");
                fail(state, error)
            },

            // ═══════════════════════════════════════════════════════════════
            // Save / Publish
            // ═══════════════════════════════════════════════════════════════
            EditorAction::Save => Self::start_reconcile(state, Intent::Save, env),

            EditorAction::Publish => Self::start_reconcile(state, Intent::Publish, env),

            EditorAction::SaveCompleted { report } => {
                state.draft.apply_report(&report);
                state.roster.merge(&report.newly_created);
                state.phase = EditorPhase::Idle;
                state.last_report = Some(*report);

                let failed = state.failure_messages();
                state.last_error = (!failed.is_empty()).then(|| failed.join("\n"));
                smallvec![Effect::None]
            },

            EditorAction::SaveFailed { error } => {
                state.phase = EditorPhase::Idle;
                fail(state, error)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EventDraft, ItemKind};
    use crate::mocks::MockEntityGateway;
    use crate::reconciler::Reconciler;
    use eventdesk_testing::assertions::{assert_future_count, assert_no_effects};
    use eventdesk_testing::mocks::{test_clock, FixedClock};
    use eventdesk_testing::ReducerTest;

    type TestReducer = EditorReducer<MockEntityGateway, FixedClock>;

    fn env() -> EditorEnvironment<MockEntityGateway, FixedClock> {
        EditorEnvironment::new(Reconciler::new(
            MockEntityGateway::new(),
            test_clock(),
            RequiredFieldsValidator,
        ))
    }

    #[test]
    fn add_item_is_local() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(EditorState::new(EventDraft::new()))
            .when_action(EditorAction::AddItem {
                kind: ItemKind::Session,
            })
            .then_state(|state| assert_eq!(state.draft.sessions.len(), 1))
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn save_while_saving_is_ignored() {
        let mut busy = EditorState::new(EventDraft::new());
        busy.phase = EditorPhase::Saving(Intent::Save);

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(busy)
            .when_action(EditorAction::Publish)
            .then_state(|state| assert_eq!(state.phase, EditorPhase::Saving(Intent::Save)))
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn save_starts_one_effect() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(EditorState::new(EventDraft::new()))
            .when_action(EditorAction::Save)
            .then_state(|state| {
                assert!(state.is_busy());
                assert!(state.last_error.is_none());
            })
            .then_effects(|effects| assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn blocked_publish_sets_missing_fields_without_effects() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(EditorState::new(EventDraft::new()))
            .when_action(EditorAction::Publish)
            .then_state(|state| {
                assert!(!state.is_busy());
                assert!(state.missing_fields.contains(&"Title".to_string()));
                assert!(state.last_error.is_some());
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn blocked_run_reports_missing_fields_and_goes_idle() {
        let mut saving = EditorState::new(EventDraft::new());
        saving.phase = EditorPhase::Saving(Intent::Publish);

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(saving)
            .when_action(EditorAction::SaveFailed {
                error: ReconcileError::PublishBlocked {
                    missing_fields: vec!["Date range".to_string()],
                },
            })
            .then_state(|state| {
                assert_eq!(state.phase, EditorPhase::Idle);
                assert_eq!(state.missing_fields, vec!["Date range".to_string()]);
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Cannot publish, missing: Date range")
                );
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn unknown_item_edit_is_reported() {
        let state = ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(EditorState::new(EventDraft::new()))
            .when_action(EditorAction::RequestRemoval {
                kind: ItemKind::SponsorLink,
                local_id: crate::ids::LocalId::new(7),
            })
            .then_effects(assert_no_effects)
            .run();

        assert_eq!(
            state.last_error.as_deref(),
            Some("No sponsor link with local id #7")
        );
    }
}
