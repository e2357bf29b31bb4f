//! Draft-to-backend reconciliation.
//!
//! A pass runs in three stages, each finished before the next starts:
//!
//! 1. Base event upsert. A failure here aborts the pass.
//! 2. Sessions, one at a time in draft order. Inline speakers are created
//!    first.
//! 3. Sponsor links, one at a time, after a single lookup of the sponsors
//!    already linked to the event. Inline sponsors are created first. A saved
//!    link switched to another sponsor unlinks the old one after the new
//!    link is written.
//!
//! Item failures in stages 2 and 3 are captured in the report and never
//! stop the remaining items. Nothing is retried automatically. A failed item
//! stays unpersisted and the next Save tries it again.

use crate::config::ReconcilerConfig;
use crate::draft::{
    EventDraft, ItemKind, RemovalPlan, RemovalTarget, RemovedItem, Reference, SessionDraft,
    SponsorLinkDraft,
};
use crate::error::{GatewayError, ItemError, ReconcileError, RemovalError};
use crate::ids::{EventId, LocalId, SponsorId};
use crate::outcome::{
    EventCommit, Intent, ItemWrite, NewlyCreated, Precheck, ReconcileReport, SessionOutcome,
    SponsorLinkOutcome, WriteKind,
};
use crate::providers::{EntityGateway, Speaker, Sponsor, SponsorLinkFields, TierUpdate};
use crate::publish::{
    calculate_event_status, PublishDecision, PublishGate, PublishValidator,
    RequiredFieldsValidator,
};
use eventdesk_core::environment::Clock;
use std::collections::HashSet;

/// Runs Save and Publish against an [`EntityGateway`].
#[derive(Debug, Clone)]
pub struct Reconciler<G, C, V = RequiredFieldsValidator> {
    gateway: G,
    clock: C,
    gate: PublishGate<V>,
    config: ReconcilerConfig,
}

fn record_outcome<T>(kind: ItemKind, result: &Result<T, ItemError>) {
    let kind = match kind {
        ItemKind::Session => "session",
        ItemKind::SponsorLink => "sponsor_link",
    };
    let outcome = if result.is_ok() { "written" } else { "failed" };
    metrics::counter!("reconciler.items", "kind" => kind, "outcome" => outcome).increment(1);
}

impl<G, C, V> Reconciler<G, C, V>
where
    G: EntityGateway,
    C: Clock,
    V: PublishValidator,
{
    /// Create a reconciler with default configuration.
    #[must_use]
    pub fn new(gateway: G, clock: C, validator: V) -> Self {
        Self {
            gateway,
            clock,
            gate: PublishGate::new(validator),
            config: ReconcilerConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// The backend gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The publish gate.
    #[must_use]
    pub const fn gate(&self) -> &PublishGate<V> {
        &self.gate
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Store the draft without publishing it.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::EventUpsert`] if the base event could not be written.
    pub async fn save(&self, draft: &EventDraft) -> Result<ReconcileReport, ReconcileError> {
        self.run(draft, Intent::Save).await
    }

    /// Store the draft and publish it.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::PublishBlocked`] before any backend call if
    /// required fields are missing, or [`ReconcileError::EventUpsert`] if the
    /// base event could not be written.
    pub async fn publish(&self, draft: &EventDraft) -> Result<ReconcileReport, ReconcileError> {
        self.run(draft, Intent::Publish).await
    }

    /// Reconcile the whole draft.
    ///
    /// The draft is not modified. Fold the report back with
    /// [`EventDraft::apply_report`].
    ///
    /// # Errors
    ///
    /// See [`Reconciler::save`] and [`Reconciler::publish`].
    #[tracing::instrument(skip_all, fields(intent = ?intent, event_id = ?draft.remote_id))]
    pub async fn run(
        &self,
        draft: &EventDraft,
        intent: Intent,
    ) -> Result<ReconcileReport, ReconcileError> {
        if intent == Intent::Publish {
            if let PublishDecision::Blocked { missing_fields } = self.gate.can_publish(draft) {
                tracing::info!(missing = missing_fields.len(), "Publish blocked by required fields");
                metrics::counter!("reconciler.publish.blocked").increment(1);
                return Err(ReconcileError::PublishBlocked { missing_fields });
            }
        }

        let event = self.upsert_event(draft, intent).await?;
        let mut newly_created = NewlyCreated::default();

        let sessions = self
            .reconcile_sessions(&event.event_id, draft, &mut newly_created)
            .await;
        let (sponsor_links, precheck) = self
            .reconcile_sponsor_links(&event.event_id, draft, &mut newly_created)
            .await;

        let report = ReconcileReport {
            intent,
            event,
            sessions,
            sponsor_links,
            newly_created,
            precheck,
        };
        tracing::debug!(
            failures = report.failures().len(),
            speakers_created = report.newly_created.speakers.len(),
            sponsors_created = report.newly_created.sponsors.len(),
            "Reconciliation finished"
        );
        Ok(report)
    }

    async fn upsert_event(
        &self,
        draft: &EventDraft,
        intent: Intent,
    ) -> Result<EventCommit, ReconcileError> {
        let (status, is_published) = match intent {
            Intent::Save => (draft.status, draft.is_published),
            Intent::Publish => {
                // A published event needs a derived status, never Draft.
                let Some(start) = draft.fields.start_date else {
                    tracing::info!("Publish blocked, no start date to derive a status from");
                    metrics::counter!("reconciler.publish.blocked").increment(1);
                    return Err(ReconcileError::PublishBlocked {
                        missing_fields: vec!["Date range".to_string()],
                    });
                };
                let status = calculate_event_status(start, draft.fields.end_date, self.clock.now());
                (status, true)
            },
        };
        let payload = draft.event_payload(status, is_published);

        let upsert_failed = |error: GatewayError| {
            tracing::error!(%error, "Event upsert failed, nothing else was written");
            ReconcileError::EventUpsert(error)
        };

        let (event_id, created) = match &draft.remote_id {
            Some(event_id) => {
                self.gateway
                    .update_event(event_id, &payload)
                    .await
                    .map_err(upsert_failed)?;
                (event_id.clone(), false)
            },
            None => {
                let event_id = self
                    .gateway
                    .create_event(&payload)
                    .await
                    .map_err(upsert_failed)?;
                tracing::info!(%event_id, "Event created");
                (event_id, true)
            },
        };

        Ok(EventCommit {
            event_id,
            created,
            status,
            is_published,
        })
    }

    async fn reconcile_sessions(
        &self,
        event_id: &EventId,
        draft: &EventDraft,
        newly_created: &mut NewlyCreated,
    ) -> Vec<SessionOutcome> {
        let mut outcomes = Vec::with_capacity(draft.sessions.len());
        for item in &draft.sessions {
            let outcome = self.reconcile_session(event_id, item, newly_created).await;
            record_outcome(ItemKind::Session, &outcome.result);
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn reconcile_session(
        &self,
        event_id: &EventId,
        item: &SessionDraft,
        newly_created: &mut NewlyCreated,
    ) -> SessionOutcome {
        let label = item.label();
        let mut created_entity = None;

        let speaker_id = match &item.reference {
            Reference::Unassigned => None,
            Reference::Existing(id) => Some(id.clone()),
            Reference::New(fields) if fields.is_complete() => {
                match self.gateway.create_speaker(fields).await {
                    Ok(id) => {
                        newly_created.speakers.push(Speaker {
                            id: id.clone(),
                            fields: fields.clone(),
                        });
                        created_entity = Some(id.clone());
                        Some(id)
                    },
                    Err(error) => {
                        tracing::warn!(session = %label, %error, "Speaker creation failed, session skipped");
                        return SessionOutcome {
                            local_id: item.local_id,
                            label,
                            created_entity: None,
                            result: Err(ItemError::SpeakerCreation(error)),
                        };
                    },
                }
            },
            Reference::New(_) => {
                tracing::warn!(
                    session = %label,
                    "New speaker needs a name and email, saving session without speaker"
                );
                None
            },
        };

        let fields = item.payload.to_fields(speaker_id);
        let result = match item.persistence.remote_id() {
            Some(session_id) => self
                .gateway
                .update_session(event_id, session_id, &fields)
                .await
                .map(|()| ItemWrite {
                    kind: WriteKind::Updated,
                    remote_id: session_id.clone(),
                }),
            None => self
                .gateway
                .create_session(event_id, &fields)
                .await
                .map(|remote_id| ItemWrite {
                    kind: WriteKind::Created,
                    remote_id,
                }),
        }
        .map_err(|error| {
            tracing::warn!(session = %label, %error, "Session write failed");
            ItemError::SessionWrite(error)
        });

        SessionOutcome {
            local_id: item.local_id,
            label,
            created_entity,
            result,
        }
    }

    async fn reconcile_sponsor_links(
        &self,
        event_id: &EventId,
        draft: &EventDraft,
        newly_created: &mut NewlyCreated,
    ) -> (Vec<SponsorLinkOutcome>, Precheck) {
        if draft.sponsor_links.is_empty() {
            return (Vec::new(), Precheck::Skipped);
        }

        let (mut linked, precheck) = match self.gateway.list_event_sponsor_links(event_id).await {
            Ok(records) => {
                let linked: HashSet<SponsorId> =
                    records.into_iter().map(|record| record.sponsor_id).collect();
                let count = linked.len();
                (linked, Precheck::Fresh { linked: count })
            },
            Err(error) => {
                tracing::warn!(%error, "Could not list linked sponsors, treating every link as new");
                (
                    HashSet::new(),
                    Precheck::Unavailable {
                        reason: error.to_string(),
                    },
                )
            },
        };

        let wanted: HashSet<SponsorId> = draft
            .sponsor_links
            .iter()
            .filter_map(|item| match &item.reference {
                Reference::Existing(id) => Some(id.clone()),
                Reference::Unassigned | Reference::New(_) => None,
            })
            .collect();

        let mut outcomes = Vec::with_capacity(draft.sponsor_links.len());
        for item in &draft.sponsor_links {
            let outcome = self
                .reconcile_sponsor_link(event_id, item, &mut linked, &wanted, newly_created)
                .await;
            record_outcome(ItemKind::SponsorLink, &outcome.result);
            outcomes.push(outcome);
        }
        (outcomes, precheck)
    }

    async fn reconcile_sponsor_link(
        &self,
        event_id: &EventId,
        item: &SponsorLinkDraft,
        linked: &mut HashSet<SponsorId>,
        wanted: &HashSet<SponsorId>,
        newly_created: &mut NewlyCreated,
    ) -> SponsorLinkOutcome {
        let incomplete = |reason: &str| SponsorLinkOutcome {
            local_id: item.local_id,
            label: item.label(),
            created_entity: None,
            result: Err(ItemError::Incomplete {
                reason: reason.to_string(),
            }),
        };

        let mut created_entity = None;
        let sponsor_id = match &item.reference {
            Reference::Existing(id) => id.clone(),
            Reference::New(fields) if !fields.name.trim().is_empty() => {
                let fields = fields.normalized(&self.config.website_scheme);
                match self.gateway.create_sponsor(&fields).await {
                    Ok(id) => {
                        newly_created.sponsors.push(Sponsor {
                            id: id.clone(),
                            fields,
                        });
                        created_entity = Some(id.clone());
                        id
                    },
                    Err(error) => {
                        tracing::warn!(sponsor = %fields.name, %error, "Sponsor creation failed");
                        return SponsorLinkOutcome {
                            local_id: item.local_id,
                            label: item.label(),
                            created_entity: None,
                            result: Err(ItemError::SponsorCreation(error)),
                        };
                    },
                }
            },
            Reference::New(_) => return incomplete("new sponsor needs a name"),
            Reference::Unassigned => return incomplete("no sponsor selected"),
        };

        let tier = item.payload.tier;
        let result = if linked.contains(&sponsor_id) {
            self.update_tier(event_id, &sponsor_id, item.local_id, TierUpdate { tier })
                .await
        } else {
            let link = SponsorLinkFields {
                sponsor_id: sponsor_id.clone(),
                tier,
            };
            match self.gateway.add_sponsor_link(event_id, &link).await {
                Ok(()) => {
                    linked.insert(sponsor_id.clone());
                    Ok(ItemWrite {
                        kind: WriteKind::Linked,
                        remote_id: sponsor_id,
                    })
                },
                Err(GatewayError::Conflict(reason)) if self.config.duplicate_link_fallback => {
                    tracing::debug!(%sponsor_id, %reason, "Sponsor already linked, updating tier");
                    linked.insert(sponsor_id.clone());
                    self.update_tier(event_id, &sponsor_id, item.local_id, TierUpdate { tier })
                        .await
                },
                Err(error) => Err(ItemError::SponsorLink(error)),
            }
        };

        // A persisted link pointed at another sponsor drops the old link once
        // the new one is in place, unless another link still wants it.
        let result = match (result, item.persistence.remote_id()) {
            (Ok(write), Some(previous))
                if *previous != write.remote_id && !wanted.contains(previous) =>
            {
                self.unlink_previous(event_id, previous, linked)
                    .await
                    .map(|()| write)
            },
            (result, _) => result,
        };

        SponsorLinkOutcome {
            local_id: item.local_id,
            label: item.label(),
            created_entity,
            result,
        }
    }

    async fn update_tier(
        &self,
        event_id: &EventId,
        sponsor_id: &SponsorId,
        local_id: LocalId,
        update: TierUpdate,
    ) -> Result<ItemWrite<SponsorId>, ItemError> {
        self.gateway
            .update_sponsor_link(event_id, sponsor_id, &update)
            .await
            .map(|()| ItemWrite {
                kind: WriteKind::TierUpdated,
                remote_id: sponsor_id.clone(),
            })
            .map_err(|error| {
                tracing::warn!(%local_id, %sponsor_id, %error, "Tier update failed");
                ItemError::SponsorLink(error)
            })
    }

    async fn unlink_previous(
        &self,
        event_id: &EventId,
        previous: &SponsorId,
        linked: &mut HashSet<SponsorId>,
    ) -> Result<(), ItemError> {
        match self.gateway.remove_sponsor_link(event_id, previous).await {
            Ok(()) => {
                tracing::debug!(%previous, "Replaced sponsor unlinked");
            },
            Err(GatewayError::NotFound) => {
                tracing::debug!(%previous, "Replaced sponsor was no longer linked");
            },
            Err(error) => {
                tracing::warn!(%previous, %error, "Could not unlink replaced sponsor");
                return Err(ItemError::SponsorUnlink {
                    sponsor_id: previous.clone(),
                    source: error,
                });
            },
        }
        linked.remove(previous);
        Ok(())
    }

    /// Delete a persisted item on the backend. The draft is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`RemovalError::Gateway`] if the backend refuses the delete.
    #[tracing::instrument(skip_all, fields(%event_id, %target))]
    pub async fn delete_remote(
        &self,
        event_id: &EventId,
        target: &RemovalTarget,
    ) -> Result<(), RemovalError> {
        let result = match target {
            RemovalTarget::Session(session_id) => {
                self.gateway.delete_session(event_id, session_id).await
            },
            RemovalTarget::SponsorLink(sponsor_id) => {
                self.gateway.remove_sponsor_link(event_id, sponsor_id).await
            },
        };

        result.map_err(|source| {
            tracing::warn!(error = %source, "Remote delete failed, item kept");
            metrics::counter!("reconciler.removals", "outcome" => "failed").increment(1);
            RemovalError::Gateway {
                target: target.clone(),
                source,
            }
        })?;
        metrics::counter!("reconciler.removals", "outcome" => "deleted").increment(1);
        Ok(())
    }

    /// Remove an item, deleting it on the backend first if it was persisted.
    ///
    /// Call after the user confirmed. A draft item is dropped locally. A
    /// persisted item is dropped only once the backend delete succeeded.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The item is unknown → [`RemovalError::Draft`]
    /// - The item is persisted but the event is not → [`RemovalError::EventNotPersisted`]
    /// - The backend delete failed → [`RemovalError::Gateway`], item kept
    pub async fn remove_item(
        &self,
        draft: &mut EventDraft,
        kind: ItemKind,
        local_id: LocalId,
    ) -> Result<RemovedItem, RemovalError> {
        if let RemovalPlan::Remote(target) = draft.removal_plan(kind, local_id)? {
            let event_id = draft
                .remote_id
                .clone()
                .ok_or(RemovalError::EventNotPersisted)?;
            self.delete_remote(&event_id, &target).await?;
        }
        Ok(draft.remove_item(kind, local_id)?)
    }
}
