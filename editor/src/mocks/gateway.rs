//! Mock entity gateway for testing.

use crate::error::{GatewayError, GatewayResult};
use crate::ids::{EventId, SessionId, SpeakerId, SponsorId};
use crate::providers::{
    EntityGateway, EventPayload, RemoteEvent, SessionFields, SessionRecord, Speaker,
    SpeakerFields, Sponsor, SponsorFields, SponsorLinkFields, SponsorLinkRecord, SponsorTier,
    TierUpdate,
};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A recorded gateway call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `create_event`
    CreateEvent(EventPayload),
    /// `update_event`
    UpdateEvent(EventId, EventPayload),
    /// `create_speaker`
    CreateSpeaker(SpeakerFields),
    /// `create_sponsor`
    CreateSponsor(SponsorFields),
    /// `create_session`
    CreateSession(EventId, SessionFields),
    /// `update_session`
    UpdateSession(EventId, SessionId, SessionFields),
    /// `delete_session`
    DeleteSession(EventId, SessionId),
    /// `list_event_sponsor_links`
    ListSponsorLinks(EventId),
    /// `add_sponsor_link`
    AddSponsorLink(EventId, SponsorLinkFields),
    /// `update_sponsor_link`
    UpdateSponsorLink(EventId, SponsorId, TierUpdate),
    /// `remove_sponsor_link`
    RemoveSponsorLink(EventId, SponsorId),
}

type Predicate = Box<dyn Fn(&GatewayCall) -> bool + Send + Sync>;

struct FailureRule {
    matches: Predicate,
    error: GatewayError,
    once: bool,
}

#[derive(Default)]
struct Inner {
    calls: Vec<GatewayCall>,
    issued: u64,
    events: BTreeMap<EventId, EventPayload>,
    sessions: BTreeMap<SessionId, (EventId, SessionFields)>,
    links: BTreeMap<EventId, BTreeMap<SponsorId, SponsorTier>>,
    speakers: Vec<Speaker>,
    sponsors: Vec<Sponsor>,
    failures: Vec<FailureRule>,
}

impl Inner {
    /// Log the call, then fail it if a rule matches.
    fn record(&mut self, call: GatewayCall) -> GatewayResult<()> {
        let hit = self.failures.iter().position(|rule| (rule.matches)(&call));
        self.calls.push(call);

        let Some(index) = hit else {
            return Ok(());
        };
        let error = self.failures[index].error.clone();
        if self.failures[index].once {
            self.failures.remove(index);
        }
        Err(error)
    }

    fn mint<T>(&mut self, prefix: &str) -> GatewayResult<T>
    where
        T: TryFrom<String>,
        T::Error: fmt::Display,
    {
        self.issued += 1;
        T::try_from(format!("{prefix}-{}", self.issued))
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn require_event(&self, event_id: &EventId) -> GatewayResult<()> {
        if self.events.contains_key(event_id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound)
        }
    }
}

/// In-memory [`EntityGateway`].
///
/// Behaves like a small backend: ids are issued as `event-N`, `speaker-N`,
/// `sponsor-N` and `session-N`, writes against unknown resources return
/// [`GatewayError::NotFound`], and linking an already linked sponsor returns
/// [`GatewayError::Conflict`]. Every call is logged in order, and failures
/// can be injected per call.
///
/// Clones share state.
#[derive(Clone, Default)]
pub struct MockEntityGateway {
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for MockEntityGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("MockEntityGateway")
            .field("calls", &inner.calls.len())
            .field("events", &inner.events.len())
            .field("sessions", &inner.sessions.len())
            .field("failure_rules", &inner.failures.len())
            .finish()
    }
}

impl MockEntityGateway {
    /// Create an empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a stored event, its sessions and its sponsor links.
    ///
    /// Seeding is not logged as calls.
    #[must_use]
    pub fn with_event(self, event: &RemoteEvent) -> Self {
        {
            let mut inner = self.lock();
            inner.events.insert(
                event.id.clone(),
                EventPayload {
                    fields: event.fields.clone(),
                    status: event.status,
                    is_published: event.is_published,
                    speaker_ids: event.speaker_ids.clone(),
                },
            );
            for session in &event.sessions {
                inner
                    .sessions
                    .insert(session.id.clone(), (event.id.clone(), session.fields.clone()));
            }
            let links = inner.links.entry(event.id.clone()).or_default();
            for link in &event.sponsor_links {
                links.insert(link.sponsor_id.clone(), link.tier);
            }
        }
        self
    }

    /// Seed a sponsor link that the draft does not know about.
    #[must_use]
    pub fn with_linked_sponsor(self, event_id: &EventId, sponsor_id: &SponsorId, tier: SponsorTier) -> Self {
        self.lock()
            .links
            .entry(event_id.clone())
            .or_default()
            .insert(sponsor_id.clone(), tier);
        self
    }

    /// Fail every call matching `predicate` with `error`.
    ///
    /// Rules are checked in the order they were added.
    #[must_use]
    pub fn fail_when<F>(self, predicate: F, error: GatewayError) -> Self
    where
        F: Fn(&GatewayCall) -> bool + Send + Sync + 'static,
    {
        self.push_rule(predicate, error, false);
        self
    }

    /// Fail only the next call matching `predicate`.
    #[must_use]
    pub fn fail_once_when<F>(self, predicate: F, error: GatewayError) -> Self
    where
        F: Fn(&GatewayCall) -> bool + Send + Sync + 'static,
    {
        self.push_rule(predicate, error, true);
        self
    }

    fn push_rule<F>(&self, predicate: F, error: GatewayError, once: bool)
    where
        F: Fn(&GatewayCall) -> bool + Send + Sync + 'static,
    {
        self.lock().failures.push(FailureRule {
            matches: Box::new(predicate),
            error,
            once,
        });
    }

    /// Drop every failure rule.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `predicate`.
    #[must_use]
    pub fn count_calls(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Forget the call log. Stored data is kept.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Stored payload of an event.
    #[must_use]
    pub fn event(&self, event_id: &EventId) -> Option<EventPayload> {
        self.lock().events.get(event_id).cloned()
    }

    /// Stored sessions of an event, ordered by id.
    #[must_use]
    pub fn sessions_of(&self, event_id: &EventId) -> Vec<SessionRecord> {
        self.lock()
            .sessions
            .iter()
            .filter(|(_, (owner, _))| owner == event_id)
            .map(|(id, (_, fields))| SessionRecord {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect()
    }

    /// Sponsors linked to an event, ordered by sponsor id.
    #[must_use]
    pub fn linked_sponsors(&self, event_id: &EventId) -> Vec<SponsorLinkRecord> {
        self.lock()
            .links
            .get(event_id)
            .map(|links| {
                links
                    .iter()
                    .map(|(sponsor_id, tier)| SponsorLinkRecord {
                        sponsor_id: sponsor_id.clone(),
                        tier: *tier,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Speakers created so far.
    #[must_use]
    pub fn speakers(&self) -> Vec<Speaker> {
        self.lock().speakers.clone()
    }

    /// Sponsors created so far.
    #[must_use]
    pub fn sponsors(&self) -> Vec<Sponsor> {
        self.lock().sponsors.clone()
    }
}

impl EntityGateway for MockEntityGateway {
    fn create_event(
        &self,
        payload: &EventPayload,
    ) -> impl Future<Output = GatewayResult<EventId>> + Send {
        let inner = Arc::clone(&self.inner);
        let payload = payload.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::CreateEvent(payload.clone()))?;
            let event_id: EventId = inner.mint("event")?;
            inner.events.insert(event_id.clone(), payload);
            Ok(event_id)
        }
    }

    fn update_event(
        &self,
        event_id: &EventId,
        payload: &EventPayload,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let payload = payload.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::UpdateEvent(event_id.clone(), payload.clone()))?;
            let stored = inner.events.get_mut(&event_id).ok_or(GatewayError::NotFound)?;
            *stored = payload;
            Ok(())
        }
    }

    fn create_speaker(
        &self,
        fields: &SpeakerFields,
    ) -> impl Future<Output = GatewayResult<SpeakerId>> + Send {
        let inner = Arc::clone(&self.inner);
        let fields = fields.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::CreateSpeaker(fields.clone()))?;
            let id: SpeakerId = inner.mint("speaker")?;
            inner.speakers.push(Speaker {
                id: id.clone(),
                fields,
            });
            Ok(id)
        }
    }

    fn create_sponsor(
        &self,
        fields: &SponsorFields,
    ) -> impl Future<Output = GatewayResult<SponsorId>> + Send {
        let inner = Arc::clone(&self.inner);
        let fields = fields.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::CreateSponsor(fields.clone()))?;
            let id: SponsorId = inner.mint("sponsor")?;
            inner.sponsors.push(Sponsor {
                id: id.clone(),
                fields,
            });
            Ok(id)
        }
    }

    fn create_session(
        &self,
        event_id: &EventId,
        fields: &SessionFields,
    ) -> impl Future<Output = GatewayResult<SessionId>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let fields = fields.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::CreateSession(event_id.clone(), fields.clone()))?;
            inner.require_event(&event_id)?;
            let id: SessionId = inner.mint("session")?;
            inner.sessions.insert(id.clone(), (event_id, fields));
            Ok(id)
        }
    }

    fn update_session(
        &self,
        event_id: &EventId,
        session_id: &SessionId,
        fields: &SessionFields,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let session_id = session_id.clone();
        let fields = fields.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::UpdateSession(
                event_id.clone(),
                session_id.clone(),
                fields.clone(),
            ))?;
            match inner.sessions.get_mut(&session_id) {
                Some((owner, stored)) if *owner == event_id => {
                    *stored = fields;
                    Ok(())
                },
                _ => Err(GatewayError::NotFound),
            }
        }
    }

    fn delete_session(
        &self,
        event_id: &EventId,
        session_id: &SessionId,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let session_id = session_id.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::DeleteSession(event_id.clone(), session_id.clone()))?;
            let owned = inner
                .sessions
                .get(&session_id)
                .is_some_and(|(owner, _)| *owner == event_id);
            if !owned {
                return Err(GatewayError::NotFound);
            }
            inner.sessions.remove(&session_id);
            Ok(())
        }
    }

    fn list_event_sponsor_links(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = GatewayResult<Vec<SponsorLinkRecord>>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::ListSponsorLinks(event_id.clone()))?;
            inner.require_event(&event_id)?;
            Ok(inner
                .links
                .get(&event_id)
                .map(|links| {
                    links
                        .iter()
                        .map(|(sponsor_id, tier)| SponsorLinkRecord {
                            sponsor_id: sponsor_id.clone(),
                            tier: *tier,
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn add_sponsor_link(
        &self,
        event_id: &EventId,
        link: &SponsorLinkFields,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let link = link.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::AddSponsorLink(event_id.clone(), link.clone()))?;
            inner.require_event(&event_id)?;
            let links = inner.links.entry(event_id).or_default();
            if links.contains_key(&link.sponsor_id) {
                return Err(GatewayError::Conflict(format!(
                    "sponsor {} is already linked",
                    link.sponsor_id
                )));
            }
            links.insert(link.sponsor_id, link.tier);
            Ok(())
        }
    }

    fn update_sponsor_link(
        &self,
        event_id: &EventId,
        sponsor_id: &SponsorId,
        update: &TierUpdate,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let sponsor_id = sponsor_id.clone();
        let update = *update;

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::UpdateSponsorLink(
                event_id.clone(),
                sponsor_id.clone(),
                update,
            ))?;
            let tier = inner
                .links
                .get_mut(&event_id)
                .and_then(|links| links.get_mut(&sponsor_id))
                .ok_or(GatewayError::NotFound)?;
            *tier = update.tier;
            Ok(())
        }
    }

    fn remove_sponsor_link(
        &self,
        event_id: &EventId,
        sponsor_id: &SponsorId,
    ) -> impl Future<Output = GatewayResult<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let event_id = event_id.clone();
        let sponsor_id = sponsor_id.clone();

        async move {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.record(GatewayCall::RemoveSponsorLink(event_id.clone(), sponsor_id.clone()))?;
            inner
                .links
                .get_mut(&event_id)
                .and_then(|links| links.remove(&sponsor_id))
                .map(|_| ())
                .ok_or(GatewayError::NotFound)
        }
    }
}
