//! Entity Gateway trait.

use super::{
    EventPayload, SessionFields, SpeakerFields, SponsorFields, SponsorLinkFields,
    SponsorLinkRecord, TierUpdate,
};
use crate::error::GatewayResult;
use crate::ids::{EventId, SessionId, SpeakerId, SponsorId};
use std::future::Future;

/// Request/response contract to the event backend.
///
/// Every call is independent. The backend offers no transaction spanning
/// more than one call. Futures are `Send` so a save can run inside an
/// [`Effect::Future`](eventdesk_core::effect::Effect::Future).
pub trait EntityGateway: Send + Sync {
    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the payload or is unreachable.
    fn create_event(&self, payload: &EventPayload)
    -> impl Future<Output = GatewayResult<EventId>> + Send;

    /// Overwrite all scalar fields of an event.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The event does not exist → `GatewayError::NotFound`
    /// - The backend rejects the payload
    fn update_event(
        &self,
        event_id: &EventId,
        payload: &EventPayload,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Create a speaker profile.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the profile.
    fn create_speaker(
        &self,
        fields: &SpeakerFields,
    ) -> impl Future<Output = GatewayResult<SpeakerId>> + Send;

    /// Create a sponsor.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the sponsor.
    fn create_sponsor(
        &self,
        fields: &SponsorFields,
    ) -> impl Future<Output = GatewayResult<SponsorId>> + Send;

    /// Create a session under an event.
    ///
    /// # Errors
    ///
    /// Returns error if the event does not exist or the session is rejected.
    fn create_session(
        &self,
        event_id: &EventId,
        fields: &SessionFields,
    ) -> impl Future<Output = GatewayResult<SessionId>> + Send;

    /// Overwrite a session.
    ///
    /// # Errors
    ///
    /// Returns error if the session does not exist or is rejected.
    fn update_session(
        &self,
        event_id: &EventId,
        session_id: &SessionId,
        fields: &SessionFields,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the delete.
    fn delete_session(
        &self,
        event_id: &EventId,
        session_id: &SessionId,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// List sponsors currently linked to an event.
    ///
    /// # Errors
    ///
    /// Returns error if the event does not exist or the backend is unreachable.
    fn list_event_sponsor_links(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = GatewayResult<Vec<SponsorLinkRecord>>> + Send;

    /// Link a sponsor to an event.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The sponsor is already linked → `GatewayError::Conflict`
    /// - The event or sponsor does not exist
    fn add_sponsor_link(
        &self,
        event_id: &EventId,
        link: &SponsorLinkFields,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Change the tier of an existing link.
    ///
    /// # Errors
    ///
    /// Returns error if the link does not exist.
    fn update_sponsor_link(
        &self,
        event_id: &EventId,
        sponsor_id: &SponsorId,
        update: &TierUpdate,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Unlink a sponsor from an event.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the delete.
    fn remove_sponsor_link(
        &self,
        event_id: &EventId,
        sponsor_id: &SponsorId,
    ) -> impl Future<Output = GatewayResult<()>> + Send;
}
