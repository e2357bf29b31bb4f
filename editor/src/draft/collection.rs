//! Ordered collections of sub-resource drafts.

use crate::error::DraftError;
use crate::ids::LocalId;
use crate::outcome::ItemOutcome;
use std::fmt;

/// Which nested collection an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A scheduled session.
    Session,
    /// A sponsor attached to the event.
    SponsorLink,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("session"),
            Self::SponsorLink => f.write_str("sponsor link"),
        }
    }
}

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Hydrated from a fetched event.
    LoadedFromStore,
    /// Added in this editing session.
    CreatedLocally,
}

/// Whether the backend knows about an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence<Id> {
    /// Never successfully written.
    Draft,
    /// Exists server-side under this id.
    Persisted(Id),
}

impl<Id> Persistence<Id> {
    /// The backend id, if any.
    pub const fn remote_id(&self) -> Option<&Id> {
        match self {
            Self::Draft => None,
            Self::Persisted(id) => Some(id),
        }
    }

    /// Returns `true` once the item exists server-side.
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// The related entity an item points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<Id, New> {
    /// Existing-entity mode with nothing selected yet.
    Unassigned,
    /// An entity that already exists, by id.
    Existing(Id),
    /// Inline fields for an entity to create on save.
    New(New),
}

impl<Id, New> Default for Reference<Id, New> {
    fn default() -> Self {
        Self::Unassigned
    }
}

/// Payload of a nested item, plus the types that go with it.
pub trait SubResource: Clone + fmt::Debug + Default + PartialEq {
    /// Id the backend assigns to the item once written.
    type RemoteId: Clone + fmt::Debug + PartialEq + Eq;
    /// Id of the related entity (speaker or sponsor).
    type EntityId: Clone + fmt::Debug + PartialEq + Eq;
    /// Inline fields used to create the related entity.
    type NewEntity: Clone + fmt::Debug + PartialEq + Eq;
    /// Partial update accepted by [`Collection::update`].
    type Patch;

    /// Collection this payload belongs to.
    const KIND: ItemKind;

    /// Merge the present fields of `patch`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Name to show the user, if the payload has one.
    fn label(&self, reference: &Reference<Self::EntityId, Self::NewEntity>) -> Option<String>;
}

/// One item of a nested collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SubResourceDraft<P: SubResource> {
    /// Client identity, never sent to the backend.
    pub local_id: LocalId,
    /// Origin of the item.
    pub provenance: Provenance,
    /// Backend identity, once known.
    pub persistence: Persistence<P::RemoteId>,
    /// Related speaker or sponsor.
    pub reference: Reference<P::EntityId, P::NewEntity>,
    /// Type-specific fields.
    pub payload: P,
}

impl<P: SubResource> SubResourceDraft<P> {
    /// Name for user-facing messages.
    #[must_use]
    pub fn label(&self) -> String {
        self.payload
            .label(&self.reference)
            .unwrap_or_else(|| format!("{} {}", P::KIND, self.local_id))
    }
}

/// Ordered items of one kind, keyed by [`LocalId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<P: SubResource> {
    items: Vec<SubResourceDraft<P>>,
    next_local_id: u64,
}

impl<P: SubResource> Default for Collection<P> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_local_id: 1,
        }
    }
}

impl<P: SubResource> Collection<P> {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> LocalId {
        let id = LocalId::new(self.next_local_id);
        self.next_local_id += 1;
        id
    }

    /// Append a blank, locally created item.
    pub fn add(&mut self) -> LocalId {
        let local_id = self.allocate();
        self.items.push(SubResourceDraft {
            local_id,
            provenance: Provenance::CreatedLocally,
            persistence: Persistence::Draft,
            reference: Reference::Unassigned,
            payload: P::default(),
        });
        local_id
    }

    /// Append an item that already exists server-side.
    pub fn hydrate(
        &mut self,
        remote_id: P::RemoteId,
        reference: Reference<P::EntityId, P::NewEntity>,
        payload: P,
    ) -> LocalId {
        let local_id = self.allocate();
        self.items.push(SubResourceDraft {
            local_id,
            provenance: Provenance::LoadedFromStore,
            persistence: Persistence::Persisted(remote_id),
            reference,
            payload,
        });
        local_id
    }

    /// Item by local id.
    #[must_use]
    pub fn get(&self, local_id: LocalId) -> Option<&SubResourceDraft<P>> {
        self.items.iter().find(|item| item.local_id == local_id)
    }

    fn get_mut(&mut self, local_id: LocalId) -> Result<&mut SubResourceDraft<P>, DraftError> {
        self.items
            .iter_mut()
            .find(|item| item.local_id == local_id)
            .ok_or(DraftError::UnknownItem {
                kind: P::KIND,
                local_id,
            })
    }

    /// Merge `patch` into an item's payload. Persistence and provenance are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such item exists.
    pub fn update(&mut self, local_id: LocalId, patch: P::Patch) -> Result<(), DraftError> {
        self.get_mut(local_id)?.payload.apply_patch(patch);
        Ok(())
    }

    /// Point an item at a different related entity.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such item exists.
    pub fn set_reference(
        &mut self,
        local_id: LocalId,
        reference: Reference<P::EntityId, P::NewEntity>,
    ) -> Result<(), DraftError> {
        self.get_mut(local_id)?.reference = reference;
        Ok(())
    }

    /// Remove an item and hand it back.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownItem`] if no such item exists.
    pub fn remove(&mut self, local_id: LocalId) -> Result<SubResourceDraft<P>, DraftError> {
        let index = self
            .items
            .iter()
            .position(|item| item.local_id == local_id)
            .ok_or(DraftError::UnknownItem {
                kind: P::KIND,
                local_id,
            })?;
        Ok(self.items.remove(index))
    }

    /// Fold one reconciliation outcome back into its item.
    ///
    /// An entity created inline replaces the `New` reference even when the
    /// item write itself failed, so a retry reuses it instead of creating
    /// another one. Outcomes for items removed in the meantime are ignored.
    pub(crate) fn absorb(&mut self, outcome: &ItemOutcome<P::RemoteId, P::EntityId>) {
        let Ok(item) = self.get_mut(outcome.local_id) else {
            tracing::debug!(local_id = %outcome.local_id, "Outcome for removed item ignored");
            return;
        };
        if let Some(entity_id) = &outcome.created_entity {
            item.reference = Reference::Existing(entity_id.clone());
        }
        if let Ok(write) = &outcome.result {
            item.persistence = Persistence::Persisted(write.remote_id.clone());
        }
    }

    /// Items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, SubResourceDraft<P>> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, P: SubResource> IntoIterator for &'a Collection<P> {
    type Item = &'a SubResourceDraft<P>;
    type IntoIter = std::slice::Iter<'a, SubResourceDraft<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
