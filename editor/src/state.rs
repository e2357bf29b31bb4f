//! Editor state.

use crate::draft::{EventDraft, ItemKind, Reference, RemovalTarget};
use crate::ids::{LocalId, SpeakerId, SponsorId};
use crate::outcome::{Intent, NewlyCreated, ReconcileReport};
use crate::providers::{Speaker, Sponsor};

/// Speakers and sponsors the pickers can offer.
///
/// Owned by the editing session. Entities created during a Save are merged
/// in from [`NewlyCreated`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// Known speakers.
    pub speakers: Vec<Speaker>,
    /// Known sponsors.
    pub sponsors: Vec<Sponsor>,
}

impl Roster {
    /// Add newly created entities, skipping ids already present.
    pub fn merge(&mut self, created: &NewlyCreated) {
        for speaker in &created.speakers {
            if self.speaker(&speaker.id).is_none() {
                self.speakers.push(speaker.clone());
            }
        }
        for sponsor in &created.sponsors {
            if self.sponsor(&sponsor.id).is_none() {
                self.sponsors.push(sponsor.clone());
            }
        }
    }

    /// Speaker by id.
    #[must_use]
    pub fn speaker(&self, id: &SpeakerId) -> Option<&Speaker> {
        self.speakers.iter().find(|speaker| &speaker.id == id)
    }

    /// Sponsor by id.
    #[must_use]
    pub fn sponsor(&self, id: &SponsorId) -> Option<&Sponsor> {
        self.sponsors.iter().find(|sponsor| &sponsor.id == id)
    }
}

/// What the editor is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorPhase {
    /// Ready for input.
    #[default]
    Idle,
    /// A Save or Publish is in flight.
    Saving(Intent),
}

/// A delete waiting for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    /// Collection of the item.
    pub kind: ItemKind,
    /// Item to remove.
    pub local_id: LocalId,
    /// Remote resource to delete.
    pub target: RemovalTarget,
    /// Name for the confirmation prompt.
    pub label: String,
}

/// State of one editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    /// The event being edited.
    pub draft: EventDraft,
    /// Entities available to pickers.
    pub roster: Roster,
    /// Save/Publish progress.
    pub phase: EditorPhase,
    /// Delete awaiting confirmation.
    pub pending_removal: Option<PendingRemoval>,
    /// Report of the last finished Save or Publish.
    pub last_report: Option<ReconcileReport>,
    /// Last error shown to the user.
    pub last_error: Option<String>,
    /// Fields blocking the last Publish attempt.
    pub missing_fields: Vec<String>,
}

impl EditorState {
    /// Editor over `draft` with an empty roster.
    #[must_use]
    pub fn new(draft: EventDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    /// Seed the pickers.
    #[must_use]
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Returns `true` while a Save or Publish is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.phase, EditorPhase::Saving(_))
    }

    /// One line per failed item from the last report.
    ///
    /// Sponsor links that only carry an id are named after the roster entry.
    #[must_use]
    pub fn failure_messages(&self) -> Vec<String> {
        let Some(report) = &self.last_report else {
            return Vec::new();
        };

        report
            .failures()
            .into_iter()
            .map(|failure| {
                let name = match failure.kind {
                    ItemKind::SponsorLink => self
                        .draft
                        .sponsor_links
                        .get(failure.local_id)
                        .and_then(|link| match &link.reference {
                            Reference::Existing(id) => self.roster.sponsor(id),
                            _ => None,
                        })
                        .map_or(failure.label, |sponsor| sponsor.fields.name.clone()),
                    ItemKind::Session => failure.label,
                };
                format!("{} \"{name}\": {}", failure.kind, failure.error)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{SpeakerFields, SponsorFields};

    #[allow(clippy::unwrap_used)]
    fn sponsor(id: &str, name: &str) -> Sponsor {
        Sponsor {
            id: SponsorId::try_new(id).unwrap(),
            fields: SponsorFields {
                name: name.into(),
                ..SponsorFields::default()
            },
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn merge_skips_known_ids() {
        let mut roster = Roster {
            speakers: Vec::new(),
            sponsors: vec![sponsor("sp1", "Acme")],
        };

        roster.merge(&NewlyCreated {
            speakers: vec![Speaker {
                id: SpeakerId::try_new("speaker-1").unwrap(),
                fields: SpeakerFields::default(),
            }],
            sponsors: vec![sponsor("sp1", "Acme"), sponsor("sp2", "Globex")],
        });

        assert_eq!(roster.speakers.len(), 1);
        assert_eq!(roster.sponsors.len(), 2);
        assert_eq!(
            roster.sponsor(&SponsorId::try_new("sp2").unwrap()).map(|s| s.fields.name.as_str()),
            Some("Globex")
        );
    }

    #[test]
    fn new_state_is_idle() {
        let state = EditorState::new(EventDraft::new());
        assert!(!state.is_busy());
        assert!(state.failure_messages().is_empty());
    }
}
