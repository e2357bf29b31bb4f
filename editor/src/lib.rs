//! # Eventdesk Editor
//!
//! Draft model, publish gate and reconciliation for the event editor.
//!
//! An event is authored as an in-memory [`EventDraft`] with nested sessions
//! and sponsor links. A Save or Publish reconciles the draft against the
//! backend through an [`EntityGateway`], one call at a time, and returns a
//! [`ReconcileReport`] that is folded back into the draft.
//!
//! ## Architecture
//!
//! ```text
//! EditorAction → EditorReducer → (EditorState, Effects) → Reconciler → EntityGateway
//!                      ▲                                        │
//!                      └──────── SaveCompleted / SaveFailed ◀───┘
//! ```
//!
//! ## Guarantees
//!
//! - **Event first**: no session or sponsor link is written unless the base
//!   event upsert succeeded.
//! - **Item isolation**: one failed session or link never stops the others.
//! - **Idempotent saves**: a second Save with no edits creates nothing and
//!   updates every item in place.
//! - **Gated publish**: Publish makes no backend call while required fields
//!   are missing.
//!
//! ## Example
//!
//! ```
//! use eventdesk_editor::mocks::MockEntityGateway;
//! use eventdesk_editor::{EventDraft, ItemKind, Reconciler, RequiredFieldsValidator};
//! use eventdesk_core::environment::SystemClock;
//!
//! # fn main() -> Result<(), eventdesk_editor::ReconcileError> {
//! # tokio_test::block_on(async {
//! let reconciler = Reconciler::new(MockEntityGateway::new(), SystemClock, RequiredFieldsValidator);
//!
//! let mut draft = EventDraft::new();
//! draft.add_item(ItemKind::Session);
//!
//! let report = reconciler.save(&draft).await?;
//! draft.apply_report(&report);
//!
//! assert!(report.is_fully_applied());
//! assert!(draft.sessions.iter().all(|s| s.persistence.is_persisted()));
//! # Ok(())
//! # })
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod draft;
pub mod environment;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod providers;
pub mod publish;
pub mod reconciler;
pub mod reducer;
pub mod state;

// Mock implementations (for testing)
#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::EditorAction;
pub use config::ReconcilerConfig;
pub use draft::{EventDraft, EventFields, EventStatus, ItemKind, Reference};
pub use environment::EditorEnvironment;
pub use error::{
    ConfigError, DraftError, EditorError, GatewayError, ItemError, ReconcileError, RemovalError,
    Result,
};
pub use ids::{EventId, LocalId, SessionId, SpeakerId, SponsorId};
pub use outcome::{Intent, NewlyCreated, ReconcileReport};
pub use providers::EntityGateway;
pub use publish::{calculate_event_status, PublishDecision, PublishGate, RequiredFieldsValidator};
pub use reconciler::Reconciler;
pub use reducer::EditorReducer;
pub use state::{EditorState, Roster};
