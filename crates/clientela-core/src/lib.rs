//! Record synchronization layer between `clientela-api` and UI consumers.
//!
//! This crate owns the business logic and domain model for the customer
//! registry front end:
//!
//! - **[`SyncController`]**: Sole writer of [`ViewState`]. Loads the set for
//!   the active [`ViewMode`], runs searches, pages through results, and routes
//!   create/update/delete through the service. Loads and searches each run on
//!   a cancellable channel, so a newer request always supersedes an older one.
//!
//! - **Validator** ([`validate`]): Pure per-field checks shared by live form
//!   feedback ([`RecordEditor`]) and the full pass before a save.
//!
//! - **Normalizer** ([`normalize`]): Folds the service's flat and wrapped
//!   payload shapes into one [`AnnotatedRecord`], dropping anything else.
//!
//! - **Seams**: [`RegistryService`] for the remote side, [`Notifier`] and
//!   [`Confirmer`] for user feedback. All are injected at construction.

mod channel;
pub mod config;
pub mod controller;
pub mod convert;
pub mod editor;
pub mod error;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod paging;
pub mod service;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ServiceConfig, TlsVerification};
pub use controller::{RemoveOutcome, SaveOutcome, SyncController, SyncOutcome};
pub use editor::{EditorMode, RecordEditor};
pub use error::CoreError;
pub use notify::{Confirmer, FixedAnswer, Notifier, Severity, TracingNotifier};
pub use paging::Pagination;
pub use service::RegistryService;
pub use validate::{ValidationError, ValidationReport, validate_all};

// The concrete service the CLI builds its controller over.
pub use clientela_api::ClientesClient;

pub use model::{
    AnnotatedRecord, Field, FieldError, Record, RemoteFieldError, ViewMode, ViewState, ViewStats,
};
