// ── Domain model ──
//
// Canonical types shared by the validator, the normalizer, and the sync
// controller. Serde names match the registry service's JSON.

pub mod record;
pub mod view;

pub use record::{AnnotatedRecord, Field, FieldError, Record, RemoteFieldError};
pub use view::{ViewMode, ViewState, ViewStats};
