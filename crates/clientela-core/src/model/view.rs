// ── View state owned by the sync controller ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::record::{AnnotatedRecord, Record};

/// Top-level view: which endpoint feeds the list and which filter applies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewMode {
    /// Every record, no annotations.
    #[default]
    All,
    /// Every record, annotated by the service's validation pass.
    WithValidation,
    /// Only records the validation pass flagged.
    ErrorsOnly,
}

impl ViewMode {
    /// Whether this mode reads from the validation endpoints.
    pub fn is_validated(self) -> bool {
        !matches!(self, Self::All)
    }

    /// Whether results are filtered down to flagged records.
    pub fn errors_only(self) -> bool {
        matches!(self, Self::ErrorsOnly)
    }
}

/// Everything a presentation layer needs to render the list.
///
/// Written only by `SyncController`; consumers get clones or a
/// `watch::Receiver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub search_term: String,
    /// The authoritative set for the active mode, replaced wholesale on
    /// every successful load. Plain loads carry no annotations.
    pub all_records: Vec<AnnotatedRecord>,
    /// What the list shows: `all_records`, or the latest search result.
    pub visible_records: Vec<AnnotatedRecord>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub loading: bool,
    pub selected_for_edit: Option<Record>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            mode: ViewMode::default(),
            search_term: String::new(),
            all_records: Vec::new(),
            visible_records: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            loading: false,
            selected_for_edit: None,
        }
    }

    pub fn stats(&self) -> ViewStats {
        ViewStats::from_records(&self.visible_records)
    }
}

/// Error counts over the visible records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStats {
    pub total: usize,
    pub with_errors: usize,
    pub valid: usize,
}

impl ViewStats {
    pub fn from_records(records: &[AnnotatedRecord]) -> Self {
        let total = records.len();
        let with_errors = records.iter().filter(|r| r.has_errors()).count();
        Self {
            total,
            with_errors,
            valid: total - with_errors,
        }
    }
}
