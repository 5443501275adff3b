// ── Sync controller ──
//
// Owns the view state for the customer list: which mode is active, what
// was loaded, what the search narrowed it to, and which page is showing.
// Loads and searches run on separate cancellable channels so that only
// the most recent request of each kind ever reaches the state.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use clientela_api::ClientesClient;

use crate::channel::{Channel, Ticket};
use crate::config::ServiceConfig;
use crate::editor::{EditorMode, RecordEditor};
use crate::error::CoreError;
use crate::model::{AnnotatedRecord, Record, RemoteFieldError, ViewMode, ViewState, ViewStats};
use crate::normalize::normalize_batch;
use crate::notify::{Confirmer, Notifier, Severity};
use crate::paging::Pagination;
use crate::service::RegistryService;
use crate::validate::{ValidationReport, validate_all};

const INVALID_FORM: &str = "please correct the errors in the form";
const REJECTED: &str = "Validation errors found";

// ── Outcomes ─────────────────────────────────────────────────────

/// Result of a load or search.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The result was committed to the view state.
    Applied,
    /// A newer request on the same channel won; nothing changed.
    Superseded,
    /// The request failed; prior records are kept and the error was
    /// already reported through the notifier.
    Failed(CoreError),
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of a create or update.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    /// Local validation failed; nothing was sent.
    Invalid(ValidationReport),
    /// The service rejected the record with per-field errors.
    Rejected(Vec<RemoteFieldError>),
    Failed(CoreError),
}

/// Result of a delete.
#[derive(Debug)]
pub enum RemoveOutcome {
    Removed,
    /// The confirmer said no.
    Declined,
    Failed(CoreError),
}

// ── SyncController ───────────────────────────────────────────────

/// The single writer of [`ViewState`].
///
/// Cheaply cloneable; clones share state and channels.
pub struct SyncController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SyncController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    service: S,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    state: watch::Sender<ViewState>,
    load: Channel<ViewMode>,
    search: Channel<ViewMode>,
}

impl SyncController<ClientesClient> {
    /// Build a controller talking HTTP to the service in `config`.
    pub fn from_config(
        config: &ServiceConfig,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Result<Self, CoreError> {
        let client = ClientesClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::new(client, config.page_size, notifier, confirmer))
    }
}

impl<S: RegistryService> SyncController<S> {
    pub fn new(
        service: S,
        page_size: usize,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::new(page_size));
        Self {
            inner: Arc::new(Inner {
                service,
                notifier,
                confirmer,
                state,
                load: Channel::new("load"),
                search: Channel::new("search"),
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Receiver that observes every committed state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    pub fn pagination(&self) -> Pagination {
        let state = self.inner.state.borrow();
        Pagination::new(state.page, state.page_size, state.visible_records.len())
    }

    pub fn stats(&self) -> ViewStats {
        self.inner.state.borrow().stats()
    }

    /// The records on the current page.
    pub fn page_items(&self) -> Vec<AnnotatedRecord> {
        let state = self.inner.state.borrow();
        Pagination::new(state.page, state.page_size, state.visible_records.len())
            .page_slice(&state.visible_records)
            .to_vec()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Load the full set for `mode` and make it the active view.
    ///
    /// On success the mode, records, and page are replaced and the search
    /// term is cleared. Any in-flight search is cancelled; a search started
    /// while this load is pending targets `mode` and survives the commit.
    pub async fn switch_mode(&self, mode: ViewMode) -> SyncOutcome {
        let inner = &self.inner;
        inner.search.cancel();
        let ticket = inner.load.begin(mode);
        self.refresh_loading();

        let fetched = tokio::select! {
            biased;
            () = ticket.token.cancelled() => None,
            result = inner.service.load(mode) => Some(result),
        };

        match fetched {
            None => {
                debug!(%mode, "load superseded");
                SyncOutcome::Superseded
            }
            Some(Ok(items)) => {
                let records = prepare(mode, &items);
                let count = records.len();
                let committed = inner.load.commit(&ticket, || {
                    inner.search.cancel_unless(mode);
                    inner.state.send_modify(|state| {
                        state.mode = mode;
                        state.search_term.clear();
                        state.visible_records.clone_from(&records);
                        state.all_records = records;
                        state.page = 1;
                        state.loading = self.is_loading();
                    });
                });
                if committed {
                    info!(%mode, count, "records loaded");
                    SyncOutcome::Applied
                } else {
                    debug!(%mode, "load result discarded");
                    SyncOutcome::Superseded
                }
            }
            Some(Err(e)) => self.fail(&inner.load, &ticket, e),
        }
    }

    /// Re-run the load for the current mode.
    pub async fn reload(&self) -> SyncOutcome {
        let mode = self.inner.state.borrow().mode;
        self.switch_mode(mode).await
    }

    /// Narrow the visible records.
    ///
    /// A blank term restores the loaded set without a network call.
    /// Otherwise the service is searched with the endpoint that matches
    /// the mode being loaded, or the current mode if no load is pending.
    /// The term and results are committed together, and only while that
    /// mode is the active one.
    pub async fn search(&self, term: &str) -> SyncOutcome {
        let inner = &self.inner;
        let term = term.trim();

        if term.is_empty() {
            inner.search.cancel();
            inner.state.send_modify(|state| {
                state.search_term.clear();
                state.visible_records.clone_from(&state.all_records);
                state.page = 1;
                state.loading = self.is_loading();
            });
            return SyncOutcome::Applied;
        }

        let mode = inner
            .load
            .active_tag()
            .unwrap_or_else(|| inner.state.borrow().mode);
        let ticket = inner.search.begin(mode);
        self.refresh_loading();

        let fetched = tokio::select! {
            biased;
            () = ticket.token.cancelled() => None,
            result = inner.service.search(mode, term) => Some(result),
        };

        match fetched {
            None => {
                debug!(term, "search superseded");
                SyncOutcome::Superseded
            }
            Some(Ok(items)) => {
                let records = prepare(mode, &items);
                let count = records.len();
                let mut applied = false;
                inner.search.commit(&ticket, || {
                    inner.state.send_modify(|state| {
                        if state.mode == mode {
                            term.clone_into(&mut state.search_term);
                            state.visible_records = records;
                            let total_pages =
                                state.visible_records.len().div_ceil(state.page_size);
                            if state.page > total_pages.max(1) {
                                state.page = 1;
                            }
                            applied = true;
                        }
                        state.loading = self.is_loading();
                    });
                });
                if applied {
                    debug!(term, count, "search applied");
                    SyncOutcome::Applied
                } else {
                    debug!(term, %mode, "search result discarded");
                    SyncOutcome::Superseded
                }
            }
            Some(Err(e)) => self.fail(&inner.search, &ticket, e),
        }
    }

    // ── Paging ───────────────────────────────────────────────────

    /// Jump to `page`. Never re-fetches.
    pub fn go_to_page(&self, page: usize) -> Result<(), CoreError> {
        self.pagination().check(page)?;
        self.inner.state.send_modify(|state| state.page = page);
        Ok(())
    }

    pub fn next_page(&self) -> Result<(), CoreError> {
        self.go_to_page(self.pagination().page.saturating_add(1))
    }

    pub fn prev_page(&self) -> Result<(), CoreError> {
        self.go_to_page(self.pagination().page.saturating_sub(1))
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Start a create flow.
    pub fn begin_create(&self) -> RecordEditor {
        self.inner
            .state
            .send_modify(|state| state.selected_for_edit = Some(Record::default()));
        RecordEditor::create()
    }

    /// Start editing the loaded record stored under `key`.
    pub fn begin_edit(&self, key: &str) -> Result<RecordEditor, CoreError> {
        let record = self
            .inner
            .state
            .borrow()
            .all_records
            .iter()
            .find(|r| r.key() == key)
            .map(|r| r.record().clone())
            .ok_or_else(|| CoreError::RecordNotFound { key: key.into() })?;

        self.inner
            .state
            .send_modify(|state| state.selected_for_edit = Some(record.clone()));
        Ok(RecordEditor::edit(record))
    }

    pub fn cancel_edit(&self) {
        self.inner
            .state
            .send_modify(|state| state.selected_for_edit = None);
    }

    /// Submit an editor: full validation, then save.
    pub async fn submit_editor(&self, editor: &mut RecordEditor) -> SaveOutcome {
        match editor.submit() {
            Ok(draft) => self.persist(draft, editor.mode()).await,
            Err(report) => self.reject_form(report),
        }
    }

    /// Validate `draft` and write it: update for `Edit`, create for `Create`.
    ///
    /// Nothing is applied optimistically. A successful write clears the
    /// selection and reloads the current mode.
    pub async fn save(&self, draft: Record, mode: &EditorMode) -> SaveOutcome {
        let report = validate_all(&draft);
        if !report.is_valid() {
            return self.reject_form(report);
        }
        self.persist(draft, mode).await
    }

    async fn persist(&self, draft: Record, mode: &EditorMode) -> SaveOutcome {
        let inner = &self.inner;
        let result = match mode {
            EditorMode::Create => inner.service.create(&draft).await,
            EditorMode::Edit { original_key } if *original_key != draft.key => {
                Err(CoreError::KeyImmutable)
            }
            EditorMode::Edit { original_key } => inner.service.update(original_key, &draft).await,
        };

        match result {
            Ok(()) => {
                let verb = if mode.is_edit() { "updated" } else { "created" };
                info!(key = %draft.key, verb, "record saved");
                inner
                    .notifier
                    .notify(Severity::Success, &format!("Record {} {verb}", draft.key));
                self.cancel_edit();
                self.reload().await;
                SaveOutcome::Saved
            }
            Err(CoreError::ValidationFailed { errors }) => {
                warn!(key = %draft.key, count = errors.len(), "save rejected by service");
                inner.notifier.notify(Severity::Error, REJECTED);
                for error in &errors {
                    inner.notifier.notify(Severity::Error, &error.to_string());
                }
                SaveOutcome::Rejected(errors)
            }
            Err(e) => {
                warn!(key = %draft.key, error = %e, "save failed");
                inner.notifier.notify(Severity::Error, &e.to_string());
                SaveOutcome::Failed(e)
            }
        }
    }

    fn reject_form(&self, report: ValidationReport) -> SaveOutcome {
        self.inner.notifier.notify(Severity::Warning, INVALID_FORM);
        SaveOutcome::Invalid(report)
    }

    // ── Removal ──────────────────────────────────────────────────

    /// Delete the record under `key` after confirmation, then reload.
    pub async fn remove(&self, key: &str) -> RemoveOutcome {
        let inner = &self.inner;
        if !inner.confirmer.confirm(&format!("Delete record {key}?")) {
            debug!(key, "delete declined");
            return RemoveOutcome::Declined;
        }

        match inner.service.delete(key).await {
            Ok(()) => {
                info!(key, "record deleted");
                inner
                    .notifier
                    .notify(Severity::Success, &format!("Record {key} deleted"));
                self.reload().await;
                RemoveOutcome::Removed
            }
            Err(e) => {
                warn!(key, error = %e, "delete failed");
                inner.notifier.notify(Severity::Error, &e.to_string());
                RemoveOutcome::Failed(e)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn is_loading(&self) -> bool {
        self.inner.load.in_flight() || self.inner.search.in_flight()
    }

    fn refresh_loading(&self) {
        let loading = self.is_loading();
        self.inner
            .state
            .send_if_modified(|state| std::mem::replace(&mut state.loading, loading) != loading);
    }

    /// Close out a failed request: keep the records, clear the loading flag
    /// if this request is still current, and report the error.
    fn fail(&self, channel: &Channel<ViewMode>, ticket: &Ticket, error: CoreError) -> SyncOutcome {
        let committed = channel.commit(ticket, || {
            self.inner
                .state
                .send_modify(|state| state.loading = self.is_loading());
        });
        if !committed {
            debug!(error = %error, "stale request failed, ignoring");
            return SyncOutcome::Superseded;
        }
        warn!(error = %error, "request failed");
        self.inner
            .notifier
            .notify(Severity::Error, &error.to_string());
        SyncOutcome::Failed(error)
    }
}

/// Normalize a list body for `mode`: drop unrecognized items, keep the first
/// record per key, and narrow to flagged records in errors-only mode.
fn prepare(mode: ViewMode, items: &[Value]) -> Vec<AnnotatedRecord> {
    let mut seen = HashSet::new();
    let mut records = normalize_batch(items);
    records.retain(|record| {
        if seen.insert(record.key().to_owned()) {
            true
        } else {
            warn!(key = record.key(), "duplicate key in payload, keeping first");
            false
        }
    });
    if mode.errors_only() {
        records.retain(AnnotatedRecord::has_errors);
    }
    records
}
