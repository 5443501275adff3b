// Behavior tests for SyncController against a scripted in-memory service.
//
// Time is paused, so scripted delays resolve instantly but keep their order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use clientela_core::{
    CoreError, EditorMode, Field, FixedAnswer, Notifier, Record, RegistryService, RemoteFieldError,
    RemoveOutcome, SaveOutcome, Severity, SyncController, SyncOutcome, ViewMode,
};

// ── Fakes ───────────────────────────────────────────────────────────

struct Scripted {
    delay: Duration,
    result: Result<Vec<Value>, CoreError>,
}

fn after(ms: u64, items: Vec<Value>) -> Scripted {
    Scripted {
        delay: Duration::from_millis(ms),
        result: Ok(items),
    }
}

#[derive(Default)]
struct Script {
    loads: Mutex<VecDeque<Scripted>>,
    searches: Mutex<VecDeque<Scripted>>,
    writes: Mutex<VecDeque<Result<(), CoreError>>>,
    calls: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
struct FakeService(Arc<Script>);

impl FakeService {
    fn push_load(&self, step: Scripted) {
        self.0.loads.lock().unwrap().push_back(step);
    }

    fn push_search(&self, step: Scripted) {
        self.0.searches.lock().unwrap().push_back(step);
    }

    fn push_write(&self, result: Result<(), CoreError>) {
        self.0.writes.lock().unwrap().push_back(result);
    }

    fn calls(&self) -> Vec<String> {
        self.0.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.0.calls.lock().unwrap().push(call);
    }

    fn next_write(&self) -> Result<(), CoreError> {
        self.0.writes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

async fn play(step: Option<Scripted>) -> Result<Vec<Value>, CoreError> {
    match step {
        Some(step) => {
            tokio::time::sleep(step.delay).await;
            step.result
        }
        None => Ok(Vec::new()),
    }
}

impl RegistryService for FakeService {
    async fn load(&self, mode: ViewMode) -> Result<Vec<Value>, CoreError> {
        self.log(format!("load {mode}"));
        let step = self.0.loads.lock().unwrap().pop_front();
        play(step).await
    }

    async fn search(&self, mode: ViewMode, term: &str) -> Result<Vec<Value>, CoreError> {
        self.log(format!("search {mode} {term}"));
        let step = self.0.searches.lock().unwrap().pop_front();
        play(step).await
    }

    async fn create(&self, record: &Record) -> Result<(), CoreError> {
        self.log(format!("create {}", record.key));
        self.next_write()
    }

    async fn update(&self, key: &str, record: &Record) -> Result<(), CoreError> {
        self.log(format!("update {key} {}", record.email));
        self.next_write()
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.log(format!("delete {key}"));
        self.next_write()
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<(Severity, String)>>);

impl Recorder {
    fn messages(&self) -> Vec<(Severity, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, severity: Severity, message: &str) {
        self.0.lock().unwrap().push((severity, message.to_owned()));
    }
}

struct Harness {
    service: FakeService,
    notes: Arc<Recorder>,
    controller: SyncController<FakeService>,
}

fn harness_with(page_size: usize, confirm: bool) -> Harness {
    let service = FakeService::default();
    let notes = Arc::new(Recorder::default());
    let controller = SyncController::new(
        service.clone(),
        page_size,
        notes.clone(),
        Arc::new(FixedAnswer(confirm)),
    );
    Harness {
        service,
        notes,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(50, true)
}

// ── Payload builders ────────────────────────────────────────────────

fn flat(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({ "clave": (i + 1).to_string(), "nombreContacto": format!("Cliente {}", i + 1) }))
        .collect()
}

fn annotated(n: usize, flagged: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let errores = if i < flagged {
                json!([{ "campo": "correo", "mensaje": "dominio desconocido" }])
            } else {
                json!([])
            };
            json!({
                "cliente": { "clave": (i + 1).to_string(), "correo": "x@gmail.com" },
                "errores": errores,
                "tieneErrores": i < flagged
            })
        })
        .collect()
}

fn valid_record(key: &str) -> Record {
    Record {
        key: key.into(),
        contact_name: "Ana López".into(),
        email: "ana@gmail.com".into(),
        phone: "9611234567".into(),
    }
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn later_load_wins_over_slower_earlier_load() {
    let h = harness();
    h.service.push_load(after(100, flat(3)));
    h.service.push_load(after(10, annotated(2, 1)));

    let (first, second) = tokio::join!(
        h.controller.switch_mode(ViewMode::All),
        h.controller.switch_mode(ViewMode::WithValidation),
    );

    assert!(matches!(first, SyncOutcome::Superseded));
    assert!(second.is_applied());

    let state = h.controller.snapshot();
    assert_eq!(state.mode, ViewMode::WithValidation);
    assert_eq!(state.all_records.len(), 2);
    assert_eq!(state.visible_records.len(), 2);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn errors_only_keeps_flagged_records() {
    let h = harness();
    h.service.push_load(after(5, annotated(10, 3)));

    let outcome = h.controller.switch_mode(ViewMode::ErrorsOnly).await;

    assert!(outcome.is_applied());
    assert_eq!(h.service.calls(), vec!["load errors_only"]);
    let state = h.controller.snapshot();
    assert_eq!(state.visible_records.len(), 3);
    assert!(state.visible_records.iter().all(|r| r.has_errors()));
    let stats = h.controller.stats();
    assert_eq!((stats.total, stats.with_errors, stats.valid), (3, 3, 0));
}

#[tokio::test(start_paused = true)]
async fn failed_load_keeps_prior_records_and_notifies() {
    let h = harness();
    h.service.push_load(after(1, flat(4)));
    h.service.push_load(Scripted {
        delay: Duration::from_millis(1),
        result: Err(CoreError::Api {
            message: "boom".into(),
            status: Some(500),
        }),
    });

    assert!(h.controller.switch_mode(ViewMode::All).await.is_applied());
    let outcome = h.controller.switch_mode(ViewMode::WithValidation).await;

    assert!(matches!(outcome, SyncOutcome::Failed(CoreError::Api { .. })));
    let state = h.controller.snapshot();
    assert_eq!(state.mode, ViewMode::All);
    assert_eq!(state.all_records.len(), 4);
    assert!(!state.loading);
    assert_eq!(
        h.notes.messages(),
        vec![(Severity::Error, "Service error: boom".to_owned())]
    );
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_committed_loads() {
    let h = harness();
    let mut rx = h.controller.subscribe();
    h.service.push_load(after(1, flat(2)));

    h.controller.switch_mode(ViewMode::All).await;

    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(rx.borrow_and_update().all_records.len(), 2);
}

// ── Search & paging ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn paging_and_search_shrink_reset() {
    let h = harness();
    h.service.push_load(after(1, flat(125)));
    h.controller.switch_mode(ViewMode::All).await;

    assert_eq!(h.controller.pagination().total_pages, 3);
    h.controller.go_to_page(3).expect("page 3 exists");
    assert_eq!(h.controller.page_items().len(), 25);
    assert_eq!(h.controller.page_items()[0].key(), "101");

    let err = h.controller.go_to_page(4).expect_err("only three pages");
    assert!(matches!(
        err,
        CoreError::PageOutOfRange {
            requested: 4,
            total_pages: 3
        }
    ));
    assert_eq!(h.controller.snapshot().page, 3);

    h.service.push_search(after(1, flat(10)));
    assert!(h.controller.search("cliente").await.is_applied());

    let state = h.controller.snapshot();
    assert_eq!(state.page, 1);
    assert_eq!(state.visible_records.len(), 10);
    assert_eq!(state.all_records.len(), 125);
    assert_eq!(state.search_term, "cliente");
}

#[tokio::test(start_paused = true)]
async fn page_navigation_stays_in_bounds() {
    let h = harness_with(2, true);
    h.service.push_load(after(1, flat(3)));
    h.controller.switch_mode(ViewMode::All).await;

    assert!(h.controller.prev_page().is_err());
    h.controller.next_page().expect("second page");
    assert!(h.controller.next_page().is_err());
    assert_eq!(h.controller.pagination().page, 2);
    h.controller.prev_page().expect("first page");
    assert_eq!(h.controller.pagination().page, 1);
}

#[tokio::test(start_paused = true)]
async fn blank_search_restores_loaded_set_without_fetching() {
    let h = harness();
    h.service.push_load(after(1, flat(5)));
    h.service.push_search(after(1, flat(2)));
    h.controller.switch_mode(ViewMode::All).await;
    h.controller.search("a").await;
    assert_eq!(h.controller.snapshot().visible_records.len(), 2);

    assert!(h.controller.search("   ").await.is_applied());

    let state = h.controller.snapshot();
    assert_eq!(state.visible_records.len(), 5);
    assert_eq!(state.search_term, "");
    assert_eq!(h.service.calls(), vec!["load all", "search all a"]);
}

#[tokio::test(start_paused = true)]
async fn search_uses_validation_endpoint_and_filter_in_errors_only() {
    let h = harness();
    h.service.push_load(after(1, annotated(6, 2)));
    h.service.push_search(after(1, annotated(4, 1)));
    h.controller.switch_mode(ViewMode::ErrorsOnly).await;

    h.controller.search("x").await;

    assert_eq!(h.controller.snapshot().visible_records.len(), 1);
    assert_eq!(h.service.calls(), vec!["load errors_only", "search errors_only x"]);
}

#[tokio::test(start_paused = true)]
async fn later_search_wins() {
    let h = harness();
    h.service.push_search(after(50, flat(7)));
    h.service.push_search(after(5, flat(1)));

    let (first, second) = tokio::join!(h.controller.search("an"), h.controller.search("ana"));

    assert!(matches!(first, SyncOutcome::Superseded));
    assert!(second.is_applied());
    let state = h.controller.snapshot();
    assert_eq!(state.search_term, "ana");
    assert_eq!(state.visible_records.len(), 1);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn load_cancels_inflight_search() {
    let h = harness();
    h.service.push_search(after(50, flat(7)));
    h.service.push_load(after(5, flat(3)));

    let (searched, loaded) = tokio::join!(
        h.controller.search("an"),
        h.controller.switch_mode(ViewMode::All),
    );

    assert!(matches!(searched, SyncOutcome::Superseded));
    assert!(loaded.is_applied());
    assert_eq!(h.controller.snapshot().visible_records.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn search_during_mode_switch_targets_the_new_mode() {
    let h = harness();
    h.service.push_load(after(1, flat(4)));
    h.controller.switch_mode(ViewMode::All).await;

    h.service.push_load(after(100, annotated(10, 3)));
    h.service.push_search(after(200, annotated(5, 2)));
    let (loaded, searched) = tokio::join!(h.controller.switch_mode(ViewMode::ErrorsOnly), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.controller.search("x").await
    });

    assert!(loaded.is_applied());
    assert!(searched.is_applied());
    assert_eq!(
        h.service.calls(),
        vec!["load all", "load errors_only", "search errors_only x"]
    );
    let state = h.controller.snapshot();
    assert_eq!(state.mode, ViewMode::ErrorsOnly);
    assert_eq!(state.search_term, "x");
    assert_eq!(state.visible_records.len(), 2);
    assert!(state.visible_records.iter().all(|r| r.has_errors()));
    assert_eq!(state.all_records.len(), 3);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn search_finishing_before_pending_switch_is_discarded() {
    let h = harness();
    h.service.push_load(after(1, flat(4)));
    h.controller.switch_mode(ViewMode::All).await;

    h.service.push_load(after(100, annotated(10, 3)));
    h.service.push_search(after(5, annotated(5, 2)));
    let (loaded, searched) = tokio::join!(h.controller.switch_mode(ViewMode::ErrorsOnly), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.controller.search("x").await
    });

    assert!(loaded.is_applied());
    assert!(matches!(searched, SyncOutcome::Superseded));
    let state = h.controller.snapshot();
    assert_eq!(state.mode, ViewMode::ErrorsOnly);
    assert_eq!(state.search_term, "");
    assert_eq!(state.visible_records.len(), 3);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn search_for_failed_switch_is_discarded() {
    let h = harness();
    h.service.push_load(after(1, flat(4)));
    h.controller.switch_mode(ViewMode::All).await;

    h.service.push_load(Scripted {
        delay: Duration::from_millis(100),
        result: Err(CoreError::Timeout),
    });
    h.service.push_search(after(200, annotated(5, 2)));
    let (loaded, searched) = tokio::join!(h.controller.switch_mode(ViewMode::ErrorsOnly), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.controller.search("x").await
    });

    assert!(matches!(loaded, SyncOutcome::Failed(CoreError::Timeout)));
    assert!(matches!(searched, SyncOutcome::Superseded));
    let state = h.controller.snapshot();
    assert_eq!(state.mode, ViewMode::All);
    assert_eq!(state.search_term, "");
    assert_eq!(state.visible_records.len(), 4);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn failed_search_keeps_term_and_records() {
    let h = harness();
    h.service.push_load(after(1, flat(4)));
    h.service.push_search(after(1, flat(2)));
    h.controller.switch_mode(ViewMode::All).await;
    h.controller.search("an").await;

    h.service.push_search(Scripted {
        delay: Duration::from_millis(1),
        result: Err(CoreError::Api {
            message: "boom".into(),
            status: Some(500),
        }),
    });
    let outcome = h.controller.search("zz").await;

    assert!(matches!(outcome, SyncOutcome::Failed(CoreError::Api { .. })));
    let state = h.controller.snapshot();
    assert_eq!(state.search_term, "an");
    assert_eq!(state.visible_records.len(), 2);
    assert_eq!(state.all_records.len(), 4);
    assert!(!state.loading);
    assert_eq!(
        h.notes.messages(),
        vec![(Severity::Error, "Service error: boom".to_owned())]
    );
}

// ── Saving ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn create_saves_then_reloads_and_clears_selection() {
    let h = harness();
    let mut editor = h.controller.begin_create();
    assert!(h.controller.snapshot().selected_for_edit.is_some());

    let draft = valid_record("10");
    for field in [Field::Key, Field::ContactName, Field::Email, Field::Phone] {
        editor.set_field(field, draft.get(field)).expect("create mode");
    }
    h.service.push_load(after(1, flat(1)));

    let outcome = h.controller.submit_editor(&mut editor).await;

    assert!(matches!(outcome, SaveOutcome::Saved));
    assert_eq!(h.service.calls(), vec!["create 10", "load all"]);
    assert!(h.controller.snapshot().selected_for_edit.is_none());
    assert_eq!(
        h.notes.messages(),
        vec![(Severity::Success, "Record 10 created".to_owned())]
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_draft_is_never_sent() {
    let h = harness();

    let outcome = h
        .controller
        .save(Record::default(), &EditorMode::Create)
        .await;

    let report = match outcome {
        SaveOutcome::Invalid(report) => report,
        other => panic!("expected local validation failure, got {other:?}"),
    };
    assert!(!report.is_valid());
    assert!(h.service.calls().is_empty());
    assert_eq!(
        h.notes.messages(),
        vec![(
            Severity::Warning,
            "please correct the errors in the form".to_owned()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_save_reports_each_field_error() {
    let h = harness();
    h.service.push_write(Err(CoreError::ValidationFailed {
        errors: vec![
            RemoteFieldError {
                field: "correo".into(),
                message: "dominio desconocido".into(),
            },
            RemoteFieldError {
                field: "clave".into(),
                message: "ya existe".into(),
            },
        ],
    }));

    let outcome = h
        .controller
        .save(valid_record("10"), &EditorMode::Create)
        .await;

    assert!(matches!(outcome, SaveOutcome::Rejected(ref errors) if errors.len() == 2));
    assert_eq!(h.service.calls(), vec!["create 10"]);
    assert_eq!(
        h.notes.messages(),
        vec![
            (Severity::Error, "Validation errors found".to_owned()),
            (Severity::Error, "correo: dominio desconocido".to_owned()),
            (Severity::Error, "clave: ya existe".to_owned()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn edit_updates_under_original_key() {
    let h = harness();
    h.service.push_load(after(1, vec![serde_json::to_value(valid_record("7")).unwrap()]));
    h.controller.switch_mode(ViewMode::All).await;

    let mut editor = h.controller.begin_edit("7").expect("loaded record");
    assert!(editor.set_field(Field::Key, "8").is_err());
    editor
        .set_field(Field::Email, "ana@empresa.mx")
        .expect("edit mode");

    let outcome = h.controller.submit_editor(&mut editor).await;

    assert!(matches!(outcome, SaveOutcome::Saved));
    assert_eq!(
        h.service.calls(),
        vec!["load all", "update 7 ana@empresa.mx", "load all"]
    );
}

#[tokio::test(start_paused = true)]
async fn edit_with_changed_key_is_refused() {
    let h = harness();
    let mode = EditorMode::Edit {
        original_key: "1".into(),
    };

    let outcome = h.controller.save(valid_record("2"), &mode).await;

    assert!(matches!(outcome, SaveOutcome::Failed(CoreError::KeyImmutable)));
    assert!(h.service.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn begin_edit_unknown_key() {
    let h = harness();
    assert!(matches!(
        h.controller.begin_edit("404"),
        Err(CoreError::RecordNotFound { .. })
    ));
}

// ── Removal ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn declined_remove_does_nothing() {
    let h = harness_with(50, false);

    let outcome = h.controller.remove("3").await;

    assert!(matches!(outcome, RemoveOutcome::Declined));
    assert!(h.service.calls().is_empty());
    assert!(h.notes.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn confirmed_remove_deletes_and_reloads() {
    let h = harness();

    let outcome = h.controller.remove("3").await;

    assert!(matches!(outcome, RemoveOutcome::Removed));
    assert_eq!(h.service.calls(), vec!["delete 3", "load all"]);
}

#[tokio::test(start_paused = true)]
async fn failed_remove_keeps_state() {
    let h = harness();
    h.service.push_load(after(1, flat(2)));
    h.controller.switch_mode(ViewMode::All).await;
    h.service.push_write(Err(CoreError::NotFound {
        identifier: "/clientes/9".into(),
        detail: None,
    }));

    let outcome = h.controller.remove("9").await;

    assert!(matches!(outcome, RemoveOutcome::Failed(CoreError::NotFound { .. })));
    assert_eq!(h.controller.snapshot().all_records.len(), 2);
    assert_eq!(h.service.calls(), vec!["load all", "delete 9"]);
    assert_eq!(h.notes.messages().len(), 1);
}
