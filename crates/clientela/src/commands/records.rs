//! Record command handlers: list, search, create, update, delete.

use tabled::Tabled;

use clientela_core::{
    AnnotatedRecord, ClientesClient, CoreError, Field, RecordEditor, RemoveOutcome, SaveOutcome,
    SyncController, SyncOutcome, ValidationReport, ViewMode,
};

use crate::cli::{
    BrowseArgs, CreateArgs, DeleteArgs, GlobalOpts, OutputFormat, SearchArgs, UpdateArgs,
};
use crate::error::CliError;
use crate::output;

use super::util;

type Controller = SyncController<ClientesClient>;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Issues")]
    issues: String,
}

impl From<&AnnotatedRecord> for RecordRow {
    fn from(r: &AnnotatedRecord) -> Self {
        let record = r.record();
        Self {
            key: record.key.clone(),
            contact: record.contact_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            issues: r
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field.label(), e.message))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

fn detail(r: &AnnotatedRecord) -> String {
    let record = r.record();
    let mut lines = vec![
        format!("Key:       {}", record.key),
        format!("Contact:   {}", record.contact_name),
        format!("Email:     {}", record.email),
        format!("Phone:     {}", record.phone),
    ];
    for error in r.errors() {
        lines.push(format!("Issue:     {}: {}", error.field.label(), error.message));
    }
    lines.join("\n")
}

// ── Browse ──────────────────────────────────────────────────────────

pub async fn list(ctl: &Controller, args: BrowseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    browse(ctl, &args, None, global).await
}

pub async fn search(
    ctl: &Controller,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    browse(ctl, &args.browse, Some(&args.term), global).await
}

async fn browse(
    ctl: &Controller,
    args: &BrowseArgs,
    term: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mode = ViewMode::from(args.view);
    synced(ctl.switch_mode(mode).await)?;
    if let Some(term) = term {
        synced(ctl.search(term).await)?;
    }
    ctl.go_to_page(args.page)?;

    let items = ctl.page_items();
    let out = output::render_list(
        &global.output,
        &items,
        |r| RecordRow::from(r),
        |r| r.key().to_owned(),
    )?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        eprintln!("{}", footer(ctl, mode, global));
    }
    Ok(())
}

fn footer(ctl: &Controller, mode: ViewMode, global: &GlobalOpts) -> String {
    let paging = ctl.pagination();
    let stats = ctl.stats();
    let mut text = format!(
        "Page {}/{} · {} record(s)",
        paging.page,
        paging.total_pages.max(1),
        stats.total
    );
    if mode.is_validated() {
        text.push_str(&format!(
            " · {} with errors · {} valid",
            stats.with_errors, stats.valid
        ));
    }
    output::paint_dim(&text, output::should_color(&global.color))
}

fn synced(outcome: SyncOutcome) -> Result<(), CliError> {
    match outcome {
        SyncOutcome::Applied | SyncOutcome::Superseded => Ok(()),
        SyncOutcome::Failed(e) => Err(e.into()),
    }
}

// ── Mutations ───────────────────────────────────────────────────────

pub async fn create(ctl: &Controller, args: CreateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut editor = ctl.begin_create();
    editor.set_field(Field::Key, args.key)?;
    editor.set_field(Field::ContactName, args.name)?;
    editor.set_field(Field::Email, args.email)?;
    editor.set_field(Field::Phone, args.phone)?;
    submit(ctl, &mut editor, global).await
}

pub async fn update(ctl: &Controller, args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    synced(ctl.switch_mode(ViewMode::All).await)?;
    let mut editor = ctl.begin_edit(&args.key)?;

    let changes = [
        (Field::ContactName, args.name),
        (Field::Email, args.email),
        (Field::Phone, args.phone),
    ];
    for (field, value) in changes {
        if let Some(value) = value {
            editor.set_field(field, value)?;
        }
    }
    submit(ctl, &mut editor, global).await.map_err(|e| match e {
        CliError::NotFound { .. } => CliError::NotFound { key: args.key },
        other => other,
    })
}

async fn submit(
    ctl: &Controller,
    editor: &mut RecordEditor,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match ctl.submit_editor(editor).await {
        SaveOutcome::Saved => {
            let saved = AnnotatedRecord::plain(editor.draft().clone());
            let out = output::render_single(&global.output, &saved, detail, |r| {
                r.key().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        SaveOutcome::Invalid(report) => {
            print_report(report, output::should_color(&global.color));
            Err(CliError::InvalidRecord {
                count: report.field_errors().len(),
            })
        }
        SaveOutcome::Rejected(errors) => Err(CliError::Rejected {
            count: errors.len(),
        }),
        SaveOutcome::Failed(e) => Err(e.into()),
    }
}

/// List each failed field on stderr.
fn print_report(report: ValidationReport, color: bool) {
    for error in report.field_errors() {
        let line = format!("  {}: {}", error.field.label(), error.message);
        eprintln!("{}", output::paint_warn(&line, color));
    }
}

pub async fn delete(ctl: &Controller, args: DeleteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_interactive("delete", global.yes)?;

    match ctl.remove(&args.key).await {
        RemoveOutcome::Removed => Ok(()),
        RemoveOutcome::Declined => {
            if !global.quiet {
                eprintln!("Aborted.");
            }
            Ok(())
        }
        RemoveOutcome::Failed(CoreError::NotFound { .. }) => {
            Err(CliError::NotFound { key: args.key })
        }
        RemoveOutcome::Failed(e) => Err(e.into()),
    }
}
