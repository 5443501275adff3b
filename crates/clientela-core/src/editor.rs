// ── Record editor ──
//
// The editing surface behind create and update flows. Each keystroke
// re-validates only the touched field; submit runs the full pass.

use crate::error::CoreError;
use crate::model::{Field, Record};
use crate::validate::{ValidationReport, validate_all, validate_field};

/// Whether a draft creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    /// Editing the record stored under `original_key`; the key is frozen.
    Edit { original_key: String },
}

impl EditorMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit { .. })
    }
}

/// A draft record plus live per-field feedback.
#[derive(Debug, Clone)]
pub struct RecordEditor {
    mode: EditorMode,
    draft: Record,
    feedback: ValidationReport,
}

impl RecordEditor {
    /// Blank draft for a new record.
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            draft: Record::default(),
            feedback: ValidationReport::default(),
        }
    }

    /// Draft seeded from an existing record.
    pub fn edit(record: Record) -> Self {
        Self {
            mode: EditorMode::Edit {
                original_key: record.key.clone(),
            },
            draft: record,
            feedback: ValidationReport::default(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn draft(&self) -> &Record {
        &self.draft
    }

    /// Live feedback for fields touched so far.
    pub fn feedback(&self) -> &ValidationReport {
        &self.feedback
    }

    /// Update one field and re-check it. Changing the key of an existing
    /// record is refused and leaves the draft untouched.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), CoreError> {
        let value = value.into();
        if field == Field::Key && self.mode.is_edit() && value != self.draft.key {
            return Err(CoreError::KeyImmutable);
        }
        self.feedback.set(field, validate_field(field, &value).err());
        self.draft.set(field, value);
        Ok(())
    }

    /// Validate every field. On failure the full report is also kept as
    /// the editor's feedback.
    pub fn submit(&mut self) -> Result<Record, ValidationReport> {
        let report = validate_all(&self.draft);
        self.feedback = report;
        if report.is_valid() {
            Ok(self.draft.clone())
        } else {
            Err(report)
        }
    }
}
