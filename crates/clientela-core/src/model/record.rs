// ── Customer record domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One attribute of a [`Record`].
///
/// `Display`/`FromStr` use the service's wire names (`clave`,
/// `nombreContacto`, ...), so a server-reported `campo` parses directly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Field {
    #[serde(rename = "clave")]
    #[strum(serialize = "clave")]
    Key,
    #[serde(rename = "nombreContacto")]
    #[strum(serialize = "nombreContacto")]
    ContactName,
    #[serde(rename = "correo")]
    #[strum(serialize = "correo")]
    Email,
    #[serde(rename = "telefonoContacto")]
    #[strum(serialize = "telefonoContacto")]
    Phone,
}

impl Field {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::ContactName => "contact name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// A customer entity. `key` is the natural identity: digits only,
/// immutable once created, unique within a loaded set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "clave", default)]
    pub key: String,
    #[serde(rename = "nombreContacto", default)]
    pub contact_name: String,
    #[serde(rename = "correo", default)]
    pub email: String,
    #[serde(rename = "telefonoContacto", default)]
    pub phone: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Key => &self.key,
            Field::ContactName => &self.contact_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Key => &mut self.key,
            Field::ContactName => &mut self.contact_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        };
        *slot = value.into();
    }
}

/// A field-scoped error, produced by a validator or by the service's
/// validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "campo")]
    pub field: Field,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A field error reported by the service on a rejected write.
///
/// Kept as raw text: the service may name fields this client does not model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFieldError {
    pub field: String,
    pub message: String,
}

impl RemoteFieldError {
    /// The modelled field, if the service used a known name.
    pub fn known_field(&self) -> Option<Field> {
        self.field.parse().ok()
    }
}

impl std::fmt::Display for RemoteFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The canonical `{record, errors, hasErrors}` shape.
///
/// `has_errors` is always `!errors.is_empty()`; the constructor is the only
/// way to build one, so the flag can never drift from the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRecord {
    #[serde(rename = "cliente")]
    record: Record,
    #[serde(rename = "errores")]
    errors: Vec<FieldError>,
    #[serde(rename = "tieneErrores")]
    has_errors: bool,
}

impl AnnotatedRecord {
    pub fn new(record: Record, errors: Vec<FieldError>) -> Self {
        let has_errors = !errors.is_empty();
        Self {
            record,
            errors,
            has_errors,
        }
    }

    /// A record with no annotations (plain list endpoints).
    pub fn plain(record: Record) -> Self {
        Self::new(record, Vec::new())
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn key(&self) -> &str {
        &self.record.key
    }

    /// First error reported for `field`, if any.
    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_parses_wire_names() {
        assert_eq!("clave".parse::<Field>().ok(), Some(Field::Key));
        assert_eq!("telefonoContacto".parse::<Field>().ok(), Some(Field::Phone));
        assert!("direccion".parse::<Field>().is_err());
        assert_eq!(Field::ContactName.to_string(), "nombreContacto");
    }

    #[test]
    fn annotated_record_flag_tracks_errors() {
        let clean = AnnotatedRecord::plain(Record::default());
        assert!(!clean.has_errors());

        let flagged = AnnotatedRecord::new(
            Record::default(),
            vec![FieldError::new(Field::Email, "bad")],
        );
        assert!(flagged.has_errors());
        assert_eq!(flagged.error_for(Field::Email).map(|e| e.message.as_str()), Some("bad"));
        assert!(flagged.error_for(Field::Phone).is_none());
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let record = Record {
            key: "12".into(),
            contact_name: "Ana".into(),
            email: "a@gmail.com".into(),
            phone: "9611234567".into(),
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["clave"], "12");
        assert_eq!(value["nombreContacto"], "Ana");
        assert_eq!(value["telefonoContacto"], "9611234567");
    }
}
