//! Record normalization.
//!
//! The plain list endpoints return flat records; the validation endpoints
//! wrap each record as `{cliente, errores, tieneErrores}`. Both are folded
//! into [`AnnotatedRecord`] here. Items that match neither shape are dropped
//! and logged; they never reach counts or pagination.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{AnnotatedRecord, Field, FieldError, Record};

const NESTED_RECORD: &str = "cliente";
const ERRORS: &str = "errores";
const HAS_ERRORS: &str = "tieneErrores";
const ERROR_FIELD: &str = "campo";
const ERROR_MESSAGE: &str = "mensaje";

const RECORD_FIELDS: [Field; 4] = [Field::Key, Field::ContactName, Field::Email, Field::Phone];

/// What a payload item looks like, decided once up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// `{cliente: {...}, errores?: [...], tieneErrores?: bool}`
    Canonical {
        record: &'a Map<String, Value>,
        errors: Option<&'a Value>,
        declared_has_errors: Option<bool>,
    },
    /// A bare record, optionally with a sibling `errores` list.
    Flat {
        record: &'a Map<String, Value>,
        errors: Option<&'a Value>,
    },
    Unrecognized,
}

/// Classify a payload item by the presence of a nested record object,
/// falling back to the presence of any record field.
pub fn classify(item: &Value) -> PayloadShape<'_> {
    let Some(obj) = item.as_object() else {
        return PayloadShape::Unrecognized;
    };

    if let Some(record) = obj.get(NESTED_RECORD).and_then(Value::as_object) {
        return PayloadShape::Canonical {
            record,
            errors: obj.get(ERRORS),
            declared_has_errors: obj.get(HAS_ERRORS).and_then(Value::as_bool),
        };
    }

    let has_record_field = RECORD_FIELDS
        .iter()
        .any(|f| obj.get(f.as_ref()).is_some_and(|v| !v.is_null()));
    if has_record_field {
        return PayloadShape::Flat {
            record: obj,
            errors: obj.get(ERRORS),
        };
    }

    PayloadShape::Unrecognized
}

/// Normalize one payload item. `None` means "drop this item".
///
/// The output's `has_errors` is always recomputed from its error list; a
/// declared `tieneErrores` that disagrees is logged and ignored.
pub fn normalize(item: &Value) -> Option<AnnotatedRecord> {
    match classify(item) {
        PayloadShape::Canonical {
            record,
            errors,
            declared_has_errors,
        } => {
            let errors = parse_errors(errors);
            if let Some(declared) = declared_has_errors {
                if declared != !errors.is_empty() {
                    debug!(
                        key = %string_field(record, Field::Key),
                        declared,
                        error_count = errors.len(),
                        "declared error flag disagrees with error list, recomputing"
                    );
                }
            }
            Some(AnnotatedRecord::new(record_from_map(record), errors))
        }
        PayloadShape::Flat { record, errors } => Some(AnnotatedRecord::new(
            record_from_map(record),
            parse_errors(errors),
        )),
        PayloadShape::Unrecognized => None,
    }
}

/// Normalize a whole list body, dropping unrecognized items.
pub fn normalize_batch(items: &[Value]) -> Vec<AnnotatedRecord> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match normalize(item) {
            Some(record) => out.push(record),
            None => warn!(index, item = %item, "unrecognized record shape, dropping item"),
        }
    }
    out
}

// ── Helpers ──────────────────────────────────────────────────────────

fn record_from_map(map: &Map<String, Value>) -> Record {
    Record {
        key: string_field(map, Field::Key),
        contact_name: string_field(map, Field::ContactName),
        email: string_field(map, Field::Email),
        phone: string_field(map, Field::Phone),
    }
}

/// Read a record attribute leniently: strings as-is, numbers and booleans
/// stringified, anything else empty.
fn string_field(map: &Map<String, Value>, field: Field) -> String {
    match map.get(field.as_ref()) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse an `errores` value. A missing or non-array value is an empty list;
/// entries without a recognizable `campo` are dropped.
fn parse_errors(value: Option<&Value>) -> Vec<FieldError> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let field = entry
                .get(ERROR_FIELD)
                .and_then(Value::as_str)
                .and_then(|name| name.parse::<Field>().ok());
            let Some(field) = field else {
                warn!(entry = %entry, "field error without a known campo, dropping");
                return None;
            };
            let message = entry
                .get(ERROR_MESSAGE)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            Some(FieldError { field, message })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ana() -> Record {
        Record {
            key: "1".into(),
            contact_name: "Ana".into(),
            email: "ana@gmail.com".into(),
            phone: "9611234567".into(),
        }
    }

    #[test]
    fn classifies_each_shape() {
        let canonical = json!({ "cliente": { "clave": "1" }, "errores": [] });
        let flat = json!({ "clave": "1" });
        let neither = json!({ "id": 1 });

        assert!(matches!(classify(&canonical), PayloadShape::Canonical { .. }));
        assert!(matches!(classify(&flat), PayloadShape::Flat { .. }));
        assert_eq!(classify(&neither), PayloadShape::Unrecognized);
        assert_eq!(classify(&json!("1")), PayloadShape::Unrecognized);
        assert_eq!(classify(&json!(null)), PayloadShape::Unrecognized);
    }

    #[test]
    fn canonical_defaults_missing_errors() {
        let item = json!({
            "cliente": {
                "clave": "1",
                "nombreContacto": "Ana",
                "correo": "ana@gmail.com",
                "telefonoContacto": "9611234567"
            }
        });
        let normalized = normalize(&item).expect("canonical item");
        assert_eq!(normalized, AnnotatedRecord::plain(ana()));
        assert!(!normalized.has_errors());
    }

    #[test]
    fn stale_flag_is_recomputed() {
        let claims_errors = json!({ "cliente": { "clave": "1" }, "errores": [], "tieneErrores": true });
        assert!(!normalize(&claims_errors).expect("item").has_errors());

        let hides_errors = json!({
            "cliente": { "clave": "1" },
            "errores": [{ "campo": "correo", "mensaje": "dominio desconocido" }],
            "tieneErrores": false
        });
        let normalized = normalize(&hides_errors).expect("item");
        assert!(normalized.has_errors());
        assert_eq!(normalized.errors().len(), 1);
        assert_eq!(normalized.errors()[0].field, Field::Email);
    }

    #[test]
    fn flat_record_with_sibling_errors() {
        let item = json!({
            "clave": 77,
            "nombreContacto": "Luis 2",
            "errores": [{ "campo": "nombreContacto", "mensaje": "sin números" }]
        });
        let normalized = normalize(&item).expect("flat item");
        assert_eq!(normalized.key(), "77");
        assert_eq!(normalized.record().email, "");
        assert!(normalized.has_errors());
    }

    #[test]
    fn null_nested_record_falls_back_to_flat() {
        let item = json!({ "cliente": null, "clave": "5" });
        assert_eq!(normalize(&item).map(|r| r.key().to_owned()), Some("5".into()));
    }

    #[test]
    fn malformed_error_entries_are_dropped() {
        let item = json!({
            "cliente": { "clave": "1" },
            "errores": [
                { "campo": "direccion", "mensaje": "?" },
                "not an object",
                { "campo": "clave" }
            ]
        });
        let normalized = normalize(&item).expect("item");
        assert_eq!(normalized.errors(), &[FieldError::new(Field::Key, "")]);
    }

    #[test]
    fn normalizing_canonical_output_is_idempotent() {
        let original = AnnotatedRecord::new(
            ana(),
            vec![
                FieldError::new(Field::Phone, "lada inválida"),
                FieldError::new(Field::Email, "dominio desconocido"),
            ],
        );
        let wire = serde_json::to_value(&original).expect("serialize");
        let once = normalize(&wire).expect("canonical");
        assert_eq!(once, original);

        let twice = normalize(&serde_json::to_value(&once).expect("serialize")).expect("canonical");
        assert_eq!(twice, once);
    }

    #[test]
    fn batch_drops_unrecognized_items() {
        let items = vec![
            json!({ "clave": "1" }),
            json!({ "unexpected": true }),
            json!(42),
            json!({ "cliente": { "clave": "2" }, "tieneErrores": false }),
        ];
        let out = normalize_batch(&items);
        let keys: Vec<&str> = out.iter().map(AnnotatedRecord::key).collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    #[test]
    fn output_flag_always_matches_errors() {
        let items = vec![
            json!({ "cliente": { "clave": "1" }, "tieneErrores": true }),
            json!({ "cliente": { "clave": "2" }, "errores": "oops", "tieneErrores": true }),
            json!({ "clave": "3", "errores": [{ "campo": "clave", "mensaje": "x" }], "tieneErrores": false }),
            json!({ "clave": "4", "tieneErrores": "yes" }),
        ];
        for record in normalize_batch(&items) {
            assert_eq!(record.has_errors(), !record.errors().is_empty(), "{}", record.key());
        }
    }
}
