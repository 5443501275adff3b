//! `check`: run the field validator locally, no service involved.

use serde::Serialize;
use tabled::Tabled;

use clientela_core::validate::validate_field;
use clientela_core::{Field, ValidationError};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct FieldCheck {
    field: Field,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&FieldCheck> for CheckRow {
    fn from(c: &FieldCheck) -> Self {
        Self {
            field: c.field.label(),
            value: c.value.clone(),
            result: c.message.unwrap_or("ok").to_owned(),
        }
    }
}

pub fn handle(args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let given = [
        (Field::Key, args.key),
        (Field::ContactName, args.name),
        (Field::Email, args.email),
        (Field::Phone, args.phone),
    ];

    let checks: Vec<FieldCheck> = given
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .map(|(field, value)| {
            let error = validate_field(field, &value).err();
            FieldCheck {
                field,
                message: error.map(|e| e.message(field)),
                error,
                value,
            }
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &checks,
        |c| CheckRow::from(c),
        |c| format!("{}\t{}", c.field, c.message.unwrap_or("ok")),
    )?;
    output::print_output(&out, global.quiet);

    match checks.iter().filter(|c| c.error.is_some()).count() {
        0 => Ok(()),
        count => Err(CliError::InvalidRecord { count }),
    }
}
