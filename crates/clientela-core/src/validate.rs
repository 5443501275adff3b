//! Field validators.
//!
//! Every check is a pure function of one value, so the same code serves
//! per-keystroke feedback and the full pass at submit time. Nothing here
//! knows about the network or the controller.

use serde::Serialize;
use thiserror::Error;

use crate::model::{Field, FieldError, Record};

/// Public mail providers accepted regardless of the TLD heuristic.
pub const KNOWN_PROVIDERS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "yahoo.com",
    "live.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "zoho.com",
    "mail.com",
];

/// Regional area codes (first three digits of a 10-digit number).
pub const AREA_CODES: &[&str] = &[
    "916", "917", "918", "919", "932", "934", "961", "962", "963", "964", "965", "966", "967",
    "968", "992", "994",
];

/// Required phone length in digits, area code included.
pub const PHONE_DIGITS: usize = 10;

const AREA_CODE_DIGITS: usize = 3;

/// Why a single field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum ValidationError {
    #[error("value is required")]
    Required,
    #[error("invalid format")]
    InvalidFormat,
    #[error("too short")]
    TooShort,
    #[error("unrecognized area code")]
    InvalidAreaCode,
    #[error("wrong length")]
    WrongLength,
    #[error("unknown email provider")]
    UnknownProvider,
}

impl ValidationError {
    /// User-facing message for this error on `field`.
    pub fn message(self, field: Field) -> &'static str {
        match (field, self) {
            (Field::Key, Self::InvalidFormat) => "key must contain only digits",
            (Field::ContactName, Self::Required) => "contact name is required",
            (Field::ContactName, Self::InvalidFormat) => "contact name must not contain digits",
            (Field::Email, Self::Required) => "email is required",
            (Field::Email, Self::InvalidFormat) => "email format is invalid",
            (Field::Email, Self::UnknownProvider) => "please use a known email provider",
            (Field::Phone, Self::InvalidFormat) => "phone must contain only digits",
            (Field::Phone, Self::TooShort) => "phone must have at least 10 digits",
            (Field::Phone, Self::InvalidAreaCode) => "phone area code is not recognized",
            (Field::Phone, Self::WrongLength) => {
                "phone must have exactly 10 digits including area code"
            }
            (_, Self::Required) => "value is required",
            (_, Self::InvalidFormat) => "invalid format",
            (_, Self::TooShort) => "value is too short",
            (_, Self::InvalidAreaCode) => "unrecognized area code",
            (_, Self::WrongLength) => "wrong length",
            (_, Self::UnknownProvider) => "unknown email provider",
        }
    }

    pub fn to_field_error(self, field: Field) -> FieldError {
        FieldError::new(field, self.message(field))
    }
}

// ── Per-field checks ────────────────────────────────────────────────

/// Non-empty, ASCII digits only.
pub fn validate_key(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat);
    }
    Ok(())
}

/// Required; letters (accented included) and spaces, but never digits.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    if value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat);
    }
    Ok(())
}

/// Required; `local@domain.tld` shape; then a known provider or a domain
/// whose last segment is at least two characters long.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    let domain = email_domain(value).ok_or(ValidationError::InvalidFormat)?;

    let domain = domain.to_lowercase();
    if KNOWN_PROVIDERS.contains(&domain.as_str()) {
        return Ok(());
    }

    let tld_len = domain
        .rsplit_once('.')
        .map_or(0, |(_, tld)| tld.chars().count());
    if tld_len >= 2 {
        Ok(())
    } else {
        Err(ValidationError::UnknownProvider)
    }
}

/// Digits are extracted first, so `961-123-4567` and `(961) 123 4567`
/// both validate as `9611234567`.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(ValidationError::InvalidFormat);
    }
    if digits.len() < PHONE_DIGITS {
        return Err(ValidationError::TooShort);
    }
    let area_code = digits.get(..AREA_CODE_DIGITS).unwrap_or_default();
    if !AREA_CODES.contains(&area_code) {
        return Err(ValidationError::InvalidAreaCode);
    }
    if digits.len() != PHONE_DIGITS {
        return Err(ValidationError::WrongLength);
    }
    Ok(())
}

/// Run the validator that belongs to `field`.
pub fn validate_field(field: Field, value: &str) -> Result<(), ValidationError> {
    match field {
        Field::Key => validate_key(value),
        Field::ContactName => validate_name(value),
        Field::Email => validate_email(value),
        Field::Phone => validate_phone(value),
    }
}

/// Check the `local@domain.tld` shape and return the domain part.
///
/// Exactly one `@`, no whitespace, a non-empty local part, and a domain
/// containing a `.` with at least one character on each side.
fn email_domain(value: &str) -> Option<&str> {
    if value.chars().any(char::is_whitespace) {
        return None;
    }
    let (local, domain) = value.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }
    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    has_inner_dot.then_some(domain)
}

// ── Aggregate ───────────────────────────────────────────────────────

/// Per-field outcome of a validation pass. `None` means valid (or, for
/// live feedback, not checked yet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub key: Option<ValidationError>,
    pub contact_name: Option<ValidationError>,
    pub email: Option<ValidationError>,
    pub phone: Option<ValidationError>,
}

impl ValidationReport {
    pub fn get(&self, field: Field) -> Option<ValidationError> {
        match field {
            Field::Key => self.key,
            Field::ContactName => self.contact_name,
            Field::Email => self.email,
            Field::Phone => self.phone,
        }
    }

    pub fn set(&mut self, field: Field, outcome: Option<ValidationError>) {
        let slot = match field {
            Field::Key => &mut self.key,
            Field::ContactName => &mut self.contact_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        };
        *slot = outcome;
    }

    /// Every field with its outcome, in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<ValidationError>)> + '_ {
        [Field::Key, Field::ContactName, Field::Email, Field::Phone]
            .into_iter()
            .map(|f| (f, self.get(f)))
    }

    pub fn is_valid(&self) -> bool {
        self.iter().all(|(_, outcome)| outcome.is_none())
    }

    /// The failures as user-facing field errors.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.iter()
            .filter_map(|(field, outcome)| outcome.map(|e| e.to_field_error(field)))
            .collect()
    }
}

/// Validate every field of `record`. Never short-circuits.
pub fn validate_all(record: &Record) -> ValidationReport {
    ValidationReport {
        key: validate_key(&record.key).err(),
        contact_name: validate_name(&record.contact_name).err(),
        email: validate_email(&record.email).err(),
        phone: validate_phone(&record.phone).err(),
    }
}
