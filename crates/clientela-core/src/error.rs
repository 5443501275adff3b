// ── Core error types ──
//
// User-facing errors from clientela-core. Consumers never see reqwest
// errors or raw JSON failures; `From<clientela_api::Error>` folds them
// into the variants below.

use thiserror::Error;

use crate::model::RemoteFieldError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to registry service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Registry service timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error(
        "Not found: {identifier}{}",
        .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    NotFound {
        identifier: String,
        /// Body text the service sent with the 404, when it sent one.
        detail: Option<String>,
    },

    #[error("No record with key {key} in the loaded set")]
    RecordNotFound { key: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation errors found ({} field error(s))", .errors.len())]
    ValidationFailed { errors: Vec<RemoteFieldError> },

    #[error("The key of an existing record cannot be changed")]
    KeyImmutable,

    #[error("Page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange { requested: usize, total_pages: usize },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Service error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Field errors reported by the service, if this is a rejection.
    pub fn field_errors(&self) -> Option<&[RemoteFieldError]> {
        match self {
            Self::ValidationFailed { errors } => Some(errors),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clientela_api::Error> for CoreError {
    fn from(err: clientela_api::Error) -> Self {
        if err.is_not_found() {
            let (identifier, detail) = match &err {
                clientela_api::Error::Transport(e) => {
                    (e.url().map(|u| u.path().to_owned()), None)
                }
                clientela_api::Error::Api { message, .. } => {
                    let message = message.trim();
                    (None, (!message.is_empty()).then(|| message.to_owned()))
                }
                _ => (None, None),
            };
            return Self::NotFound {
                identifier: identifier.unwrap_or_else(|| "requested record".into()),
                detail,
            };
        }

        match err {
            clientela_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            clientela_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            clientela_api::Error::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            clientela_api::Error::Validation { errors, .. } => Self::ValidationFailed {
                errors: errors.into_iter().map(RemoteFieldError::from).collect(),
            },
            clientela_api::Error::Api { status, message } => Self::Api {
                message,
                status: Some(status),
            },
        }
    }
}
