use thiserror::Error;

use crate::models::ApiFieldError;

/// Top-level error type for the `clientela-api` crate.
///
/// Covers every failure mode of the registry service surface: transport,
/// TLS setup, structured validation rejections, and raw non-2xx responses.
/// `clientela-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service responses ───────────────────────────────────────────
    /// The service rejected the record with per-field errors
    /// (a body of the form `{"errores": [{"campo", "mensaje"}]}`).
    #[error("Validation rejected by service (HTTP {status}): {} field error(s)", .errors.len())]
    Validation {
        status: u16,
        errors: Vec<ApiFieldError>,
    },

    /// Any other non-2xx response. `message` is the raw body text.
    #[error("Service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Returns `true` if the service reported field-level validation errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
