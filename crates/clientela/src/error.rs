//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use clientela_config::ConfigError;
use clientela_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the registry service at {url}")]
    #[diagnostic(
        code(clientela::connection_failed),
        help(
            "Check that the service is running and reachable.\n\
             URL: {url}\n\
             Try: clientela list --url http://host:port"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(clientela::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout,

    // ── Records ──────────────────────────────────────────────────────

    #[error("Record '{key}' not found")]
    #[diagnostic(
        code(clientela::not_found),
        help("Run: clientela list to see available records")
    )]
    NotFound { key: String },

    #[error("{count} field(s) failed validation")]
    #[diagnostic(
        code(clientela::invalid_record),
        help("Fix the fields reported above and try again.")
    )]
    InvalidRecord { count: usize },

    #[error("The service rejected the record ({count} field error(s))")]
    #[diagnostic(
        code(clientela::rejected),
        help("Fix the fields reported above and try again.")
    )]
    Rejected { count: usize },

    #[error("The key of an existing record cannot be changed")]
    #[diagnostic(
        code(clientela::key_immutable),
        help("Delete the record and create a new one to use a different key.")
    )]
    KeyImmutable,

    #[error("Page {requested} does not exist")]
    #[diagnostic(
        code(clientela::page_out_of_range),
        help("There are {total_pages} page(s) in this view.")
    )]
    PageOutOfRange { requested: usize, total_pages: usize },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Service error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(clientela::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clientela::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(clientela::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: clientela config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(clientela::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(clientela::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(clientela::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidRecord { .. }
            | Self::Rejected { .. }
            | Self::KeyImmutable
            | Self::PageOutOfRange { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotFound { identifier, .. } => Self::NotFound { key: identifier },
            CoreError::RecordNotFound { key } => Self::NotFound { key },
            CoreError::ValidationFailed { errors } => Self::Rejected {
                count: errors.len(),
            },
            CoreError::KeyImmutable => Self::KeyImmutable,
            CoreError::PageOutOfRange {
                requested,
                total_pages,
            } => Self::PageOutOfRange {
                requested,
                total_pages,
            },
            CoreError::Api { message, status } => Self::ApiError { status, message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
