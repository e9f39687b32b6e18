//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fitgarden_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the FitGarden backend")]
    #[diagnostic(
        code(fitgarden::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Reason: {reason}\n\
             Try: fitgarden config show"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Session expired or missing access token")]
    #[diagnostic(
        code(fitgarden::auth_failed),
        help(
            "Store a fresh token with: fitgarden config set-token\n\
             Or set the FITGARDEN_TOKEN environment variable."
        )
    )]
    AuthFailed,

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(fitgarden::no_token),
        help(
            "Configure one with: fitgarden config init\n\
             Or set FITGARDEN_TOKEN."
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(fitgarden::not_found),
        help("Run: fitgarden {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Workflow ─────────────────────────────────────────────────────

    /// Draft validation failure; the message names the missing piece.
    #[error("{message}")]
    #[diagnostic(code(fitgarden::validation))]
    Validation { message: String },

    /// Business rule blocked the operation before any backend call.
    #[error("{message}")]
    #[diagnostic(code(fitgarden::rejected))]
    Rejected { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Backend error: {message}")]
    #[diagnostic(code(fitgarden::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fitgarden::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fitgarden config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(fitgarden::no_config),
        help(
            "Create one with: fitgarden config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fitgarden::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fitgarden::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(fitgarden::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fitgarden::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<fitgarden_config::ConfigError> for CliError {
    fn from(err: fitgarden_config::ConfigError) -> Self {
        match err {
            fitgarden_config::ConfigError::NoToken { profile } => Self::NoToken { profile },
            fitgarden_config::ConfigError::Figment(e) => Self::Config(e),
            fitgarden_config::ConfigError::Io(e) => Self::Io(e),
            other => Self::Validation {
                message: other.to_string(),
            },
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::SessionExpired => CliError::AuthFailed,

            CoreError::Timeout => CliError::Timeout,

            CoreError::BookingNotFound { identifier } => CliError::NotFound {
                resource_type: "agendamento".into(),
                identifier,
                list_command: "agenda list".into(),
            },

            CoreError::CustomerNotFound { identifier } => CliError::NotFound {
                resource_type: "cliente".into(),
                identifier,
                list_command: "customers list".into(),
            },

            CoreError::MenuOptionNotFound { identifier } => CliError::NotFound {
                resource_type: "opção".into(),
                identifier,
                list_command: "menu list".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation { message },

            CoreError::EditRejected { message } => CliError::Rejected { message },

            CoreError::Api { message, status } => {
                if status == Some(404) {
                    CliError::NotFound {
                        resource_type: "agendamento".into(),
                        identifier: message,
                        list_command: "agenda list".into(),
                    }
                } else {
                    CliError::ApiError { message, status }
                }
            }

            CoreError::Config { message } => CliError::Validation { message },

            CoreError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}
