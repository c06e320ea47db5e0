//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use rota_config::ConfigError;
use rota_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 78;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Backend ──────────────────────────────────────────────────────

    #[error("Could not reach the calendar backend: {message}")]
    #[diagnostic(
        code(rota::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Set it with --server or data_source.url in the config file."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Calendar backend returned {status}: {message}")]
    #[diagnostic(code(rota::backend_error))]
    Backend { status: u16, message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(rota::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rota::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration value for {field}: {reason}")]
    #[diagnostic(
        code(rota::config_invalid),
        help("Inspect the effective configuration with: rota config show")
    )]
    ConfigInvalid { field: String, reason: String },

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(rota::config_exists),
        help(
            "Use --force to overwrite it.\n\
             Path: {path}"
        )
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(rota::config))]
    Config(Box<figment::Error>),

    // ── Local state ──────────────────────────────────────────────────

    #[error("Local state error: {message}")]
    #[diagnostic(code(rota::state))]
    State { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {reason}")]
    #[diagnostic(code(rota::render))]
    Render { reason: String },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigInvalid { .. } | Self::ConfigExists { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch {
                message,
                status: Some(status),
            } => CliError::Backend { status, message },

            CoreError::Fetch {
                message,
                status: None,
            } => CliError::ConnectionFailed { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "filters".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::ConfigInvalid {
                field: "data_source.url".into(),
                reason: message,
            },

            CoreError::Cache { message } | CoreError::Persistence { message } => {
                CliError::State { message }
            }

            CoreError::NotRunning => CliError::State {
                message: "calendar controller is not running".into(),
            },

            CoreError::Internal(message) => CliError::State { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid { field, reason },
            ConfigError::Serialization(e) => CliError::Render {
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
