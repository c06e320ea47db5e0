// ── Core error types ──
//
// User-facing errors from rota-core. Consumers never see reqwest or
// serde failures directly: the `From<rota_api::Error>` impl folds every
// transport-layer failure into `CoreError::Fetch`.
//
// `CoreError` is `Clone` because a single fetch failure is shared by
// every caller waiting on the same in-flight request, and is published
// inside `CalendarSnapshot`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Data source errors ───────────────────────────────────────────
    #[error("Failed to fetch calendar events: {message}")]
    Fetch {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Local state errors ───────────────────────────────────────────
    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Controller is not running")]
    NotRunning,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::ValidationFailed`].
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rota_api::Error> for CoreError {
    fn from(err: rota_api::Error) -> Self {
        let status = err.status();
        match err {
            rota_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "Event".into(),
                identifier: message,
            },
            rota_api::Error::Api {
                message,
                details: Some(details),
                ..
            } => CoreError::Fetch {
                message: format!("{message} ({details})"),
                status,
            },
            rota_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid data source URL: {e}"),
            },
            other => CoreError::Fetch {
                message: other.to_string(),
                status,
            },
        }
    }
}
