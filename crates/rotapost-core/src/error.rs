use thiserror::Error;

/// Service-level error taxonomy shared across crates.
///
/// Expected failures are always returned as values; after startup nothing in
/// this list is allowed to take the process down.
#[derive(Debug, Error)]
pub enum RotapostError {
    /// Required credentials (bot token / channel id) are absent. The gateway
    /// keeps serving but reports the publisher as inactive.
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// No body is mapped for the requested (type, day) pair.
    #[error("No content for {content_type} on day {day}")]
    ContentNotFound { content_type: String, day: u32 },

    /// Manual day override outside [1, cycle_length].
    #[error("Day {day} out of range 1..={cycle_length}")]
    OutOfRange { day: u32, cycle_length: u32 },

    /// Timeout, refused connection, DNS failure — the request never produced
    /// an application-level answer.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The messaging API answered and said no (non-2xx or `ok:false`).
    #[error("API rejection: {0}")]
    ApiRejection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RotapostError {
    /// Short stable code string for JSON error responses.
    pub fn code(&self) -> &'static str {
        match self {
            RotapostError::ConfigMissing(_) => "CONFIG_MISSING",
            RotapostError::Config(_) => "CONFIG",
            RotapostError::ContentNotFound { .. } => "CONTENT_NOT_FOUND",
            RotapostError::OutOfRange { .. } => "OUT_OF_RANGE",
            RotapostError::Transport(_) => "TRANSPORT",
            RotapostError::ApiRejection(_) => "API_REJECTED",
            RotapostError::Database(_) => "DATABASE",
            RotapostError::Internal(_) => "INTERNAL",
        }
    }
}

pub type Result<T> = std::result::Result<T, RotapostError>;
