use thiserror::Error;

/// Errors from the catalog and cycle clock.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("no content for {content_type} on day {day}")]
    NotFound { content_type: String, day: u32 },

    #[error("day {day} out of range 1..={cycle_length}")]
    OutOfRange { day: u32, cycle_length: u32 },

    #[error("cycle length must be at least 1")]
    ZeroCycleLength,
}

pub type Result<T> = std::result::Result<T, ContentError>;
