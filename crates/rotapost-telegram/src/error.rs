use thiserror::Error;

/// Delivery failure, classified for the caller.
///
/// The publisher never retries on its own; whether a `Transport` failure is
/// worth one more attempt is the caller's call. `Api` failures are terminal:
/// the request arrived and was refused.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Timeout, refused connection, DNS failure — no application-level answer.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The Bot API answered with non-2xx or `ok:false`; carries the API's
    /// `description` when one was given.
    #[error("api rejection: {0}")]
    Api(String),
}

impl PublishError {
    pub fn detail(&self) -> &str {
        match self {
            PublishError::Transport(d) | PublishError::Api(d) => d,
        }
    }
}
