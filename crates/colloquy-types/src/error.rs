use thiserror::Error;

/// Errors from session store operations (used by trait definitions in colloquy-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by a chat turn, history read, or clear.
///
/// Generation failures are absent on purpose: the orchestrator absorbs them
/// and answers with the offline fallback text.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("session key allocation failed: {0}")]
    Allocation(String),

    #[error("session unavailable: {0}")]
    SessionUnavailable(String),
}

impl ChatError {
    /// Whether the error was caused by the caller's input (4xx) rather than
    /// the service (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::InvalidInput(_))
    }
}
