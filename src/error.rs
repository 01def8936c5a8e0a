use thiserror::Error;

/// Errors raised while talking to the model provider or decoding its replies.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("failed to create AI client: {0}")]
    Client(String),
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("provider returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("question {index} does not match the quiz schema: {reason}")]
    InvalidQuestion { index: usize, reason: String },
    #[error("provider returned no questions")]
    NoQuestions,
}

/// Errors raised when mutating a quiz session.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("expected {expected} entries for {field}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("session already finished")]
    AlreadyFinished,
}

/// Errors raised by the local draft store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Migration(#[from] refinery::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
