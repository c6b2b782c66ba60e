use thiserror::Error;

/// Client-facing error taxonomy. Failures of the optional AI capabilities
/// (evaluation, transcription, report narration) never appear here; each
/// component catches them and substitutes its deterministic fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown session/question identifier, or a report requested before
    /// any question was asked.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied no usable answer, or the operation is invalid
    /// for the session's current state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Fatal initialization problem (e.g. empty question catalog). Not a
    /// per-request condition.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
