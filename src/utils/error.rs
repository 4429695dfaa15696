use thiserror::Error;

/// Hard failures of the reconciliation engine. Heuristic ambiguity (no place
/// match, no qualifying issue date) is expressed as `None`, never as a
/// variant here.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Malformed MRZ: {0}")]
    MalformedMrz(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Backing store still unreachable after the retry policy was exhausted.
    #[error("Result store unavailable: {0}")]
    StoreUnavailable(String),

    /// Non-transient backing store failure, surfaced without retry.
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(String),
}
