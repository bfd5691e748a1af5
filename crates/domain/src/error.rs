//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

/// Coarse classification of a [`DomainError`], used by callers to branch on
/// the failure without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InputInvalid,
    NotFound,
    Duplicate,
    ConstraintsViolation,
    ConcurrencyConflict,
    MaxRetriesExceeded,
    MarshalingFailed,
    UnmarshalingFailed,
    Technical,
}

impl ErrorKind {
    /// Returns the kind as a snake_case label (used for metrics).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputInvalid => "input_invalid",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::ConstraintsViolation => "constraints_violation",
            ErrorKind::ConcurrencyConflict => "concurrency_conflict",
            ErrorKind::MaxRetriesExceeded => "max_retries_exceeded",
            ErrorKind::MarshalingFailed => "marshaling_failed",
            ErrorKind::UnmarshalingFailed => "unmarshaling_failed",
            ErrorKind::Technical => "technical",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller supplied a malformed or empty field.
    #[error("input invalid: {0}")]
    InputInvalid(String),

    /// The customer does not exist or was deleted.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint (email address) would be violated.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A business rule rejected the command.
    #[error("domain constraints violation: {0}")]
    ConstraintsViolation(String),

    /// Another writer appended to the same stream first.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Every attempt ended in a concurrency conflict.
    #[error("max retries exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded {
        attempts: usize,
        #[source]
        last: Box<DomainError>,
    },

    /// An event could not be serialized.
    #[error("marshaling failed: {0}")]
    MarshalingFailed(String),

    /// A stored event could not be deserialized.
    #[error("unmarshaling failed: {0}")]
    UnmarshalingFailed(String),

    /// Any other I/O or runtime failure.
    #[error("technical error: {0}")]
    Technical(String),
}

impl DomainError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InputInvalid(_) => ErrorKind::InputInvalid,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Duplicate(_) => ErrorKind::Duplicate,
            DomainError::ConstraintsViolation(_) => ErrorKind::ConstraintsViolation,
            DomainError::ConcurrencyConflict(_) => ErrorKind::ConcurrencyConflict,
            DomainError::MaxRetriesExceeded { .. } => ErrorKind::MaxRetriesExceeded,
            DomainError::MarshalingFailed(_) => ErrorKind::MarshalingFailed,
            DomainError::UnmarshalingFailed(_) => ErrorKind::UnmarshalingFailed,
            DomainError::Technical(_) => ErrorKind::Technical,
        }
    }

    /// Prefixes the message with `context`, keeping the kind.
    pub fn context(self, context: &str) -> Self {
        let wrap = |message: String| format!("{context}: {message}");
        match self {
            DomainError::InputInvalid(m) => DomainError::InputInvalid(wrap(m)),
            DomainError::NotFound(m) => DomainError::NotFound(wrap(m)),
            DomainError::Duplicate(m) => DomainError::Duplicate(wrap(m)),
            DomainError::ConstraintsViolation(m) => DomainError::ConstraintsViolation(wrap(m)),
            DomainError::ConcurrencyConflict(m) => DomainError::ConcurrencyConflict(wrap(m)),
            DomainError::MaxRetriesExceeded { attempts, last } => DomainError::MaxRetriesExceeded {
                attempts,
                last: Box::new(last.context(context)),
            },
            DomainError::MarshalingFailed(m) => DomainError::MarshalingFailed(wrap(m)),
            DomainError::UnmarshalingFailed(m) => DomainError::UnmarshalingFailed(wrap(m)),
            DomainError::Technical(m) => DomainError::Technical(wrap(m)),
        }
    }
}

impl From<EventStoreError> for DomainError {
    fn from(e: EventStoreError) -> Self {
        match e {
            EventStoreError::ConcurrencyConflict { .. } => {
                DomainError::ConcurrencyConflict(e.to_string())
            }
            EventStoreError::DuplicateUniqueValue { .. } => DomainError::Duplicate(e.to_string()),
            _ => DomainError::Technical(e.to_string()),
        }
    }
}
