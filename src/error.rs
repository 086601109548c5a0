use std::fmt;

/// Engine-level failure taxonomy surfaced over IPC as stable codes.
///
/// Validation means a malformed quiz/question definition or ledger input;
/// NotFound means a referenced record does not exist; Storage wraps a
/// failure of the persistence collaborator (propagated, never swallowed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(String),
    NotFound(String),
    Storage(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ServiceError::Storage(message.into())
    }

    /// Stable error code for IPC responses.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Storage(_) => "storage",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::Validation(m) | ServiceError::NotFound(m) | ServiceError::Storage(m) => {
                m
            }
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ServiceError {}
