use thiserror::Error;

/// Failure of a store operation. Only the message is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The request client could not complete the call.
    #[error("{0}")]
    Failed(String),
}

impl StoreError {
    pub fn message(&self) -> &str {
        match self {
            StoreError::Rejected(message) | StoreError::Failed(message) => message,
        }
    }
}
