//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Errors surfaced by message sending.
///
/// `ReceiverNotFound` and `Validation` are reported back to the sender as a
/// failed send while the connection stays open; `Storage` is not locally
/// recoverable and is left to the session to act on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// The targeted receiver does not resolve to an existing user
    #[error("receiver {0} not found")]
    ReceiverNotFound(i64),

    /// The message payload failed validation
    #[error("invalid message payload: {0}")]
    Validation(#[from] ValueObjectError),

    /// The storage collaborator failed
    #[error("storage unavailable: {0}")]
    Storage(String),
}

impl From<RepositoryError> for SendMessageError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UserNotFound(id) => Self::ReceiverNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}
