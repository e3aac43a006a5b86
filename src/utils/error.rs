use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Failures raised by a [`Repository`](crate::utils::traits::Repository) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("database unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::UniqueViolation
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Everything an action can fail with. The display text of the client-facing
/// variants is what ends up in the `error` field of the response.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Expense not found")]
    NotFound,
    #[error("Invalid action")]
    InvalidAction,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session store failure: {0}")]
    Session(String),
    #[error("{0}")]
    Internal(String),
}

impl ActionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}
