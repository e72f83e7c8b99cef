use thiserror::Error;

/// Domain error kinds. The handler layer maps each kind to an HTTP
/// status; the service itself never logs failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name must be at least 2 characters")]
    InvalidName,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("invalid phone format")]
    InvalidPhone,

    #[error("user not found")]
    NotFound,

    #[error("user already exists")]
    AlreadyExists,

    #[error("no update data provided")]
    NoUpdateData,

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;
