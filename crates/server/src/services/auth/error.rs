//! Credential store error types.

use thiserror::Error;

use beverly_core::UsernameError;

/// Input rejected before any account is touched.
///
/// The `Display` text is returned to the client as-is.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Registration without email, password or username.
    #[error("Please provide email, password, and username")]
    MissingRegistrationFields,

    /// Login without email or password.
    #[error("Please provide email and password")]
    MissingLoginFields,

    /// Username below the minimum length.
    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    /// Username above the maximum length.
    #[error("Username must be at most {max} characters")]
    UsernameTooLong { max: usize },

    /// Email does not look like `local@domain.tld`.
    #[error("Please provide a valid email address")]
    InvalidEmail,

    /// Password below the minimum length.
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    /// Password above the maximum length.
    #[error("Password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

impl From<UsernameError> for ValidationError {
    fn from(err: UsernameError) -> Self {
        match err {
            UsernameError::TooShort { min } => Self::UsernameTooShort { min },
            UsernameError::TooLong { max } => Self::UsernameTooLong { max },
        }
    }
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Email or username already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}
