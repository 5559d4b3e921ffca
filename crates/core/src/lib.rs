//! Shared primitives for all Rust crates in hvacdesk.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
pub mod server_message;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::Credential;
pub use server_message::extract_server_message;

/// Result type used across hvacdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Server-assigned identifier of a CRM record.
pub type RecordId = i64;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// No usable credential for an authenticated call.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Fetch {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response body did not have a recognised shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the message shown to a user for this error.
    ///
    /// Server failures surface the message carried in the response body.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Fetch { status, body } => extract_server_message(body)
                .unwrap_or_else(|| format!("request failed with status {status}")),
            other => other.to_string(),
        }
    }
}
