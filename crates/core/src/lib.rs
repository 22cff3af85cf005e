//! Shared primitives for all Rust crates in the Dependency-Track provider.

#![forbid(unsafe_code)]

/// Authentication primitives shared across crates.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::Credentials;

/// Result type used across provider crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Wraps `value` after rejecting blank input.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Borrows the wrapped text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Failure categories shared by every provider crate.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration or input was rejected before reaching the server.
    #[error("validation error: {0}")]
    Validation(String),

    /// The addressed entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server already holds a clashing entity.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials are missing or rejected by the server.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials are valid but lack the required server permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The server answered with an unexpected non-success status.
    #[error("server returned status {status}: {message}")]
    Remote {
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body or summary.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A single permission grant or revoke call failed.
    #[error("unable to {action} permission '{permission}' for {holder}: {source}")]
    PermissionChange {
        /// Either `grant` or `revoke`.
        action: &'static str,
        /// Permission name sent to the server.
        permission: String,
        /// Display form of the permission holder.
        holder: String,
        /// Underlying call failure.
        #[source]
        source: Box<AppError>,
    },

    /// A local failure with no better category.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error reports a missing remote entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
