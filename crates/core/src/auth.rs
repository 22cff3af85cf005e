use std::fmt::{Debug, Formatter};

use crate::{AppError, AppResult};

/// Credentials attached to every call against the Dependency-Track server.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Team API key sent as `X-Api-Key`.
    ApiKey(String),
    /// Session token sent as `Authorization: Bearer`.
    BearerToken(String),
    /// Managed user login, exchanged for a bearer token at configure time.
    UsernamePassword {
        /// Managed username.
        username: String,
        /// Plain password.
        password: String,
    },
}

impl Credentials {
    /// Builds credentials from the optional provider settings.
    ///
    /// An API key and a username/password pair are mutually exclusive, and a
    /// username is only accepted together with a password.
    pub fn from_settings(
        api_key: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> AppResult<Self> {
        let api_key = api_key.filter(|value| !value.trim().is_empty());
        let username = username.filter(|value| !value.trim().is_empty());
        let password = password.filter(|value| !value.is_empty());

        match (api_key, username, password) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(AppError::Validation(
                "api_key and username/password authentication are mutually exclusive".to_owned(),
            )),
            (Some(api_key), None, None) => Ok(Self::ApiKey(api_key)),
            (None, Some(username), Some(password)) => {
                Ok(Self::UsernamePassword { username, password })
            }
            (None, Some(_), None) => Err(AppError::Validation(
                "username requires password to be set as well".to_owned(),
            )),
            (None, None, Some(_)) => Err(AppError::Validation(
                "password requires username to be set as well".to_owned(),
            )),
            (None, None, None) => Err(AppError::Validation(
                "credentials are required: set an api_key or a username and password".to_owned(),
            )),
        }
    }

    /// Returns a short label for the authentication method.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::BearerToken(_) => "bearer_token",
            Self::UsernamePassword { .. } => "username_password",
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => formatter.write_str("Credentials::ApiKey(<redacted>)"),
            Self::BearerToken(_) => formatter.write_str("Credentials::BearerToken(<redacted>)"),
            Self::UsernamePassword { username, .. } => formatter
                .debug_struct("Credentials::UsernamePassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
