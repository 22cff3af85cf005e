//! Managed user domain types.

use dtrack_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{PermissionSet, TeamId, Username};

/// Managed (local) user as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedUser {
    /// Unique username.
    pub username: Username,
    /// Optional full name.
    pub fullname: Option<String>,
    /// Optional email address.
    pub email: Option<String>,
    /// Whether the account is suspended.
    pub suspended: bool,
    /// Whether the user must change the password on next login.
    pub force_password_change: bool,
    /// Whether the password never expires.
    pub non_expiry_password: bool,
    /// Permissions held directly by the user.
    pub permissions: PermissionSet,
    /// Teams the user belongs to.
    pub teams: Vec<TeamId>,
}

/// Directory a user account lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDirectory {
    /// Local accounts managed by the server.
    Managed,
    /// Accounts synchronised from LDAP.
    Ldap,
    /// Accounts provisioned through OpenID Connect.
    Oidc,
}

impl UserDirectory {
    /// Returns the directories in lookup order.
    #[must_use]
    pub fn lookup_order() -> &'static [Self] {
        &[Self::Managed, Self::Ldap, Self::Oidc]
    }

    /// Returns the endpoint segment for the directory.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Ldap => "ldap",
            Self::Oidc => "oidc",
        }
    }
}

/// Team memberships of a user in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    /// Username.
    pub username: Username,
    /// Teams the user belongs to.
    pub teams: Vec<TeamId>,
}

/// Desired attributes of a managed user.
#[derive(Clone, PartialEq, Eq)]
pub struct ManagedUserInput {
    /// Unique username.
    pub username: Username,
    /// Optional full name.
    pub fullname: Option<String>,
    /// Optional email address.
    pub email: Option<String>,
    /// Password sent as both new and confirmation password.
    pub password: String,
    /// Whether the account is suspended.
    pub suspended: bool,
    /// Whether the user must change the password on next login.
    pub force_password_change: bool,
    /// Whether the password never expires.
    pub non_expiry_password: bool,
}

impl ManagedUserInput {
    /// Validates the input before it is sent.
    pub fn validate(&self) -> AppResult<()> {
        if self.password.is_empty() {
            return Err(AppError::Validation(format!(
                "password for managed user '{}' must not be empty",
                self.username
            )));
        }

        if let Some(email) = self.email.as_deref()
            && !email.is_empty()
            && !email.contains('@')
        {
            return Err(AppError::Validation(format!(
                "email '{email}' for managed user '{}' must contain '@'",
                self.username
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ManagedUserInput {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ManagedUserInput")
            .field("username", &self.username)
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("suspended", &self.suspended)
            .field("force_password_change", &self.force_password_change)
            .field("non_expiry_password", &self.non_expiry_password)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ManagedUserInput;
    use crate::Username;

    fn input(password: &str, email: Option<&str>) -> Option<ManagedUserInput> {
        Some(ManagedUserInput {
            username: Username::new("jdoe").ok()?,
            fullname: None,
            email: email.map(str::to_owned),
            password: password.to_owned(),
            suspended: false,
            force_password_change: false,
            non_expiry_password: false,
        })
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(input("", None).is_some_and(|input| input.validate().is_err()));
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert!(input("secret", Some("jdoe")).is_some_and(|input| input.validate().is_err()));
        assert!(
            input("secret", Some("jdoe@example.com")).is_some_and(|input| input.validate().is_ok())
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = input("hunter2", None)
            .map(|input| format!("{input:?}"))
            .unwrap_or_default();
        assert!(rendered.contains("jdoe"));
        assert!(!rendered.contains("hunter2"));
    }
}
