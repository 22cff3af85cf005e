//! Entity identifiers and composite import identifiers.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use dtrack_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier, naming the entity in the error.
            pub fn parse(value: &str) -> AppResult<Self> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    AppError::Validation(format!(
                        concat!("invalid ", $label, " UUID '{}': {}"),
                        value, error
                    ))
                })
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Team identifier.
    TeamId,
    "team"
);
uuid_id!(
    /// Project identifier.
    ProjectId,
    "project"
);
uuid_id!(
    /// Policy identifier.
    PolicyId,
    "policy"
);
uuid_id!(
    /// Policy condition identifier.
    PolicyConditionId,
    "policy condition"
);
uuid_id!(
    /// Notification publisher identifier.
    NotificationPublisherId,
    "notification publisher"
);
uuid_id!(
    /// Notification rule identifier.
    NotificationRuleId,
    "notification rule"
);

/// Managed, LDAP or OIDC username.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(NonEmptyString);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("username must not be empty".to_owned()))
    }

    /// Returns the username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Username {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Splits an import identifier of the form `first/second`.
///
/// Exactly one separator is accepted and neither part may be empty. The part
/// names are used in the error message.
pub fn parse_composite_id<'a>(
    id: &'a str,
    first_name: &str,
    second_name: &str,
) -> AppResult<(&'a str, &'a str)> {
    let mut parts = id.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) if !first.is_empty() && !second.is_empty() => {
            Ok((first, second))
        }
        _ => Err(AppError::Validation(format!(
            "expected format '{first_name}/{second_name}', got: {id}"
        ))),
    }
}

/// Joins two parts into a composite identifier.
#[must_use]
pub fn composite_id(first: impl Display, second: impl Display) -> String {
    format!("{first}/{second}")
}
