//! Typed request and response bodies of the Dependency-Track REST API.
//!
//! Identity fields are required so a shape mismatch fails decoding. List
//! fields default to empty because the server omits null collections.

mod config_property;
mod notification;
mod policy;
mod project;
mod team;
mod user;

pub use config_property::{ConfigPropertyDto, ConfigPropertyUpdateDto};
pub use notification::{NotificationPublisherDto, NotificationRuleDto};
pub use policy::{PolicyConditionDto, PolicyConditionWriteDto, PolicyDto, PolicyWriteDto};
pub use project::ProjectDto;
pub use team::{ApiKeyDto, TeamDto, TeamWriteDto};
pub use user::{DirectoryUserDto, ManagedUserDto, ManagedUserWriteDto};

use dtrack_core::AppResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to another entity by UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidRef {
    /// Referenced identifier.
    pub uuid: Uuid,
}

impl UuidRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self { uuid }
    }
}

/// Permission entry embedded in team and user bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDto {
    /// Permission name.
    pub name: String,
}

/// Body addressing a user by username.
#[derive(Debug, Clone, Serialize)]
pub struct UsernameRef<'a> {
    /// Username.
    pub username: &'a str,
}

pub(crate) fn permission_set(
    permissions: &[PermissionDto],
) -> AppResult<dtrack_domain::PermissionSet> {
    dtrack_domain::PermissionSet::parse(
        permissions
            .iter()
            .map(|permission| permission.name.clone()),
    )
}
