use dtrack_core::AppResult;
use dtrack_domain::{DirectoryUser, ManagedUser, ManagedUserInput, TeamId, Username};
use serde::{Deserialize, Serialize};

use super::{PermissionDto, UuidRef, permission_set};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUserDto {
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub force_password_change: bool,
    #[serde(default)]
    pub non_expiry_password: bool,
    #[serde(default)]
    pub permissions: Vec<PermissionDto>,
    #[serde(default)]
    pub teams: Vec<UuidRef>,
}

impl ManagedUserDto {
    pub fn into_domain(self) -> AppResult<ManagedUser> {
        Ok(ManagedUser {
            username: Username::new(self.username)?,
            fullname: self.fullname,
            email: self.email,
            suspended: self.suspended,
            force_password_change: self.force_password_change,
            non_expiry_password: self.non_expiry_password,
            permissions: permission_set(&self.permissions)?,
            teams: team_ids(&self.teams),
        })
    }
}

/// User listing entry of any directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUserDto {
    pub username: String,
    #[serde(default)]
    pub teams: Vec<UuidRef>,
}

impl DirectoryUserDto {
    pub fn into_domain(self) -> AppResult<DirectoryUser> {
        Ok(DirectoryUser {
            username: Username::new(self.username)?,
            teams: team_ids(&self.teams),
        })
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUserWriteDto<'a> {
    pub username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
    pub suspended: bool,
    pub force_password_change: bool,
    pub non_expiry_password: bool,
}

impl<'a> From<&'a ManagedUserInput> for ManagedUserWriteDto<'a> {
    fn from(input: &'a ManagedUserInput) -> Self {
        Self {
            username: input.username.as_str(),
            fullname: input.fullname.as_deref(),
            email: input.email.as_deref(),
            new_password: input.password.as_str(),
            confirm_password: input.password.as_str(),
            suspended: input.suspended,
            force_password_change: input.force_password_change,
            non_expiry_password: input.non_expiry_password,
        }
    }
}

fn team_ids(teams: &[UuidRef]) -> Vec<TeamId> {
    teams.iter().map(|team| TeamId::from_uuid(team.uuid)).collect()
}
