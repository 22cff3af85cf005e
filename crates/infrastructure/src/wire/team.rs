use dtrack_core::AppResult;
use dtrack_domain::{ApiKey, GeneratedApiKey, Team, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PermissionDto, permission_set};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionDto>,
    #[serde(default)]
    pub api_keys: Vec<ApiKeyDto>,
}

impl TeamDto {
    pub fn into_domain(self) -> AppResult<Team> {
        Ok(Team {
            id: TeamId::from_uuid(self.uuid),
            name: self.name,
            permissions: permission_set(&self.permissions)?,
            api_keys: self.api_keys.into_iter().map(ApiKeyDto::into_metadata).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWriteDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub name: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDto {
    pub public_id: String,
    pub masked_key: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub legacy: bool,
    #[serde(default)]
    pub key: Option<String>,
}

impl ApiKeyDto {
    pub fn into_metadata(self) -> ApiKey {
        ApiKey {
            public_id: self.public_id,
            masked_key: self.masked_key,
            comment: self.comment.filter(|comment| !comment.is_empty()),
            legacy: self.legacy,
        }
    }

    /// Splits a generate response into metadata and clear key.
    pub fn into_generated(mut self) -> Option<GeneratedApiKey> {
        let key = self.key.take()?;
        Some(GeneratedApiKey {
            metadata: self.into_metadata(),
            key,
        })
    }
}
