use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{ApiKey, TeamId};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

/// Team API key. The clear key is only known right after generation.
pub struct TeamApiKeyResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamApiKeyConfig {
    team: TeamId,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TeamApiKeyState {
    id: String,
    team: TeamId,
    comment: Option<String>,
    key: String,
    masked_key: String,
}

impl std::fmt::Debug for TeamApiKeyState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TeamApiKeyState")
            .field("id", &self.id)
            .field("team", &self.team)
            .field("comment", &self.comment)
            .field("key", &"<redacted>")
            .field("masked_key", &self.masked_key)
            .finish()
    }
}

impl TeamApiKeyState {
    fn with_metadata(&self, metadata: ApiKey) -> Self {
        Self {
            id: metadata.public_id,
            team: self.team,
            comment: metadata.comment,
            key: self.key.clone(),
            masked_key: metadata.masked_key,
        }
    }
}

#[async_trait]
impl Resource for TeamApiKeyResource {
    type Config = TeamApiKeyConfig;
    type State = TeamApiKeyState;

    fn type_name(&self) -> &'static str {
        "team_api_key"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &TeamApiKeyConfig,
    ) -> AppResult<TeamApiKeyState> {
        let generated = ctx
            .teams
            .generate_api_key(config.team, config.comment.as_deref())
            .await?;
        Ok(TeamApiKeyState {
            id: generated.metadata.public_id,
            team: config.team,
            comment: generated.metadata.comment,
            key: generated.key,
            masked_key: generated.metadata.masked_key,
        })
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &TeamApiKeyState,
    ) -> AppResult<Option<TeamApiKeyState>> {
        Ok(ctx
            .teams
            .find_api_key(state.team, &state.id)
            .await?
            .map(|metadata| state.with_metadata(metadata)))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &TeamApiKeyConfig,
        state: &TeamApiKeyState,
    ) -> AppResult<TeamApiKeyState> {
        let metadata = ctx
            .teams
            .set_api_key_comment(&state.id, config.comment.as_deref())
            .await?;
        Ok(state.with_metadata(metadata))
    }

    async fn delete(&self, ctx: &ProviderContext, state: &TeamApiKeyState) -> AppResult<()> {
        ctx.teams.delete_api_key(&state.id).await
    }

    async fn import(&self, _ctx: &ProviderContext, id: &str) -> AppResult<TeamApiKeyState> {
        Err(AppError::Validation(format!(
            "team api key '{id}' cannot be imported, its clear key is only shown once"
        )))
    }

    fn has_changes(&self, config: &TeamApiKeyConfig, state: &TeamApiKeyState) -> bool {
        config.comment != state.comment
    }

    fn requires_replace(&self, config: &TeamApiKeyConfig, state: &TeamApiKeyState) -> bool {
        config.team != state.team
    }
}
