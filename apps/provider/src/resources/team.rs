use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{Team, TeamId};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct TeamResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamConfig {
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamState {
    id: TeamId,
    name: String,
}

impl From<Team> for TeamState {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
        }
    }
}

#[async_trait]
impl Resource for TeamResource {
    type Config = TeamConfig;
    type State = TeamState;

    fn type_name(&self) -> &'static str {
        "team"
    }

    async fn create(&self, ctx: &ProviderContext, config: &TeamConfig) -> AppResult<TeamState> {
        Ok(ctx.teams.create(&config.name).await?.into())
    }

    async fn read(&self, ctx: &ProviderContext, state: &TeamState) -> AppResult<Option<TeamState>> {
        Ok(ctx.teams.get(state.id).await?.map(TeamState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &TeamConfig,
        state: &TeamState,
    ) -> AppResult<TeamState> {
        Ok(ctx.teams.rename(state.id, &config.name).await?.into())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &TeamState) -> AppResult<()> {
        ctx.teams.delete(state.id).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<TeamState> {
        let team_id = TeamId::parse(id)?;
        let team = require(ctx.teams.get(team_id).await?, || format!("team '{team_id}'"))?;
        Ok(team.into())
    }

    fn has_changes(&self, config: &TeamConfig, state: &TeamState) -> bool {
        config.name != state.name
    }
}
