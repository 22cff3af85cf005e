use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{ProjectId, TeamId, composite_id, parse_composite_id};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct AclMappingResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclMappingConfig {
    team: TeamId,
    project: ProjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclMappingState {
    id: String,
    team: TeamId,
    project: ProjectId,
}

impl AclMappingState {
    fn new(team: TeamId, project: ProjectId) -> Self {
        Self {
            id: composite_id(team, project),
            team,
            project,
        }
    }
}

#[async_trait]
impl Resource for AclMappingResource {
    type Config = AclMappingConfig;
    type State = AclMappingState;

    fn type_name(&self) -> &'static str {
        "acl_mapping"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &AclMappingConfig,
    ) -> AppResult<AclMappingState> {
        ctx.acl.add(config.team, config.project).await?;
        Ok(AclMappingState::new(config.team, config.project))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &AclMappingState,
    ) -> AppResult<Option<AclMappingState>> {
        let mapped = ctx.acl.exists(state.team, state.project).await?;
        Ok(mapped.then(|| state.clone()))
    }

    async fn update(
        &self,
        _ctx: &ProviderContext,
        _config: &AclMappingConfig,
        state: &AclMappingState,
    ) -> AppResult<AclMappingState> {
        Ok(state.clone())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &AclMappingState) -> AppResult<()> {
        ctx.acl.remove(state.team, state.project).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<AclMappingState> {
        let (team, project) = parse_composite_id(id, "team_uuid", "project_uuid")?;
        let state = AclMappingState::new(TeamId::parse(team)?, ProjectId::parse(project)?);
        if !ctx.acl.exists(state.team, state.project).await? {
            return Err(AppError::NotFound(format!(
                "team '{}' has no access to project '{}'",
                state.team, state.project
            )));
        }
        Ok(state)
    }

    fn has_changes(&self, _config: &AclMappingConfig, _state: &AclMappingState) -> bool {
        false
    }

    fn requires_replace(&self, config: &AclMappingConfig, state: &AclMappingState) -> bool {
        config.team != state.team || config.project != state.project
    }
}
