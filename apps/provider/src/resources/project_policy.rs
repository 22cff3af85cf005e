use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{PolicyId, ProjectId, composite_id, parse_composite_id};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct ProjectPolicyResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPolicyConfig {
    policy: PolicyId,
    project: ProjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPolicyState {
    id: String,
    policy: PolicyId,
    project: ProjectId,
}

impl ProjectPolicyState {
    fn new(policy: PolicyId, project: ProjectId) -> Self {
        Self {
            id: composite_id(policy, project),
            policy,
            project,
        }
    }
}

#[async_trait]
impl Resource for ProjectPolicyResource {
    type Config = ProjectPolicyConfig;
    type State = ProjectPolicyState;

    fn type_name(&self) -> &'static str {
        "project_policy"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &ProjectPolicyConfig,
    ) -> AppResult<ProjectPolicyState> {
        ctx.policies.add_project(config.policy, config.project).await?;
        Ok(ProjectPolicyState::new(config.policy, config.project))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &ProjectPolicyState,
    ) -> AppResult<Option<ProjectPolicyState>> {
        let linked = ctx.policies.has_project(state.policy, state.project).await?;
        Ok(linked.then(|| state.clone()))
    }

    async fn update(
        &self,
        _ctx: &ProviderContext,
        _config: &ProjectPolicyConfig,
        state: &ProjectPolicyState,
    ) -> AppResult<ProjectPolicyState> {
        Ok(state.clone())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &ProjectPolicyState) -> AppResult<()> {
        ctx.policies.remove_project(state.policy, state.project).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<ProjectPolicyState> {
        let (policy, project) = parse_composite_id(id, "policy_uuid", "project_uuid")?;
        let state = ProjectPolicyState::new(PolicyId::parse(policy)?, ProjectId::parse(project)?);
        if !ctx.policies.has_project(state.policy, state.project).await? {
            return Err(AppError::NotFound(format!(
                "policy '{}' is not applied to project '{}'",
                state.policy, state.project
            )));
        }
        Ok(state)
    }

    fn has_changes(&self, _config: &ProjectPolicyConfig, _state: &ProjectPolicyState) -> bool {
        false
    }

    fn requires_replace(&self, config: &ProjectPolicyConfig, state: &ProjectPolicyState) -> bool {
        config.policy != state.policy || config.project != state.project
    }
}
