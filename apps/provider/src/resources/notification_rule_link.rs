//! Links limiting a notification rule to projects and notifying teams.

use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{NotificationRuleId, ProjectId, TeamId, composite_id, parse_composite_id};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct NotificationRuleProjectResource;

pub struct NotificationRuleTeamResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleProjectConfig {
    rule: NotificationRuleId,
    project: ProjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleProjectState {
    id: String,
    rule: NotificationRuleId,
    project: ProjectId,
}

impl RuleProjectState {
    fn new(rule: NotificationRuleId, project: ProjectId) -> Self {
        Self {
            id: composite_id(rule, project),
            rule,
            project,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleTeamConfig {
    rule: NotificationRuleId,
    team: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTeamState {
    id: String,
    rule: NotificationRuleId,
    team: TeamId,
}

impl RuleTeamState {
    fn new(rule: NotificationRuleId, team: TeamId) -> Self {
        Self {
            id: composite_id(rule, team),
            rule,
            team,
        }
    }
}

#[async_trait]
impl Resource for NotificationRuleProjectResource {
    type Config = RuleProjectConfig;
    type State = RuleProjectState;

    fn type_name(&self) -> &'static str {
        "notification_rule_project"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &RuleProjectConfig,
    ) -> AppResult<RuleProjectState> {
        ctx.notifications
            .add_rule_project(config.rule, config.project)
            .await?;
        Ok(RuleProjectState::new(config.rule, config.project))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &RuleProjectState,
    ) -> AppResult<Option<RuleProjectState>> {
        let linked = ctx
            .notifications
            .has_rule_project(state.rule, state.project)
            .await?;
        Ok(linked.then(|| state.clone()))
    }

    async fn update(
        &self,
        _ctx: &ProviderContext,
        _config: &RuleProjectConfig,
        state: &RuleProjectState,
    ) -> AppResult<RuleProjectState> {
        Ok(state.clone())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &RuleProjectState) -> AppResult<()> {
        ctx.notifications
            .remove_rule_project(state.rule, state.project)
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<RuleProjectState> {
        let (rule, project) = parse_composite_id(id, "rule_uuid", "project_uuid")?;
        let state = RuleProjectState::new(
            NotificationRuleId::parse(rule)?,
            ProjectId::parse(project)?,
        );
        if !ctx
            .notifications
            .has_rule_project(state.rule, state.project)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "notification rule '{}' is not limited to project '{}'",
                state.rule, state.project
            )));
        }
        Ok(state)
    }

    fn has_changes(&self, _config: &RuleProjectConfig, _state: &RuleProjectState) -> bool {
        false
    }

    fn requires_replace(&self, config: &RuleProjectConfig, state: &RuleProjectState) -> bool {
        config.rule != state.rule || config.project != state.project
    }
}

#[async_trait]
impl Resource for NotificationRuleTeamResource {
    type Config = RuleTeamConfig;
    type State = RuleTeamState;

    fn type_name(&self) -> &'static str {
        "notification_rule_team"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &RuleTeamConfig,
    ) -> AppResult<RuleTeamState> {
        ctx.notifications.add_rule_team(config.rule, config.team).await?;
        Ok(RuleTeamState::new(config.rule, config.team))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &RuleTeamState,
    ) -> AppResult<Option<RuleTeamState>> {
        let linked = ctx.notifications.has_rule_team(state.rule, state.team).await?;
        Ok(linked.then(|| state.clone()))
    }

    async fn update(
        &self,
        _ctx: &ProviderContext,
        _config: &RuleTeamConfig,
        state: &RuleTeamState,
    ) -> AppResult<RuleTeamState> {
        Ok(state.clone())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &RuleTeamState) -> AppResult<()> {
        ctx.notifications.remove_rule_team(state.rule, state.team).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<RuleTeamState> {
        let (rule, team) = parse_composite_id(id, "rule_uuid", "team_uuid")?;
        let state = RuleTeamState::new(NotificationRuleId::parse(rule)?, TeamId::parse(team)?);
        if !ctx.notifications.has_rule_team(state.rule, state.team).await? {
            return Err(AppError::NotFound(format!(
                "notification rule '{}' does not notify team '{}'",
                state.rule, state.team
            )));
        }
        Ok(state)
    }

    fn has_changes(&self, _config: &RuleTeamConfig, _state: &RuleTeamState) -> bool {
        false
    }

    fn requires_replace(&self, config: &RuleTeamConfig, state: &RuleTeamState) -> bool {
        config.rule != state.rule || config.team != state.team
    }
}
