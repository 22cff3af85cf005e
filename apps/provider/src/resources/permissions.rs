//! Authoritative permission sets of teams and managed users.

use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{PermissionHolder, PermissionSet, TeamId, Username};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct TeamPermissionsResource;

pub struct ManagedUserPermissionsResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamPermissionsConfig {
    team: TeamId,
    #[serde(default)]
    permissions: PermissionSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPermissionsState {
    id: String,
    team: TeamId,
    permissions: PermissionSet,
}

impl TeamPermissionsState {
    fn new(team: TeamId, permissions: PermissionSet) -> Self {
        Self {
            id: team.to_string(),
            team,
            permissions,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedUserPermissionsConfig {
    username: Username,
    #[serde(default)]
    permissions: PermissionSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedUserPermissionsState {
    id: String,
    username: Username,
    permissions: PermissionSet,
}

impl ManagedUserPermissionsState {
    fn new(username: Username, permissions: PermissionSet) -> Self {
        Self {
            id: username.to_string(),
            username,
            permissions,
        }
    }
}

async fn import_holder(
    ctx: &ProviderContext,
    holder: &PermissionHolder,
) -> AppResult<PermissionSet> {
    require(ctx.permissions.fetch(holder).await?, || holder.to_string())
}

#[async_trait]
impl Resource for TeamPermissionsResource {
    type Config = TeamPermissionsConfig;
    type State = TeamPermissionsState;

    fn type_name(&self) -> &'static str {
        "team_permissions"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &TeamPermissionsConfig,
    ) -> AppResult<TeamPermissionsState> {
        let holder = PermissionHolder::Team(config.team);
        let reported = ctx
            .permissions
            .reconcile(&holder, &PermissionSet::new(), &config.permissions)
            .await?;
        Ok(TeamPermissionsState::new(config.team, reported))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &TeamPermissionsState,
    ) -> AppResult<Option<TeamPermissionsState>> {
        let holder = PermissionHolder::Team(state.team);
        Ok(ctx
            .permissions
            .fetch(&holder)
            .await?
            .map(|permissions| TeamPermissionsState::new(state.team, permissions)))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &TeamPermissionsConfig,
        state: &TeamPermissionsState,
    ) -> AppResult<TeamPermissionsState> {
        let holder = PermissionHolder::Team(state.team);
        let reported = ctx
            .permissions
            .reconcile(&holder, &state.permissions, &config.permissions)
            .await?;
        Ok(TeamPermissionsState::new(state.team, reported))
    }

    async fn delete(&self, ctx: &ProviderContext, state: &TeamPermissionsState) -> AppResult<()> {
        let holder = PermissionHolder::Team(state.team);
        ctx.permissions
            .reconcile(&holder, &state.permissions, &PermissionSet::new())
            .await
            .map(|remaining| {
                tracing::debug!(
                    holder = %holder,
                    remaining = remaining.len(),
                    "revoked recorded permissions"
                );
            })
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<TeamPermissionsState> {
        let team = TeamId::parse(id)?;
        let permissions = import_holder(ctx, &PermissionHolder::Team(team)).await?;
        Ok(TeamPermissionsState::new(team, permissions))
    }

    fn has_changes(&self, config: &TeamPermissionsConfig, state: &TeamPermissionsState) -> bool {
        config.permissions != state.permissions
    }

    fn requires_replace(
        &self,
        config: &TeamPermissionsConfig,
        state: &TeamPermissionsState,
    ) -> bool {
        config.team != state.team
    }
}

#[async_trait]
impl Resource for ManagedUserPermissionsResource {
    type Config = ManagedUserPermissionsConfig;
    type State = ManagedUserPermissionsState;

    fn type_name(&self) -> &'static str {
        "managed_user_permissions"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &ManagedUserPermissionsConfig,
    ) -> AppResult<ManagedUserPermissionsState> {
        let holder = PermissionHolder::ManagedUser(config.username.clone());
        let reported = ctx
            .permissions
            .reconcile(&holder, &PermissionSet::new(), &config.permissions)
            .await?;
        Ok(ManagedUserPermissionsState::new(
            config.username.clone(),
            reported,
        ))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &ManagedUserPermissionsState,
    ) -> AppResult<Option<ManagedUserPermissionsState>> {
        let holder = PermissionHolder::ManagedUser(state.username.clone());
        Ok(ctx.permissions.fetch(&holder).await?.map(|permissions| {
            ManagedUserPermissionsState::new(state.username.clone(), permissions)
        }))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &ManagedUserPermissionsConfig,
        state: &ManagedUserPermissionsState,
    ) -> AppResult<ManagedUserPermissionsState> {
        let holder = PermissionHolder::ManagedUser(state.username.clone());
        let reported = ctx
            .permissions
            .reconcile(&holder, &state.permissions, &config.permissions)
            .await?;
        Ok(ManagedUserPermissionsState::new(
            state.username.clone(),
            reported,
        ))
    }

    async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &ManagedUserPermissionsState,
    ) -> AppResult<()> {
        let holder = PermissionHolder::ManagedUser(state.username.clone());
        ctx.permissions
            .reconcile(&holder, &state.permissions, &PermissionSet::new())
            .await
            .map(|remaining| {
                tracing::debug!(
                    holder = %holder,
                    remaining = remaining.len(),
                    "revoked recorded permissions"
                );
            })
    }

    async fn import(
        &self,
        ctx: &ProviderContext,
        id: &str,
    ) -> AppResult<ManagedUserPermissionsState> {
        let username = Username::new(id)?;
        let holder = PermissionHolder::ManagedUser(username.clone());
        let permissions = import_holder(ctx, &holder).await?;
        Ok(ManagedUserPermissionsState::new(username, permissions))
    }

    fn has_changes(
        &self,
        config: &ManagedUserPermissionsConfig,
        state: &ManagedUserPermissionsState,
    ) -> bool {
        config.permissions != state.permissions
    }

    fn requires_replace(
        &self,
        config: &ManagedUserPermissionsConfig,
        state: &ManagedUserPermissionsState,
    ) -> bool {
        config.username != state.username
    }
}
