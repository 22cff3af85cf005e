use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{TeamId, Username, composite_id, parse_composite_id};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct UserTeamMembershipResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembershipConfig {
    username: Username,
    team: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipState {
    id: String,
    username: Username,
    team: TeamId,
}

impl MembershipState {
    fn new(username: Username, team: TeamId) -> Self {
        Self {
            id: composite_id(&username, team),
            username,
            team,
        }
    }
}

#[async_trait]
impl Resource for UserTeamMembershipResource {
    type Config = MembershipConfig;
    type State = MembershipState;

    fn type_name(&self) -> &'static str {
        "user_team_membership"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &MembershipConfig,
    ) -> AppResult<MembershipState> {
        ctx.users.add_membership(&config.username, config.team).await?;
        Ok(MembershipState::new(config.username.clone(), config.team))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &MembershipState,
    ) -> AppResult<Option<MembershipState>> {
        let member = ctx.users.has_membership(&state.username, state.team).await?;
        Ok(member.then(|| state.clone()))
    }

    async fn update(
        &self,
        _ctx: &ProviderContext,
        _config: &MembershipConfig,
        state: &MembershipState,
    ) -> AppResult<MembershipState> {
        Ok(state.clone())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &MembershipState) -> AppResult<()> {
        ctx.users.remove_membership(&state.username, state.team).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<MembershipState> {
        let (username, team) = parse_composite_id(id, "username", "team_uuid")?;
        let state = MembershipState::new(Username::new(username)?, TeamId::parse(team)?);
        if !ctx.users.has_membership(&state.username, state.team).await? {
            return Err(AppError::NotFound(format!(
                "user '{}' is not a member of team '{}'",
                state.username, state.team
            )));
        }
        Ok(state)
    }

    fn has_changes(&self, _config: &MembershipConfig, _state: &MembershipState) -> bool {
        false
    }

    fn requires_replace(&self, config: &MembershipConfig, state: &MembershipState) -> bool {
        config.username != state.username || config.team != state.team
    }
}
