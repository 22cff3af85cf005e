use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{ManagedUser, ManagedUserInput, Username};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct ManagedUserResource;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedUserConfig {
    username: Username,
    fullname: Option<String>,
    email: Option<String>,
    password: String,
    #[serde(default)]
    suspended: bool,
    #[serde(default)]
    force_password_change: bool,
    #[serde(default)]
    non_expiry_password: bool,
}

impl ManagedUserConfig {
    fn input(&self) -> ManagedUserInput {
        ManagedUserInput {
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            suspended: self.suspended,
            force_password_change: self.force_password_change,
            non_expiry_password: self.non_expiry_password,
        }
    }
}

/// The password is never reported by the server and is carried over from
/// configuration. Imported users start with an empty password.
#[derive(Clone, Serialize, Deserialize)]
pub struct ManagedUserState {
    id: String,
    username: Username,
    fullname: Option<String>,
    email: Option<String>,
    password: String,
    suspended: bool,
    force_password_change: bool,
    non_expiry_password: bool,
}

impl ManagedUserState {
    fn new(user: ManagedUser, password: String) -> Self {
        Self {
            id: user.username.to_string(),
            username: user.username,
            fullname: user.fullname,
            email: user.email,
            password,
            suspended: user.suspended,
            force_password_change: user.force_password_change,
            non_expiry_password: user.non_expiry_password,
        }
    }
}

#[async_trait]
impl Resource for ManagedUserResource {
    type Config = ManagedUserConfig;
    type State = ManagedUserState;

    fn type_name(&self) -> &'static str {
        "managed_user"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &ManagedUserConfig,
    ) -> AppResult<ManagedUserState> {
        let user = ctx.users.create(&config.input()).await?;
        Ok(ManagedUserState::new(user, config.password.clone()))
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &ManagedUserState,
    ) -> AppResult<Option<ManagedUserState>> {
        Ok(ctx
            .users
            .find(&state.username)
            .await?
            .map(|user| ManagedUserState::new(user, state.password.clone())))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &ManagedUserConfig,
        _state: &ManagedUserState,
    ) -> AppResult<ManagedUserState> {
        let user = ctx.users.update(&config.input()).await?;
        Ok(ManagedUserState::new(user, config.password.clone()))
    }

    async fn delete(&self, ctx: &ProviderContext, state: &ManagedUserState) -> AppResult<()> {
        ctx.users.delete(&state.username).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<ManagedUserState> {
        let username = Username::new(id)?;
        let user = require(ctx.users.find(&username).await?, || {
            format!("managed user '{username}'")
        })?;
        Ok(ManagedUserState::new(user, String::new()))
    }

    fn has_changes(&self, config: &ManagedUserConfig, state: &ManagedUserState) -> bool {
        config.fullname != state.fullname
            || config.email != state.email
            || config.password != state.password
            || config.suspended != state.suspended
            || config.force_password_change != state.force_password_change
            || config.non_expiry_password != state.non_expiry_password
    }

    fn requires_replace(&self, config: &ManagedUserConfig, state: &ManagedUserState) -> bool {
        config.username != state.username
    }
}
