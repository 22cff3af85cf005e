//! Resource adapters and the registry the engine drives them through.
//!
//! Every adapter is written against typed configuration and state. The
//! registry erases those types behind [`DynResource`] so the engine can
//! work on JSON documents and state files.

use async_trait::async_trait;
use dtrack_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider_context::ProviderContext;

mod acl_mapping;
mod config_property;
mod managed_user;
mod notification_publisher;
mod notification_rule;
mod notification_rule_link;
mod permissions;
mod policy;
mod project;
mod project_policy;
mod team;
mod team_api_key;
mod user_team_membership;


/// One manageable entity type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Declarative configuration.
    type Config: DeserializeOwned + Send + Sync;
    /// Persisted state.
    type State: Serialize + DeserializeOwned + Send + Sync;

    /// Type name used in documents and state files.
    fn type_name(&self) -> &'static str;

    /// Creates the entity and returns its state.
    async fn create(&self, ctx: &ProviderContext, config: &Self::Config)
    -> AppResult<Self::State>;

    /// Refreshes state from the server. `None` drops the entity from state.
    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &Self::State,
    ) -> AppResult<Option<Self::State>>;

    /// Updates the entity in place.
    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &Self::Config,
        state: &Self::State,
    ) -> AppResult<Self::State>;

    /// Deletes the entity.
    async fn delete(&self, ctx: &ProviderContext, state: &Self::State) -> AppResult<()>;

    /// Builds state for an existing entity from its import identifier.
    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<Self::State>;

    /// Returns whether the configuration differs from the recorded state.
    fn has_changes(&self, config: &Self::Config, state: &Self::State) -> bool;

    /// Returns whether a change can only be applied by recreating.
    fn requires_replace(&self, _config: &Self::Config, _state: &Self::State) -> bool {
        false
    }
}

/// Planned action for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Nothing to do.
    NoOp,
    /// Entity does not exist yet.
    Create,
    /// Entity is changed in place.
    Update,
    /// Entity is deleted and created again.
    Replace,
    /// Entity is no longer configured.
    Delete,
}

impl Action {
    /// Returns the one-character plan marker.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::NoOp => " ",
            Self::Create => "+",
            Self::Update => "~",
            Self::Replace => "±",
            Self::Delete => "-",
        }
    }
}

/// Type-erased resource working on JSON values.
#[async_trait]
pub trait DynResource: Send + Sync {
    /// Type name used in documents and state files.
    fn type_name(&self) -> &'static str;

    /// Creates the entity from a JSON configuration.
    async fn create(&self, ctx: &ProviderContext, config: &Value) -> AppResult<Value>;

    /// Refreshes JSON state.
    async fn read(&self, ctx: &ProviderContext, state: &Value) -> AppResult<Option<Value>>;

    /// Updates the entity from a JSON configuration.
    async fn update(&self, ctx: &ProviderContext, config: &Value, state: &Value)
    -> AppResult<Value>;

    /// Deletes the entity recorded in JSON state.
    async fn delete(&self, ctx: &ProviderContext, state: &Value) -> AppResult<()>;

    /// Imports an existing entity.
    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<Value>;

    /// Compares a configuration against recorded state.
    fn plan(&self, config: &Value, state: &Value) -> AppResult<Action>;

    /// Checks that a configuration decodes.
    fn validate(&self, config: &Value) -> AppResult<()>;
}

struct Erased<R>(R);

impl<R: Resource> Erased<R> {
    fn config(&self, value: &Value) -> AppResult<R::Config> {
        R::Config::deserialize(value).map_err(|error| {
            AppError::Validation(format!(
                "invalid {} configuration: {error}",
                self.0.type_name()
            ))
        })
    }

    fn state(&self, value: &Value) -> AppResult<R::State> {
        R::State::deserialize(value).map_err(|error| {
            AppError::Decode(format!("unreadable {} state: {error}", self.0.type_name()))
        })
    }

    fn encode(&self, state: &R::State) -> AppResult<Value> {
        serde_json::to_value(state).map_err(|error| {
            AppError::Internal(format!(
                "failed to encode {} state: {error}",
                self.0.type_name()
            ))
        })
    }
}

#[async_trait]
impl<R: Resource> DynResource for Erased<R> {
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    async fn create(&self, ctx: &ProviderContext, config: &Value) -> AppResult<Value> {
        let config = self.config(config)?;
        let state = self.0.create(ctx, &config).await?;
        self.encode(&state)
    }

    async fn read(&self, ctx: &ProviderContext, state: &Value) -> AppResult<Option<Value>> {
        let state = self.state(state)?;
        match self.0.read(ctx, &state).await? {
            Some(state) => self.encode(&state).map(Some),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &Value,
        state: &Value,
    ) -> AppResult<Value> {
        let config = self.config(config)?;
        let state = self.state(state)?;
        let state = self.0.update(ctx, &config, &state).await?;
        self.encode(&state)
    }

    async fn delete(&self, ctx: &ProviderContext, state: &Value) -> AppResult<()> {
        let state = self.state(state)?;
        self.0.delete(ctx, &state).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<Value> {
        let state = self.0.import(ctx, id).await?;
        self.encode(&state)
    }

    fn plan(&self, config: &Value, state: &Value) -> AppResult<Action> {
        let config = self.config(config)?;
        let state = self.state(state)?;
        Ok(if self.0.requires_replace(&config, &state) {
            Action::Replace
        } else if self.0.has_changes(&config, &state) {
            Action::Update
        } else {
            Action::NoOp
        })
    }

    fn validate(&self, config: &Value) -> AppResult<()> {
        self.config(config).map(|_| ())
    }
}

/// Resource type names known to the registry.
pub const RESOURCE_TYPES: &[&str] = &[
    "acl_mapping",
    "config_property",
    "managed_user",
    "managed_user_permissions",
    "notification_publisher",
    "notification_rule",
    "notification_rule_project",
    "notification_rule_team",
    "policy",
    "project",
    "project_policy",
    "team",
    "team_api_key",
    "team_permissions",
    "user_team_membership",
];

/// Looks up a resource adapter by type name.
pub fn resource(type_name: &str) -> AppResult<Box<dyn DynResource>> {
    Ok(match type_name {
        "acl_mapping" => Box::new(Erased(acl_mapping::AclMappingResource)),
        "config_property" => Box::new(Erased(config_property::ConfigPropertyResource)),
        "managed_user" => Box::new(Erased(managed_user::ManagedUserResource)),
        "managed_user_permissions" => {
            Box::new(Erased(permissions::ManagedUserPermissionsResource))
        }
        "notification_publisher" => {
            Box::new(Erased(notification_publisher::NotificationPublisherResource))
        }
        "notification_rule" => Box::new(Erased(notification_rule::NotificationRuleResource)),
        "notification_rule_project" => Box::new(Erased(
            notification_rule_link::NotificationRuleProjectResource,
        )),
        "notification_rule_team" => {
            Box::new(Erased(notification_rule_link::NotificationRuleTeamResource))
        }
        "policy" => Box::new(Erased(policy::PolicyResource)),
        "project" => Box::new(Erased(project::ProjectResource)),
        "project_policy" => Box::new(Erased(project_policy::ProjectPolicyResource)),
        "team" => Box::new(Erased(team::TeamResource)),
        "team_api_key" => Box::new(Erased(team_api_key::TeamApiKeyResource)),
        "team_permissions" => Box::new(Erased(permissions::TeamPermissionsResource)),
        "user_team_membership" => {
            Box::new(Erased(user_team_membership::UserTeamMembershipResource))
        }
        other => {
            return Err(AppError::Validation(format!(
                "unknown resource type '{other}', expected one of: {}",
                RESOURCE_TYPES.join(", ")
            )));
        }
    })
}
