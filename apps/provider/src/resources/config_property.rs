use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{ConfigProperty, ConfigPropertyKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Resource;
use crate::provider_context::ProviderContext;

/// Server-owned property. Creating adopts it and deleting forgets it.
pub struct ConfigPropertyResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPropertyConfig {
    group_name: String,
    name: String,
    #[serde(default)]
    value: Option<String>,
}

impl ConfigPropertyConfig {
    fn key(&self) -> AppResult<ConfigPropertyKey> {
        ConfigPropertyKey::new(&self.group_name, &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPropertyState {
    id: String,
    group_name: String,
    name: String,
    value: Option<String>,
    property_type: String,
    description: Option<String>,
}

impl ConfigPropertyState {
    fn key(&self) -> AppResult<ConfigPropertyKey> {
        ConfigPropertyKey::new(&self.group_name, &self.name)
    }
}

impl From<ConfigProperty> for ConfigPropertyState {
    fn from(property: ConfigProperty) -> Self {
        Self {
            id: property.key.to_string(),
            group_name: property.key.group_name,
            name: property.key.name,
            value: property.value,
            property_type: property.property_type,
            description: property.description,
        }
    }
}

#[async_trait]
impl Resource for ConfigPropertyResource {
    type Config = ConfigPropertyConfig;
    type State = ConfigPropertyState;

    fn type_name(&self) -> &'static str {
        "config_property"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &ConfigPropertyConfig,
    ) -> AppResult<ConfigPropertyState> {
        let key = config.key()?;
        let property = ctx
            .config_properties
            .adopt(&key, config.value.as_deref())
            .await?;
        Ok(property.into())
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &ConfigPropertyState,
    ) -> AppResult<Option<ConfigPropertyState>> {
        let key = state.key()?;
        Ok(ctx
            .config_properties
            .find(&key)
            .await?
            .map(ConfigPropertyState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &ConfigPropertyConfig,
        state: &ConfigPropertyState,
    ) -> AppResult<ConfigPropertyState> {
        match &config.value {
            Some(value) => Ok(ctx
                .config_properties
                .set(&config.key()?, value)
                .await?
                .into()),
            None => Ok(state.clone()),
        }
    }

    async fn delete(&self, _ctx: &ProviderContext, state: &ConfigPropertyState) -> AppResult<()> {
        debug!(property = %state.id, "forgetting config property, server value kept");
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<ConfigPropertyState> {
        let key = ConfigPropertyKey::parse(id)?;
        let property = require(ctx.config_properties.find(&key).await?, || {
            format!("config property '{key}'")
        })?;
        Ok(property.into())
    }

    fn has_changes(&self, config: &ConfigPropertyConfig, state: &ConfigPropertyState) -> bool {
        config
            .value
            .as_ref()
            .is_some_and(|value| state.value.as_ref() != Some(value))
    }

    fn requires_replace(&self, config: &ConfigPropertyConfig, state: &ConfigPropertyState) -> bool {
        config.group_name != state.group_name || config.name != state.name
    }
}
