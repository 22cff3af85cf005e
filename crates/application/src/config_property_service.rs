use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{ConfigProperty, ConfigPropertyKey};
use tracing::info;

use crate::ConfigPropertyApi;
use crate::lookup::require;

/// Config property operations.
///
/// The server owns the set of properties, so there is no create or delete.
#[derive(Clone)]
pub struct ConfigPropertyService {
    api: Arc<dyn ConfigPropertyApi>,
}

impl ConfigPropertyService {
    /// Creates a config property service.
    #[must_use]
    pub fn new(api: Arc<dyn ConfigPropertyApi>) -> Self {
        Self { api }
    }

    /// Finds a property by group and name.
    pub async fn find(&self, key: &ConfigPropertyKey) -> AppResult<Option<ConfigProperty>> {
        Ok(self
            .api
            .list_config_properties()
            .await?
            .into_iter()
            .find(|property| &property.key == key))
    }

    /// Takes ownership of an existing property and sets its value when one is
    /// given. A missing property is `AppError::NotFound`.
    pub async fn adopt(
        &self,
        key: &ConfigPropertyKey,
        value: Option<&str>,
    ) -> AppResult<ConfigProperty> {
        let existing = require(self.find(key).await?, || format!("config property '{key}'"))?;
        info!(property = %key, "adopted config property");

        match value {
            Some(value) if existing.value.as_deref() != Some(value) => self.set(key, value).await,
            _ => Ok(existing),
        }
    }

    /// Sets the value of a property.
    pub async fn set(&self, key: &ConfigPropertyKey, value: &str) -> AppResult<ConfigProperty> {
        let property = self.api.update_config_property(key, value).await?;
        info!(property = %key, "updated config property");
        Ok(property)
    }
}
