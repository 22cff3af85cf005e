use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{ConfigProperty, ConfigPropertyKey};

/// Config property endpoints. Properties cannot be created or deleted.
#[async_trait]
pub trait ConfigPropertyApi: Send + Sync {
    /// Lists every config property.
    async fn list_config_properties(&self) -> AppResult<Vec<ConfigProperty>>;

    /// Sets the value of an existing property.
    async fn update_config_property(
        &self,
        key: &ConfigPropertyKey,
        value: &str,
    ) -> AppResult<ConfigProperty>;
}
