use async_trait::async_trait;
use dtrack_application::ConfigPropertyApi;
use dtrack_core::AppResult;
use dtrack_domain::{ConfigProperty, ConfigPropertyKey};
use reqwest::Method;

use super::DependencyTrackClient;
use crate::wire::{ConfigPropertyDto, ConfigPropertyUpdateDto};

#[async_trait]
impl ConfigPropertyApi for DependencyTrackClient {
    async fn list_config_properties(&self) -> AppResult<Vec<ConfigProperty>> {
        let builder = self.request(Method::GET, &["configProperty"])?;
        self.fetch::<Vec<ConfigPropertyDto>>(builder, "list config properties")
            .await?
            .into_iter()
            .map(ConfigPropertyDto::into_domain)
            .collect()
    }

    async fn update_config_property(
        &self,
        key: &ConfigPropertyKey,
        value: &str,
    ) -> AppResult<ConfigProperty> {
        let what = format!("update config property '{key}'");
        let builder = self
            .request(Method::POST, &["configProperty"])?
            .json(&ConfigPropertyUpdateDto::new(key, value));
        self.fetch::<ConfigPropertyDto>(builder, &what)
            .await?
            .into_domain()
    }
}
