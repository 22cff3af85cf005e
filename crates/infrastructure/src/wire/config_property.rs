use dtrack_core::AppResult;
use dtrack_domain::{ConfigProperty, ConfigPropertyKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPropertyDto {
    pub group_name: String,
    pub property_name: String,
    #[serde(default)]
    pub property_value: Option<String>,
    pub property_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ConfigPropertyDto {
    pub fn into_domain(self) -> AppResult<ConfigProperty> {
        Ok(ConfigProperty {
            key: ConfigPropertyKey::new(self.group_name, self.property_name)?,
            value: self.property_value,
            property_type: self.property_type,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPropertyUpdateDto<'a> {
    pub group_name: &'a str,
    pub property_name: &'a str,
    pub property_value: &'a str,
}

impl<'a> ConfigPropertyUpdateDto<'a> {
    pub fn new(key: &'a ConfigPropertyKey, value: &'a str) -> Self {
        Self {
            group_name: key.group_name.as_str(),
            property_name: key.name.as_str(),
            property_value: value,
        }
    }
}
