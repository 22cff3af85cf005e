use dtrack_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Group and name addressing a config property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigPropertyKey {
    /// Property group.
    pub group_name: String,
    /// Property name within the group.
    pub name: String,
}

impl ConfigPropertyKey {
    /// Creates a key, rejecting empty parts.
    pub fn new(group_name: impl Into<String>, name: impl Into<String>) -> AppResult<Self> {
        let group_name = group_name.into();
        let name = name.into();
        if group_name.is_empty() || name.is_empty() {
            return Err(AppError::Validation(format!(
                "config property group and name must not be empty, got '{group_name}/{name}'"
            )));
        }

        Ok(Self { group_name, name })
    }

    /// Parses `group/name`, splitting on the first separator only.
    pub fn parse(id: &str) -> AppResult<Self> {
        let Some((group_name, name)) = id.split_once('/') else {
            return Err(AppError::Validation(format!(
                "expected format 'group_name/name', got: {id}"
            )));
        };

        Self::new(group_name, name)
    }
}

impl std::fmt::Display for ConfigPropertyKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}/{}", self.group_name, self.name)
    }
}

/// Config property as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    /// Group and name.
    pub key: ConfigPropertyKey,
    /// Current value, absent when unset.
    pub value: Option<String>,
    /// Server-declared value type.
    pub property_type: String,
    /// Server-provided description.
    pub description: Option<String>,
}
