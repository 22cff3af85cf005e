use serde::{Deserialize, Serialize};

use crate::{PermissionSet, TeamId};

/// Team as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Server-assigned identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Permissions held by the team.
    pub permissions: PermissionSet,
    /// API keys issued to the team.
    pub api_keys: Vec<ApiKey>,
}

/// Team API key metadata.
///
/// The clear key is only ever returned by the generate call and is carried in
/// [`GeneratedApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Stable public identifier used to address the key.
    pub public_id: String,
    /// Masked rendering of the key.
    pub masked_key: String,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Whether the key predates public identifiers.
    pub legacy: bool,
}

/// Newly generated team API key including the clear key.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedApiKey {
    /// Key metadata.
    pub metadata: ApiKey,
    /// Clear key value.
    pub key: String,
}

impl std::fmt::Debug for GeneratedApiKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GeneratedApiKey")
            .field("metadata", &self.metadata)
            .field("key", &"<redacted>")
            .finish()
    }
}
