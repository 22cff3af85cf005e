//! Read-only lookups whose results can be referenced from resources.

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{ConfigPropertyKey, PolicyId, ProjectId, TeamId, Username};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::provider_context::ProviderContext;

/// Data source type names.
pub const DATA_SOURCE_TYPES: &[&str] = &[
    "config_property",
    "managed_user",
    "policy",
    "project",
    "team",
    "team_api_keys",
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeamQuery {
    #[serde(default)]
    id: Option<TeamId>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectQuery {
    #[serde(default)]
    id: Option<ProjectId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManagedUserQuery {
    username: Username,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPropertyQuery {
    group_name: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyQuery {
    id: PolicyId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeamApiKeysQuery {
    team: TeamId,
}

/// Runs one data source lookup. Finding nothing is `AppError::NotFound`.
pub async fn read(ctx: &ProviderContext, data_type: &str, query: &Value) -> AppResult<Value> {
    debug!(data_source = data_type, "reading data source");
    match data_type {
        "team" => {
            let query: TeamQuery = decode(data_type, query)?;
            let team = match (query.id, query.name) {
                (Some(id), None) => ctx.teams.get(id).await?,
                (None, Some(name)) => ctx.teams.find_by_name(&name).await?,
                _ => return Err(exactly_one(data_type, "id", "name")),
            };
            let team = team.ok_or_else(|| nothing_found(data_type))?;
            Ok(json!({
                "id": team.id,
                "name": team.name,
                "permissions": team.permissions,
            }))
        }
        "project" => {
            let query: ProjectQuery = decode(data_type, query)?;
            let project = match (query.id, query.name) {
                (Some(id), None) if query.version.is_none() => ctx.projects.get(id).await?,
                (None, Some(name)) => ctx.projects.lookup(&name, query.version.as_deref()).await?,
                _ => return Err(exactly_one(data_type, "id", "name")),
            };
            let project = project.ok_or_else(|| nothing_found(data_type))?;
            with_id(project.id, &project.attributes)
        }
        "managed_user" => {
            let query: ManagedUserQuery = decode(data_type, query)?;
            let user = ctx
                .users
                .find(&query.username)
                .await?
                .ok_or_else(|| nothing_found(data_type))?;
            encode(&user)
        }
        "config_property" => {
            let query: ConfigPropertyQuery = decode(data_type, query)?;
            let key = ConfigPropertyKey::new(query.group_name, query.name)?;
            let property = ctx
                .config_properties
                .find(&key)
                .await?
                .ok_or_else(|| nothing_found(data_type))?;
            Ok(json!({
                "id": key.to_string(),
                "group_name": key.group_name,
                "name": key.name,
                "value": property.value,
                "property_type": property.property_type,
                "description": property.description,
            }))
        }
        "policy" => {
            let query: PolicyQuery = decode(data_type, query)?;
            let policy = ctx
                .policies
                .get(query.id)
                .await?
                .ok_or_else(|| nothing_found(data_type))?;
            encode(&policy)
        }
        "team_api_keys" => {
            let query: TeamApiKeysQuery = decode(data_type, query)?;
            let keys = ctx
                .teams
                .api_keys(query.team)
                .await?
                .ok_or_else(|| nothing_found(data_type))?;
            Ok(json!({ "team": query.team, "api_keys": keys }))
        }
        other => Err(AppError::Validation(format!(
            "unknown data source type '{other}', expected one of: {}",
            DATA_SOURCE_TYPES.join(", ")
        ))),
    }
}

fn decode<T: DeserializeOwned>(data_type: &str, query: &Value) -> AppResult<T> {
    T::deserialize(query).map_err(|error| {
        AppError::Validation(format!("invalid {data_type} data source query: {error}"))
    })
}

fn encode(value: &impl Serialize) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|error| {
        AppError::Internal(format!("failed to encode data source result: {error}"))
    })
}

fn with_id(id: impl Serialize, attributes: &impl Serialize) -> AppResult<Value> {
    let mut value = encode(attributes)?;
    if let Value::Object(fields) = &mut value {
        fields.insert("id".to_owned(), encode(&id)?);
    }
    Ok(value)
}

fn exactly_one(data_type: &str, first: &str, second: &str) -> AppError {
    AppError::Validation(format!(
        "{data_type} data source needs exactly one of '{first}' or '{second}'"
    ))
}

fn nothing_found(data_type: &str) -> AppError {
    AppError::NotFound(format!("{data_type} data source matched nothing"))
}
