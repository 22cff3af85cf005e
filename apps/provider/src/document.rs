//! Declarative resource document and `${...}` references between blocks.
//!
//! A configuration value that is exactly `${type.name.attribute}` is replaced
//! by that attribute of the resource's recorded state, and
//! `${data.type.name.attribute}` by the attribute of a data source result.
//! References to resources that are not created yet stay pending until
//! apply reaches them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use dtrack_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

use crate::data_sources;
use crate::resources;

/// Parsed declarative document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub data: Vec<DataBlock>,
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

/// Data source lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataBlock {
    #[serde(rename = "type")]
    pub data_type: String,
    pub name: String,
    #[serde(default)]
    pub query: Value,
}

impl DataBlock {
    #[must_use]
    pub fn address(&self) -> String {
        format!("data.{}.{}", self.data_type, self.name)
    }
}

/// Managed resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub config: Value,
}

impl ResourceBlock {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

impl Document {
    /// Reads and validates a document.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Validation(format!("failed to read document {}: {error}", path.display()))
        })?;

        Self::parse(&raw)
    }

    /// Parses and validates a document.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let document: Self = serde_json::from_str(raw)
            .map_err(|error| AppError::Validation(format!("invalid document: {error}")))?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> AppResult<()> {
        let mut seen = BTreeSet::new();
        for block in &self.data {
            check_name(&block.name)?;
            if !data_sources::DATA_SOURCE_TYPES.contains(&block.data_type.as_str()) {
                return Err(AppError::Validation(format!(
                    "unknown data source type '{}', expected one of: {}",
                    block.data_type,
                    data_sources::DATA_SOURCE_TYPES.join(", ")
                )));
            }
            if !seen.insert(block.address()) {
                return Err(duplicate(&block.address()));
            }
        }

        for block in &self.resources {
            check_name(&block.name)?;
            resources::resource(&block.resource_type)?;
            if !seen.insert(block.address()) {
                return Err(duplicate(&block.address()));
            }
        }

        Ok(())
    }

    /// Addresses of every resource block.
    #[must_use]
    pub fn addresses(&self) -> BTreeSet<String> {
        self.resources.iter().map(ResourceBlock::address).collect()
    }
}

fn check_name(name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "block name '{name}' may only contain letters, digits, '_' and '-'"
        )))
    }
}

fn duplicate(address: &str) -> AppError {
    AppError::Validation(format!("'{address}' is declared more than once"))
}

/// Outcome of resolving references in a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Every reference had a value.
    Known(Value),
    /// Some referenced resources do not exist yet.
    Pending(Vec<String>),
}

/// Known values of resources and data sources, plus addresses that will
/// exist once applied.
#[derive(Debug, Default)]
pub struct Scope {
    values: BTreeMap<String, Value>,
    declared: BTreeSet<String>,
}

impl Scope {
    #[must_use]
    pub fn new(declared: BTreeSet<String>) -> Self {
        Self {
            values: BTreeMap::new(),
            declared,
        }
    }

    pub fn insert(&mut self, address: impl Into<String>, value: Value) {
        self.values.insert(address.into(), value);
    }

    pub fn remove(&mut self, address: &str) {
        self.values.remove(address);
    }

    /// Substitutes every reference in `value`.
    pub fn resolve(&self, value: &Value) -> AppResult<Resolved> {
        let mut pending = Vec::new();
        let resolved = self.substitute(value, &mut pending)?;
        Ok(if pending.is_empty() {
            Resolved::Known(resolved)
        } else {
            Resolved::Pending(pending)
        })
    }

    fn substitute(&self, value: &Value, pending: &mut Vec<String>) -> AppResult<Value> {
        match value {
            Value::String(text) => match reference(text) {
                Some(reference) => self.lookup(reference, pending),
                None => Ok(value.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.substitute(item, pending))
                .collect::<AppResult<Vec<_>>>()
                .map(Value::Array),
            Value::Object(fields) => fields
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.substitute(item, pending)?)))
                .collect::<AppResult<serde_json::Map<_, _>>>()
                .map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    fn lookup(&self, reference: &str, pending: &mut Vec<String>) -> AppResult<Value> {
        let Some((address, attribute)) = reference.rsplit_once('.') else {
            return Err(invalid_reference(reference));
        };

        match self.values.get(address) {
            Some(state) => state.get(attribute).cloned().ok_or_else(|| {
                AppError::Validation(format!(
                    "reference '${{{reference}}}': '{address}' has no attribute '{attribute}'"
                ))
            }),
            None if self.declared.contains(address) => {
                pending.push(reference.to_owned());
                Ok(Value::Null)
            }
            None => Err(invalid_reference(reference)),
        }
    }
}

fn reference(text: &str) -> Option<&str> {
    text.strip_prefix("${")?.strip_suffix('}')
}

fn invalid_reference(reference: &str) -> AppError {
    AppError::Validation(format!(
        "reference '${{{reference}}}' does not name a declared resource or data source attribute"
    ))
}
