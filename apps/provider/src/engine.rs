//! Plan, apply, destroy, refresh and import over a document and a state file.
//!
//! Resources are handled one at a time. Orphaned entries are deleted first,
//! in reverse state order, then document blocks are converged in document
//! order. State is updated after every successful step so a failed run
//! keeps what it already changed.

use std::fmt::{Display, Formatter};

use dtrack_core::{AppError, AppResult};
use tracing::{debug, info, warn};

use crate::data_sources;
use crate::document::{Document, Resolved, ResourceBlock, Scope};
use crate::provider_context::ProviderContext;
use crate::resources::{Action, resource};
use crate::state_file::{StateEntry, StateFile};

#[cfg(test)]
mod tests;

/// One planned or applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub address: String,
    pub action: Action,
}

impl Display for Change {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {}", self.action.symbol(), self.address)
    }
}

/// Re-reads every recorded resource and drops the ones the server no
/// longer has.
pub async fn refresh(ctx: &ProviderContext, state: &mut StateFile) -> AppResult<()> {
    for entry in state.resources.clone() {
        let adapter = resource(&entry.resource_type)?;
        match adapter.read(ctx, &entry.state).await? {
            Some(refreshed) => state.upsert(StateEntry {
                state: refreshed,
                ..entry
            }),
            None => {
                warn!(
                    resource = %entry.address,
                    resource_type = adapter.type_name(),
                    "resource no longer exists, dropping from state"
                );
                state.remove(&entry.address);
            }
        }
    }

    Ok(())
}

/// Computes the actions an apply would take. `state` is not modified.
pub async fn plan(
    ctx: &ProviderContext,
    document: &Document,
    state: &StateFile,
) -> AppResult<Vec<Change>> {
    let mut state = state.clone();
    refresh(ctx, &mut state).await?;
    let scope = scope(ctx, document, &state).await?;

    let mut changes = orphans(document, &state);
    for block in &document.resources {
        let address = block.address();
        let adapter = resource(&block.resource_type)?;
        let action = match (state.get(&address), scope.resolve(&block.config)?) {
            (None, Resolved::Known(config)) => {
                adapter.validate(&config)?;
                Action::Create
            }
            (None, Resolved::Pending(_)) => Action::Create,
            (Some(entry), Resolved::Known(config)) => adapter.plan(&config, &entry.state)?,
            (Some(_), Resolved::Pending(references)) => {
                debug!(
                    resource = %address,
                    references = ?references,
                    "configuration depends on pending resources"
                );
                Action::Update
            }
        };
        changes.push(Change { address, action });
    }

    Ok(changes)
}

/// Converges the server to the document and records the result in `state`.
pub async fn apply(
    ctx: &ProviderContext,
    document: &Document,
    state: &mut StateFile,
) -> AppResult<Vec<Change>> {
    refresh(ctx, state).await?;
    let mut scope = scope(ctx, document, state).await?;
    let mut applied = Vec::new();

    for change in orphans(document, state) {
        if let Some(entry) = state.get(&change.address).cloned() {
            delete_entry(ctx, &entry).await?;
            state.remove(&entry.address);
            scope.remove(&entry.address);
            applied.push(change);
        }
    }

    for block in &document.resources {
        let address = block.address();
        let config = match scope.resolve(&block.config)? {
            Resolved::Known(config) => config,
            Resolved::Pending(references) => {
                return Err(AppError::Validation(format!(
                    "'{address}' references {} before it exists, move them earlier",
                    references.join(", ")
                )));
            }
        };

        let action = converge(ctx, block, &config, state).await?;
        if let Some(entry) = state.get(&address) {
            scope.insert(address.clone(), entry.state.clone());
        }
        if action != Action::NoOp {
            applied.push(Change { address, action });
        }
    }

    Ok(applied)
}

/// Deletes every recorded resource in reverse creation order.
pub async fn destroy(ctx: &ProviderContext, state: &mut StateFile) -> AppResult<Vec<Change>> {
    refresh(ctx, state).await?;
    let mut destroyed = Vec::new();

    for entry in state.resources.clone().into_iter().rev() {
        delete_entry(ctx, &entry).await?;
        state.remove(&entry.address);
        destroyed.push(Change {
            address: entry.address,
            action: Action::Delete,
        });
    }

    Ok(destroyed)
}

/// Adopts an existing entity into state under `address`.
pub async fn import(
    ctx: &ProviderContext,
    state: &mut StateFile,
    resource_type: &str,
    address: &str,
    id: &str,
) -> AppResult<()> {
    let adapter = resource(resource_type)?;
    let expected_prefix = format!("{resource_type}.");
    if !address.starts_with(&expected_prefix) || address.len() == expected_prefix.len() {
        return Err(AppError::Validation(format!(
            "import address '{address}' must look like '{resource_type}.<name>'"
        )));
    }
    if state.get(address).is_some() {
        return Err(AppError::Conflict(format!(
            "'{address}' is already managed, remove it from state first"
        )));
    }

    let imported = adapter.import(ctx, id).await?;
    state.upsert(StateEntry {
        address: address.to_owned(),
        resource_type: resource_type.to_owned(),
        state: imported,
    });
    info!(resource = %address, action = "import", "imported resource");
    Ok(())
}

async fn scope(ctx: &ProviderContext, document: &Document, state: &StateFile) -> AppResult<Scope> {
    let mut scope = Scope::new(document.addresses());
    for entry in &state.resources {
        scope.insert(entry.address.clone(), entry.state.clone());
    }

    for block in &document.data {
        let address = block.address();
        let query = match scope.resolve(&block.query)? {
            Resolved::Known(query) => query,
            Resolved::Pending(references) => {
                return Err(AppError::Validation(format!(
                    "'{address}' references {} which do not exist yet",
                    references.join(", ")
                )));
            }
        };
        let result = data_sources::read(ctx, &block.data_type, &query).await?;
        scope.insert(address, result);
    }

    Ok(scope)
}

fn orphans(document: &Document, state: &StateFile) -> Vec<Change> {
    let declared = document.addresses();
    state
        .resources
        .iter()
        .rev()
        .filter(|entry| !declared.contains(&entry.address))
        .map(|entry| Change {
            address: entry.address.clone(),
            action: Action::Delete,
        })
        .collect()
}

async fn converge(
    ctx: &ProviderContext,
    block: &ResourceBlock,
    config: &serde_json::Value,
    state: &mut StateFile,
) -> AppResult<Action> {
    let address = block.address();
    let adapter = resource(&block.resource_type)?;

    let Some(entry) = state.get(&address).cloned() else {
        let created = adapter.create(ctx, config).await?;
        record(state, block, created);
        info!(resource = %address, action = "create", "applied change");
        return Ok(Action::Create);
    };

    let action = adapter.plan(config, &entry.state)?;
    match action {
        Action::NoOp => {}
        Action::Update => {
            let updated = adapter.update(ctx, config, &entry.state).await?;
            record(state, block, updated);
        }
        Action::Replace | Action::Delete | Action::Create => {
            adapter.delete(ctx, &entry.state).await?;
            state.remove(&address);
            let created = adapter.create(ctx, config).await?;
            record(state, block, created);
        }
    }

    if action != Action::NoOp {
        info!(resource = %address, action = ?action, "applied change");
    }
    Ok(action)
}

async fn delete_entry(ctx: &ProviderContext, entry: &StateEntry) -> AppResult<()> {
    resource(&entry.resource_type)?
        .delete(ctx, &entry.state)
        .await?;
    info!(resource = %entry.address, action = "delete", "applied change");
    Ok(())
}

fn record(state: &mut StateFile, block: &ResourceBlock, value: serde_json::Value) {
    state.upsert(StateEntry {
        address: block.address(),
        resource_type: block.resource_type.clone(),
        state: value,
    });
}
