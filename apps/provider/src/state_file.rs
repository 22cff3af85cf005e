use std::path::{Path, PathBuf};

use dtrack_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const STATE_VERSION: u32 = 1;

/// Recorded state of one managed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub state: Value,
}

/// Persisted state of every managed resource, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    version: u32,
    pub resources: Vec<StateEntry>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resources: Vec::new(),
        }
    }
}

impl StateFile {
    /// Loads the state file. A missing file is empty state.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file, starting empty");
                return Ok(Self::default());
            }
            Err(error) => return Err(io_error("read", path, &error)),
        };

        let state: Self = serde_json::from_str(&raw).map_err(|error| {
            AppError::Decode(format!("unreadable state file {}: {error}", path.display()))
        })?;
        if state.version != STATE_VERSION {
            return Err(AppError::Validation(format!(
                "state file {} has version {}, expected {STATE_VERSION}",
                path.display(),
                state.version
            )));
        }

        Ok(state)
    }

    /// Writes the state file through a temporary sibling and a rename.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        let rendered = serde_json::to_string_pretty(self)
            .map_err(|error| AppError::Internal(format!("failed to encode state: {error}")))?;

        let temporary = temporary_path(path);
        tokio::fs::write(&temporary, rendered)
            .await
            .map_err(|error| io_error("write", &temporary, &error))?;
        tokio::fs::rename(&temporary, path)
            .await
            .map_err(|error| io_error("replace", path, &error))?;

        debug!(path = %path.display(), resources = self.resources.len(), "saved state");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, address: &str) -> Option<&StateEntry> {
        self.resources.iter().find(|entry| entry.address == address)
    }

    /// Replaces the entry with the same address or appends a new one.
    pub fn upsert(&mut self, entry: StateEntry) {
        match self
            .resources
            .iter_mut()
            .find(|existing| existing.address == entry.address)
        {
            Some(existing) => *existing = entry,
            None => self.resources.push(entry),
        }
    }

    pub fn remove(&mut self, address: &str) {
        self.resources.retain(|entry| entry.address != address);
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(action: &str, path: &Path, error: &std::io::Error) -> AppError {
    AppError::Internal(format!("failed to {action} {}: {error}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use dtrack_core::{AppError, AppResult};

    use super::{StateEntry, StateFile};

    fn entry(address: &str, name: &str) -> StateEntry {
        StateEntry {
            address: address.to_owned(),
            resource_type: "team".to_owned(),
            state: json!({"id": "00000000-0000-0000-0000-000000000001", "name": name}),
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty_state() -> AppResult<()> {
        let directory = tempfile::tempdir().map_err(|error| AppError::Internal(error.to_string()))?;

        let state = StateFile::load(&directory.path().join("absent.json")).await?;

        assert!(state.resources.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn saved_state_loads_back() -> AppResult<()> {
        let directory = tempfile::tempdir().map_err(|error| AppError::Internal(error.to_string()))?;
        let path = directory.path().join("dtrack.state.json");
        let mut state = StateFile::default();
        state.upsert(entry("team.ops", "Ops"));
        state.upsert(entry("team.dev", "Dev"));
        state.upsert(entry("team.ops", "Operations"));

        state.save(&path).await?;
        let loaded = StateFile::load(&path).await?;

        assert_eq!(loaded, state);
        assert_eq!(loaded.resources.len(), 2);
        assert_eq!(
            loaded.get("team.ops").map(|entry| entry.state["name"].clone()),
            Some(json!("Operations"))
        );
        assert!(!directory.path().join("dtrack.state.json.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_version_is_rejected() -> AppResult<()> {
        let directory = tempfile::tempdir().map_err(|error| AppError::Internal(error.to_string()))?;
        let path = directory.path().join("dtrack.state.json");
        tokio::fs::write(&path, json!({"version": 7, "resources": []}).to_string())
            .await
            .map_err(|error| AppError::Internal(error.to_string()))?;

        let result = StateFile::load(&path).await;

        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("version 7")
        ));
        Ok(())
    }
}
