use std::collections::BTreeMap;

use dtrack_application::{Page, PageRequest};
use dtrack_core::AppError;
use dtrack_domain::{
    ConfigProperty, DirectoryUser, ManagedUser, NotificationPublisher, NotificationRule, Policy,
    Project, ProjectId, Team, TeamId, UserDirectory,
};
use tokio::sync::RwLock;

mod access;
mod portfolio;
mod settings;

#[cfg(test)]
mod tests;

/// In-memory Dependency-Track server implementing every application port.
///
/// Mirrors the server behaviors the provider depends on: read-only policy
/// flags, notification rules that ignore most fields on create, adopt-only
/// config properties and directories that only know seeded users.
#[derive(Debug, Default)]
pub struct InMemoryDependencyTrack {
    teams: RwLock<Vec<Team>>,
    managed_users: RwLock<BTreeMap<String, ManagedUser>>,
    directory_users: RwLock<BTreeMap<(UserDirectory, String), DirectoryUser>>,
    acl: RwLock<Vec<(TeamId, ProjectId)>>,
    projects: RwLock<Vec<Project>>,
    policies: RwLock<Vec<Policy>>,
    config_properties: RwLock<Vec<ConfigProperty>>,
    publishers: RwLock<Vec<NotificationPublisher>>,
    rules: RwLock<Vec<NotificationRule>>,
    generated_keys: RwLock<u64>,
}

impl InMemoryDependencyTrack {
    /// Creates an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a server-defined config property.
    pub async fn seed_config_property(&self, property: ConfigProperty) {
        self.config_properties.write().await.push(property);
    }

    /// Registers a user known to an LDAP or OIDC directory.
    pub async fn seed_directory_user(&self, directory: UserDirectory, user: DirectoryUser) {
        self.directory_users
            .write()
            .await
            .insert((directory, user.username.as_str().to_owned()), user);
    }
}

fn paged<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let start =
        (page.page_number.saturating_sub(1) as usize).saturating_mul(page.page_size as usize);
    Page {
        items: items
            .iter()
            .skip(start)
            .take(page.page_size as usize)
            .cloned()
            .collect(),
        total: items.len() as u64,
    }
}

fn not_found(what: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{what} does not exist"))
}
