use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{ManagedUser, ManagedUserInput, TeamId, UserDirectory, Username};
use tracing::{debug, info};

use crate::UserApi;

#[cfg(test)]
mod tests;

/// Managed user and team membership operations.
#[derive(Clone)]
pub struct UserService {
    api: Arc<dyn UserApi>,
}

impl UserService {
    /// Creates a user service.
    #[must_use]
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self { api }
    }

    /// Creates a managed user.
    pub async fn create(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        input.validate()?;
        let user = self.api.create_managed_user(input).await?;
        info!(username = %user.username, "created managed user");
        Ok(user)
    }

    /// Finds a managed user by username.
    pub async fn find(&self, username: &Username) -> AppResult<Option<ManagedUser>> {
        Ok(self
            .api
            .list_managed_users()
            .await?
            .into_iter()
            .find(|user| &user.username == username))
    }

    /// Updates a managed user.
    pub async fn update(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        input.validate()?;
        let user = self.api.update_managed_user(input).await?;
        info!(username = %user.username, "updated managed user");
        Ok(user)
    }

    /// Deletes a managed user.
    pub async fn delete(&self, username: &Username) -> AppResult<()> {
        self.api.delete_managed_user(username).await?;
        info!(username = %username, "deleted managed user");
        Ok(())
    }

    /// Adds a user to a team.
    pub async fn add_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        self.api.add_membership(username, team_id).await?;
        info!(username = %username, team_id = %team_id, "added team membership");
        Ok(())
    }

    /// Removes a user from a team.
    pub async fn remove_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        self.api.remove_membership(username, team_id).await?;
        info!(username = %username, team_id = %team_id, "removed team membership");
        Ok(())
    }

    /// Returns whether the user belongs to the team.
    ///
    /// Directories are searched in lookup order and the first directory that
    /// knows the user decides. Managed listing failures are returned; an LDAP
    /// or OIDC listing that fails is treated as not configured.
    pub async fn has_membership(&self, username: &Username, team_id: TeamId) -> AppResult<bool> {
        for directory in UserDirectory::lookup_order() {
            let users = match self.api.list_directory_users(*directory).await {
                Ok(users) => users,
                Err(error) if *directory != UserDirectory::Managed => {
                    debug!(
                        directory = directory.as_str(),
                        error = %error,
                        "skipping user directory"
                    );
                    continue;
                }
                Err(error) => return Err(error),
            };

            if let Some(user) = users.into_iter().find(|user| &user.username == username) {
                return Ok(user.teams.contains(&team_id));
            }
        }

        Ok(false)
    }
}
