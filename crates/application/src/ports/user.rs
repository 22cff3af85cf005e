use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{DirectoryUser, ManagedUser, ManagedUserInput, TeamId, UserDirectory, Username};

/// User directory and team membership endpoints.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Lists every managed user.
    async fn list_managed_users(&self) -> AppResult<Vec<ManagedUser>>;

    /// Creates a managed user.
    async fn create_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser>;

    /// Updates a managed user addressed by username.
    async fn update_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser>;

    /// Deletes a managed user.
    async fn delete_managed_user(&self, username: &Username) -> AppResult<()>;

    /// Lists users of one directory with their team memberships.
    async fn list_directory_users(&self, directory: UserDirectory)
    -> AppResult<Vec<DirectoryUser>>;

    /// Adds a user to a team.
    async fn add_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()>;

    /// Removes a user from a team.
    async fn remove_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()>;
}
