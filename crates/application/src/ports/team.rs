use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{ApiKey, GeneratedApiKey, Team, TeamId};

use crate::{Page, PageRequest};

/// Team and team API key endpoints.
#[async_trait]
pub trait TeamApi: Send + Sync {
    /// Lists one page of teams.
    async fn list_teams(&self, page: PageRequest) -> AppResult<Page<Team>>;

    /// Fetches a team. Missing teams are `AppError::NotFound`.
    async fn get_team(&self, team_id: TeamId) -> AppResult<Team>;

    /// Creates a team.
    async fn create_team(&self, name: &str) -> AppResult<Team>;

    /// Renames a team.
    async fn update_team(&self, team_id: TeamId, name: &str) -> AppResult<Team>;

    /// Deletes a team.
    async fn delete_team(&self, team_id: TeamId) -> AppResult<()>;

    /// Generates a new API key for a team.
    async fn generate_api_key(&self, team_id: TeamId) -> AppResult<GeneratedApiKey>;

    /// Replaces the comment of an API key.
    async fn update_api_key_comment(&self, public_id: &str, comment: &str) -> AppResult<ApiKey>;

    /// Deletes an API key.
    async fn delete_api_key(&self, public_id: &str) -> AppResult<()>;
}
