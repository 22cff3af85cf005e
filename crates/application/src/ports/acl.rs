use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{ProjectId, TeamId};

use crate::{Page, PageRequest};

/// Portfolio access control endpoints.
#[async_trait]
pub trait AclApi: Send + Sync {
    /// Grants a team access to a project.
    async fn add_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()>;

    /// Revokes a team's access to a project.
    async fn remove_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()>;

    /// Lists one page of projects a team can access.
    async fn list_team_projects(
        &self,
        team_id: TeamId,
        page: PageRequest,
    ) -> AppResult<Page<ProjectId>>;
}
