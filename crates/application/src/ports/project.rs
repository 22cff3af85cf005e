use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{Project, ProjectId, ProjectInput};

/// Project endpoints.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Fetches a project. Missing projects are `AppError::NotFound`.
    async fn get_project(&self, project_id: ProjectId) -> AppResult<Project>;

    /// Looks a project up by name and optional version.
    async fn lookup_project(&self, name: &str, version: Option<&str>) -> AppResult<Project>;

    /// Creates a project.
    async fn create_project(&self, input: &ProjectInput) -> AppResult<Project>;

    /// Updates a project.
    async fn update_project(&self, project_id: ProjectId, input: &ProjectInput)
    -> AppResult<Project>;

    /// Deletes a project.
    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()>;
}
