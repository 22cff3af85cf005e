use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{Project, ProjectId, ProjectInput};
use tracing::info;

use crate::ProjectApi;
use crate::lookup::found;

/// Project operations.
#[derive(Clone)]
pub struct ProjectService {
    api: Arc<dyn ProjectApi>,
}

impl ProjectService {
    /// Creates a project service.
    #[must_use]
    pub fn new(api: Arc<dyn ProjectApi>) -> Self {
        Self { api }
    }

    /// Creates a project.
    pub async fn create(&self, input: &ProjectInput) -> AppResult<Project> {
        let project = self.api.create_project(input).await?;
        info!(project_id = %project.id, name = %project.attributes.name, "created project");
        Ok(project)
    }

    /// Fetches a project, `None` when it no longer exists.
    pub async fn get(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        found(self.api.get_project(project_id).await)
    }

    /// Looks a project up by name and version.
    pub async fn lookup(&self, name: &str, version: Option<&str>) -> AppResult<Option<Project>> {
        found(self.api.lookup_project(name, version).await)
    }

    /// Updates a project.
    pub async fn update(&self, project_id: ProjectId, input: &ProjectInput) -> AppResult<Project> {
        let project = self.api.update_project(project_id, input).await?;
        info!(project_id = %project.id, "updated project");
        Ok(project)
    }

    /// Deletes a project.
    pub async fn delete(&self, project_id: ProjectId) -> AppResult<()> {
        self.api.delete_project(project_id).await?;
        info!(project_id = %project_id, "deleted project");
        Ok(())
    }
}
