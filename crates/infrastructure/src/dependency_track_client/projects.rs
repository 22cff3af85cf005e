use async_trait::async_trait;
use dtrack_application::ProjectApi;
use dtrack_core::AppResult;
use dtrack_domain::{Project, ProjectId, ProjectInput};
use reqwest::Method;

use super::DependencyTrackClient;
use crate::wire::ProjectDto;

#[async_trait]
impl ProjectApi for DependencyTrackClient {
    async fn get_project(&self, project_id: ProjectId) -> AppResult<Project> {
        let what = format!("get project '{project_id}'");
        let builder = self.request(Method::GET, &["project", &project_id.to_string()])?;
        self.fetch::<ProjectDto>(builder, &what).await?.into_domain()
    }

    async fn lookup_project(&self, name: &str, version: Option<&str>) -> AppResult<Project> {
        let what = format!("look up project '{name}'");
        let mut builder = self
            .request(Method::GET, &["project", "lookup"])?
            .query(&[("name", name)]);
        if let Some(version) = version {
            builder = builder.query(&[("version", version)]);
        }
        self.fetch::<ProjectDto>(builder, &what).await?.into_domain()
    }

    async fn create_project(&self, input: &ProjectInput) -> AppResult<Project> {
        let what = format!("create project '{}'", input.name);
        let builder = self
            .request(Method::PUT, &["project"])?
            .json(&ProjectDto::from_input(None, input));
        self.fetch::<ProjectDto>(builder, &what).await?.into_domain()
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        input: &ProjectInput,
    ) -> AppResult<Project> {
        let what = format!("update project '{project_id}'");
        let builder = self
            .request(Method::POST, &["project"])?
            .json(&ProjectDto::from_input(Some(project_id), input));
        self.fetch::<ProjectDto>(builder, &what).await?.into_domain()
    }

    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()> {
        let what = format!("delete project '{project_id}'");
        let builder = self.request(Method::DELETE, &["project", &project_id.to_string()])?;
        self.execute(builder, &what).await
    }
}
