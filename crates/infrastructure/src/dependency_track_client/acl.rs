use async_trait::async_trait;
use dtrack_application::{AclApi, Page, PageRequest};
use dtrack_core::AppResult;
use dtrack_domain::{ProjectId, TeamId};
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use super::DependencyTrackClient;
use crate::wire::UuidRef;

#[derive(Serialize)]
struct AclMappingDto {
    team: Uuid,
    project: Uuid,
}

#[async_trait]
impl AclApi for DependencyTrackClient {
    async fn add_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        let what = format!("map team '{team_id}' to project '{project_id}'");
        let builder = self
            .request(Method::PUT, &["acl", "mapping"])?
            .json(&AclMappingDto {
                team: team_id.as_uuid(),
                project: project_id.as_uuid(),
            });
        self.execute(builder, &what).await
    }

    async fn remove_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        let what = format!("unmap team '{team_id}' from project '{project_id}'");
        let builder = self.request(
            Method::DELETE,
            &[
                "acl",
                "mapping",
                "team",
                &team_id.to_string(),
                "project",
                &project_id.to_string(),
            ],
        )?;
        self.execute(builder, &what).await
    }

    async fn list_team_projects(
        &self,
        team_id: TeamId,
        page: PageRequest,
    ) -> AppResult<Page<ProjectId>> {
        let what = format!("list projects of team '{team_id}'");
        let builder = self.paged(&["acl", "team", &team_id.to_string()], page)?;
        let page: Page<UuidRef> = self.fetch_page(builder, page, &what).await?;
        Ok(Page {
            items: page
                .items
                .iter()
                .map(|project| ProjectId::from_uuid(project.uuid))
                .collect(),
            total: page.total,
        })
    }
}
