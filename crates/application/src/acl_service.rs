use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{ProjectId, TeamId};
use tracing::info;

use crate::{AclApi, find_first};

/// Team to project access mappings.
#[derive(Clone)]
pub struct AclService {
    api: Arc<dyn AclApi>,
    page_size: u32,
}

impl AclService {
    /// Creates an ACL service.
    #[must_use]
    pub fn new(api: Arc<dyn AclApi>, page_size: u32) -> Self {
        Self { api, page_size }
    }

    /// Grants a team access to a project.
    pub async fn add(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        self.api.add_mapping(team_id, project_id).await?;
        info!(team_id = %team_id, project_id = %project_id, "added acl mapping");
        Ok(())
    }

    /// Revokes a team's access to a project.
    pub async fn remove(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        self.api.remove_mapping(team_id, project_id).await?;
        info!(team_id = %team_id, project_id = %project_id, "removed acl mapping");
        Ok(())
    }

    /// Returns whether the team can access the project.
    pub async fn exists(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<bool> {
        let api: &dyn AclApi = self.api.as_ref();
        let found = find_first(
            self.page_size,
            move |page| api.list_team_projects(team_id, page),
            |candidate| *candidate == project_id,
        )
        .await?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use dtrack_core::AppResult;
    use dtrack_domain::{ProjectId, TeamId};

    use super::AclService;
    use crate::{AclApi, Page, PageRequest};

    #[derive(Default)]
    struct FakeAclApi {
        projects: Mutex<Vec<ProjectId>>,
        pages_served: Mutex<u32>,
    }

    #[async_trait]
    impl AclApi for FakeAclApi {
        async fn add_mapping(&self, _team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
            self.projects.lock().await.push(project_id);
            Ok(())
        }

        async fn remove_mapping(&self, _team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
            self.projects.lock().await.retain(|id| *id != project_id);
            Ok(())
        }

        async fn list_team_projects(
            &self,
            _team_id: TeamId,
            page: PageRequest,
        ) -> AppResult<Page<ProjectId>> {
            *self.pages_served.lock().await += 1;
            let projects = self.projects.lock().await;
            let start = ((page.page_number - 1) * page.page_size) as usize;
            Ok(Page {
                items: projects
                    .iter()
                    .skip(start)
                    .take(page.page_size as usize)
                    .copied()
                    .collect(),
                total: projects.len() as u64,
            })
        }
    }

    fn project() -> ProjectId {
        ProjectId::from_uuid(Uuid::new_v4())
    }

    #[tokio::test]
    async fn mapping_on_a_later_page_is_found() -> AppResult<()> {
        let api = Arc::new(FakeAclApi::default());
        let service = AclService::new(api.clone(), 1);
        let team_id = TeamId::from_uuid(Uuid::new_v4());
        let wanted = project();

        service.add(team_id, project()).await?;
        service.add(team_id, project()).await?;
        service.add(team_id, wanted).await?;

        assert!(service.exists(team_id, wanted).await?);
        assert_eq!(*api.pages_served.lock().await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn removed_mapping_is_absent() -> AppResult<()> {
        let service = AclService::new(Arc::new(FakeAclApi::default()), 10);
        let team_id = TeamId::from_uuid(Uuid::new_v4());
        let project_id = project();

        service.add(team_id, project_id).await?;
        service.remove(team_id, project_id).await?;

        assert!(!service.exists(team_id, project_id).await?);
        Ok(())
    }
}
