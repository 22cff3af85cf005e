use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{ApiKey, GeneratedApiKey, PermissionSet, Team, TeamId};

use crate::{Page, PageRequest, TeamApi};

use super::TeamService;

#[derive(Default)]
struct FakeTeamApi {
    teams: Mutex<Vec<Team>>,
    pages_served: Mutex<Vec<u32>>,
    comments: Mutex<Vec<(String, String)>>,
}

fn team(name: &str) -> Team {
    Team {
        id: TeamId::from_uuid(Uuid::new_v4()),
        name: name.to_owned(),
        permissions: PermissionSet::new(),
        api_keys: Vec::new(),
    }
}

fn key(public_id: &str, comment: Option<&str>) -> ApiKey {
    ApiKey {
        public_id: public_id.to_owned(),
        masked_key: format!("odt_{public_id}****"),
        comment: comment.map(str::to_owned),
        legacy: false,
    }
}

#[async_trait]
impl TeamApi for FakeTeamApi {
    async fn list_teams(&self, page: PageRequest) -> AppResult<Page<Team>> {
        self.pages_served.lock().await.push(page.page_number);
        let teams = self.teams.lock().await;
        let start = ((page.page_number - 1) * page.page_size) as usize;
        Ok(Page {
            items: teams
                .iter()
                .skip(start)
                .take(page.page_size as usize)
                .cloned()
                .collect(),
            total: teams.len() as u64,
        })
    }

    async fn get_team(&self, team_id: TeamId) -> AppResult<Team> {
        self.teams
            .lock()
            .await
            .iter()
            .find(|team| team.id == team_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("team '{team_id}'")))
    }

    async fn create_team(&self, name: &str) -> AppResult<Team> {
        let created = team(name);
        self.teams.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_team(&self, team_id: TeamId, name: &str) -> AppResult<Team> {
        let mut teams = self.teams.lock().await;
        let existing = teams
            .iter_mut()
            .find(|team| team.id == team_id)
            .ok_or_else(|| AppError::NotFound(format!("team '{team_id}'")))?;
        existing.name = name.to_owned();
        Ok(existing.clone())
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<()> {
        self.teams.lock().await.retain(|team| team.id != team_id);
        Ok(())
    }

    async fn generate_api_key(&self, _team_id: TeamId) -> AppResult<GeneratedApiKey> {
        Ok(GeneratedApiKey {
            metadata: key("abc", None),
            key: "odt_abcsecret".to_owned(),
        })
    }

    async fn update_api_key_comment(&self, public_id: &str, comment: &str) -> AppResult<ApiKey> {
        self.comments
            .lock()
            .await
            .push((public_id.to_owned(), comment.to_owned()));
        Ok(key(public_id, Some(comment)))
    }

    async fn delete_api_key(&self, _public_id: &str) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn find_by_name_walks_pages_until_match() -> AppResult<()> {
    let api = Arc::new(FakeTeamApi::default());
    for name in ["a", "b", "c", "d", "e"] {
        api.teams.lock().await.push(team(name));
    }
    let service = TeamService::new(api.clone(), 2);

    let found = service.find_by_name("c").await?;

    assert_eq!(found.map(|team| team.name), Some("c".to_owned()));
    assert_eq!(*api.pages_served.lock().await, vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn find_by_name_without_match_is_none() -> AppResult<()> {
    let api = Arc::new(FakeTeamApi::default());
    api.teams.lock().await.push(team("a"));
    let service = TeamService::new(api, 10);

    assert!(service.find_by_name("missing").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn get_of_deleted_team_is_none() -> AppResult<()> {
    let service = TeamService::new(Arc::new(FakeTeamApi::default()), 10);
    let created = service.create("ops").await?;
    service.delete(created.id).await?;

    assert!(service.get(created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn generated_key_gets_comment_and_keeps_clear_key() -> AppResult<()> {
    let api = Arc::new(FakeTeamApi::default());
    let service = TeamService::new(api.clone(), 10);

    let generated = service
        .generate_api_key(TeamId::from_uuid(Uuid::new_v4()), Some("ci"))
        .await?;

    assert_eq!(generated.key, "odt_abcsecret");
    assert_eq!(generated.metadata.comment.as_deref(), Some("ci"));
    assert_eq!(
        *api.comments.lock().await,
        vec![("abc".to_owned(), "ci".to_owned())]
    );
    Ok(())
}

#[tokio::test]
async fn generated_key_without_comment_skips_comment_call() -> AppResult<()> {
    let api = Arc::new(FakeTeamApi::default());
    let service = TeamService::new(api.clone(), 10);

    service
        .generate_api_key(TeamId::from_uuid(Uuid::new_v4()), None)
        .await?;

    assert!(api.comments.lock().await.is_empty());
    Ok(())
}
