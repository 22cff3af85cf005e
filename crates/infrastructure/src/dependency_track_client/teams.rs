use async_trait::async_trait;
use dtrack_application::{Page, PageRequest, TeamApi};
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{ApiKey, GeneratedApiKey, Team, TeamId};
use reqwest::Method;

use super::DependencyTrackClient;
use crate::wire::{ApiKeyDto, TeamDto, TeamWriteDto, UuidRef};

#[async_trait]
impl TeamApi for DependencyTrackClient {
    async fn list_teams(&self, page: PageRequest) -> AppResult<Page<Team>> {
        let builder = self.paged(&["team"], page)?;
        let page: Page<TeamDto> = self.fetch_page(builder, page, "list teams").await?;
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(TeamDto::into_domain)
                .collect::<AppResult<_>>()?,
            total: page.total,
        })
    }

    async fn get_team(&self, team_id: TeamId) -> AppResult<Team> {
        let what = format!("get team '{team_id}'");
        let builder = self.request(Method::GET, &["team", &team_id.to_string()])?;
        self.fetch::<TeamDto>(builder, &what).await?.into_domain()
    }

    async fn create_team(&self, name: &str) -> AppResult<Team> {
        let builder = self
            .request(Method::PUT, &["team"])?
            .json(&TeamWriteDto { uuid: None, name });
        self.fetch::<TeamDto>(builder, "create team").await?.into_domain()
    }

    async fn update_team(&self, team_id: TeamId, name: &str) -> AppResult<Team> {
        let what = format!("update team '{team_id}'");
        let builder = self.request(Method::POST, &["team"])?.json(&TeamWriteDto {
            uuid: Some(team_id.as_uuid()),
            name,
        });
        self.fetch::<TeamDto>(builder, &what).await?.into_domain()
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<()> {
        let what = format!("delete team '{team_id}'");
        let builder = self
            .request(Method::DELETE, &["team"])?
            .json(&UuidRef::new(team_id.as_uuid()));
        self.execute(builder, &what).await
    }

    async fn generate_api_key(&self, team_id: TeamId) -> AppResult<GeneratedApiKey> {
        let what = format!("generate api key for team '{team_id}'");
        let builder = self.request(Method::PUT, &["team", &team_id.to_string(), "key"])?;
        self.fetch::<ApiKeyDto>(builder, &what)
            .await?
            .into_generated()
            .ok_or_else(|| AppError::Decode(format!("{what}: response has no key")))
    }

    async fn update_api_key_comment(&self, public_id: &str, comment: &str) -> AppResult<ApiKey> {
        let what = format!("update comment of api key '{public_id}'");
        let builder = self
            .request(Method::POST, &["team", "key", public_id, "comment"])?
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(comment.to_owned());
        Ok(self.fetch::<ApiKeyDto>(builder, &what).await?.into_metadata())
    }

    async fn delete_api_key(&self, public_id: &str) -> AppResult<()> {
        let what = format!("delete api key '{public_id}'");
        let builder = self.request(Method::DELETE, &["team", "key", public_id])?;
        self.execute(builder, &what).await
    }
}
