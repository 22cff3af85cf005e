use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{ApiKey, GeneratedApiKey, Team, TeamId};
use tracing::info;

use crate::lookup::found;
use crate::{TeamApi, find_first};

#[cfg(test)]
mod tests;

/// Team and team API key operations.
#[derive(Clone)]
pub struct TeamService {
    api: Arc<dyn TeamApi>,
    page_size: u32,
}

impl TeamService {
    /// Creates a team service.
    #[must_use]
    pub fn new(api: Arc<dyn TeamApi>, page_size: u32) -> Self {
        Self { api, page_size }
    }

    /// Creates a team.
    pub async fn create(&self, name: &str) -> AppResult<Team> {
        let team = self.api.create_team(name).await?;
        info!(team_id = %team.id, name = %team.name, "created team");
        Ok(team)
    }

    /// Fetches a team, `None` when it no longer exists.
    pub async fn get(&self, team_id: TeamId) -> AppResult<Option<Team>> {
        found(self.api.get_team(team_id).await)
    }

    /// Finds a team by exact name across all pages.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Team>> {
        let api: &dyn TeamApi = self.api.as_ref();
        find_first(self.page_size, move |page| api.list_teams(page), |team| {
            team.name == name
        })
        .await
    }

    /// Renames a team.
    pub async fn rename(&self, team_id: TeamId, name: &str) -> AppResult<Team> {
        let team = self.api.update_team(team_id, name).await?;
        info!(team_id = %team.id, name = %team.name, "updated team");
        Ok(team)
    }

    /// Deletes a team.
    pub async fn delete(&self, team_id: TeamId) -> AppResult<()> {
        self.api.delete_team(team_id).await?;
        info!(team_id = %team_id, "deleted team");
        Ok(())
    }

    /// Lists the API keys of a team, `None` when the team no longer exists.
    pub async fn api_keys(&self, team_id: TeamId) -> AppResult<Option<Vec<ApiKey>>> {
        Ok(self.get(team_id).await?.map(|team| team.api_keys))
    }

    /// Finds one API key of a team by public identifier.
    pub async fn find_api_key(
        &self,
        team_id: TeamId,
        public_id: &str,
    ) -> AppResult<Option<ApiKey>> {
        Ok(self
            .api_keys(team_id)
            .await?
            .and_then(|keys| keys.into_iter().find(|key| key.public_id == public_id)))
    }

    /// Generates an API key and applies the comment when one is given.
    pub async fn generate_api_key(
        &self,
        team_id: TeamId,
        comment: Option<&str>,
    ) -> AppResult<GeneratedApiKey> {
        let mut generated = self.api.generate_api_key(team_id).await?;
        info!(
            team_id = %team_id,
            public_id = %generated.metadata.public_id,
            "generated team api key"
        );

        if let Some(comment) = comment {
            generated.metadata = self
                .api
                .update_api_key_comment(&generated.metadata.public_id, comment)
                .await?;
        }

        Ok(generated)
    }

    /// Replaces the comment of an API key. `None` clears it.
    pub async fn set_api_key_comment(
        &self,
        public_id: &str,
        comment: Option<&str>,
    ) -> AppResult<ApiKey> {
        self.api
            .update_api_key_comment(public_id, comment.unwrap_or_default())
            .await
    }

    /// Deletes an API key.
    pub async fn delete_api_key(&self, public_id: &str) -> AppResult<()> {
        self.api.delete_api_key(public_id).await?;
        info!(public_id = %public_id, "deleted team api key");
        Ok(())
    }
}
