use async_trait::async_trait;
use dtrack_application::UserApi;
use dtrack_core::AppResult;
use dtrack_domain::{
    DirectoryUser, ManagedUser, ManagedUserInput, TeamId, UserDirectory, Username,
};
use reqwest::Method;

use super::DependencyTrackClient;
use crate::wire::{DirectoryUserDto, ManagedUserDto, ManagedUserWriteDto, UsernameRef, UuidRef};

#[async_trait]
impl UserApi for DependencyTrackClient {
    async fn list_managed_users(&self) -> AppResult<Vec<ManagedUser>> {
        let builder = self.request(Method::GET, &["user", "managed"])?;
        self.fetch::<Vec<ManagedUserDto>>(builder, "list managed users")
            .await?
            .into_iter()
            .map(ManagedUserDto::into_domain)
            .collect()
    }

    async fn create_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        let what = format!("create managed user '{}'", input.username);
        let builder = self
            .request(Method::PUT, &["user", "managed"])?
            .json(&ManagedUserWriteDto::from(input));
        self.fetch::<ManagedUserDto>(builder, &what).await?.into_domain()
    }

    async fn update_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        let what = format!("update managed user '{}'", input.username);
        let builder = self
            .request(Method::POST, &["user", "managed"])?
            .json(&ManagedUserWriteDto::from(input));
        self.fetch::<ManagedUserDto>(builder, &what).await?.into_domain()
    }

    async fn delete_managed_user(&self, username: &Username) -> AppResult<()> {
        let what = format!("delete managed user '{username}'");
        let builder = self
            .request(Method::DELETE, &["user", "managed"])?
            .json(&UsernameRef {
                username: username.as_str(),
            });
        self.execute(builder, &what).await
    }

    async fn list_directory_users(
        &self,
        directory: UserDirectory,
    ) -> AppResult<Vec<DirectoryUser>> {
        let what = format!("list {} users", directory.as_str());
        let builder = self.request(Method::GET, &["user", directory.as_str()])?;
        self.fetch::<Vec<DirectoryUserDto>>(builder, &what)
            .await?
            .into_iter()
            .map(DirectoryUserDto::into_domain)
            .collect()
    }

    async fn add_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        let what = format!("add '{username}' to team '{team_id}'");
        let builder = self
            .request(Method::POST, &["user", username.as_str(), "membership"])?
            .json(&UuidRef::new(team_id.as_uuid()));
        self.execute(builder, &what).await
    }

    async fn remove_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        let what = format!("remove '{username}' from team '{team_id}'");
        let builder = self
            .request(Method::DELETE, &["user", username.as_str(), "membership"])?
            .json(&UuidRef::new(team_id.as_uuid()));
        self.execute(builder, &what).await
    }
}
