use async_trait::async_trait;
use dtrack_application::{PermissionApi, TeamApi, UserApi, found};
use dtrack_core::AppResult;
use dtrack_domain::{PermissionHolder, PermissionName, PermissionSet};
use reqwest::Method;

use super::DependencyTrackClient;

impl DependencyTrackClient {
    fn permission_request(
        &self,
        method: Method,
        holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<reqwest::RequestBuilder> {
        match holder {
            PermissionHolder::Team(team_id) => self.request(
                method,
                &["permission", permission.as_str(), "team", &team_id.to_string()],
            ),
            PermissionHolder::ManagedUser(username) => self.request(
                method,
                &["permission", permission.as_str(), "user", username.as_str()],
            ),
        }
    }
}

#[async_trait]
impl PermissionApi for DependencyTrackClient {
    async fn grant(
        &self,
        holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let what = format!("grant permission '{permission}' to {holder}");
        let builder = self.permission_request(Method::POST, holder, permission)?;
        self.execute_idempotent(builder, &what).await
    }

    async fn revoke(
        &self,
        holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let what = format!("revoke permission '{permission}' from {holder}");
        let builder = self.permission_request(Method::DELETE, holder, permission)?;
        self.execute_idempotent(builder, &what).await
    }

    async fn fetch_permissions(
        &self,
        holder: &PermissionHolder,
    ) -> AppResult<Option<PermissionSet>> {
        match holder {
            PermissionHolder::Team(team_id) => Ok(found(self.get_team(*team_id).await)?
                .map(|team| team.permissions)),
            PermissionHolder::ManagedUser(username) => Ok(self
                .list_managed_users()
                .await?
                .into_iter()
                .find(|user| &user.username == username)
                .map(|user| user.permissions)),
        }
    }
}
