use async_trait::async_trait;
use dtrack_application::{AclApi, Page, PageRequest, PermissionApi, TeamApi, UserApi};
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{
    ApiKey, DirectoryUser, GeneratedApiKey, ManagedUser, ManagedUserInput, PermissionHolder,
    PermissionName, PermissionSet, ProjectId, Team, TeamId, UserDirectory, Username,
};
use uuid::Uuid;

use super::{InMemoryDependencyTrack, not_found, paged};

fn holder_not_found(holder: &PermissionHolder) -> AppError {
    not_found(holder)
}

fn unknown_permission(permission: &PermissionName) -> AppError {
    AppError::NotFound(format!("permission '{permission}' is not defined"))
}

impl InMemoryDependencyTrack {
    async fn with_permissions<R>(
        &self,
        holder: &PermissionHolder,
        change: impl FnOnce(&mut PermissionSet) -> R,
    ) -> AppResult<R> {
        match holder {
            PermissionHolder::Team(team_id) => {
                let mut teams = self.teams.write().await;
                let team = teams
                    .iter_mut()
                    .find(|team| team.id == *team_id)
                    .ok_or_else(|| holder_not_found(holder))?;
                Ok(change(&mut team.permissions))
            }
            PermissionHolder::ManagedUser(username) => {
                let mut users = self.managed_users.write().await;
                let user = users
                    .get_mut(username.as_str())
                    .ok_or_else(|| holder_not_found(holder))?;
                Ok(change(&mut user.permissions))
            }
        }
    }

    async fn update_membership(
        &self,
        username: &Username,
        team_id: TeamId,
        member: bool,
    ) -> AppResult<()> {
        if !self.teams.read().await.iter().any(|team| team.id == team_id) {
            return Err(not_found(format_args!("team '{team_id}'")));
        }

        let apply = |teams: &mut Vec<TeamId>| {
            teams.retain(|existing| *existing != team_id);
            if member {
                teams.push(team_id);
            }
        };

        if let Some(user) = self.managed_users.write().await.get_mut(username.as_str()) {
            apply(&mut user.teams);
            return Ok(());
        }

        let mut directory_users = self.directory_users.write().await;
        let user = directory_users
            .iter_mut()
            .find(|((_, name), _)| name == username.as_str())
            .map(|(_, user)| user)
            .ok_or_else(|| not_found(format_args!("user '{username}'")))?;
        apply(&mut user.teams);
        Ok(())
    }
}

fn managed_user(input: &ManagedUserInput, existing: Option<&ManagedUser>) -> ManagedUser {
    ManagedUser {
        username: input.username.clone(),
        fullname: input.fullname.clone(),
        email: input.email.clone(),
        suspended: input.suspended,
        force_password_change: input.force_password_change,
        non_expiry_password: input.non_expiry_password,
        permissions: existing
            .map(|user| user.permissions.clone())
            .unwrap_or_default(),
        teams: existing.map(|user| user.teams.clone()).unwrap_or_default(),
    }
}

#[async_trait]
impl TeamApi for InMemoryDependencyTrack {
    async fn list_teams(&self, page: PageRequest) -> AppResult<Page<Team>> {
        Ok(paged(&self.teams.read().await, page))
    }

    async fn get_team(&self, team_id: TeamId) -> AppResult<Team> {
        self.teams
            .read()
            .await
            .iter()
            .find(|team| team.id == team_id)
            .cloned()
            .ok_or_else(|| not_found(format_args!("team '{team_id}'")))
    }

    async fn create_team(&self, name: &str) -> AppResult<Team> {
        let team = Team {
            id: TeamId::from_uuid(Uuid::new_v4()),
            name: name.to_owned(),
            permissions: PermissionSet::new(),
            api_keys: Vec::new(),
        };
        self.teams.write().await.push(team.clone());
        Ok(team)
    }

    async fn update_team(&self, team_id: TeamId, name: &str) -> AppResult<Team> {
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|team| team.id == team_id)
            .ok_or_else(|| not_found(format_args!("team '{team_id}'")))?;
        team.name = name.to_owned();
        Ok(team.clone())
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<()> {
        let mut teams = self.teams.write().await;
        let before = teams.len();
        teams.retain(|team| team.id != team_id);
        if teams.len() == before {
            return Err(not_found(format_args!("team '{team_id}'")));
        }
        drop(teams);

        self.acl.write().await.retain(|(team, _)| *team != team_id);
        for user in self.managed_users.write().await.values_mut() {
            user.teams.retain(|team| *team != team_id);
        }
        for rule in self.rules.write().await.iter_mut() {
            rule.teams.retain(|team| *team != team_id);
        }
        Ok(())
    }

    async fn generate_api_key(&self, team_id: TeamId) -> AppResult<GeneratedApiKey> {
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|team| team.id == team_id)
            .ok_or_else(|| not_found(format_args!("team '{team_id}'")))?;

        let mut counter = self.generated_keys.write().await;
        *counter += 1;
        let public_id = format!("k{:04}", *counter);
        let metadata = ApiKey {
            masked_key: format!("odt_{public_id}****"),
            public_id: public_id.clone(),
            comment: None,
            legacy: false,
        };
        team.api_keys.push(metadata.clone());

        Ok(GeneratedApiKey {
            metadata,
            key: format!("odt_{public_id}{}", Uuid::new_v4().simple()),
        })
    }

    async fn update_api_key_comment(&self, public_id: &str, comment: &str) -> AppResult<ApiKey> {
        let mut teams = self.teams.write().await;
        let key = teams
            .iter_mut()
            .flat_map(|team| team.api_keys.iter_mut())
            .find(|key| key.public_id == public_id)
            .ok_or_else(|| not_found(format_args!("api key '{public_id}'")))?;
        key.comment = (!comment.is_empty()).then(|| comment.to_owned());
        Ok(key.clone())
    }

    async fn delete_api_key(&self, public_id: &str) -> AppResult<()> {
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|team| team.api_keys.iter().any(|key| key.public_id == public_id))
            .ok_or_else(|| not_found(format_args!("api key '{public_id}'")))?;
        team.api_keys.retain(|key| key.public_id != public_id);
        Ok(())
    }
}

#[async_trait]
impl UserApi for InMemoryDependencyTrack {
    async fn list_managed_users(&self) -> AppResult<Vec<ManagedUser>> {
        Ok(self.managed_users.read().await.values().cloned().collect())
    }

    async fn create_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        let mut users = self.managed_users.write().await;
        if users.contains_key(input.username.as_str()) {
            return Err(AppError::Conflict(format!(
                "managed user '{}' already exists",
                input.username
            )));
        }
        let user = managed_user(input, None);
        users.insert(input.username.as_str().to_owned(), user.clone());
        Ok(user)
    }

    async fn update_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        let mut users = self.managed_users.write().await;
        let existing = users
            .get_mut(input.username.as_str())
            .ok_or_else(|| not_found(format_args!("managed user '{}'", input.username)))?;
        *existing = managed_user(input, Some(&*existing));
        Ok(existing.clone())
    }

    async fn delete_managed_user(&self, username: &Username) -> AppResult<()> {
        self.managed_users
            .write()
            .await
            .remove(username.as_str())
            .map(|_| ())
            .ok_or_else(|| not_found(format_args!("managed user '{username}'")))
    }

    async fn list_directory_users(
        &self,
        directory: UserDirectory,
    ) -> AppResult<Vec<DirectoryUser>> {
        if directory == UserDirectory::Managed {
            return Ok(self
                .managed_users
                .read()
                .await
                .values()
                .map(|user| DirectoryUser {
                    username: user.username.clone(),
                    teams: user.teams.clone(),
                })
                .collect());
        }

        Ok(self
            .directory_users
            .read()
            .await
            .iter()
            .filter(|((owner, _), _)| *owner == directory)
            .map(|(_, user)| user.clone())
            .collect())
    }

    async fn add_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        self.update_membership(username, team_id, true).await
    }

    async fn remove_membership(&self, username: &Username, team_id: TeamId) -> AppResult<()> {
        self.update_membership(username, team_id, false).await
    }
}

#[async_trait]
impl PermissionApi for InMemoryDependencyTrack {
    async fn grant(&self, holder: &PermissionHolder, permission: &PermissionName) -> AppResult<()> {
        if !permission.is_well_known() {
            return Err(unknown_permission(permission));
        }
        self.with_permissions(holder, |permissions| {
            permissions.insert(permission.clone());
        })
        .await
    }

    async fn revoke(
        &self,
        holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()> {
        if !permission.is_well_known() {
            return Err(unknown_permission(permission));
        }
        self.with_permissions(holder, |permissions| {
            *permissions = permissions
                .iter()
                .filter(|held| *held != permission)
                .cloned()
                .collect();
        })
        .await
    }

    async fn fetch_permissions(
        &self,
        holder: &PermissionHolder,
    ) -> AppResult<Option<PermissionSet>> {
        match self
            .with_permissions(holder, |permissions| permissions.clone())
            .await
        {
            Ok(permissions) => Ok(Some(permissions)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[async_trait]
impl AclApi for InMemoryDependencyTrack {
    async fn add_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        self.get_team(team_id).await?;
        if !self
            .projects
            .read()
            .await
            .iter()
            .any(|project| project.id == project_id)
        {
            return Err(not_found(format_args!("project '{project_id}'")));
        }

        let mut acl = self.acl.write().await;
        if acl.contains(&(team_id, project_id)) {
            return Err(AppError::Conflict(format!(
                "team '{team_id}' is already mapped to project '{project_id}'"
            )));
        }
        acl.push((team_id, project_id));
        Ok(())
    }

    async fn remove_mapping(&self, team_id: TeamId, project_id: ProjectId) -> AppResult<()> {
        let mut acl = self.acl.write().await;
        let before = acl.len();
        acl.retain(|mapping| *mapping != (team_id, project_id));
        if acl.len() == before {
            return Err(not_found(format_args!(
                "mapping of team '{team_id}' to project '{project_id}'"
            )));
        }
        Ok(())
    }

    async fn list_team_projects(
        &self,
        team_id: TeamId,
        page: PageRequest,
    ) -> AppResult<Page<ProjectId>> {
        let projects: Vec<ProjectId> = self
            .acl
            .read()
            .await
            .iter()
            .filter(|(team, _)| *team == team_id)
            .map(|(_, project)| *project)
            .collect();
        Ok(paged(&projects, page))
    }
}
