use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{
    DirectoryUser, ManagedUser, ManagedUserInput, TeamId, UserDirectory, Username,
};

use crate::UserApi;

use super::UserService;

#[derive(Default)]
struct FakeUserApi {
    directories: HashMap<UserDirectory, AppResult<Vec<DirectoryUser>>>,
    listed: Mutex<Vec<UserDirectory>>,
    created: Mutex<Vec<Username>>,
}

fn username(value: &str) -> Username {
    Username::new(value).unwrap_or_else(|_| unreachable!())
}

fn member(name: &str, teams: &[TeamId]) -> DirectoryUser {
    DirectoryUser {
        username: username(name),
        teams: teams.to_vec(),
    }
}

fn clone_result(result: &AppResult<Vec<DirectoryUser>>) -> AppResult<Vec<DirectoryUser>> {
    match result {
        Ok(users) => Ok(users.clone()),
        Err(error) => Err(AppError::Internal(error.to_string())),
    }
}

#[async_trait]
impl UserApi for FakeUserApi {
    async fn list_managed_users(&self) -> AppResult<Vec<ManagedUser>> {
        Ok(Vec::new())
    }

    async fn create_managed_user(&self, input: &ManagedUserInput) -> AppResult<ManagedUser> {
        self.created.lock().await.push(input.username.clone());
        Err(AppError::Internal("not recorded".to_owned()))
    }

    async fn update_managed_user(&self, _input: &ManagedUserInput) -> AppResult<ManagedUser> {
        Err(AppError::Internal("not recorded".to_owned()))
    }

    async fn delete_managed_user(&self, _username: &Username) -> AppResult<()> {
        Ok(())
    }

    async fn list_directory_users(
        &self,
        directory: UserDirectory,
    ) -> AppResult<Vec<DirectoryUser>> {
        self.listed.lock().await.push(directory);
        self.directories
            .get(&directory)
            .map(clone_result)
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn add_membership(&self, _username: &Username, _team_id: TeamId) -> AppResult<()> {
        Ok(())
    }

    async fn remove_membership(&self, _username: &Username, _team_id: TeamId) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn managed_listing_decides_when_user_is_managed() -> AppResult<()> {
    let team_id = TeamId::from_uuid(Uuid::new_v4());
    let api = Arc::new(FakeUserApi {
        directories: HashMap::from([(
            UserDirectory::Managed,
            Ok(vec![member("jdoe", &[team_id])]),
        )]),
        ..FakeUserApi::default()
    });
    let service = UserService::new(api.clone());

    assert!(service.has_membership(&username("jdoe"), team_id).await?);
    assert_eq!(*api.listed.lock().await, vec![UserDirectory::Managed]);
    Ok(())
}

#[tokio::test]
async fn failing_ldap_listing_falls_through_to_oidc() -> AppResult<()> {
    let team_id = TeamId::from_uuid(Uuid::new_v4());
    let api = Arc::new(FakeUserApi {
        directories: HashMap::from([
            (
                UserDirectory::Ldap,
                Err(AppError::Remote {
                    status: 500,
                    message: "ldap disabled".to_owned(),
                }),
            ),
            (UserDirectory::Oidc, Ok(vec![member("sso", &[team_id])])),
        ]),
        ..FakeUserApi::default()
    });
    let service = UserService::new(api.clone());

    assert!(service.has_membership(&username("sso"), team_id).await?);
    assert_eq!(
        *api.listed.lock().await,
        vec![
            UserDirectory::Managed,
            UserDirectory::Ldap,
            UserDirectory::Oidc
        ]
    );
    Ok(())
}

#[tokio::test]
async fn first_directory_knowing_the_user_decides() -> AppResult<()> {
    let team_id = TeamId::from_uuid(Uuid::new_v4());
    let api = Arc::new(FakeUserApi {
        directories: HashMap::from([
            (UserDirectory::Managed, Ok(vec![member("jdoe", &[])])),
            (UserDirectory::Oidc, Ok(vec![member("jdoe", &[team_id])])),
        ]),
        ..FakeUserApi::default()
    });
    let service = UserService::new(api);

    assert!(!service.has_membership(&username("jdoe"), team_id).await?);
    Ok(())
}

#[tokio::test]
async fn managed_listing_failure_is_returned() {
    let api = Arc::new(FakeUserApi {
        directories: HashMap::from([(
            UserDirectory::Managed,
            Err(AppError::Unauthorized("bad key".to_owned())),
        )]),
        ..FakeUserApi::default()
    });
    let service = UserService::new(api);

    let result = service
        .has_membership(&username("jdoe"), TeamId::from_uuid(Uuid::new_v4()))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_call() {
    let api = Arc::new(FakeUserApi::default());
    let service = UserService::new(api.clone());

    let result = service
        .create(&ManagedUserInput {
            username: username("jdoe"),
            fullname: None,
            email: None,
            password: String::new(),
            suspended: false,
            force_password_change: false,
            non_expiry_password: false,
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(api.created.lock().await.is_empty());
}
