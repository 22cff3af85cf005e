use std::sync::Arc;

use dtrack_application::{
    AclApi, AclService, ConfigPropertyApi, ConfigPropertyService, NotificationApi,
    NotificationService, PermissionApi, PermissionReconciler, PolicyApi, PolicyService,
    ProjectApi, ProjectService, TeamApi, TeamService, UserApi, UserService,
};

/// Services shared by every resource adapter and data source.
///
/// Built once per run and passed by reference.
#[derive(Clone)]
pub struct ProviderContext {
    pub permissions: PermissionReconciler,
    pub teams: TeamService,
    pub users: UserService,
    pub projects: ProjectService,
    pub policies: PolicyService,
    pub config_properties: ConfigPropertyService,
    pub notifications: NotificationService,
    pub acl: AclService,
}

impl ProviderContext {
    /// Wires every service against one server implementation.
    #[must_use]
    pub fn new<A>(api: Arc<A>, page_size: u32) -> Self
    where
        A: TeamApi
            + UserApi
            + PermissionApi
            + ProjectApi
            + PolicyApi
            + ConfigPropertyApi
            + NotificationApi
            + AclApi
            + 'static,
    {
        Self {
            permissions: PermissionReconciler::new(api.clone()),
            teams: TeamService::new(api.clone(), page_size),
            users: UserService::new(api.clone()),
            projects: ProjectService::new(api.clone()),
            policies: PolicyService::new(api.clone()),
            config_properties: ConfigPropertyService::new(api.clone()),
            notifications: NotificationService::new(api.clone()),
            acl: AclService::new(api, page_size),
        }
    }
}
