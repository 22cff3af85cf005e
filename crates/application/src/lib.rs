//! Application services and ports.

#![forbid(unsafe_code)]

mod acl_service;
mod config_property_service;
mod lookup;
mod notification_service;
mod pagination;
mod permission_reconciler;
mod policy_service;
mod ports;
mod project_service;
mod team_service;
mod user_service;

pub use acl_service::AclService;
pub use config_property_service::ConfigPropertyService;
pub use lookup::{found, require};
pub use notification_service::NotificationService;
pub use pagination::{Page, PageRequest, find_first};
pub use permission_reconciler::PermissionReconciler;
pub use policy_service::PolicyService;
pub use ports::{
    AclApi, ConfigPropertyApi, NotificationApi, PermissionApi, PolicyApi, ProjectApi, TeamApi,
    UserApi,
};
pub use project_service::ProjectService;
pub use team_service::TeamService;
pub use user_service::UserService;
