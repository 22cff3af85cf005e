mod acl;
mod config_property;
mod notification;
mod permission;
mod policy;
mod project;
mod team;
mod user;

pub use acl::AclApi;
pub use config_property::ConfigPropertyApi;
pub use notification::NotificationApi;
pub use permission::PermissionApi;
pub use policy::PolicyApi;
pub use project::ProjectApi;
pub use team::TeamApi;
pub use user::UserApi;
