//! Domain entities and invariants.

#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod config_property;
mod ids;
mod notification;
mod permission;
mod policy;
mod project;
mod team;
mod user;

pub use config_property::{ConfigProperty, ConfigPropertyKey};
pub use ids::{
    NotificationPublisherId, NotificationRuleId, PolicyConditionId, PolicyId, ProjectId, TeamId,
    Username, composite_id, parse_composite_id,
};
pub use notification::{
    NotificationLevel, NotificationPublisher, NotificationPublisherInput, NotificationRule,
    NotificationRuleInput, NotificationScope,
};
pub use permission::{
    PermissionDiff, PermissionHolder, PermissionName, PermissionSet, WELL_KNOWN_PERMISSIONS,
};
pub use policy::{
    ConditionOperator, ConditionSubject, Policy, PolicyCondition, PolicyConditionInput,
    PolicyInput, PolicyOperator, ViolationState,
};
pub use project::{Project, ProjectClassifier, ProjectInput};
pub use team::{ApiKey, GeneratedApiKey, Team};
pub use user::{DirectoryUser, ManagedUser, ManagedUserInput, UserDirectory};
