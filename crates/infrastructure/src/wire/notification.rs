use dtrack_domain::{
    NotificationLevel, NotificationPublisher, NotificationPublisherId, NotificationPublisherInput,
    NotificationRule, NotificationRuleId, NotificationRuleInput, NotificationScope, ProjectId,
    TeamId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UuidRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPublisherDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub publisher_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub template_mime_type: String,
    #[serde(default)]
    pub default_publisher: bool,
}

impl NotificationPublisherDto {
    pub fn from_input(
        uuid: Option<NotificationPublisherId>,
        input: &NotificationPublisherInput,
    ) -> Self {
        Self {
            uuid: uuid.map(|id| id.as_uuid()),
            name: input.name.clone(),
            description: input.description.clone(),
            publisher_class: input.publisher_class.clone(),
            template: input.template.clone(),
            template_mime_type: input.template_mime_type.clone(),
            default_publisher: input.default_publisher,
        }
    }

    pub fn into_domain(self) -> Option<NotificationPublisher> {
        Some(NotificationPublisher {
            id: NotificationPublisherId::from_uuid(self.uuid?),
            attributes: NotificationPublisherInput {
                name: self.name,
                description: self.description,
                publisher_class: self.publisher_class,
                template: self.template,
                template_mime_type: self.template_mime_type,
                default_publisher: self.default_publisher,
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRuleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub name: String,
    pub enabled: bool,
    pub notify_children: bool,
    pub log_successful_publish: bool,
    pub scope: NotificationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_level: Option<NotificationLevel>,
    #[serde(default, skip_serializing)]
    pub projects: Vec<UuidRef>,
    #[serde(default, skip_serializing)]
    pub teams: Vec<UuidRef>,
    #[serde(default)]
    pub notify_on: Vec<String>,
    pub publisher: UuidRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_config: Option<String>,
}

impl NotificationRuleDto {
    pub fn from_input(uuid: Option<NotificationRuleId>, input: &NotificationRuleInput) -> Self {
        Self {
            uuid: uuid.map(|id| id.as_uuid()),
            name: input.name.clone(),
            enabled: input.enabled,
            notify_children: input.notify_children,
            log_successful_publish: input.log_successful_publish,
            scope: input.scope,
            notification_level: Some(input.notification_level),
            projects: Vec::new(),
            teams: Vec::new(),
            notify_on: input.notify_on.clone(),
            publisher: UuidRef::new(input.publisher.as_uuid()),
            publisher_config: input.publisher_config.clone(),
        }
    }

    pub fn into_domain(self) -> Option<NotificationRule> {
        Some(NotificationRule {
            id: NotificationRuleId::from_uuid(self.uuid?),
            attributes: NotificationRuleInput {
                name: self.name,
                scope: self.scope,
                notification_level: self.notification_level.unwrap_or_default(),
                enabled: self.enabled,
                notify_children: self.notify_children,
                log_successful_publish: self.log_successful_publish,
                notify_on: self.notify_on,
                publisher: NotificationPublisherId::from_uuid(self.publisher.uuid),
                publisher_config: self.publisher_config,
            },
            projects: self
                .projects
                .iter()
                .map(|project| ProjectId::from_uuid(project.uuid))
                .collect(),
            teams: self
                .teams
                .iter()
                .map(|team| TeamId::from_uuid(team.uuid))
                .collect(),
        })
    }
}
