use serde::{Deserialize, Serialize};

use crate::{NotificationPublisherId, NotificationRuleId, ProjectId, TeamId};

wire_enum!(
    /// Scope a notification rule listens on.
    NotificationScope, "notification scope" {
        /// Portfolio events.
        Portfolio => "PORTFOLIO",
        /// System events.
        System => "SYSTEM",
    }
);

wire_enum!(
    /// Minimum level a notification rule fires for.
    NotificationLevel, "notification level" {
        /// Informational.
        Informational => "INFORMATIONAL",
        /// Warning.
        Warning => "WARNING",
        /// Error.
        Error => "ERROR",
    }
);

impl Default for NotificationLevel {
    fn default() -> Self {
        Self::Informational
    }
}

/// Desired notification publisher attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPublisherInput {
    /// Publisher name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Fully qualified publisher implementation class.
    pub publisher_class: String,
    /// Optional template body.
    pub template: Option<String>,
    /// Template MIME type.
    pub template_mime_type: String,
    /// Whether the publisher ships with the server.
    pub default_publisher: bool,
}

/// Notification publisher as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPublisher {
    /// Server-assigned identifier.
    pub id: NotificationPublisherId,
    /// Reported attributes.
    pub attributes: NotificationPublisherInput,
}

/// Desired notification rule attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRuleInput {
    /// Rule name.
    pub name: String,
    /// Listened scope.
    pub scope: NotificationScope,
    /// Minimum level.
    pub notification_level: NotificationLevel,
    /// Whether the rule is enabled.
    pub enabled: bool,
    /// Whether child projects trigger the rule.
    pub notify_children: bool,
    /// Whether successful publishes are logged.
    pub log_successful_publish: bool,
    /// Notification groups the rule fires on.
    pub notify_on: Vec<String>,
    /// Publisher used to deliver notifications.
    pub publisher: NotificationPublisherId,
    /// Optional publisher configuration document.
    pub publisher_config: Option<String>,
}

impl NotificationRuleInput {
    /// Returns whether any attribute the create endpoint drops differs from
    /// the value it stores instead.
    #[must_use]
    pub fn needs_follow_up_update(&self) -> bool {
        !self.notify_on.is_empty()
            || !self.enabled
            || !self.notify_children
            || self.log_successful_publish
    }
}

/// Notification rule as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRule {
    /// Server-assigned identifier.
    pub id: NotificationRuleId,
    /// Reported attributes.
    pub attributes: NotificationRuleInput,
    /// Projects the rule is limited to.
    pub projects: Vec<ProjectId>,
    /// Teams notified by the rule.
    pub teams: Vec<TeamId>,
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{NotificationLevel, NotificationRuleInput, NotificationScope};
    use crate::NotificationPublisherId;

    fn input() -> NotificationRuleInput {
        NotificationRuleInput {
            name: "alerts".to_owned(),
            scope: NotificationScope::Portfolio,
            notification_level: NotificationLevel::default(),
            enabled: true,
            notify_children: true,
            log_successful_publish: false,
            notify_on: Vec::new(),
            publisher: NotificationPublisherId::from_uuid(Uuid::nil()),
            publisher_config: None,
        }
    }

    #[test]
    fn create_defaults_need_no_follow_up() {
        assert!(!input().needs_follow_up_update());
    }

    #[test]
    fn dropped_attributes_need_follow_up() {
        let mut with_groups = input();
        with_groups.notify_on = vec!["NEW_VULNERABILITY".to_owned()];
        assert!(with_groups.needs_follow_up_update());

        let mut disabled = input();
        disabled.enabled = false;
        assert!(disabled.needs_follow_up_update());

        let mut logging = input();
        logging.log_successful_publish = true;
        assert!(logging.needs_follow_up_update());
    }
}
