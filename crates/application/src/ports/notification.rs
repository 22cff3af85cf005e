use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{
    NotificationPublisher, NotificationPublisherId, NotificationPublisherInput, NotificationRule,
    NotificationRuleId, NotificationRuleInput, ProjectId, TeamId,
};

/// Notification publisher and rule endpoints.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Lists every publisher.
    async fn list_publishers(&self) -> AppResult<Vec<NotificationPublisher>>;

    /// Creates a publisher.
    async fn create_publisher(
        &self,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher>;

    /// Updates a publisher.
    async fn update_publisher(
        &self,
        publisher_id: NotificationPublisherId,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher>;

    /// Deletes a publisher.
    async fn delete_publisher(&self, publisher_id: NotificationPublisherId) -> AppResult<()>;

    /// Lists every rule.
    async fn list_rules(&self) -> AppResult<Vec<NotificationRule>>;

    /// Creates a rule. The server drops some attributes on create, see
    /// [`NotificationRuleInput::needs_follow_up_update`].
    async fn create_rule(&self, input: &NotificationRuleInput) -> AppResult<NotificationRule>;

    /// Updates every attribute of a rule.
    async fn update_rule(
        &self,
        rule_id: NotificationRuleId,
        input: &NotificationRuleInput,
    ) -> AppResult<NotificationRule>;

    /// Deletes a rule.
    async fn delete_rule(&self, rule_id: NotificationRuleId) -> AppResult<()>;

    /// Limits a rule to a project.
    async fn add_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()>;

    /// Removes a project from a rule.
    async fn remove_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()>;

    /// Adds a team to notify.
    async fn add_rule_team(&self, rule_id: NotificationRuleId, team_id: TeamId) -> AppResult<()>;

    /// Removes a notified team.
    async fn remove_rule_team(&self, rule_id: NotificationRuleId, team_id: TeamId)
    -> AppResult<()>;
}
