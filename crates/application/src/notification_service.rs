use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{
    NotificationPublisher, NotificationPublisherId, NotificationPublisherInput, NotificationRule,
    NotificationRuleId, NotificationRuleInput, ProjectId, TeamId,
};
use tracing::{debug, info};

use crate::NotificationApi;


/// Notification publisher, rule and rule link operations.
#[derive(Clone)]
pub struct NotificationService {
    api: Arc<dyn NotificationApi>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(api: Arc<dyn NotificationApi>) -> Self {
        Self { api }
    }

    /// Creates a publisher.
    pub async fn create_publisher(
        &self,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        let publisher = self.api.create_publisher(input).await?;
        info!(publisher_id = %publisher.id, name = %input.name, "created notification publisher");
        Ok(publisher)
    }

    /// Finds a publisher by identifier.
    pub async fn find_publisher(
        &self,
        publisher_id: NotificationPublisherId,
    ) -> AppResult<Option<NotificationPublisher>> {
        Ok(self
            .api
            .list_publishers()
            .await?
            .into_iter()
            .find(|publisher| publisher.id == publisher_id))
    }

    /// Updates a publisher.
    pub async fn update_publisher(
        &self,
        publisher_id: NotificationPublisherId,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        let publisher = self.api.update_publisher(publisher_id, input).await?;
        info!(publisher_id = %publisher_id, "updated notification publisher");
        Ok(publisher)
    }

    /// Deletes a publisher.
    pub async fn delete_publisher(&self, publisher_id: NotificationPublisherId) -> AppResult<()> {
        self.api.delete_publisher(publisher_id).await?;
        info!(publisher_id = %publisher_id, "deleted notification publisher");
        Ok(())
    }

    /// Creates a rule, following up with an update when the create call
    /// would have dropped configured attributes.
    pub async fn create_rule(&self, input: &NotificationRuleInput) -> AppResult<NotificationRule> {
        let created = self.api.create_rule(input).await?;
        info!(rule_id = %created.id, name = %input.name, "created notification rule");

        if !input.needs_follow_up_update() {
            return Ok(created);
        }

        debug!(rule_id = %created.id, "applying attributes ignored on create");
        self.api.update_rule(created.id, input).await
    }

    /// Finds a rule by identifier.
    pub async fn find_rule(
        &self,
        rule_id: NotificationRuleId,
    ) -> AppResult<Option<NotificationRule>> {
        Ok(self
            .api
            .list_rules()
            .await?
            .into_iter()
            .find(|rule| rule.id == rule_id))
    }

    /// Updates a rule.
    pub async fn update_rule(
        &self,
        rule_id: NotificationRuleId,
        input: &NotificationRuleInput,
    ) -> AppResult<NotificationRule> {
        let rule = self.api.update_rule(rule_id, input).await?;
        info!(rule_id = %rule_id, "updated notification rule");
        Ok(rule)
    }

    /// Deletes a rule.
    pub async fn delete_rule(&self, rule_id: NotificationRuleId) -> AppResult<()> {
        self.api.delete_rule(rule_id).await?;
        info!(rule_id = %rule_id, "deleted notification rule");
        Ok(())
    }

    /// Limits a rule to a project.
    pub async fn add_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.api.add_rule_project(rule_id, project_id).await?;
        info!(rule_id = %rule_id, project_id = %project_id, "linked notification rule to project");
        Ok(())
    }

    /// Removes a project from a rule.
    pub async fn remove_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.api.remove_rule_project(rule_id, project_id).await?;
        info!(
            rule_id = %rule_id,
            project_id = %project_id,
            "unlinked notification rule from project"
        );
        Ok(())
    }

    /// Returns whether the rule is limited to the project. A missing rule
    /// has no links.
    pub async fn has_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<bool> {
        Ok(self
            .find_rule(rule_id)
            .await?
            .is_some_and(|rule| rule.projects.contains(&project_id)))
    }

    /// Adds a team to notify.
    pub async fn add_rule_team(
        &self,
        rule_id: NotificationRuleId,
        team_id: TeamId,
    ) -> AppResult<()> {
        self.api.add_rule_team(rule_id, team_id).await?;
        info!(rule_id = %rule_id, team_id = %team_id, "linked notification rule to team");
        Ok(())
    }

    /// Removes a notified team.
    pub async fn remove_rule_team(
        &self,
        rule_id: NotificationRuleId,
        team_id: TeamId,
    ) -> AppResult<()> {
        self.api.remove_rule_team(rule_id, team_id).await?;
        info!(rule_id = %rule_id, team_id = %team_id, "unlinked notification rule from team");
        Ok(())
    }

    /// Returns whether the rule notifies the team. A missing rule has no
    /// links.
    pub async fn has_rule_team(
        &self,
        rule_id: NotificationRuleId,
        team_id: TeamId,
    ) -> AppResult<bool> {
        Ok(self
            .find_rule(rule_id)
            .await?
            .is_some_and(|rule| rule.teams.contains(&team_id)))
    }
}
