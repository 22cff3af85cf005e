use async_trait::async_trait;
use dtrack_application::{ConfigPropertyApi, NotificationApi, TeamApi};
use dtrack_core::AppResult;
use dtrack_domain::{
    ConfigProperty, ConfigPropertyKey, NotificationPublisher, NotificationPublisherId,
    NotificationPublisherInput, NotificationRule, NotificationRuleId, NotificationRuleInput,
    ProjectId, TeamId,
};
use uuid::Uuid;

use super::{InMemoryDependencyTrack, not_found};

impl InMemoryDependencyTrack {
    async fn ensure_publisher(&self, publisher_id: NotificationPublisherId) -> AppResult<()> {
        if self
            .publishers
            .read()
            .await
            .iter()
            .any(|publisher| publisher.id == publisher_id)
        {
            Ok(())
        } else {
            Err(not_found(format_args!(
                "notification publisher '{publisher_id}'"
            )))
        }
    }

    async fn with_rule(
        &self,
        rule_id: NotificationRuleId,
        change: impl FnOnce(&mut NotificationRule),
    ) -> AppResult<()> {
        let mut rules = self.rules.write().await;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| not_found(format_args!("notification rule '{rule_id}'")))?;
        change(rule);
        Ok(())
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T, present: bool) {
    items.retain(|existing| *existing != item);
    if present {
        items.push(item);
    }
}

#[async_trait]
impl ConfigPropertyApi for InMemoryDependencyTrack {
    async fn list_config_properties(&self) -> AppResult<Vec<ConfigProperty>> {
        Ok(self.config_properties.read().await.clone())
    }

    async fn update_config_property(
        &self,
        key: &ConfigPropertyKey,
        value: &str,
    ) -> AppResult<ConfigProperty> {
        let mut properties = self.config_properties.write().await;
        let property = properties
            .iter_mut()
            .find(|property| &property.key == key)
            .ok_or_else(|| not_found(format_args!("config property '{key}'")))?;
        property.value = Some(value.to_owned());
        Ok(property.clone())
    }
}

#[async_trait]
impl NotificationApi for InMemoryDependencyTrack {
    async fn list_publishers(&self) -> AppResult<Vec<NotificationPublisher>> {
        Ok(self.publishers.read().await.clone())
    }

    async fn create_publisher(
        &self,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        let publisher = NotificationPublisher {
            id: NotificationPublisherId::from_uuid(Uuid::new_v4()),
            attributes: input.clone(),
        };
        self.publishers.write().await.push(publisher.clone());
        Ok(publisher)
    }

    async fn update_publisher(
        &self,
        publisher_id: NotificationPublisherId,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        let mut publishers = self.publishers.write().await;
        let publisher = publishers
            .iter_mut()
            .find(|publisher| publisher.id == publisher_id)
            .ok_or_else(|| not_found(format_args!("notification publisher '{publisher_id}'")))?;
        publisher.attributes = input.clone();
        Ok(publisher.clone())
    }

    async fn delete_publisher(&self, publisher_id: NotificationPublisherId) -> AppResult<()> {
        let mut publishers = self.publishers.write().await;
        let before = publishers.len();
        publishers.retain(|publisher| publisher.id != publisher_id);
        if publishers.len() == before {
            return Err(not_found(format_args!(
                "notification publisher '{publisher_id}'"
            )));
        }
        Ok(())
    }

    async fn list_rules(&self) -> AppResult<Vec<NotificationRule>> {
        Ok(self.rules.read().await.clone())
    }

    async fn create_rule(&self, input: &NotificationRuleInput) -> AppResult<NotificationRule> {
        self.ensure_publisher(input.publisher).await?;
        // Creation only honours name, scope, level and publisher.
        let rule = NotificationRule {
            id: NotificationRuleId::from_uuid(Uuid::new_v4()),
            attributes: NotificationRuleInput {
                enabled: true,
                notify_children: true,
                log_successful_publish: false,
                notify_on: Vec::new(),
                publisher_config: None,
                ..input.clone()
            },
            projects: Vec::new(),
            teams: Vec::new(),
        };
        self.rules.write().await.push(rule.clone());
        Ok(rule)
    }

    async fn update_rule(
        &self,
        rule_id: NotificationRuleId,
        input: &NotificationRuleInput,
    ) -> AppResult<NotificationRule> {
        self.ensure_publisher(input.publisher).await?;
        self.with_rule(rule_id, |rule| rule.attributes = input.clone())
            .await?;
        self.rules
            .read()
            .await
            .iter()
            .find(|rule| rule.id == rule_id)
            .cloned()
            .ok_or_else(|| not_found(format_args!("notification rule '{rule_id}'")))
    }

    async fn delete_rule(&self, rule_id: NotificationRuleId) -> AppResult<()> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|rule| rule.id != rule_id);
        if rules.len() == before {
            return Err(not_found(format_args!("notification rule '{rule_id}'")));
        }
        Ok(())
    }

    async fn add_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.ensure_project(project_id).await?;
        self.with_rule(rule_id, |rule| toggle(&mut rule.projects, project_id, true))
            .await
    }

    async fn remove_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.with_rule(rule_id, |rule| toggle(&mut rule.projects, project_id, false))
            .await
    }

    async fn add_rule_team(&self, rule_id: NotificationRuleId, team_id: TeamId) -> AppResult<()> {
        self.get_team(team_id).await?;
        self.with_rule(rule_id, |rule| toggle(&mut rule.teams, team_id, true))
            .await
    }

    async fn remove_rule_team(
        &self,
        rule_id: NotificationRuleId,
        team_id: TeamId,
    ) -> AppResult<()> {
        self.with_rule(rule_id, |rule| toggle(&mut rule.teams, team_id, false))
            .await
    }
}
