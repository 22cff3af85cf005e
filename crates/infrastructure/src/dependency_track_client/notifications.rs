use async_trait::async_trait;
use dtrack_application::NotificationApi;
use dtrack_core::AppResult;
use dtrack_domain::{
    NotificationPublisher, NotificationPublisherId, NotificationPublisherInput, NotificationRule,
    NotificationRuleId, NotificationRuleInput, ProjectId, TeamId,
};
use reqwest::Method;

use super::{DependencyTrackClient, missing_uuid};
use crate::wire::{NotificationPublisherDto, NotificationRuleDto, UuidRef};

impl DependencyTrackClient {
    async fn rule_link(
        &self,
        method: Method,
        rule_id: NotificationRuleId,
        kind: &str,
        other: String,
    ) -> AppResult<()> {
        let action = if method == Method::DELETE { "unlink" } else { "link" };
        let what = format!("{action} notification rule '{rule_id}' and {kind} '{other}'");
        let builder = self.request(
            method,
            &["notification", "rule", &rule_id.to_string(), kind, &other],
        )?;
        self.execute(builder, &what).await
    }

    async fn write_publisher(
        &self,
        method: Method,
        body: NotificationPublisherDto,
        what: String,
    ) -> AppResult<NotificationPublisher> {
        let builder = self
            .request(method, &["notification", "publisher"])?
            .json(&body);
        self.fetch::<NotificationPublisherDto>(builder, &what)
            .await?
            .into_domain()
            .ok_or_else(|| missing_uuid(&what))
    }

    async fn write_rule(
        &self,
        method: Method,
        body: NotificationRuleDto,
        what: String,
    ) -> AppResult<NotificationRule> {
        let builder = self
            .request(method, &["notification", "rule"])?
            .json(&body);
        self.fetch::<NotificationRuleDto>(builder, &what)
            .await?
            .into_domain()
            .ok_or_else(|| missing_uuid(&what))
    }
}

#[async_trait]
impl NotificationApi for DependencyTrackClient {
    async fn list_publishers(&self) -> AppResult<Vec<NotificationPublisher>> {
        let what = "list notification publishers";
        let builder = self.request(Method::GET, &["notification", "publisher"])?;
        self.fetch::<Vec<NotificationPublisherDto>>(builder, what)
            .await?
            .into_iter()
            .map(|publisher| publisher.into_domain().ok_or_else(|| missing_uuid(what)))
            .collect()
    }

    async fn create_publisher(
        &self,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        self.write_publisher(
            Method::PUT,
            NotificationPublisherDto::from_input(None, input),
            format!("create notification publisher '{}'", input.name),
        )
        .await
    }

    async fn update_publisher(
        &self,
        publisher_id: NotificationPublisherId,
        input: &NotificationPublisherInput,
    ) -> AppResult<NotificationPublisher> {
        self.write_publisher(
            Method::POST,
            NotificationPublisherDto::from_input(Some(publisher_id), input),
            format!("update notification publisher '{publisher_id}'"),
        )
        .await
    }

    async fn delete_publisher(&self, publisher_id: NotificationPublisherId) -> AppResult<()> {
        let what = format!("delete notification publisher '{publisher_id}'");
        let builder = self.request(
            Method::DELETE,
            &["notification", "publisher", &publisher_id.to_string()],
        )?;
        self.execute(builder, &what).await
    }

    async fn list_rules(&self) -> AppResult<Vec<NotificationRule>> {
        let what = "list notification rules";
        let builder = self.request(Method::GET, &["notification", "rule"])?;
        self.fetch::<Vec<NotificationRuleDto>>(builder, what)
            .await?
            .into_iter()
            .map(|rule| rule.into_domain().ok_or_else(|| missing_uuid(what)))
            .collect()
    }

    async fn create_rule(&self, input: &NotificationRuleInput) -> AppResult<NotificationRule> {
        self.write_rule(
            Method::PUT,
            NotificationRuleDto::from_input(None, input),
            format!("create notification rule '{}'", input.name),
        )
        .await
    }

    async fn update_rule(
        &self,
        rule_id: NotificationRuleId,
        input: &NotificationRuleInput,
    ) -> AppResult<NotificationRule> {
        self.write_rule(
            Method::POST,
            NotificationRuleDto::from_input(Some(rule_id), input),
            format!("update notification rule '{rule_id}'"),
        )
        .await
    }

    async fn delete_rule(&self, rule_id: NotificationRuleId) -> AppResult<()> {
        let what = format!("delete notification rule '{rule_id}'");
        let builder = self
            .request(Method::DELETE, &["notification", "rule"])?
            .json(&UuidRef::new(rule_id.as_uuid()));
        self.execute(builder, &what).await
    }

    async fn add_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.rule_link(Method::POST, rule_id, "project", project_id.to_string())
            .await
    }

    async fn remove_rule_project(
        &self,
        rule_id: NotificationRuleId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.rule_link(Method::DELETE, rule_id, "project", project_id.to_string())
            .await
    }

    async fn add_rule_team(&self, rule_id: NotificationRuleId, team_id: TeamId) -> AppResult<()> {
        self.rule_link(Method::POST, rule_id, "team", team_id.to_string())
            .await
    }

    async fn remove_rule_team(
        &self,
        rule_id: NotificationRuleId,
        team_id: TeamId,
    ) -> AppResult<()> {
        self.rule_link(Method::DELETE, rule_id, "team", team_id.to_string())
            .await
    }
}
