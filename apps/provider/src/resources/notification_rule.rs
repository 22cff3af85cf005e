use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{
    NotificationLevel, NotificationPublisherId, NotificationRule, NotificationRuleId,
    NotificationRuleInput, NotificationScope, ProjectId, TeamId,
};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct NotificationRuleResource;

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAttributes {
    name: String,
    scope: NotificationScope,
    #[serde(default)]
    notification_level: NotificationLevel,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default = "enabled_by_default")]
    notify_children: bool,
    #[serde(default)]
    log_successful_publish: bool,
    #[serde(default)]
    notify_on: Vec<String>,
    publisher: NotificationPublisherId,
    #[serde(default)]
    publisher_config: Option<String>,
}

impl RuleAttributes {
    fn input(&self) -> NotificationRuleInput {
        NotificationRuleInput {
            name: self.name.clone(),
            scope: self.scope,
            notification_level: self.notification_level,
            enabled: self.enabled,
            notify_children: self.notify_children,
            log_successful_publish: self.log_successful_publish,
            notify_on: self.notify_on.clone(),
            publisher: self.publisher,
            publisher_config: self.publisher_config.clone(),
        }
    }

    /// Notification groups compare as sets, the server does not keep order.
    fn same_as(&self, other: &Self) -> bool {
        let sorted = |groups: &[String]| {
            let mut groups = groups.to_vec();
            groups.sort();
            groups
        };
        Self {
            notify_on: sorted(&self.notify_on),
            ..self.clone()
        } == Self {
            notify_on: sorted(&other.notify_on),
            ..other.clone()
        }
    }
}

impl From<NotificationRuleInput> for RuleAttributes {
    fn from(input: NotificationRuleInput) -> Self {
        Self {
            name: input.name,
            scope: input.scope,
            notification_level: input.notification_level,
            enabled: input.enabled,
            notify_children: input.notify_children,
            log_successful_publish: input.log_successful_publish,
            notify_on: input.notify_on,
            publisher: input.publisher,
            publisher_config: input.publisher_config,
        }
    }
}

/// `projects` and `teams` are managed through the link resources and only
/// mirrored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleState {
    id: NotificationRuleId,
    #[serde(flatten)]
    attributes: RuleAttributes,
    projects: Vec<ProjectId>,
    teams: Vec<TeamId>,
}

impl From<NotificationRule> for RuleState {
    fn from(rule: NotificationRule) -> Self {
        Self {
            id: rule.id,
            attributes: rule.attributes.into(),
            projects: rule.projects,
            teams: rule.teams,
        }
    }
}

#[async_trait]
impl Resource for NotificationRuleResource {
    type Config = RuleAttributes;
    type State = RuleState;

    fn type_name(&self) -> &'static str {
        "notification_rule"
    }

    async fn create(&self, ctx: &ProviderContext, config: &RuleAttributes) -> AppResult<RuleState> {
        Ok(ctx.notifications.create_rule(&config.input()).await?.into())
    }

    async fn read(&self, ctx: &ProviderContext, state: &RuleState) -> AppResult<Option<RuleState>> {
        Ok(ctx
            .notifications
            .find_rule(state.id)
            .await?
            .map(RuleState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &RuleAttributes,
        state: &RuleState,
    ) -> AppResult<RuleState> {
        Ok(ctx
            .notifications
            .update_rule(state.id, &config.input())
            .await?
            .into())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &RuleState) -> AppResult<()> {
        ctx.notifications.delete_rule(state.id).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<RuleState> {
        let rule_id = NotificationRuleId::parse(id)?;
        let rule = require(ctx.notifications.find_rule(rule_id).await?, || {
            format!("notification rule '{rule_id}'")
        })?;
        Ok(rule.into())
    }

    fn has_changes(&self, config: &RuleAttributes, state: &RuleState) -> bool {
        !config.same_as(&state.attributes)
    }
}
