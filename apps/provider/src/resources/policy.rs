use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{
    ConditionOperator, ConditionSubject, Policy, PolicyConditionId, PolicyConditionInput,
    PolicyId, PolicyInput, PolicyOperator, ViolationState,
};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct PolicyResource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    name: String,
    #[serde(default)]
    operator: PolicyOperator,
    #[serde(default)]
    violation_state: ViolationState,
    #[serde(default)]
    conditions: Vec<PolicyConditionInput>,
}

impl PolicyConfig {
    fn input(&self) -> PolicyInput {
        PolicyInput {
            name: self.name.clone(),
            operator: self.operator,
            violation_state: self.violation_state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionState {
    uuid: PolicyConditionId,
    subject: ConditionSubject,
    operator: ConditionOperator,
    value: String,
}

impl ConditionState {
    fn matches(&self, input: &PolicyConditionInput) -> bool {
        self.subject == input.subject
            && self.operator == input.operator
            && self.value == input.value
    }
}

/// `include_children` and `global` are reported by the server and never
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyState {
    id: PolicyId,
    name: String,
    operator: PolicyOperator,
    violation_state: ViolationState,
    conditions: Vec<ConditionState>,
    include_children: bool,
    global: bool,
}

impl From<Policy> for PolicyState {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id,
            name: policy.name,
            operator: policy.operator,
            violation_state: policy.violation_state,
            conditions: policy
                .conditions
                .into_iter()
                .map(|condition| ConditionState {
                    uuid: condition.id,
                    subject: condition.subject,
                    operator: condition.operator,
                    value: condition.value,
                })
                .collect(),
            include_children: policy.include_children,
            global: policy.global,
        }
    }
}

#[async_trait]
impl Resource for PolicyResource {
    type Config = PolicyConfig;
    type State = PolicyState;

    fn type_name(&self) -> &'static str {
        "policy"
    }

    async fn create(&self, ctx: &ProviderContext, config: &PolicyConfig) -> AppResult<PolicyState> {
        let policy = ctx
            .policies
            .create(&config.input(), &config.conditions)
            .await?;
        Ok(policy.into())
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &PolicyState,
    ) -> AppResult<Option<PolicyState>> {
        Ok(ctx.policies.get(state.id).await?.map(PolicyState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &PolicyConfig,
        state: &PolicyState,
    ) -> AppResult<PolicyState> {
        let recorded: Vec<PolicyConditionId> =
            state.conditions.iter().map(|condition| condition.uuid).collect();
        let policy = ctx
            .policies
            .update(state.id, &config.input(), &recorded, &config.conditions)
            .await?;
        Ok(policy.into())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &PolicyState) -> AppResult<()> {
        ctx.policies.delete(state.id).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<PolicyState> {
        let policy_id = PolicyId::parse(id)?;
        let policy = require(ctx.policies.get(policy_id).await?, || {
            format!("policy '{policy_id}'")
        })?;
        Ok(policy.into())
    }

    fn has_changes(&self, config: &PolicyConfig, state: &PolicyState) -> bool {
        config.name != state.name
            || config.operator != state.operator
            || config.violation_state != state.violation_state
            || config.conditions.len() != state.conditions.len()
            || !state
                .conditions
                .iter()
                .zip(&config.conditions)
                .all(|(recorded, desired)| recorded.matches(desired))
    }
}
