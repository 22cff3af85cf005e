use std::sync::Arc;

use dtrack_core::AppResult;
use dtrack_domain::{
    Policy, PolicyConditionId, PolicyConditionInput, PolicyId, PolicyInput, ProjectId,
};
use tracing::{debug, info};

use crate::PolicyApi;
use crate::lookup::{found, require};

#[cfg(test)]
mod tests;

/// Policy, condition and policy project link operations.
#[derive(Clone)]
pub struct PolicyService {
    api: Arc<dyn PolicyApi>,
}

impl PolicyService {
    /// Creates a policy service.
    #[must_use]
    pub fn new(api: Arc<dyn PolicyApi>) -> Self {
        Self { api }
    }

    /// Creates a policy followed by each condition in order.
    pub async fn create(
        &self,
        input: &PolicyInput,
        conditions: &[PolicyConditionInput],
    ) -> AppResult<Policy> {
        let policy = self.api.create_policy(input).await?;
        info!(policy_id = %policy.id, name = %policy.name, "created policy");

        self.create_conditions(policy.id, conditions).await?;
        self.reload(policy.id).await
    }

    /// Fetches a policy, `None` when it no longer exists.
    pub async fn get(&self, policy_id: PolicyId) -> AppResult<Option<Policy>> {
        found(self.api.get_policy(policy_id).await)
    }

    /// Updates the policy and replaces every recorded condition.
    pub async fn update(
        &self,
        policy_id: PolicyId,
        input: &PolicyInput,
        recorded_conditions: &[PolicyConditionId],
        conditions: &[PolicyConditionInput],
    ) -> AppResult<Policy> {
        self.api.update_policy(policy_id, input).await?;

        for condition_id in recorded_conditions {
            self.api.delete_condition(*condition_id).await?;
            debug!(
                policy_id = %policy_id,
                condition_id = %condition_id,
                "deleted policy condition"
            );
        }

        self.create_conditions(policy_id, conditions).await?;
        info!(policy_id = %policy_id, conditions = conditions.len(), "updated policy");
        self.reload(policy_id).await
    }

    /// Deletes a policy.
    pub async fn delete(&self, policy_id: PolicyId) -> AppResult<()> {
        self.api.delete_policy(policy_id).await?;
        info!(policy_id = %policy_id, "deleted policy");
        Ok(())
    }

    /// Limits a policy to a project.
    pub async fn add_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        self.api.add_project(policy_id, project_id).await?;
        info!(policy_id = %policy_id, project_id = %project_id, "linked policy to project");
        Ok(())
    }

    /// Removes a project from a policy.
    pub async fn remove_project(
        &self,
        policy_id: PolicyId,
        project_id: ProjectId,
    ) -> AppResult<()> {
        self.api.remove_project(policy_id, project_id).await?;
        info!(policy_id = %policy_id, project_id = %project_id, "unlinked policy from project");
        Ok(())
    }

    /// Returns whether the policy is limited to the project. A missing
    /// policy has no links.
    pub async fn has_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<bool> {
        Ok(self
            .get(policy_id)
            .await?
            .is_some_and(|policy| policy.projects.contains(&project_id)))
    }

    async fn create_conditions(
        &self,
        policy_id: PolicyId,
        conditions: &[PolicyConditionInput],
    ) -> AppResult<()> {
        for condition in conditions {
            let created = self.api.create_condition(policy_id, condition).await?;
            debug!(policy_id = %policy_id, condition_id = %created.id, "created policy condition");
        }

        Ok(())
    }

    async fn reload(&self, policy_id: PolicyId) -> AppResult<Policy> {
        require(self.get(policy_id).await?, || format!("policy '{policy_id}'"))
    }
}
