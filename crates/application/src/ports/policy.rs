use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{
    Policy, PolicyCondition, PolicyConditionId, PolicyConditionInput, PolicyId, PolicyInput,
    ProjectId,
};

/// Policy, policy condition and policy project link endpoints.
#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// Fetches a policy with its conditions. Missing policies are
    /// `AppError::NotFound`.
    async fn get_policy(&self, policy_id: PolicyId) -> AppResult<Policy>;

    /// Creates a policy without conditions.
    async fn create_policy(&self, input: &PolicyInput) -> AppResult<Policy>;

    /// Updates the scalar attributes of a policy.
    async fn update_policy(&self, policy_id: PolicyId, input: &PolicyInput) -> AppResult<Policy>;

    /// Deletes a policy and its conditions.
    async fn delete_policy(&self, policy_id: PolicyId) -> AppResult<()>;

    /// Adds a condition to a policy.
    async fn create_condition(
        &self,
        policy_id: PolicyId,
        input: &PolicyConditionInput,
    ) -> AppResult<PolicyCondition>;

    /// Deletes a condition.
    async fn delete_condition(&self, condition_id: PolicyConditionId) -> AppResult<()>;

    /// Limits a policy to a project.
    async fn add_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()>;

    /// Removes a project from a policy.
    async fn remove_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()>;
}
