use async_trait::async_trait;
use dtrack_application::PolicyApi;
use dtrack_core::AppResult;
use dtrack_domain::{
    Policy, PolicyCondition, PolicyConditionId, PolicyConditionInput, PolicyId, PolicyInput,
    ProjectId,
};
use reqwest::Method;

use super::DependencyTrackClient;
use crate::wire::{PolicyConditionDto, PolicyConditionWriteDto, PolicyDto, PolicyWriteDto};

#[async_trait]
impl PolicyApi for DependencyTrackClient {
    async fn get_policy(&self, policy_id: PolicyId) -> AppResult<Policy> {
        let what = format!("get policy '{policy_id}'");
        let builder = self.request(Method::GET, &["policy", &policy_id.to_string()])?;
        Ok(self.fetch::<PolicyDto>(builder, &what).await?.into_domain())
    }

    async fn create_policy(&self, input: &PolicyInput) -> AppResult<Policy> {
        let what = format!("create policy '{}'", input.name);
        let builder = self
            .request(Method::PUT, &["policy"])?
            .json(&PolicyWriteDto::new(None, input));
        Ok(self.fetch::<PolicyDto>(builder, &what).await?.into_domain())
    }

    async fn update_policy(&self, policy_id: PolicyId, input: &PolicyInput) -> AppResult<Policy> {
        let what = format!("update policy '{policy_id}'");
        let builder = self
            .request(Method::POST, &["policy"])?
            .json(&PolicyWriteDto::new(Some(policy_id), input));
        Ok(self.fetch::<PolicyDto>(builder, &what).await?.into_domain())
    }

    async fn delete_policy(&self, policy_id: PolicyId) -> AppResult<()> {
        let what = format!("delete policy '{policy_id}'");
        let builder = self.request(Method::DELETE, &["policy", &policy_id.to_string()])?;
        self.execute(builder, &what).await
    }

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        input: &PolicyConditionInput,
    ) -> AppResult<PolicyCondition> {
        let what = format!("create condition on policy '{policy_id}'");
        let builder = self
            .request(Method::PUT, &["policy", &policy_id.to_string(), "condition"])?
            .json(&PolicyConditionWriteDto::from(input));
        Ok(self
            .fetch::<PolicyConditionDto>(builder, &what)
            .await?
            .into_domain())
    }

    async fn delete_condition(&self, condition_id: PolicyConditionId) -> AppResult<()> {
        let what = format!("delete policy condition '{condition_id}'");
        let builder = self.request(
            Method::DELETE,
            &["policy", "condition", &condition_id.to_string()],
        )?;
        self.execute(builder, &what).await
    }

    async fn add_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        let what = format!("link policy '{policy_id}' to project '{project_id}'");
        let builder = self.request(
            Method::POST,
            &[
                "policy",
                &policy_id.to_string(),
                "project",
                &project_id.to_string(),
            ],
        )?;
        self.execute(builder, &what).await
    }

    async fn remove_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        let what = format!("unlink policy '{policy_id}' from project '{project_id}'");
        let builder = self.request(
            Method::DELETE,
            &[
                "policy",
                &policy_id.to_string(),
                "project",
                &project_id.to_string(),
            ],
        )?;
        self.execute(builder, &what).await
    }
}
