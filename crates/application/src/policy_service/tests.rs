use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{
    ConditionOperator, ConditionSubject, Policy, PolicyCondition, PolicyConditionId,
    PolicyConditionInput, PolicyId, PolicyInput, PolicyOperator, ProjectId, ViolationState,
};

use crate::PolicyApi;

use super::PolicyService;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    DeleteCondition(PolicyConditionId),
    CreateCondition(String),
}

#[derive(Default)]
struct FakePolicyApi {
    policy: Mutex<Option<Policy>>,
    calls: Mutex<Vec<Call>>,
}

impl FakePolicyApi {
    async fn stored(&self) -> AppResult<Policy> {
        self.policy
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::NotFound("policy".to_owned()))
    }
}

#[async_trait]
impl PolicyApi for FakePolicyApi {
    async fn get_policy(&self, _policy_id: PolicyId) -> AppResult<Policy> {
        self.stored().await
    }

    async fn create_policy(&self, input: &PolicyInput) -> AppResult<Policy> {
        let policy = Policy {
            id: PolicyId::from_uuid(Uuid::new_v4()),
            name: input.name.clone(),
            operator: input.operator,
            violation_state: input.violation_state,
            conditions: Vec::new(),
            projects: Vec::new(),
            include_children: false,
            global: true,
        };
        *self.policy.lock().await = Some(policy.clone());
        Ok(policy)
    }

    async fn update_policy(&self, _policy_id: PolicyId, input: &PolicyInput) -> AppResult<Policy> {
        let mut guard = self.policy.lock().await;
        let policy = guard
            .as_mut()
            .ok_or_else(|| AppError::NotFound("policy".to_owned()))?;
        policy.name = input.name.clone();
        policy.operator = input.operator;
        policy.violation_state = input.violation_state;
        Ok(policy.clone())
    }

    async fn delete_policy(&self, _policy_id: PolicyId) -> AppResult<()> {
        *self.policy.lock().await = None;
        Ok(())
    }

    async fn create_condition(
        &self,
        _policy_id: PolicyId,
        input: &PolicyConditionInput,
    ) -> AppResult<PolicyCondition> {
        self.calls
            .lock()
            .await
            .push(Call::CreateCondition(input.value.clone()));
        let condition = PolicyCondition {
            id: PolicyConditionId::from_uuid(Uuid::new_v4()),
            subject: input.subject,
            operator: input.operator,
            value: input.value.clone(),
        };
        if let Some(policy) = self.policy.lock().await.as_mut() {
            policy.conditions.push(condition.clone());
        }
        Ok(condition)
    }

    async fn delete_condition(&self, condition_id: PolicyConditionId) -> AppResult<()> {
        self.calls
            .lock()
            .await
            .push(Call::DeleteCondition(condition_id));
        if let Some(policy) = self.policy.lock().await.as_mut() {
            policy.conditions.retain(|condition| condition.id != condition_id);
        }
        Ok(())
    }

    async fn add_project(&self, _policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        if let Some(policy) = self.policy.lock().await.as_mut() {
            policy.projects.push(project_id);
        }
        Ok(())
    }

    async fn remove_project(&self, _policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        if let Some(policy) = self.policy.lock().await.as_mut() {
            policy.projects.retain(|id| *id != project_id);
        }
        Ok(())
    }
}

fn input() -> PolicyInput {
    PolicyInput {
        name: "no-copyleft".to_owned(),
        operator: PolicyOperator::Any,
        violation_state: ViolationState::Fail,
    }
}

fn condition(value: &str) -> PolicyConditionInput {
    PolicyConditionInput {
        subject: ConditionSubject::LicenseGroup,
        operator: ConditionOperator::Is,
        value: value.to_owned(),
    }
}

#[tokio::test]
async fn create_adds_conditions_in_order() -> AppResult<()> {
    let api = Arc::new(FakePolicyApi::default());
    let service = PolicyService::new(api.clone());

    let policy = service
        .create(&input(), &[condition("gpl"), condition("agpl")])
        .await?;

    let values: Vec<&str> = policy
        .conditions
        .iter()
        .map(|condition| condition.value.as_str())
        .collect();
    assert_eq!(values, vec!["gpl", "agpl"]);
    Ok(())
}

#[tokio::test]
async fn update_replaces_every_recorded_condition() -> AppResult<()> {
    let api = Arc::new(FakePolicyApi::default());
    let service = PolicyService::new(api.clone());
    let created = service.create(&input(), &[condition("gpl")]).await?;
    let recorded: Vec<PolicyConditionId> = created.conditions.iter().map(|c| c.id).collect();
    api.calls.lock().await.clear();

    let updated = service
        .update(created.id, &input(), &recorded, &[condition("lgpl")])
        .await?;

    assert_eq!(
        *api.calls.lock().await,
        vec![
            Call::DeleteCondition(recorded[0]),
            Call::CreateCondition("lgpl".to_owned())
        ]
    );
    assert_eq!(updated.conditions.len(), 1);
    Ok(())
}

#[tokio::test]
async fn project_link_of_missing_policy_is_absent() -> AppResult<()> {
    let service = PolicyService::new(Arc::new(FakePolicyApi::default()));

    let linked = service
        .has_project(
            PolicyId::from_uuid(Uuid::new_v4()),
            ProjectId::from_uuid(Uuid::new_v4()),
        )
        .await?;

    assert!(!linked);
    Ok(())
}

#[tokio::test]
async fn project_links_round_trip() -> AppResult<()> {
    let service = PolicyService::new(Arc::new(FakePolicyApi::default()));
    let policy = service.create(&input(), &[]).await?;
    let project_id = ProjectId::from_uuid(Uuid::new_v4());

    service.add_project(policy.id, project_id).await?;
    assert!(service.has_project(policy.id, project_id).await?);

    service.remove_project(policy.id, project_id).await?;
    assert!(!service.has_project(policy.id, project_id).await?);
    Ok(())
}
