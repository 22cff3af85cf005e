use dtrack_domain::{
    ConditionOperator, ConditionSubject, Policy, PolicyCondition, PolicyConditionId,
    PolicyConditionInput, PolicyId, PolicyInput, PolicyOperator, ProjectId, ViolationState,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UuidRef;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDto {
    pub uuid: Uuid,
    pub name: String,
    pub operator: PolicyOperator,
    pub violation_state: ViolationState,
    #[serde(default)]
    pub policy_conditions: Vec<PolicyConditionDto>,
    #[serde(default)]
    pub projects: Vec<UuidRef>,
    #[serde(default)]
    pub include_children: bool,
    #[serde(default)]
    pub global: bool,
}

impl PolicyDto {
    pub fn into_domain(self) -> Policy {
        Policy {
            id: PolicyId::from_uuid(self.uuid),
            name: self.name,
            operator: self.operator,
            violation_state: self.violation_state,
            conditions: self
                .policy_conditions
                .into_iter()
                .map(PolicyConditionDto::into_domain)
                .collect(),
            projects: self
                .projects
                .iter()
                .map(|project| ProjectId::from_uuid(project.uuid))
                .collect(),
            include_children: self.include_children,
            global: self.global,
        }
    }
}

/// Policy write body. The hierarchical flags are server-computed and never
/// sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyWriteDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub name: &'a str,
    pub operator: PolicyOperator,
    pub violation_state: ViolationState,
}

impl<'a> PolicyWriteDto<'a> {
    pub fn new(uuid: Option<PolicyId>, input: &'a PolicyInput) -> Self {
        Self {
            uuid: uuid.map(|id| id.as_uuid()),
            name: input.name.as_str(),
            operator: input.operator,
            violation_state: input.violation_state,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConditionDto {
    pub uuid: Uuid,
    pub subject: ConditionSubject,
    pub operator: ConditionOperator,
    pub value: String,
}

impl PolicyConditionDto {
    pub fn into_domain(self) -> PolicyCondition {
        PolicyCondition {
            id: PolicyConditionId::from_uuid(self.uuid),
            subject: self.subject,
            operator: self.operator,
            value: self.value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyConditionWriteDto<'a> {
    pub subject: ConditionSubject,
    pub operator: ConditionOperator,
    pub value: &'a str,
}

impl<'a> From<&'a PolicyConditionInput> for PolicyConditionWriteDto<'a> {
    fn from(input: &'a PolicyConditionInput) -> Self {
        Self {
            subject: input.subject,
            operator: input.operator,
            value: input.value.as_str(),
        }
    }
}
