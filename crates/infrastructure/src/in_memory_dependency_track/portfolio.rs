use async_trait::async_trait;
use dtrack_application::{PolicyApi, ProjectApi};
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{
    Policy, PolicyCondition, PolicyConditionId, PolicyConditionInput, PolicyId, PolicyInput,
    Project, ProjectId, ProjectInput,
};
use uuid::Uuid;

use super::{InMemoryDependencyTrack, not_found};

impl InMemoryDependencyTrack {
    async fn ensure_unique_project(
        &self,
        input: &ProjectInput,
        except: Option<ProjectId>,
    ) -> AppResult<()> {
        let taken = self.projects.read().await.iter().any(|project| {
            Some(project.id) != except
                && project.attributes.name == input.name
                && project.attributes.version == input.version
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "project '{}' with version {:?} already exists",
                input.name, input.version
            )));
        }
        Ok(())
    }

    pub(super) async fn ensure_project(&self, project_id: ProjectId) -> AppResult<()> {
        if self
            .projects
            .read()
            .await
            .iter()
            .any(|project| project.id == project_id)
        {
            Ok(())
        } else {
            Err(not_found(format_args!("project '{project_id}'")))
        }
    }

    async fn with_policy<R>(
        &self,
        policy_id: PolicyId,
        change: impl FnOnce(&mut Policy) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut policies = self.policies.write().await;
        let policy = policies
            .iter_mut()
            .find(|policy| policy.id == policy_id)
            .ok_or_else(|| not_found(format_args!("policy '{policy_id}'")))?;
        let result = change(policy)?;
        policy.global = policy.projects.is_empty();
        Ok(result)
    }
}

#[async_trait]
impl ProjectApi for InMemoryDependencyTrack {
    async fn get_project(&self, project_id: ProjectId) -> AppResult<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|project| project.id == project_id)
            .cloned()
            .ok_or_else(|| not_found(format_args!("project '{project_id}'")))
    }

    async fn lookup_project(&self, name: &str, version: Option<&str>) -> AppResult<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|project| {
                project.attributes.name == name && project.attributes.version.as_deref() == version
            })
            .cloned()
            .ok_or_else(|| not_found(format_args!("project '{name}'")))
    }

    async fn create_project(&self, input: &ProjectInput) -> AppResult<Project> {
        self.ensure_unique_project(input, None).await?;
        if let Some(parent) = input.parent {
            self.ensure_project(parent).await?;
        }
        let project = Project {
            id: ProjectId::from_uuid(Uuid::new_v4()),
            attributes: input.clone(),
        };
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        input: &ProjectInput,
    ) -> AppResult<Project> {
        self.ensure_unique_project(input, Some(project_id)).await?;
        if let Some(parent) = input.parent {
            self.ensure_project(parent).await?;
        }
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| not_found(format_args!("project '{project_id}'")))?;
        project.attributes = input.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|project| project.id != project_id);
        if projects.len() == before {
            return Err(not_found(format_args!("project '{project_id}'")));
        }
        drop(projects);

        self.acl
            .write()
            .await
            .retain(|(_, project)| *project != project_id);
        for policy in self.policies.write().await.iter_mut() {
            policy.projects.retain(|project| *project != project_id);
            policy.global = policy.projects.is_empty();
        }
        for rule in self.rules.write().await.iter_mut() {
            rule.projects.retain(|project| *project != project_id);
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyApi for InMemoryDependencyTrack {
    async fn get_policy(&self, policy_id: PolicyId) -> AppResult<Policy> {
        self.policies
            .read()
            .await
            .iter()
            .find(|policy| policy.id == policy_id)
            .cloned()
            .ok_or_else(|| not_found(format_args!("policy '{policy_id}'")))
    }

    async fn create_policy(&self, input: &PolicyInput) -> AppResult<Policy> {
        let mut policies = self.policies.write().await;
        if policies.iter().any(|policy| policy.name == input.name) {
            return Err(AppError::Conflict(format!(
                "policy '{}' already exists",
                input.name
            )));
        }
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
        policies.push(policy.clone());
        Ok(policy)
    }

    async fn update_policy(&self, policy_id: PolicyId, input: &PolicyInput) -> AppResult<Policy> {
        self.with_policy(policy_id, |policy| {
            policy.name = input.name.clone();
            policy.operator = input.operator;
            policy.violation_state = input.violation_state;
            Ok(())
        })
        .await?;
        self.get_policy(policy_id).await
    }

    async fn delete_policy(&self, policy_id: PolicyId) -> AppResult<()> {
        let mut policies = self.policies.write().await;
        let before = policies.len();
        policies.retain(|policy| policy.id != policy_id);
        if policies.len() == before {
            return Err(not_found(format_args!("policy '{policy_id}'")));
        }
        Ok(())
    }

    async fn create_condition(
        &self,
        policy_id: PolicyId,
        input: &PolicyConditionInput,
    ) -> AppResult<PolicyCondition> {
        self.with_policy(policy_id, |policy| {
            let condition = PolicyCondition {
                id: PolicyConditionId::from_uuid(Uuid::new_v4()),
                subject: input.subject,
                operator: input.operator,
                value: input.value.clone(),
            };
            policy.conditions.push(condition.clone());
            Ok(condition)
        })
        .await
    }

    async fn delete_condition(&self, condition_id: PolicyConditionId) -> AppResult<()> {
        let mut policies = self.policies.write().await;
        let policy = policies
            .iter_mut()
            .find(|policy| policy.conditions.iter().any(|c| c.id == condition_id))
            .ok_or_else(|| not_found(format_args!("policy condition '{condition_id}'")))?;
        policy.conditions.retain(|condition| condition.id != condition_id);
        Ok(())
    }

    async fn add_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        self.ensure_project(project_id).await?;
        self.with_policy(policy_id, |policy| {
            if policy.projects.contains(&project_id) {
                return Err(AppError::Conflict(format!(
                    "policy '{policy_id}' already applies to project '{project_id}'"
                )));
            }
            policy.projects.push(project_id);
            Ok(())
        })
        .await
    }

    async fn remove_project(&self, policy_id: PolicyId, project_id: ProjectId) -> AppResult<()> {
        self.with_policy(policy_id, |policy| {
            if !policy.projects.contains(&project_id) {
                return Err(not_found(format_args!(
                    "project '{project_id}' on policy '{policy_id}'"
                )));
            }
            policy.projects.retain(|project| *project != project_id);
            Ok(())
        })
        .await
    }
}
