use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{Project, ProjectClassifier, ProjectId, ProjectInput};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct ProjectResource;

fn active_by_default() -> bool {
    true
}

/// Project attributes shared by configuration and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAttributes {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    classifier: ProjectClassifier,
    #[serde(default = "active_by_default")]
    active: bool,
    #[serde(default)]
    cpe: Option<String>,
    #[serde(default)]
    purl: Option<String>,
    #[serde(default)]
    swid_tag_id: Option<String>,
    #[serde(default)]
    parent_uuid: Option<ProjectId>,
}

impl ProjectAttributes {
    fn input(&self) -> ProjectInput {
        ProjectInput {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            group: self.group.clone(),
            publisher: self.publisher.clone(),
            author: self.author.clone(),
            classifier: self.classifier,
            active: self.active,
            cpe: self.cpe.clone(),
            purl: self.purl.clone(),
            swid_tag_id: self.swid_tag_id.clone(),
            parent: self.parent_uuid,
        }
    }
}

impl From<ProjectInput> for ProjectAttributes {
    fn from(input: ProjectInput) -> Self {
        Self {
            name: input.name,
            version: input.version,
            description: input.description,
            group: input.group,
            publisher: input.publisher,
            author: input.author,
            classifier: input.classifier,
            active: input.active,
            cpe: input.cpe,
            purl: input.purl,
            swid_tag_id: input.swid_tag_id,
            parent_uuid: input.parent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    id: ProjectId,
    #[serde(flatten)]
    attributes: ProjectAttributes,
}

impl From<Project> for ProjectState {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            attributes: project.attributes.into(),
        }
    }
}

#[async_trait]
impl Resource for ProjectResource {
    type Config = ProjectAttributes;
    type State = ProjectState;

    fn type_name(&self) -> &'static str {
        "project"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &ProjectAttributes,
    ) -> AppResult<ProjectState> {
        Ok(ctx.projects.create(&config.input()).await?.into())
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &ProjectState,
    ) -> AppResult<Option<ProjectState>> {
        Ok(ctx.projects.get(state.id).await?.map(ProjectState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &ProjectAttributes,
        state: &ProjectState,
    ) -> AppResult<ProjectState> {
        Ok(ctx.projects.update(state.id, &config.input()).await?.into())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &ProjectState) -> AppResult<()> {
        ctx.projects.delete(state.id).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<ProjectState> {
        let project_id = ProjectId::parse(id)?;
        let project = require(ctx.projects.get(project_id).await?, || {
            format!("project '{project_id}'")
        })?;
        Ok(project.into())
    }

    fn has_changes(&self, config: &ProjectAttributes, state: &ProjectState) -> bool {
        *config != state.attributes
    }
}
