use std::str::FromStr;

use dtrack_core::AppResult;
use dtrack_domain::{Project, ProjectClassifier, ProjectId, ProjectInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UuidRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swid_tag_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<UuidRef>,
}

impl ProjectDto {
    pub fn from_input(uuid: Option<ProjectId>, input: &ProjectInput) -> Self {
        Self {
            uuid: uuid.map(|id| id.as_uuid()),
            name: input.name.clone(),
            version: input.version.clone(),
            description: input.description.clone(),
            group: input.group.clone(),
            publisher: input.publisher.clone(),
            author: input.author.clone(),
            classifier: Some(input.classifier.as_str().to_owned()),
            active: Some(input.active),
            cpe: input.cpe.clone(),
            purl: input.purl.clone(),
            swid_tag_id: input.swid_tag_id.clone(),
            parent: input.parent.map(|parent| UuidRef::new(parent.as_uuid())),
        }
    }

    pub fn into_domain(self) -> AppResult<Project> {
        let uuid = self.uuid.ok_or_else(|| {
            dtrack_core::AppError::Decode(format!("project '{}' has no uuid", self.name))
        })?;
        let classifier = self
            .classifier
            .as_deref()
            .map(ProjectClassifier::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(Project {
            id: ProjectId::from_uuid(uuid),
            attributes: ProjectInput {
                name: self.name,
                version: self.version,
                description: self.description,
                group: self.group,
                publisher: self.publisher,
                author: self.author,
                classifier,
                active: self.active.unwrap_or(true),
                cpe: self.cpe,
                purl: self.purl,
                swid_tag_id: self.swid_tag_id,
                parent: self.parent.map(|parent| ProjectId::from_uuid(parent.uuid)),
            },
        })
    }
}
