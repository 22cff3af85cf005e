use async_trait::async_trait;
use dtrack_application::require;
use dtrack_core::AppResult;
use dtrack_domain::{NotificationPublisher, NotificationPublisherId, NotificationPublisherInput};
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::provider_context::ProviderContext;

pub struct NotificationPublisherResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherAttributes {
    name: String,
    #[serde(default)]
    description: Option<String>,
    publisher_class: String,
    #[serde(default)]
    template: Option<String>,
    template_mime_type: String,
    #[serde(default)]
    default_publisher: bool,
}

impl PublisherAttributes {
    fn input(&self) -> NotificationPublisherInput {
        NotificationPublisherInput {
            name: self.name.clone(),
            description: self.description.clone(),
            publisher_class: self.publisher_class.clone(),
            template: self.template.clone(),
            template_mime_type: self.template_mime_type.clone(),
            default_publisher: self.default_publisher,
        }
    }
}

impl From<NotificationPublisherInput> for PublisherAttributes {
    fn from(input: NotificationPublisherInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            publisher_class: input.publisher_class,
            template: input.template,
            template_mime_type: input.template_mime_type,
            default_publisher: input.default_publisher,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherState {
    id: NotificationPublisherId,
    #[serde(flatten)]
    attributes: PublisherAttributes,
}

impl From<NotificationPublisher> for PublisherState {
    fn from(publisher: NotificationPublisher) -> Self {
        Self {
            id: publisher.id,
            attributes: publisher.attributes.into(),
        }
    }
}

#[async_trait]
impl Resource for NotificationPublisherResource {
    type Config = PublisherAttributes;
    type State = PublisherState;

    fn type_name(&self) -> &'static str {
        "notification_publisher"
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        config: &PublisherAttributes,
    ) -> AppResult<PublisherState> {
        Ok(ctx
            .notifications
            .create_publisher(&config.input())
            .await?
            .into())
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &PublisherState,
    ) -> AppResult<Option<PublisherState>> {
        Ok(ctx
            .notifications
            .find_publisher(state.id)
            .await?
            .map(PublisherState::from))
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        config: &PublisherAttributes,
        state: &PublisherState,
    ) -> AppResult<PublisherState> {
        Ok(ctx
            .notifications
            .update_publisher(state.id, &config.input())
            .await?
            .into())
    }

    async fn delete(&self, ctx: &ProviderContext, state: &PublisherState) -> AppResult<()> {
        ctx.notifications.delete_publisher(state.id).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> AppResult<PublisherState> {
        let publisher_id = NotificationPublisherId::parse(id)?;
        let publisher = require(ctx.notifications.find_publisher(publisher_id).await?, || {
            format!("notification publisher '{publisher_id}'")
        })?;
        Ok(publisher.into())
    }

    fn has_changes(&self, config: &PublisherAttributes, state: &PublisherState) -> bool {
        *config != state.attributes
    }
}
