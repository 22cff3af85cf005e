use dtrack_application::{
    AclApi, NotificationApi, PageRequest, PermissionApi, PolicyApi, ProjectApi, TeamApi,
};
use dtrack_core::{AppError, AppResult};
use dtrack_domain::{
    NotificationLevel, NotificationPublisherInput, NotificationRuleInput, NotificationScope,
    PermissionHolder, PermissionName, PolicyInput, PolicyOperator, ProjectClassifier,
    ProjectInput, ViolationState,
};

use super::InMemoryDependencyTrack;

fn project_input(name: &str) -> ProjectInput {
    ProjectInput {
        name: name.to_owned(),
        version: None,
        description: None,
        group: None,
        publisher: None,
        author: None,
        classifier: ProjectClassifier::Application,
        active: true,
        cpe: None,
        purl: None,
        swid_tag_id: None,
        parent: None,
    }
}

#[tokio::test]
async fn created_rule_ignores_everything_but_identity_fields() -> AppResult<()> {
    let server = InMemoryDependencyTrack::new();
    let publisher = server
        .create_publisher(&NotificationPublisherInput {
            name: "hook".to_owned(),
            description: None,
            publisher_class: "org.dependencytrack.notification.publisher.WebhookPublisher"
                .to_owned(),
            template: None,
            template_mime_type: "application/json".to_owned(),
            default_publisher: false,
        })
        .await?;

    let rule = server
        .create_rule(&NotificationRuleInput {
            name: "alerts".to_owned(),
            scope: NotificationScope::Portfolio,
            notification_level: NotificationLevel::Informational,
            enabled: false,
            notify_children: false,
            log_successful_publish: true,
            notify_on: vec!["NEW_VULNERABILITY".to_owned()],
            publisher: publisher.id,
            publisher_config: Some("{}".to_owned()),
        })
        .await?;

    assert!(rule.attributes.enabled);
    assert!(rule.attributes.notify_on.is_empty());
    assert_eq!(rule.attributes.publisher, publisher.id);
    Ok(())
}

#[tokio::test]
async fn policy_is_global_until_limited_to_a_project() -> AppResult<()> {
    let server = InMemoryDependencyTrack::new();
    let project = server.create_project(&project_input("shop")).await?;
    let policy = server
        .create_policy(&PolicyInput {
            name: "licenses".to_owned(),
            operator: PolicyOperator::All,
            violation_state: ViolationState::Warn,
        })
        .await?;
    assert!(policy.global);

    server.add_project(policy.id, project.id).await?;
    assert!(!server.get_policy(policy.id).await?.global);

    server.delete_project(project.id).await?;
    assert!(server.get_policy(policy.id).await?.global);
    Ok(())
}

#[tokio::test]
async fn deleting_a_team_drops_its_acl_mappings() -> AppResult<()> {
    let server = InMemoryDependencyTrack::new();
    let team = server.create_team("ops").await?;
    let project = server.create_project(&project_input("shop")).await?;
    server.add_mapping(team.id, project.id).await?;

    server.delete_team(team.id).await?;

    let page = server
        .list_team_projects(team.id, PageRequest::first(10))
        .await?;
    assert!(page.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn undefined_permission_is_rejected() -> AppResult<()> {
    let server = InMemoryDependencyTrack::new();
    let team = server.create_team("ops").await?;

    let result = server
        .grant(
            &PermissionHolder::Team(team.id),
            &PermissionName::new("NOT_A_PERMISSION")?,
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_project_name_and_version_conflicts() -> AppResult<()> {
    let server = InMemoryDependencyTrack::new();
    server.create_project(&project_input("shop")).await?;

    let result = server.create_project(&project_input("shop")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}
