use std::sync::Arc;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{PermissionSet, TeamId};
use dtrack_infrastructure::InMemoryDependencyTrack;
use serde_json::{Value, json};

use super::{Change, apply, destroy, import, plan, refresh};
use crate::document::Document;
use crate::provider_context::ProviderContext;
use crate::resources::Action;
use crate::state_file::StateFile;

fn context() -> ProviderContext {
    ProviderContext::new(Arc::new(InMemoryDependencyTrack::new()), 2)
}

fn document(value: Value) -> Document {
    Document::parse(&value.to_string()).unwrap_or_else(|_| unreachable!())
}

fn team_with_permissions(permissions: &[&str]) -> Document {
    document(json!({
        "resources": [
            {"type": "team", "name": "ops", "config": {"name": "Ops"}},
            {
                "type": "team_permissions",
                "name": "ops",
                "config": {"team": "${team.ops.id}", "permissions": permissions}
            }
        ]
    }))
}

fn change(address: &str, action: Action) -> Change {
    Change {
        address: address.to_owned(),
        action,
    }
}

fn team_id(state: &StateFile, address: &str) -> TeamId {
    state
        .get(address)
        .and_then(|entry| entry.state["id"].as_str())
        .and_then(|id| TeamId::parse(id).ok())
        .unwrap_or_else(|| unreachable!())
}

async fn server_permissions(ctx: &ProviderContext, team: TeamId) -> AppResult<PermissionSet> {
    Ok(ctx
        .teams
        .get(team)
        .await?
        .map(|team| team.permissions)
        .unwrap_or_default())
}

fn permissions(names: &[&str]) -> PermissionSet {
    PermissionSet::parse(names.iter().copied()).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn apply_creates_in_document_order_and_converges() -> AppResult<()> {
    let ctx = context();
    let document = team_with_permissions(&["BOM_UPLOAD", "VIEW_PORTFOLIO"]);
    let mut state = StateFile::default();

    let planned = plan(&ctx, &document, &state).await?;
    assert_eq!(
        planned,
        vec![
            change("team.ops", Action::Create),
            change("team_permissions.ops", Action::Create),
        ]
    );

    let applied = apply(&ctx, &document, &mut state).await?;
    assert_eq!(applied, planned);

    let team = team_id(&state, "team.ops");
    assert_eq!(
        server_permissions(&ctx, team).await?,
        permissions(&["BOM_UPLOAD", "VIEW_PORTFOLIO"])
    );

    let replanned = plan(&ctx, &document, &state).await?;
    assert!(replanned.iter().all(|change| change.action == Action::NoOp));
    assert!(apply(&ctx, &document, &mut state).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn changed_permissions_are_reconciled_in_place() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();
    apply(&ctx, &team_with_permissions(&["BOM_UPLOAD", "VIEW_PORTFOLIO"]), &mut state).await?;

    let document = team_with_permissions(&["VIEW_PORTFOLIO", "POLICY_MANAGEMENT"]);
    let applied = apply(&ctx, &document, &mut state).await?;

    assert_eq!(applied, vec![change("team_permissions.ops", Action::Update)]);
    let team = team_id(&state, "team.ops");
    assert_eq!(
        server_permissions(&ctx, team).await?,
        permissions(&["POLICY_MANAGEMENT", "VIEW_PORTFOLIO"])
    );
    assert_eq!(
        state
            .get("team_permissions.ops")
            .map(|entry| entry.state["permissions"].clone()),
        Some(json!(["POLICY_MANAGEMENT", "VIEW_PORTFOLIO"]))
    );
    Ok(())
}

#[tokio::test]
async fn dropped_block_revokes_recorded_permissions_but_keeps_the_team() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();
    apply(&ctx, &team_with_permissions(&["BOM_UPLOAD"]), &mut state).await?;
    let team = team_id(&state, "team.ops");

    let document = document(json!({
        "resources": [{"type": "team", "name": "ops", "config": {"name": "Ops"}}]
    }));
    let applied = apply(&ctx, &document, &mut state).await?;

    assert_eq!(applied, vec![change("team_permissions.ops", Action::Delete)]);
    assert!(server_permissions(&ctx, team).await?.is_empty());
    assert!(ctx.teams.get(team).await?.is_some());
    assert!(state.get("team_permissions.ops").is_none());
    Ok(())
}

#[tokio::test]
async fn moving_permissions_to_another_team_replaces_them() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();
    let teams = json!([
        {"type": "team", "name": "ops", "config": {"name": "Ops"}},
        {"type": "team", "name": "dev", "config": {"name": "Dev"}}
    ]);
    let with_holder = |holder: &str| {
        let mut resources = teams.as_array().cloned().unwrap_or_default();
        resources.push(json!({
            "type": "team_permissions",
            "name": "shared",
            "config": {"team": format!("${{team.{holder}.id}}"), "permissions": ["BOM_UPLOAD"]}
        }));
        document(json!({ "resources": resources }))
    };
    apply(&ctx, &with_holder("ops"), &mut state).await?;

    let document = with_holder("dev");
    assert!(
        plan(&ctx, &document, &state)
            .await?
            .contains(&change("team_permissions.shared", Action::Replace))
    );
    apply(&ctx, &document, &mut state).await?;

    let ops = team_id(&state, "team.ops");
    let dev = team_id(&state, "team.dev");
    assert!(server_permissions(&ctx, ops).await?.is_empty());
    assert_eq!(server_permissions(&ctx, dev).await?, permissions(&["BOM_UPLOAD"]));
    Ok(())
}

#[tokio::test]
async fn destroy_deletes_in_reverse_order() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();
    apply(&ctx, &team_with_permissions(&["BOM_UPLOAD"]), &mut state).await?;
    let team = team_id(&state, "team.ops");

    let destroyed = destroy(&ctx, &mut state).await?;

    assert_eq!(
        destroyed,
        vec![
            change("team_permissions.ops", Action::Delete),
            change("team.ops", Action::Delete),
        ]
    );
    assert!(state.resources.is_empty());
    assert!(ctx.teams.get(team).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn refresh_drops_entities_deleted_outside_the_provider() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();
    apply(&ctx, &team_with_permissions(&["BOM_UPLOAD"]), &mut state).await?;

    ctx.teams.delete(team_id(&state, "team.ops")).await?;
    refresh(&ctx, &mut state).await?;

    assert!(state.resources.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_apply_keeps_completed_steps() -> AppResult<()> {
    let ctx = context();
    let mut state = StateFile::default();

    let result = apply(&ctx, &team_with_permissions(&["NOT_A_PERMISSION"]), &mut state).await;

    assert!(matches!(
        result,
        Err(AppError::PermissionChange { ref permission, .. }) if permission == "NOT_A_PERMISSION"
    ));
    assert!(state.get("team.ops").is_some());
    assert!(state.get("team_permissions.ops").is_none());
    Ok(())
}

#[tokio::test]
async fn data_sources_feed_resource_references() -> AppResult<()> {
    let ctx = context();
    let security = ctx.teams.create("Security").await?;
    let document = document(json!({
        "data": [{"type": "team", "name": "security", "query": {"name": "Security"}}],
        "resources": [{
            "type": "team_permissions",
            "name": "security",
            "config": {"team": "${data.team.security.id}", "permissions": ["VIEW_VULNERABILITY"]}
        }]
    }));
    let mut state = StateFile::default();

    apply(&ctx, &document, &mut state).await?;

    assert_eq!(
        server_permissions(&ctx, security.id).await?,
        permissions(&["VIEW_VULNERABILITY"])
    );
    Ok(())
}

#[tokio::test]
async fn missing_data_source_match_fails_the_plan() {
    let ctx = context();
    let document = document(json!({
        "data": [{"type": "team", "name": "ghost", "query": {"name": "Ghost"}}]
    }));

    let result = plan(&ctx, &document, &StateFile::default()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn imported_team_plans_clean_and_cannot_be_imported_twice() -> AppResult<()> {
    let ctx = context();
    let legacy = ctx.teams.create("Legacy").await?;
    let mut state = StateFile::default();

    import(&ctx, &mut state, "team", "team.legacy", &legacy.id.to_string()).await?;

    let document = document(json!({
        "resources": [{"type": "team", "name": "legacy", "config": {"name": "Legacy"}}]
    }));
    assert_eq!(
        plan(&ctx, &document, &state).await?,
        vec![change("team.legacy", Action::NoOp)]
    );

    let again = import(&ctx, &mut state, "team", "team.legacy", &legacy.id.to_string()).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let legacy_id = legacy.id.to_string();
    let mismatched = import(&ctx, &mut state, "team", "project.legacy", &legacy_id).await;
    assert!(matches!(mismatched, Err(AppError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn state_survives_a_round_trip_through_the_file() -> AppResult<()> {
    let ctx = context();
    let directory = tempfile::tempdir().map_err(|error| AppError::Internal(error.to_string()))?;
    let path = directory.path().join("dtrack.state.json");
    let document = team_with_permissions(&["BOM_UPLOAD"]);

    let mut state = StateFile::load(&path).await?;
    apply(&ctx, &document, &mut state).await?;
    state.save(&path).await?;

    let reloaded = StateFile::load(&path).await?;
    let replanned = plan(&ctx, &document, &reloaded).await?;
    assert!(replanned.iter().all(|change| change.action == Action::NoOp));
    Ok(())
}
