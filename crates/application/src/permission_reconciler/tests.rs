use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{PermissionHolder, PermissionName, PermissionSet, TeamId, Username};

use crate::PermissionApi;

use super::PermissionReconciler;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Grant(String),
    Revoke(String),
    Fetch,
}

#[derive(Default)]
struct FakePermissionApi {
    held: Mutex<BTreeSet<String>>,
    calls: Mutex<Vec<Call>>,
    failing_grant: Option<String>,
    rejected_grant: Option<String>,
    failing_revoke: Option<String>,
    fetch_unreachable: bool,
    holder_missing: bool,
}

impl FakePermissionApi {
    fn holding(names: &[&str]) -> Self {
        Self {
            held: Mutex::new(names.iter().map(|name| (*name).to_owned()).collect()),
            ..Self::default()
        }
    }

    async fn mutations(&self) -> Vec<Call> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| !matches!(call, Call::Fetch))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PermissionApi for FakePermissionApi {
    async fn grant(
        &self,
        _holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let name = permission.as_str().to_owned();
        self.calls.lock().await.push(Call::Grant(name.clone()));
        if self.failing_grant.as_deref() == Some(name.as_str()) {
            return Err(AppError::Remote {
                status: 500,
                message: "boom".to_owned(),
            });
        }

        if self.rejected_grant.as_deref() != Some(name.as_str()) {
            self.held.lock().await.insert(name);
        }
        Ok(())
    }

    async fn revoke(
        &self,
        _holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let name = permission.as_str().to_owned();
        self.calls.lock().await.push(Call::Revoke(name.clone()));
        if self.failing_revoke.as_deref() == Some(name.as_str()) {
            return Err(AppError::Remote {
                status: 500,
                message: "boom".to_owned(),
            });
        }

        self.held.lock().await.remove(&name);
        Ok(())
    }

    async fn fetch_permissions(
        &self,
        _holder: &PermissionHolder,
    ) -> AppResult<Option<PermissionSet>> {
        self.calls.lock().await.push(Call::Fetch);
        if self.fetch_unreachable {
            return Err(AppError::Transport("connection reset".to_owned()));
        }
        if self.holder_missing {
            return Ok(None);
        }

        let held = self.held.lock().await.clone();
        PermissionSet::parse(held).map(Some)
    }
}

fn set(names: &[&str]) -> PermissionSet {
    PermissionSet::parse(names.iter().copied()).unwrap_or_else(|_| unreachable!())
}

fn team() -> PermissionHolder {
    PermissionHolder::Team(TeamId::from_uuid(Uuid::new_v4()))
}

fn grant(name: &str) -> Call {
    Call::Grant(name.to_owned())
}

fn revoke(name: &str) -> Call {
    Call::Revoke(name.to_owned())
}

#[tokio::test]
async fn initial_creation_only_grants() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi::default());
    let reconciler = PermissionReconciler::new(api.clone());

    let recorded = reconciler
        .reconcile(&team(), &PermissionSet::new(), &set(&["A", "B"]))
        .await?;

    assert_eq!(api.mutations().await, vec![grant("A"), grant("B")]);
    assert_eq!(recorded, set(&["A", "B"]));
    Ok(())
}

#[tokio::test]
async fn full_teardown_only_revokes() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi::holding(&["A", "B"]));
    let reconciler = PermissionReconciler::new(api.clone());

    let recorded = reconciler
        .reconcile(&team(), &set(&["A", "B"]), &PermissionSet::new())
        .await?;

    assert_eq!(api.mutations().await, vec![revoke("A"), revoke("B")]);
    assert!(recorded.is_empty());
    Ok(())
}

#[tokio::test]
async fn mixed_diff_leaves_shared_permission_untouched() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi::holding(&["A", "B"]));
    let reconciler = PermissionReconciler::new(api.clone());

    let recorded = reconciler
        .reconcile(&team(), &set(&["A", "B"]), &set(&["B", "C"]))
        .await?;

    assert_eq!(api.mutations().await, vec![grant("C"), revoke("A")]);
    assert_eq!(recorded, set(&["B", "C"]));
    Ok(())
}

#[tokio::test]
async fn converged_set_still_refetches() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi::holding(&["A", "EXTERNAL"]));
    let reconciler = PermissionReconciler::new(api.clone());

    let recorded = reconciler
        .reconcile(&team(), &set(&["A"]), &set(&["A"]))
        .await?;

    assert_eq!(*api.calls.lock().await, vec![Call::Fetch]);
    assert_eq!(recorded, set(&["A", "EXTERNAL"]));
    Ok(())
}

#[tokio::test]
async fn second_reconcile_issues_no_mutations() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi::default());
    let reconciler = PermissionReconciler::new(api.clone());
    let holder = team();
    let desired = set(&["A", "B"]);

    let first = reconciler
        .reconcile(&holder, &PermissionSet::new(), &desired)
        .await?;
    api.calls.lock().await.clear();
    let second = reconciler.reconcile(&holder, &first, &desired).await?;

    assert_eq!(*api.calls.lock().await, vec![Call::Fetch]);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn failed_grant_stops_and_names_the_permission() {
    let api = Arc::new(FakePermissionApi {
        failing_grant: Some("B".to_owned()),
        ..FakePermissionApi::default()
    });
    let reconciler = PermissionReconciler::new(api.clone());

    let result = reconciler
        .reconcile(&team(), &PermissionSet::new(), &set(&["A", "B", "C"]))
        .await;

    match result {
        Err(AppError::PermissionChange {
            action,
            permission,
            source,
            ..
        }) => {
            assert_eq!(action, "grant");
            assert_eq!(permission, "B");
            assert!(matches!(*source, AppError::Remote { status: 500, .. }));
        }
        other => panic!("expected a permission change error, got {other:?}"),
    }

    assert_eq!(api.mutations().await, vec![grant("A"), grant("B")]);
    assert!(!api.calls.lock().await.contains(&Call::Fetch));
    assert!(api.held.lock().await.contains("A"));
}

#[tokio::test]
async fn failed_revoke_stops_before_later_revokes() {
    let api = Arc::new(FakePermissionApi {
        failing_revoke: Some("B".to_owned()),
        ..FakePermissionApi::holding(&["A", "B", "C"])
    });
    let reconciler = PermissionReconciler::new(api.clone());

    let result = reconciler
        .reconcile(&team(), &set(&["A", "B", "C"]), &PermissionSet::new())
        .await;

    match result {
        Err(AppError::PermissionChange {
            action, permission, ..
        }) => {
            assert_eq!(action, "revoke");
            assert_eq!(permission, "B");
        }
        other => panic!("expected a permission change error, got {other:?}"),
    }

    assert_eq!(api.mutations().await, vec![revoke("A"), revoke("B")]);
    assert!(!api.calls.lock().await.contains(&Call::Fetch));
    assert!(api.held.lock().await.contains("C"));
}

#[tokio::test]
async fn failed_refetch_is_returned_unchanged() {
    let api = Arc::new(FakePermissionApi {
        fetch_unreachable: true,
        ..FakePermissionApi::default()
    });
    let reconciler = PermissionReconciler::new(api.clone());

    let result = reconciler
        .reconcile(&team(), &PermissionSet::new(), &set(&["A"]))
        .await;

    match result {
        Err(AppError::Transport(message)) => assert_eq!(message, "connection reset"),
        other => panic!("expected the transport error, got {other:?}"),
    }
    assert_eq!(api.mutations().await, vec![grant("A")]);
    assert!(api.held.lock().await.contains("A"));
}

#[tokio::test]
async fn recorded_state_follows_the_server_not_the_plan() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi {
        rejected_grant: Some("B".to_owned()),
        ..FakePermissionApi::default()
    });
    let reconciler = PermissionReconciler::new(api.clone());

    let recorded = reconciler
        .reconcile(&team(), &PermissionSet::new(), &set(&["A", "B"]))
        .await?;

    assert_eq!(recorded, set(&["A"]));
    Ok(())
}

#[tokio::test]
async fn missing_holder_after_changes_is_not_found() -> AppResult<()> {
    let api = Arc::new(FakePermissionApi {
        holder_missing: true,
        ..FakePermissionApi::default()
    });
    let reconciler = PermissionReconciler::new(api.clone());
    let holder = PermissionHolder::ManagedUser(Username::new("jdoe")?);

    let result = reconciler
        .reconcile(&holder, &PermissionSet::new(), &set(&["A"]))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(reconciler.fetch(&holder).await?, None);
    Ok(())
}

#[tokio::test]
async fn error_message_names_holder_and_permission() {
    let api = Arc::new(FakePermissionApi {
        failing_grant: Some("BOM_UPLOAD".to_owned()),
        ..FakePermissionApi::default()
    });
    let reconciler = PermissionReconciler::new(api);
    let holder = PermissionHolder::ManagedUser(
        Username::new("jdoe").unwrap_or_else(|_| unreachable!()),
    );

    let message = reconciler
        .reconcile(&holder, &PermissionSet::new(), &set(&["BOM_UPLOAD"]))
        .await
        .err()
        .map(|error| error.to_string())
        .unwrap_or_default();

    assert!(message.starts_with("unable to grant permission 'BOM_UPLOAD' for managed user 'jdoe'"));
}
