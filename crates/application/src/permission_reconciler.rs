use std::sync::Arc;

use dtrack_core::{AppError, AppResult};
use dtrack_domain::{PermissionHolder, PermissionSet};
use tracing::{debug, info, warn};

use crate::PermissionApi;

#[cfg(test)]
mod tests;

/// Converges a holder's remote permission set onto a desired set.
#[derive(Clone)]
pub struct PermissionReconciler {
    api: Arc<dyn PermissionApi>,
}

impl PermissionReconciler {
    /// Creates a reconciler over a permission port.
    #[must_use]
    pub fn new(api: Arc<dyn PermissionApi>) -> Self {
        Self { api }
    }

    /// Fetches the holder's current set, `None` when the holder is gone.
    pub async fn fetch(&self, holder: &PermissionHolder) -> AppResult<Option<PermissionSet>> {
        self.api.fetch_permissions(holder).await
    }

    /// Grants `desired - current`, revokes `current - desired`, then returns
    /// the set the server reports afterwards.
    ///
    /// Calls run one at a time. The first failing call aborts the reconcile
    /// and earlier calls stay applied.
    pub async fn reconcile(
        &self,
        holder: &PermissionHolder,
        current: &PermissionSet,
        desired: &PermissionSet,
    ) -> AppResult<PermissionSet> {
        let diff = current.diff(desired);
        info!(
            holder = %holder,
            to_add = diff.to_add.len(),
            to_remove = diff.to_remove.len(),
            "reconciling permissions"
        );
        if diff.is_empty() {
            debug!(holder = %holder, "permissions already converged");
        }

        for permission in &diff.to_add {
            if !permission.is_well_known() {
                warn!(
                    holder = %holder,
                    permission = %permission,
                    "granting non-standard permission"
                );
            }

            self.api
                .grant(holder, permission)
                .await
                .map_err(|source| AppError::PermissionChange {
                    action: "grant",
                    permission: permission.to_string(),
                    holder: holder.to_string(),
                    source: Box::new(source),
                })?;
            debug!(holder = %holder, permission = %permission, "granted permission");
        }

        for permission in &diff.to_remove {
            self.api
                .revoke(holder, permission)
                .await
                .map_err(|source| AppError::PermissionChange {
                    action: "revoke",
                    permission: permission.to_string(),
                    holder: holder.to_string(),
                    source: Box::new(source),
                })?;
            debug!(holder = %holder, permission = %permission, "revoked permission");
        }

        let reported = self
            .api
            .fetch_permissions(holder)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{holder} disappeared during reconcile")))?;

        if &reported != desired {
            warn!(
                holder = %holder,
                reported = reported.len(),
                desired = desired.len(),
                "server reports a permission set that differs from the desired set"
            );
        }

        Ok(reported)
    }
}
