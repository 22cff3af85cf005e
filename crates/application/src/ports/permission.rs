use async_trait::async_trait;
use dtrack_core::AppResult;
use dtrack_domain::{PermissionHolder, PermissionName, PermissionSet};

/// Remote primitives for one holder's permission set.
///
/// The server exposes no bulk replace, so convergence is built from single
/// grants and revokes.
#[async_trait]
pub trait PermissionApi: Send + Sync {
    /// Grants one permission. Granting a held permission is a no-op.
    async fn grant(&self, holder: &PermissionHolder, permission: &PermissionName)
    -> AppResult<()>;

    /// Revokes one permission. Revoking a missing permission is a no-op.
    async fn revoke(
        &self,
        holder: &PermissionHolder,
        permission: &PermissionName,
    ) -> AppResult<()>;

    /// Fetches the holder's full permission set, or `None` when the holder
    /// does not exist.
    async fn fetch_permissions(&self, holder: &PermissionHolder)
    -> AppResult<Option<PermissionSet>>;
}
