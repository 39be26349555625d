use crate::listing::{list_local_files, ListingError, RemoteClient};
use crate::utils::{FileSet, LocalFileSet};
use std::ffi::OsStr;
use std::path::Path;
use tracing::debug;

/// What a sync run has to do. The two sets never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Listed by the server, missing locally
    pub to_download: FileSet,
    /// Present locally, not listed by the server
    pub to_delete: LocalFileSet,
}

impl SyncPlan {
    /// Check if the directory already matches the server
    pub fn is_empty(&self) -> bool {
        self.to_download.is_empty() && self.to_delete.is_empty()
    }
}

/// Compute `(remote - local, local - remote)`.
///
/// A local name that is not valid UTF-8 can never match the manifest, so it
/// always lands in `to_delete`.
pub fn reconcile(remote: &FileSet, local: &LocalFileSet) -> SyncPlan {
    SyncPlan {
        to_download: remote
            .iter()
            .filter(|name| !local.contains(OsStr::new(name.as_str())))
            .cloned()
            .collect(),
        to_delete: local
            .iter()
            .filter(|name| name.to_str().map_or(true, |name| !remote.contains(name)))
            .cloned()
            .collect(),
    }
}

/// List both sides concurrently and reconcile them.
///
/// The first listing error aborts the plan; the other listing is dropped.
pub async fn build_sync_plan(
    client: &RemoteClient,
    target_directory: &Path,
) -> Result<SyncPlan, ListingError> {
    let (local, remote) = tokio::try_join!(
        list_local_files(target_directory),
        client.fetch_file_list()
    )?;

    let plan = reconcile(&remote, &local);
    debug!(
        download = plan.to_download.len(),
        delete = plan.to_delete.len(),
        "Built sync plan"
    );
    Ok(plan)
}
