use super::phase::SyncPhase;
use super::plan::{build_sync_plan, SyncPlan};
use crate::config::{ConfigError, SyncConfig};
use crate::listing::{ListingError, RemoteClient};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("IO error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    RequestError(#[from] ListingError),

    #[error("Transfer from {url} interrupted: {source}")]
    StreamError {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to set up HTTP client: {0}")]
    Client(#[source] ListingError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("Failed to remove {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: TransferError,
    },

    #[error("Failed to download {name}: {source}")]
    Download {
        name: String,
        #[source]
        source: TransferError,
    },
}

impl SyncError {
    /// The phase the run was in when it failed
    pub fn phase(&self) -> SyncPhase {
        match self {
            SyncError::Config(_) | SyncError::Client(_) => SyncPhase::Init,
            SyncError::Listing(_) => SyncPhase::Listing,
            SyncError::Delete { .. } => SyncPhase::Deleting,
            SyncError::Download { .. } => SyncPhase::Downloading,
        }
    }
}

/// Options for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Log the plan without touching the directory
    pub dry_run: bool,
}

/// Result of a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub plan: SyncPlan,
    /// Files removed, in the order they were removed
    pub removed: Vec<OsString>,
    /// Files downloaded, in the order they were downloaded
    pub downloaded: Vec<String>,
    /// Total bytes written by downloads
    pub bytes_downloaded: u64,
}

/// Mirror the server's file list into the configured directory.
pub async fn sync_directory(
    config: &SyncConfig,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    debug!(phase = %SyncPhase::Init, "Entering phase");
    let client = RemoteClient::from_base_url(config.base_url()?).map_err(SyncError::Client)?;
    let target_directory = config.target_directory.as_path();

    info!("Working with directory: {}", target_directory.display());
    info!("Loading file list from the server on {}", config.host);

    debug!(phase = %SyncPhase::Listing, "Entering phase");
    let plan = build_sync_plan(&client, target_directory).await?;
    debug!(phase = %SyncPhase::Reconciling, "Entering phase");

    if options.dry_run {
        for name in &plan.to_delete {
            info!("Would remove {}", name.to_string_lossy());
        }
        for name in &plan.to_download {
            info!("Would download {}", name);
        }
        info!("Dry run, nothing changed");
        return Ok(SyncReport {
            plan,
            ..Default::default()
        });
    }

    let report = execute_sync_plan(&client, target_directory, plan).await?;

    debug!(phase = %SyncPhase::Done, "Entering phase");
    info!("Done!");
    Ok(report)
}

/// Apply a plan: every deletion first, then every download, one at a time.
///
/// The first failure stops the run; later entries are not attempted.
pub async fn execute_sync_plan(
    client: &RemoteClient,
    target_directory: &Path,
    plan: SyncPlan,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    debug!(phase = %SyncPhase::Deleting, "Entering phase");
    for name in &plan.to_delete {
        info!("Removing {}", name.to_string_lossy());
        delete_file(target_directory, name)
            .await
            .map_err(|source| SyncError::Delete {
                name: name.to_string_lossy().into_owned(),
                source,
            })?;
        report.removed.push(name.clone());
    }

    debug!(phase = %SyncPhase::Downloading, "Entering phase");
    for name in &plan.to_download {
        info!("Downloading {}", name);
        let bytes = download_file(client, target_directory, name)
            .await
            .map_err(|source| SyncError::Download {
                name: name.clone(),
                source,
            })?;
        report.downloaded.push(name.clone());
        report.bytes_downloaded += bytes;
    }

    report.plan = plan;
    Ok(report)
}

/// Remove `{target_directory}/{name}`
pub async fn delete_file(target_directory: &Path, name: &OsStr) -> Result<(), TransferError> {
    let path = target_directory.join(name);
    fs::remove_file(&path)
        .await
        .map_err(|source| TransferError::IoError { path, source })
}

/// Stream `/files/{name}` from the server into `{target_directory}/{name}`.
///
/// Returns the number of bytes written. A transfer that fails part way leaves
/// the truncated file behind.
pub async fn download_file(
    client: &RemoteClient,
    target_directory: &Path,
    name: &str,
) -> Result<u64, TransferError> {
    let url = client.file_url(name);
    let mut response = client.get(url.clone()).await?;

    let path = target_directory.join(name);
    let io_error = |source: std::io::Error| TransferError::IoError {
        path: path.clone(),
        source,
    };

    let mut file = File::create(&path).await.map_err(io_error)?;
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| TransferError::StreamError {
            url: url.to_string(),
            source,
        })?
    {
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_error)?;
    debug!(name, bytes = written, "Downloaded file");
    Ok(written)
}
