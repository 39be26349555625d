pub mod config;
pub mod listing;
pub mod reconciliation;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, read_config, ConfigError, RawConfig, SyncConfig};
pub use listing::{list_local_files, FileList, ListingError, RemoteClient};
pub use reconciliation::{
    build_sync_plan, delete_file, download_file, execute_sync_plan, reconcile, sync_directory,
    SyncError, SyncOptions, SyncPhase, SyncPlan, SyncReport, TransferError,
};
pub use utils::{FileSet, LocalFileSet};
