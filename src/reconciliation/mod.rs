mod execute;
mod phase;
mod plan;

pub use execute::{
    delete_file, download_file, execute_sync_plan, sync_directory, SyncError, SyncOptions,
    SyncReport, TransferError,
};
pub use phase::SyncPhase;
pub use plan::{build_sync_plan, reconcile, SyncPlan};
