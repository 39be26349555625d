use std::fmt;

/// Stage of a sync run. Any failure ends the run in the stage it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Init,
    Listing,
    Reconciling,
    Deleting,
    Downloading,
    Done,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Init => "init",
            SyncPhase::Listing => "listing",
            SyncPhase::Reconciling => "reconciling",
            SyncPhase::Deleting => "deleting",
            SyncPhase::Downloading => "downloading",
            SyncPhase::Done => "done",
        };
        f.write_str(name)
    }
}
