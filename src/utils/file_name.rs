use std::collections::BTreeSet;
use std::ffi::OsString;

/// A set of bare filenames. Sorted so logs come out in a stable order.
pub type FileSet = BTreeSet<String>;

/// Names found on disk, kept as the OS reports them so any of them can be removed.
pub type LocalFileSet = BTreeSet<OsString>;

/// Check that a server-supplied name can only address an entry directly
/// inside the target directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}
