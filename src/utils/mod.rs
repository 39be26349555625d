mod env;
mod file_name;

pub use env::expand_env;
pub use file_name::{is_safe_file_name, FileSet, LocalFileSet};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Path of the manifest endpoint on the server
pub const FILELIST_PATH: &str = "filelist";

/// Path prefix of the file download endpoint on the server
pub const FILES_PATH: &str = "files";
