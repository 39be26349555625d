mod local;
mod remote;

pub use local::list_local_files;
pub use remote::{FileList, RemoteClient};

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Failed to read directory {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Request to {url} failed: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    StatusError { url: String, status: StatusCode },

    #[error("Failed to decode file list from {url}: {source}")]
    DecodeError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Server listed an unsafe file name: {0:?}")]
    UnsafeFileName(String),

    #[error(transparent)]
    ConfigError(#[from] crate::config::ConfigError),
}
