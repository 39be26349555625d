use super::ListingError;
use crate::config::SyncConfig;
use crate::utils::{is_safe_file_name, FileSet, FILELIST_PATH, FILES_PATH};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::debug;

/// Body of the `/filelist` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileList {
    #[serde(rename = "Files")]
    pub files: Vec<String>,
}

/// HTTP client bound to one server
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(config: &SyncConfig) -> Result<Self, ListingError> {
        Self::from_base_url(config.base_url()?)
    }

    /// Build a client for `base_url`. Loopback servers are always reached
    /// directly, bypassing any proxy from the environment.
    pub fn from_base_url(base_url: Url) -> Result<Self, ListingError> {
        let mut builder = Client::builder();
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|source| ListingError::NetworkError {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// `http://{host}/filelist`
    pub fn file_list_url(&self) -> Url {
        self.url_for(&[FILELIST_PATH])
    }

    /// `http://{host}/files/{name}`, with `name` encoded as one path segment
    pub fn file_url(&self, name: &str) -> Url {
        self.url_for(&[FILES_PATH, name])
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http URLs always have a path, so this cannot fail
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue a GET and require a success status.
    pub async fn get(&self, url: Url) -> Result<Response, ListingError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ListingError::NetworkError {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::StatusError {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    /// Fetch the server's manifest as a set of file names.
    pub async fn fetch_file_list(&self) -> Result<FileSet, ListingError> {
        let url = self.file_list_url();
        let response = self.get(url.clone()).await?;

        let body = response
            .bytes()
            .await
            .map_err(|source| ListingError::NetworkError {
                url: url.to_string(),
                source,
            })?;

        let list: FileList =
            serde_json::from_slice(&body).map_err(|source| ListingError::DecodeError {
                url: url.to_string(),
                source,
            })?;

        let files = parse_file_list(list)?;
        debug!(count = files.len(), "Fetched remote file list");
        Ok(files)
    }
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

/// Turn the manifest into a set, rejecting names that could escape the target directory.
fn parse_file_list(list: FileList) -> Result<FileSet, ListingError> {
    list.files
        .into_iter()
        .map(|name| {
            if is_safe_file_name(&name) {
                Ok(name)
            } else {
                Err(ListingError::UnsafeFileName(name))
            }
        })
        .collect()
}
