// src/repository/client.rs

//! HTTP client for repository operations
//!
//! A thin wrapper around a blocking reqwest client. Failures carry the HTTP
//! status and URL so a CI log pinpoints the broken fetch. There is no retry
//! or caching layer: the checker runs once per CI invocation, and a wrapper
//! service that needs either should add its own.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Request deadline; a hung download must not block the run indefinitely
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client wrapper for index fetches and archive downloads
pub struct RepositoryClient {
    client: Client,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Init(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch a URL into memory
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Download(format!("failed to get {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Download(format!("failed to read response from {url}: {e}")))?;

        Ok(bytes.to_vec())
    }

    /// Download a URL to `dest_path`
    ///
    /// Streams to a `.tmp` sibling first, then renames, so a failed download
    /// never leaves a truncated file at the destination.
    pub fn download_file(&self, url: &str, dest_path: &Path) -> Result<()> {
        info!("downloading {} to {}", url, dest_path.display());

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Io(format!("failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Download(format!("failed to get {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let temp_path = dest_path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| {
            Error::Io(format!("failed to create file {}: {e}", temp_path.display()))
        })?;

        io::copy(&mut response, &mut file)
            .map_err(|e| Error::Download(format!("failed to write data from {url}: {e}")))?;

        fs::rename(&temp_path, dest_path).map_err(|e| {
            Error::Io(format!(
                "failed to move {} to {}: {e}",
                temp_path.display(),
                dest_path.display()
            ))
        })?;

        Ok(())
    }
}
