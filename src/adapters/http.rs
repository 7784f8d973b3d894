//! HTTP downloader for remote media.
//!
//! Files land in `<cache_dir>/<category>/<sha256(url)[0:16]><.ext>`. A file
//! already present in the cache is reused instead of fetched again.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use super::Downloader;
use crate::domain::extension_suffix;

/// Downloader using reqwest
pub struct HttpDownloader {
    /// Root of the download cache
    cache_dir: PathBuf,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpDownloader {
    /// Create a downloader writing into `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            cache_dir: cache_dir.into(),
            client,
        })
    }

    /// Create from the resolved configuration
    pub fn from_config(config: &crate::config::ResolvedConfig) -> Result<Self> {
        Self::new(
            config.download.cache_dir.clone(),
            Duration::from_secs(config.download.timeout_seconds),
            &config.download.user_agent,
        )
    }

    /// Cache location for a URL
    pub fn cache_path(&self, url: &str, category: &str) -> PathBuf {
        self.cache_dir
            .join(category)
            .join(format!("{}{}", url_digest(url), url_extension(url)))
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download_to_local(&self, url: &str, category: &str) -> Result<PathBuf> {
        let dest = self.cache_path(url, category);
        if dest.exists() {
            debug!(url, path = %dest.display(), "Reusing cached download");
            return Ok(dest);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?
            .error_for_status()
            .with_context(|| format!("Download of {} was rejected", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
        }
        fs::write(&dest, &bytes)
            .await
            .with_context(|| format!("Failed to write download: {}", dest.display()))?;

        debug!(url, path = %dest.display(), size = bytes.len(), "Downloaded remote file");
        Ok(dest)
    }
}

/// First 16 hex chars of SHA256(url)
fn url_digest(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Extension of the URL's last path segment, ignoring query and fragment
fn url_extension(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .map(|name| extension_suffix(Path::new(&name)))
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}
