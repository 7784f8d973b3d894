//! Adapter interfaces for host collaborators.
//!
//! The media store never reaches for globals: translation, record lookup
//! and downloading are injected through these traits so the core can run
//! against fakes in tests.

pub mod http;
pub mod messages;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{GameHash, GameRecord};

pub use http::HttpDownloader;
pub use messages::EnglishMessages;

/// Localized message lookup.
///
/// Only used to build human-readable error text; never affects control flow.
pub trait Translator: Send + Sync {
    /// Translate `key`, substituting positional `{0}`, `{1}`, ... arguments
    fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// Read access to the host's game library
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Find the live record owning `hash`
    async fn lookup_record_by_hash(&self, hash: &GameHash) -> Result<Option<GameRecord>>;
}

/// Fetches remote resources into local, readable files
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into a local file grouped under `category`; returns its path
    async fn download_to_local(&self, url: &str, category: &str) -> Result<PathBuf>;
}
