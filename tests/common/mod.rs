//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use gamemedia::adapters::{Downloader, EnglishMessages};
use gamemedia::media::hash_identity;
use gamemedia::{GameHash, GameLibrary, GameRecord, HostServices, MediaStore};

/// Downloader serving canned local files per URL
#[derive(Default)]
pub struct FakeDownloader {
    files: HashMap<String, PathBuf>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeDownloader {
    pub fn with_file(mut self, url: &str, path: impl Into<PathBuf>) -> Self {
        self.files.insert(url.to_string(), path.into());
        self
    }

    /// (url, category) pairs requested so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download_to_local(&self, url: &str, category: &str) -> Result<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), category.to_string()));

        match self.files.get(url) {
            Some(path) => Ok(path.clone()),
            None => anyhow::bail!("404 for {}", url),
        }
    }
}

/// Store over `root` whose identity checks see `library`
pub fn store_with(root: &Path, library: &GameLibrary, downloader: Arc<FakeDownloader>) -> MediaStore {
    MediaStore::new(
        root,
        HostServices {
            messages: Arc::new(EnglishMessages),
            records: Arc::new(library.clone()),
            downloader,
        },
    )
}

/// Store with an empty library and no remote files
pub fn store(root: &Path) -> MediaStore {
    store_with(root, &GameLibrary::new(), Arc::new(FakeDownloader::default()))
}

/// Hash a game would get
pub fn hash_of(title: &str, year: &str) -> GameHash {
    hash_identity(&GameRecord::new(title, year).info)
}

/// Write a file, creating parent directories
pub fn write_file(path: &Path, content: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Names of directories under `root`, sorted
pub fn dir_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
