//! JSON-backed game library.
//!
//! Stands in for the host's record store: the CLI loads it, drives the media
//! store with it, and writes it back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::adapters::RecordLookup;
use crate::domain::{GameHash, GameRecord};

/// All games known to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLibrary {
    /// Library format version
    pub version: u32,

    /// When the library was last written
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    /// Game records
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

impl Default for GameLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            version: 1,
            saved_at: None,
            games: Vec::new(),
        }
    }

    /// Get the configured library file path
    pub fn default_path() -> Result<PathBuf> {
        crate::config::paths::library_file()
    }

    /// Load the library from disk; a missing file is an empty library
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read library: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse library JSON: {}", path.display()))
    }

    /// Save the library to disk
    pub async fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        self.saved_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write library: {}", path.display()))?;

        Ok(())
    }

    /// Get a game by hash
    pub fn get(&self, hash: &GameHash) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.hash.as_ref() == Some(hash))
    }

    /// Insert a game, replacing one stored under `replaces` (or its own hash)
    pub fn upsert(&mut self, record: GameRecord, replaces: Option<&GameHash>) {
        let key = replaces.or(record.hash.as_ref()).cloned();
        let existing = key.and_then(|key| {
            self.games
                .iter()
                .position(|g| g.hash.as_ref() == Some(&key))
        });

        match existing {
            Some(pos) => self.games[pos] = record,
            None => self.games.push(record),
        }
    }

    /// Remove a game by hash
    pub fn remove(&mut self, hash: &GameHash) -> Option<GameRecord> {
        let pos = self.games.iter().position(|g| g.hash.as_ref() == Some(hash))?;
        Some(self.games.remove(pos))
    }

    /// Get the number of games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Check if the library is empty
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl RecordLookup for GameLibrary {
    async fn lookup_record_by_hash(&self, hash: &GameHash) -> Result<Option<GameRecord>> {
        Ok(self.get(hash).cloned())
    }
}
