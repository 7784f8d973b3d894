//! The media store facade wired to its host collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, instrument};

use super::error::MediaError;
use super::identity::validate_identity;
use super::internalize::internalize;
use super::migrate::{migrate, MigrationOutcome};
use super::reconcile::{reconcile, ReconcileOptions, ReconcileReport};
use super::resolve::{self, Resolution, ResolverChain};
use crate::adapters::{Downloader, RecordLookup, Translator};
use crate::domain::{GameHash, GameRecord};

/// Host services injected at construction
#[derive(Clone)]
pub struct HostServices {
    pub messages: Arc<dyn Translator>,
    pub records: Arc<dyn RecordLookup>,
    pub downloader: Arc<dyn Downloader>,
}

/// Content-addressed media store rooted at a single directory
#[derive(Clone)]
pub struct MediaStore {
    /// Store root; one subdirectory per game hash
    root: PathBuf,
    services: HostServices,
}

impl MediaStore {
    /// Create a store over `root`; call [`MediaStore::on_init`] before use
    pub fn new(root: impl Into<PathBuf>, services: HostServices) -> Self {
        Self {
            root: root.into(),
            services,
        }
    }

    /// Get the store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Media directory of a game
    pub fn media_dir(&self, hash: &GameHash) -> PathBuf {
        self.root.join(hash.as_str())
    }

    /// Lifecycle hook: create the store root if absent
    pub async fn on_init(&self) -> Result<(), MediaError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(MediaError::fs("create", &self.root))?;
        debug!(root = %self.root.display(), "Media store ready");
        Ok(())
    }

    /// Lifecycle hook: reconcile the store against a freshly loaded library
    #[instrument(skip(self, records), fields(root = %self.root.display(), games = records.len()))]
    pub async fn on_library_loaded(
        &self,
        records: &mut [GameRecord],
        options: ReconcileOptions,
    ) -> Result<ReconcileReport, MediaError> {
        let report = reconcile(&self.root, records, options).await?;
        info!(
            removed = report.removed.len(),
            hashes_assigned = report.hashes_assigned,
            "Library reconciled"
        );
        Ok(report)
    }

    /// Validate identity fields and return the draft hash
    pub async fn validate(&self, record: &GameRecord) -> Result<GameHash, MediaError> {
        validate_identity(
            record,
            self.services.records.as_ref(),
            self.services.messages.as_ref(),
        )
        .await
    }

    /// Create or update a game: validate, migrate, then internalize.
    ///
    /// On success the record carries its new hash and no `prev_hash`.
    #[instrument(skip(self, record), fields(title = %record.info.title))]
    pub async fn save_record(&self, record: &mut GameRecord) -> Result<GameHash, MediaError> {
        let hash = self.validate(record).await?;

        if let MigrationOutcome::Moved { rewritten, .. } = migrate(&self.root, record, &hash).await? {
            debug!(?rewritten, "Migrated media directory");
        }

        record.hash = Some(hash.clone());

        let report = internalize(
            &self.root,
            &hash,
            record,
            self.services.downloader.as_ref(),
            self.services.messages.as_ref(),
        )
        .await?;
        debug!(?report, "Internalized media");

        record.prev_hash = None;
        Ok(hash)
    }

    /// Resolve a virtual reference of `hash` to a filesystem path
    pub fn resolve_path(&self, hash: &GameHash, inflight: &mut Resolution) {
        resolve::resolve_path(&self.root, hash, inflight);
    }

    /// Resolve a virtual reference of `hash` to a cache-busted URL
    pub fn resolve_url(&self, hash: &GameHash, inflight: &mut Resolution) {
        resolve::resolve_url(&self.root, hash, inflight);
    }

    /// Path resolvers: this store first, then plain local paths
    pub fn path_chain(&self) -> ResolverChain<'_> {
        ResolverChain::new()
            .with(move |hash: &GameHash, r: &mut Resolution| self.resolve_path(hash, r))
            .with(resolve::passthrough_path)
    }

    /// URL resolvers: this store first, then remote URLs and local paths
    pub fn url_chain(&self) -> ResolverChain<'_> {
        ResolverChain::new()
            .with(move |hash: &GameHash, r: &mut Resolution| self.resolve_url(hash, r))
            .with(resolve::passthrough_url)
    }
}
