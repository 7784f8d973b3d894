//! Garbage collection of media directories against the live library.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use super::error::MediaError;
use super::identity::hash_identity;
use crate::domain::GameRecord;

/// Options for a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Report orphans without deleting them
    pub dry_run: bool,
}

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Orphaned directory names (deleted unless `dry_run`)
    pub removed: Vec<String>,

    /// Records that had no hash and got one assigned
    pub hashes_assigned: usize,

    pub dry_run: bool,
}

impl ReconcileReport {
    /// Whether the record set changed and should be persisted
    pub fn records_modified(&self) -> bool {
        self.hashes_assigned > 0
    }
}

/// Reconcile the store root with the live record set.
///
/// Assigns hashes to records missing one, then deletes every directory
/// under `root` that no record claims. Deletion is recursive and final.
pub async fn reconcile(
    root: &Path,
    records: &mut [GameRecord],
    options: ReconcileOptions,
) -> Result<ReconcileReport, MediaError> {
    let mut unclaimed = list_media_dirs(root).await?;
    let mut report = ReconcileReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for record in records.iter_mut() {
        let hash = match &record.hash {
            Some(hash) => hash.clone(),
            None => {
                let hash = hash_identity(&record.info);
                info!(title = %record.info.title, %hash, "Game has no hash, assigning one");
                record.hash = Some(hash.clone());
                report.hashes_assigned += 1;
                hash
            }
        };
        unclaimed.remove(hash.as_str());
    }

    if unclaimed.is_empty() {
        return Ok(report);
    }

    warn!(
        count = unclaimed.len(),
        root = %root.display(),
        dry_run = options.dry_run,
        "Removing media directories with no matching game in library"
    );

    for name in unclaimed {
        if !options.dry_run {
            let dir = root.join(&name);
            fs::remove_dir_all(&dir)
                .await
                .map_err(MediaError::fs("remove", &dir))?;
        }
        report.removed.push(name);
    }

    Ok(report)
}

/// Names of the directories directly under `root` (files are ignored)
async fn list_media_dirs(root: &Path) -> Result<BTreeSet<String>, MediaError> {
    let mut names = BTreeSet::new();

    let mut entries = match fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(MediaError::fs("list", root)(e)),
    };

    while let Some(entry) = entries.next_entry().await.map_err(MediaError::fs("list", root))? {
        let is_dir = entry
            .file_type()
            .await
            .map_err(MediaError::fs("inspect", &entry.path()))?
            .is_dir();
        if is_dir {
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
    }

    Ok(names)
}
