//! Pulling slot assets into a game's media directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error, info};

use super::error::{MediaError, ValidationError};
use crate::adapters::{Downloader, Translator};
use crate::domain::{extension_suffix, AssetSlot, AssetSource, GameHash, GameRecord, VirtualRef};

/// Download category used for slot images
pub const IMAGE_CATEGORY: &str = "images";

/// Slots touched by an internalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalizeReport {
    /// Slots fetched from a remote URL
    pub downloaded: Vec<AssetSlot>,

    /// Slots copied into the media directory
    pub copied: Vec<AssetSlot>,

    /// Slots rewritten to a virtual reference
    pub internalized: Vec<AssetSlot>,
}

impl InternalizeReport {
    /// Whether nothing changed
    pub fn is_noop(&self) -> bool {
        self.downloaded.is_empty() && self.copied.is_empty() && self.internalized.is_empty()
    }
}

/// Copy every non-virtual slot asset into `root/<hash>` and rewrite the slot
/// to `@media://<slot><.ext>`.
///
/// A missing source aborts with `FileNotFound`; slots handled earlier in the
/// same call stay internalized. Failed downloads are logged and the slot is
/// left unchanged, so they surface as `FileNotFound` too.
pub async fn internalize(
    root: &Path,
    hash: &GameHash,
    record: &mut GameRecord,
    downloader: &dyn Downloader,
    messages: &dyn Translator,
) -> Result<InternalizeReport, MediaError> {
    let media_dir = root.join(hash.as_str());
    let mut report = InternalizeReport::default();

    for slot in AssetSlot::ALL {
        let Some(mut value) = record.info.slot(slot).map(str::to_string) else {
            continue;
        };

        debug!(%slot, %value, "Internalizing asset");

        let remote = match AssetSource::classify(&value) {
            None | Some(AssetSource::Virtual(_)) => continue,
            Some(AssetSource::Remote(url)) => Some(url.to_string()),
            Some(AssetSource::Local(_)) => None,
        };

        if let Some(url) = remote {
            info!(%slot, %url, "Downloading asset from web");
            match downloader.download_to_local(&url, IMAGE_CATEGORY).await {
                Ok(local) => {
                    value = local.to_string_lossy().into_owned();
                    record.info.set_slot(slot, value.as_str());
                    report.downloaded.push(slot);
                }
                Err(e) => {
                    error!(%slot, %url, error = %format!("{:#}", e), "Error downloading asset");
                }
            }
        }

        let source = absolute(Path::new(&value))?;
        if !fs::try_exists(&source).await.unwrap_or(false) {
            return Err(ValidationError::file_not_found(messages, slot, &value).into());
        }

        let dest = media_dir.join(format!("{}{}", slot.name(), extension_suffix(&source)));
        if !same_file(&source, &dest).await {
            fs::create_dir_all(&media_dir)
                .await
                .map_err(MediaError::fs("create", &media_dir))?;
            fs::copy(&source, &dest)
                .await
                .map_err(MediaError::fs("copy", &source))?;
            report.copied.push(slot);
        }

        record
            .info
            .set_slot(slot, VirtualRef::for_slot(slot, &source).as_str());
        report.internalized.push(slot);
    }

    Ok(report)
}

/// Resolve a relative path against the current directory
fn absolute(path: &Path) -> Result<PathBuf, MediaError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(MediaError::fs("resolve", path))?;
    Ok(cwd.join(path))
}

/// Whether both paths name the same existing file
async fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
