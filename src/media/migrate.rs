//! Moving a game's media directory when its identity hash changes.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use super::error::MediaError;
use crate::domain::{AssetSlot, AssetSource, GameHash, GameInfo, GameRecord, VirtualRef};

/// Result of a migration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No directory existed under the previous hash
    NothingToMigrate,

    /// The directory moved; `rewritten` lists slots converted from legacy absolute paths
    Moved {
        from: PathBuf,
        to: PathBuf,
        rewritten: Vec<AssetSlot>,
    },
}

/// Move `root/<prev_hash>` to `root/<new_hash>` for an edited record.
///
/// Does nothing unless `record.prev_hash` is set, differs from `new_hash`,
/// and has a directory on disk.
pub async fn migrate(
    root: &Path,
    record: &mut GameRecord,
    new_hash: &GameHash,
) -> Result<MigrationOutcome, MediaError> {
    let Some(prev_hash) = record.prev_hash.clone() else {
        return Ok(MigrationOutcome::NothingToMigrate);
    };
    if prev_hash == *new_hash {
        return Ok(MigrationOutcome::NothingToMigrate);
    }

    let from = root.join(prev_hash.as_str());
    if !fs::try_exists(&from).await.map_err(MediaError::fs("inspect", &from))? {
        return Ok(MigrationOutcome::NothingToMigrate);
    }

    let to = root.join(new_hash.as_str());
    info!(from = %prev_hash, to = %new_hash, "Moving media directory");
    move_dir(&from, &to).await?;

    let rewritten = rewrite_legacy_absolute_refs(&mut record.info, &from);

    Ok(MigrationOutcome::Moved { from, to, rewritten })
}

/// Legacy rule: slots that stored an absolute path inside the old media
/// directory become virtual references. Everything else is left for the
/// internalizer.
pub fn rewrite_legacy_absolute_refs(info: &mut GameInfo, old_dir: &Path) -> Vec<AssetSlot> {
    let mut rewritten = Vec::new();

    for slot in AssetSlot::ALL {
        let reference = match info.slot(slot).and_then(AssetSource::classify) {
            Some(AssetSource::Local(path)) if is_inside(path, old_dir) => {
                VirtualRef::for_slot(slot, path)
            }
            _ => continue,
        };
        info.set_slot(slot, reference.as_str());
        rewritten.push(slot);
    }

    rewritten
}

fn is_inside(path: &Path, dir: &Path) -> bool {
    path.strip_prefix(dir)
        .map(|rest| !rest.as_os_str().is_empty())
        .unwrap_or(false)
}

/// Rename a directory, falling back to copy-then-delete (e.g. across devices)
async fn move_dir(from: &Path, to: &Path) -> Result<(), MediaError> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, from = %from.display(), to = %to.display(), "Rename failed, copying instead");
            copy_dir_all(from, to).await?;
            fs::remove_dir_all(from)
                .await
                .map_err(MediaError::fs("remove", from))
        }
    }
}

/// Recursively copy `from` into `to`, overwriting existing files
async fn copy_dir_all(from: &Path, to: &Path) -> Result<(), MediaError> {
    let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];

    while let Some((src_dir, dst_dir)) = pending.pop() {
        fs::create_dir_all(&dst_dir)
            .await
            .map_err(MediaError::fs("create", &dst_dir))?;

        let mut entries = fs::read_dir(&src_dir)
            .await
            .map_err(MediaError::fs("list", &src_dir))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(MediaError::fs("list", &src_dir))?
        {
            let src = entry.path();
            let dst = dst_dir.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(MediaError::fs("inspect", &src))?;

            if file_type.is_dir() {
                pending.push((src, dst));
            } else {
                fs::copy(&src, &dst).await.map_err(MediaError::fs("copy", &src))?;
            }
        }
    }

    Ok(())
}
