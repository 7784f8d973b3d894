//! Canonical paths for gamemedia.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gamemedia::config::paths;
//!
//! let root = paths::media_root()?;
//! let library = paths::library_file()?;
//! ```

use std::path::PathBuf;

use anyhow::Result;

use super::ResolvedConfig;

/// Name of the lock file guarding mutating commands
pub const LOCK_FILE_NAME: &str = ".lock";

/// Get the gamemedia home directory (~/.gamemedia)
pub fn home() -> Result<PathBuf> {
    Ok(crate::config::config()?.home.clone())
}

/// Get the media store root (~/.gamemedia/library/media)
pub fn media_root() -> Result<PathBuf> {
    Ok(crate::config::config()?.media_root.clone())
}

/// Get the game library file (~/.gamemedia/library.json)
pub fn library_file() -> Result<PathBuf> {
    Ok(crate::config::config()?.library_file.clone())
}

/// Get the download cache directory (~/.gamemedia/cache)
pub fn download_cache() -> Result<PathBuf> {
    Ok(crate::config::config()?.download.cache_dir.clone())
}

/// Get the lock file inside the media root.
///
/// A file, so reconciliation (which only looks at directories) ignores it.
pub fn lock_file() -> Result<PathBuf> {
    Ok(lock_file_in(crate::config::config()?))
}

fn lock_file_in(config: &ResolvedConfig) -> PathBuf {
    config.media_root.join(LOCK_FILE_NAME)
}
