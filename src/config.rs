//! Configuration for gamemedia paths and downloads.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GAMEMEDIA_HOME, GAMEMEDIA_MEDIA)
//! 2. Config file (.gamemedia/config.yaml)
//! 3. Defaults (~/.gamemedia)
//!
//! Config file discovery:
//! - Searches current directory and parents for .gamemedia/config.yaml
//! - `paths.home` is relative to the .gamemedia/ directory, every other
//!   path is relative to the directory containing .gamemedia/

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".gamemedia";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub download: Option<DownloadConfig>,
    #[serde(default)]
    pub reconcile: Option<ReconcileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Application state directory
    pub home: Option<String>,
    /// Media store root
    pub media: Option<String>,
    /// Library file
    pub library: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    pub cache_dir: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    pub dry_run: Option<bool>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Application state directory
    pub home: PathBuf,
    /// Media store root
    pub media_root: PathBuf,
    /// Game library file
    pub library_file: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Download settings
    pub download: DownloadSettings,
    /// Report orphaned media instead of deleting it
    pub reconcile_dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub cache_dir: PathBuf,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl DownloadSettings {
    fn defaults_for(home: &Path) -> Self {
        Self {
            cache_dir: home.join("cache"),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("gamemedia/{}", env!("CARGO_PKG_VERSION"))
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Make an environment-provided path absolute
fn absolute_env_path(value: String) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().map(absolute_env_path)
}

/// Path overrides taken from the environment
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<PathBuf>,
    media: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: env_path("GAMEMEDIA_HOME"),
            media: env_path("GAMEMEDIA_MEDIA"),
        }
    }
}

/// Resolve every setting from a parsed config file
fn resolve_config(
    config: ConfigFile,
    config_path: &Path,
    default_home: PathBuf,
    env: &EnvOverrides,
) -> ResolvedConfig {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    // Base directory is the parent of .gamemedia/
    let base_dir = config_dir.parent().unwrap_or(Path::new("."));

    let home = env
        .home
        .clone()
        .or_else(|| config.paths.home.as_deref().map(|h| resolve_path(config_dir, h)))
        .unwrap_or(default_home);

    let media_root = env
        .media
        .clone()
        .or_else(|| config.paths.media.as_deref().map(|m| resolve_path(base_dir, m)))
        .unwrap_or_else(|| home.join("library").join("media"));

    let library_file = config
        .paths
        .library
        .as_deref()
        .map(|l| resolve_path(base_dir, l))
        .unwrap_or_else(|| home.join("library.json"));

    let defaults = DownloadSettings::defaults_for(&home);
    let download = match config.download {
        Some(d) => DownloadSettings {
            cache_dir: d
                .cache_dir
                .as_deref()
                .map(|c| resolve_path(base_dir, c))
                .unwrap_or(defaults.cache_dir),
            timeout_seconds: d.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            user_agent: d.user_agent.unwrap_or(defaults.user_agent),
        },
        None => defaults,
    };

    let reconcile_dry_run = config
        .reconcile
        .as_ref()
        .and_then(|r| r.dry_run)
        .unwrap_or(false);

    ResolvedConfig {
        home,
        media_root,
        library_file,
        config_file: Some(config_path.to_path_buf()),
        download,
        reconcile_dry_run,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let env = EnvOverrides::from_env();

    if let Some(config_path) = find_config_file() {
        let config = load_config_file(&config_path)?;
        return Ok(resolve_config(config, &config_path, default_home, &env));
    }

    // No config file - use env vars or defaults
    Ok(default_config(default_home, &env))
}

/// Configuration when no config file exists
fn default_config(default_home: PathBuf, env: &EnvOverrides) -> ResolvedConfig {
    let home = env.home.clone().unwrap_or(default_home);
    let media_root = env
        .media
        .clone()
        .unwrap_or_else(|| home.join("library").join("media"));

    ResolvedConfig {
        library_file: home.join("library.json"),
        download: DownloadSettings::defaults_for(&home),
        home,
        media_root,
        config_file: None,
        reconcile_dry_run: false,
    }
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
