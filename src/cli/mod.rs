//! Command-line interface for gamemedia.
//!
//! Drives the media store the way a host application would: every command
//! that loads the library runs the load-time reconciliation first, and
//! mutating commands hold an exclusive lock on the media root.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fs2::FileExt;
use tracing::warn;

use crate::adapters::{EnglishMessages, HttpDownloader};
use crate::config::{self, paths, ResolvedConfig};
use crate::domain::{AssetSlot, GameHash, GameRecord};
use crate::library::GameLibrary;
use crate::media::{
    HostServices, MediaError, MediaStore, ReconcileOptions, ReconcileReport, ValidationError,
};

/// gamemedia - content-addressed media store for a game library
#[derive(Parser, Debug)]
#[command(name = "gamemedia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the media store root
    Init,

    /// Assign missing hashes and delete media with no matching game
    Reconcile {
        /// Only report orphaned directories
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a game and internalize its media
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        year: String,

        #[command(flatten)]
        media: MediaArgs,
    },

    /// Edit a game; changing title or year moves its media
    Edit {
        /// Current hash of the game
        hash: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[command(flatten)]
        media: MediaArgs,
    },

    /// Resolve a slot value of a game to a path (or URL)
    Resolve {
        /// Hash of the owning game
        hash: String,

        /// Stored value, e.g. @media://icon.png
        reference: String,

        /// Print a file URL with cache-busting token
        #[arg(long)]
        url: bool,
    },

    /// List games in the library
    List,

    /// Show resolved configuration (debug)
    Config,
}

/// Media slot values (local path or http(s) URL)
#[derive(clap::Args, Debug, Default)]
pub struct MediaArgs {
    #[arg(long)]
    pub landscape: Option<String>,

    #[arg(long)]
    pub portrait: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,
}

impl MediaArgs {
    fn apply(self, record: &mut GameRecord) {
        let values = [
            (AssetSlot::Landscape, self.landscape),
            (AssetSlot::Portrait, self.portrait),
            (AssetSlot::Icon, self.icon),
        ];
        for (slot, value) in values {
            if let Some(value) = value {
                record.info.set_slot(slot, value);
            }
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init => init().await,
            Commands::Reconcile { dry_run } => reconcile_library(dry_run).await,
            Commands::Add { title, year, media } => add_game(title, year, media).await,
            Commands::Edit {
                hash,
                title,
                year,
                media,
            } => edit_game(GameHash::new(hash), title, year, media).await,
            Commands::Resolve {
                hash,
                reference,
                url,
            } => resolve_reference(GameHash::new(hash), &reference, url).await,
            Commands::List => list_games().await,
            Commands::Config => show_config(),
        }
    }
}

/// A loaded library with the media root locked
struct Session {
    config: &'static ResolvedConfig,
    library: GameLibrary,
    _lock: File,
}

impl Session {
    /// Lock the media root, load the library and reconcile it
    async fn open(dry_run: bool) -> Result<(Self, ReconcileReport)> {
        let config = config::config()?;
        let bootstrap = build_store(config, GameLibrary::new())?;
        bootstrap.on_init().await?;

        let lock = acquire_lock()?;
        let mut library = GameLibrary::load(&config.library_file).await?;

        let options = ReconcileOptions {
            dry_run: dry_run || config.reconcile_dry_run,
        };
        let report = bootstrap.on_library_loaded(&mut library.games, options).await?;

        let mut session = Self {
            config,
            library,
            _lock: lock,
        };
        if report.records_modified() {
            session.save().await?;
        }

        Ok((session, report))
    }

    /// Store whose identity checks see the library as currently loaded
    fn store(&self) -> Result<MediaStore> {
        build_store(self.config, self.library.clone())
    }

    async fn save(&mut self) -> Result<()> {
        self.library.save(&self.config.library_file).await
    }
}

fn build_store(config: &ResolvedConfig, records: GameLibrary) -> Result<MediaStore> {
    let services = HostServices {
        messages: Arc::new(EnglishMessages),
        records: Arc::new(records),
        downloader: Arc::new(HttpDownloader::from_config(config)?),
    };
    Ok(MediaStore::new(config.media_root.clone(), services))
}

/// Exclusive lock serializing access to the media store
fn acquire_lock() -> Result<File> {
    let path = paths::lock_file()?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire lock: {}", path.display()))?;

    Ok(file)
}

/// Create the store root
async fn init() -> Result<()> {
    let config = config::config()?;
    build_store(config, GameLibrary::new())?.on_init().await?;
    println!("Media store ready at {}", config.media_root.display());
    Ok(())
}

/// Run reconciliation and print what it did
async fn reconcile_library(dry_run: bool) -> Result<()> {
    let (session, report) = Session::open(dry_run).await?;

    if report.hashes_assigned > 0 {
        println!("Assigned hashes to {} game(s)", report.hashes_assigned);
    }
    if report.removed.is_empty() {
        println!("No orphaned media in {}", session.config.media_root.display());
        return Ok(());
    }

    let verb = if report.dry_run { "Would remove" } else { "Removed" };
    println!("{} {} orphaned media directories:", verb, report.removed.len());
    for name in &report.removed {
        println!("  {}", name);
    }

    Ok(())
}

/// Add a new game
async fn add_game(title: String, year: String, media: MediaArgs) -> Result<()> {
    let (mut session, _) = Session::open(false).await?;

    let mut record = GameRecord::new(title, year);
    media.apply(&mut record);

    let store = session.store()?;
    let saved = commit(&store, &mut session.library, &mut record, None).await;
    session.save().await?;
    let hash = exit_on_rejection(saved)?;

    println!("Saved game {}", hash);
    Ok(())
}

/// Edit an existing game
async fn edit_game(
    hash: GameHash,
    title: Option<String>,
    year: Option<String>,
    media: MediaArgs,
) -> Result<()> {
    let (mut session, _) = Session::open(false).await?;

    let existing = session
        .library
        .get(&hash)
        .with_context(|| format!("No game with hash {}", hash))?;

    let mut record = existing.clone().with_prev_hash(hash.clone());
    if let Some(title) = title {
        record.info.title = title;
    }
    if let Some(year) = year {
        record.info.year = year;
    }
    media.apply(&mut record);

    let store = session.store()?;
    let saved = commit(&store, &mut session.library, &mut record, Some(&hash)).await;
    session.save().await?;
    let new_hash = exit_on_rejection(saved)?;

    if new_hash == hash {
        println!("Saved game {}", new_hash);
    } else {
        println!("Saved game {} (was {})", new_hash, hash);
    }
    Ok(())
}

/// Save `record` through the store and write it into `library`.
///
/// When the media directory already moved to the new hash and a later step
/// fails, the record is still written under that hash so the next
/// reconciliation keeps the directory.
async fn commit(
    store: &MediaStore,
    library: &mut GameLibrary,
    record: &mut GameRecord,
    replaces: Option<&GameHash>,
) -> Result<GameHash, MediaError> {
    match store.save_record(record).await {
        Ok(hash) => {
            library.upsert(record.clone(), replaces);
            Ok(hash)
        }
        Err(err) => {
            if let (Some(old), Some(new)) = (replaces, record.hash.as_ref()) {
                let moved_dir = tokio::fs::try_exists(store.media_dir(new)).await.unwrap_or(false);
                if old != new && moved_dir {
                    warn!(from = %old, to = %new, "Save failed after media moved, keeping record under new hash");
                    let mut moved = record.clone();
                    moved.prev_hash = None;
                    library.upsert(moved, Some(old));
                }
            }
            Err(err)
        }
    }
}

/// Print validation failures and exit non-zero; other errors propagate
fn exit_on_rejection(saved: Result<GameHash, MediaError>) -> Result<GameHash> {
    match saved {
        Ok(hash) => Ok(hash),
        Err(MediaError::Validation(err)) => {
            print_validation_error(&err);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn print_validation_error(err: &ValidationError) {
    eprintln!("{}", err.title);
    eprintln!("  {}", err.message);
    if let Some(locator) = &err.locator {
        eprintln!("  (tab: {}, field: {})", locator.tab, locator.item);
    }
}

/// Resolve a stored value to a path or URL
async fn resolve_reference(hash: GameHash, reference: &str, as_url: bool) -> Result<()> {
    let config = config::config()?;
    let store = build_store(config, GameLibrary::new())?;

    let resolution = if as_url {
        store.url_chain().resolve(&hash, reference)
    } else {
        store.path_chain().resolve(&hash, reference)
    };

    let output = if as_url {
        resolution.url
    } else {
        resolution.path.map(|p| p.display().to_string())
    };

    match output {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => anyhow::bail!("Cannot resolve {:?} for game {}", reference, hash),
    }
}

/// List games with their hashes
async fn list_games() -> Result<()> {
    let config = config::config()?;
    let library = GameLibrary::load(&config.library_file).await?;

    if library.is_empty() {
        println!("No games in library");
        return Ok(());
    }

    println!("{:<34} {:<6} {:<30}", "HASH", "YEAR", "TITLE");
    println!("{}", "-".repeat(72));

    for game in &library.games {
        let hash = game.hash.as_ref().map(GameHash::as_str).unwrap_or("-");
        println!("{:<34} {:<6} {:<30}", hash, game.info.year, game.info.title);
    }

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("Home:          {}", config.home.display());
    println!("Media root:    {}", config.media_root.display());
    println!("Library file:  {}", config.library_file.display());
    println!("Download cache: {}", config.download.cache_dir.display());
    println!("Timeout:       {}s", config.download.timeout_seconds);
    println!(
        "Config file:   {}",
        config
            .config_file
            .as_ref()
            .map(|p: &PathBuf| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Reconcile dry-run: {}", config.reconcile_dry_run);

    Ok(())
}
