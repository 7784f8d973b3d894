//! gamemedia - content-addressed media store for a game library
//!
//! Keeps each game's images in a directory named by a hash of its title and
//! year, and lets records refer to them through portable `@media://`
//! references.
//!
//! # Modules
//!
//! - `domain`: Data structures (GameRecord, GameHash, AssetSlot, VirtualRef)
//! - `media`: The store (identity, reconcile, migrate, internalize, resolve)
//! - `adapters`: Host collaborators (translation, record lookup, downloads)
//! - `library`: JSON-backed game library
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add a game with a local icon and a remote cover
//! gamemedia add --title Chess --year 1990 --icon ./chess.png \
//!     --portrait https://example.com/chess-cover.jpg
//!
//! # Resolve a stored reference
//! gamemedia resolve <hash> @media://icon.png --url
//!
//! # Remove media of games no longer in the library
//! gamemedia reconcile
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod library;
pub mod media;

// Re-export main types at crate root for convenience
pub use domain::{AssetSlot, GameHash, GameInfo, GameRecord, VirtualRef};
pub use library::GameLibrary;
pub use media::{HostServices, MediaError, MediaStore, Resolution, ValidationError, ValidationErrorKind};
