//! Game library persistence.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.gamemedia/
//! ├── library.json              # All game records
//! ├── cache/images/             # Downloaded remote media
//! └── library/media/<hash>/     # Internalized media (see `media`)
//! ```

pub mod games;

pub use games::GameLibrary;
