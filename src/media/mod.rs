//! Content-addressed media storage for game records.
//!
//! # Storage Layout
//!
//! ```text
//! <media root>/
//! └── <hash>/                   # SHA256(title § year)[0:16] as hex
//!     ├── imagelandscape.jpg
//!     ├── imageportrait.png
//!     └── icon.png
//! ```
//!
//! Records refer to these files through virtual references such as
//! `@media://icon.png`, which are resolved against the owning game's hash.
//!
//! # Flow
//!
//! - library load: [`reconcile`] assigns missing hashes and deletes orphaned directories
//! - create/edit: [`validate_identity`], then [`migrate`], then [`internalize`]
//! - display: [`resolve_path`] / [`resolve_url`] on demand
//!
//! All operations expect a single caller at a time; nothing here locks.

pub mod error;
pub mod identity;
pub mod internalize;
pub mod migrate;
pub mod reconcile;
pub mod resolve;
pub mod store;

pub use error::{FieldLocator, MediaError, ValidationError, ValidationErrorKind};
pub use identity::{hash_identity, validate_identity};
pub use internalize::{internalize, InternalizeReport, IMAGE_CATEGORY};
pub use migrate::{migrate, rewrite_legacy_absolute_refs, MigrationOutcome};
pub use reconcile::{reconcile, ReconcileOptions, ReconcileReport};
pub use resolve::{resolve_path, resolve_url, Resolution, ResolverChain};
pub use store::{HostServices, MediaStore};
