//! Domain types for the media store.
//!
//! - `game`: game records, identity hashes and asset slots
//! - `reference`: virtual references and slot value classification

pub mod game;
pub mod reference;

pub use game::{AssetSlot, GameHash, GameInfo, GameRecord};
pub use reference::{extension_suffix, is_remote_url, AssetSource, VirtualRef, MEDIA_SCHEME};
