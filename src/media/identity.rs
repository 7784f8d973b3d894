//! Identity hashing and pre-save validation.

use sha2::{Digest, Sha256};

use super::error::{MediaError, ValidationError};
use crate::adapters::{RecordLookup, Translator};
use crate::domain::{GameHash, GameInfo, GameRecord};

/// Separator between title and year in the hash input
pub const IDENTITY_DELIMITER: char = '§';

/// Hash of a game's identity (title and year only).
///
/// SHA256 over `title § year`, first 16 bytes as hex.
pub fn hash_identity(info: &GameInfo) -> GameHash {
    let mut hasher = Sha256::new();
    hasher.update(info.title.as_bytes());
    hasher.update(IDENTITY_DELIMITER.to_string().as_bytes());
    hasher.update(info.year.as_bytes());
    GameHash::new(hex::encode(&hasher.finalize()[..16]))
}

/// Validate a record before any mutation and return its draft hash.
///
/// Stops at the first failure:
/// - empty `title`, then empty `year` -> `MissingField`
/// - renamed onto a hash another game owns -> `IdentityConflict`
/// - unchanged hash that no live game owns -> `StaleReference`
pub async fn validate_identity(
    record: &GameRecord,
    records: &dyn RecordLookup,
    messages: &dyn Translator,
) -> Result<GameHash, MediaError> {
    if record.info.title.is_empty() {
        return Err(ValidationError::missing_field(messages, "title").into());
    }
    if record.info.year.is_empty() {
        return Err(ValidationError::missing_field(messages, "year").into());
    }

    let draft = hash_identity(&record.info);

    if let Some(prev) = &record.prev_hash {
        let owner = records
            .lookup_record_by_hash(&draft)
            .await
            .map_err(MediaError::Lookup)?;

        if *prev != draft && owner.is_some() {
            return Err(ValidationError::identity_conflict(messages).into());
        }
        if *prev == draft && owner.is_none() {
            return Err(ValidationError::stale_reference(messages).into());
        }
    }

    Ok(draft)
}
