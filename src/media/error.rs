//! Errors raised by the media store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::messages::{
    field_label_key, ALREADY_EXISTS, ALREADY_EXISTS_TITLE, FILE_NOT_FOUND, FILE_NOT_FOUND_TITLE,
    NOT_EXISTS, NOT_EXISTS_TITLE, REQUIRED, REQUIRED_TITLE,
};
use crate::adapters::Translator;
use crate::domain::AssetSlot;

/// Editor tab holding the identity and media fields
pub const INFO_TAB: &str = "info";

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Title or year is empty
    MissingField,
    /// The edited identity collides with another live game
    IdentityConflict,
    /// The record claims a hash no live game owns
    StaleReference,
    /// A slot points at a file that does not exist
    FileNotFound,
}

/// Editor field to highlight for a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocator {
    pub tab: String,
    pub item: String,
}

impl FieldLocator {
    fn info(item: &str) -> Self {
        Self {
            tab: INFO_TAB.to_string(),
            item: item.to_string(),
        }
    }
}

/// A failure the caller presents inline rather than treating as fatal
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{title}: {message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,

    /// Localized short title
    pub title: String,

    /// Localized explanation
    pub message: String,

    /// Field to highlight, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<FieldLocator>,
}

impl ValidationError {
    /// A required identity field (`title` or `year`) is empty
    pub fn missing_field(messages: &dyn Translator, field: &str) -> Self {
        let label = messages.translate(&field_label_key(field), &[]);
        Self {
            kind: ValidationErrorKind::MissingField,
            title: messages.translate(REQUIRED_TITLE, &[]),
            message: messages.translate(REQUIRED, &[&label]),
            locator: Some(FieldLocator::info(field)),
        }
    }

    /// Renaming would collide with an existing game
    pub fn identity_conflict(messages: &dyn Translator) -> Self {
        Self {
            kind: ValidationErrorKind::IdentityConflict,
            title: messages.translate(ALREADY_EXISTS_TITLE, &[]),
            message: messages.translate(ALREADY_EXISTS, &[]),
            locator: Some(FieldLocator::info("title")),
        }
    }

    /// The game being edited is no longer in the library
    pub fn stale_reference(messages: &dyn Translator) -> Self {
        Self {
            kind: ValidationErrorKind::StaleReference,
            title: messages.translate(NOT_EXISTS_TITLE, &[]),
            message: messages.translate(NOT_EXISTS, &[]),
            locator: None,
        }
    }

    /// A slot's source file is missing
    pub fn file_not_found(messages: &dyn Translator, slot: AssetSlot, path: &str) -> Self {
        let label = messages.translate(&field_label_key(slot.name()), &[]);
        Self {
            kind: ValidationErrorKind::FileNotFound,
            title: messages.translate(FILE_NOT_FOUND_TITLE, &[]),
            message: messages.translate(FILE_NOT_FOUND, &[&label, path]),
            locator: Some(FieldLocator::info(slot.name())),
        }
    }
}

/// Errors returned by media store operations
#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record lookup failed: {0:#}")]
    Lookup(anyhow::Error),
}

impl MediaError {
    /// Adapter for `map_err` on filesystem calls
    pub fn fs(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> MediaError {
        let path = path.to_path_buf();
        move |source| MediaError::Filesystem {
            action,
            path,
            source,
        }
    }

    /// The validation failure, if this is one
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            MediaError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
