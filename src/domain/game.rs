//! Game records as seen by the media store.
//!
//! The library owns these records; the media store only reads them and
//! annotates `hash` / asset slot values.

use serde::{Deserialize, Deserializer, Serialize};

/// Stable identity hash of a game (hex digest of title and year).
///
/// Doubles as the name of the game's media directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHash(String);

impl GameHash {
    /// Wrap an already computed hash (e.g. a directory name or CLI argument)
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the fixed media slots a game can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSlot {
    /// Wide cover/banner image
    #[serde(rename = "imagelandscape")]
    Landscape,

    /// Tall box-art image
    #[serde(rename = "imageportrait")]
    Portrait,

    /// Small square icon
    Icon,
}

impl AssetSlot {
    /// Every slot, in internalization order
    pub const ALL: [AssetSlot; 3] = [AssetSlot::Landscape, AssetSlot::Portrait, AssetSlot::Icon];

    /// Slot name as stored in records and used for file names on disk
    pub fn name(self) -> &'static str {
        match self {
            AssetSlot::Landscape => "imagelandscape",
            AssetSlot::Portrait => "imageportrait",
            AssetSlot::Icon => "icon",
        }
    }
}

impl std::fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AssetSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "imagelandscape" | "landscape" => Ok(AssetSlot::Landscape),
            "imageportrait" | "portrait" => Ok(AssetSlot::Portrait),
            "icon" => Ok(AssetSlot::Icon),
            _ => anyhow::bail!("Unknown asset slot: {}", s),
        }
    }
}

/// Editable info block of a game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Display title (required)
    #[serde(default)]
    pub title: String,

    /// Release year (required); accepted as string or number
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagelandscape: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageportrait: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl GameInfo {
    /// Current value of a slot; empty strings count as unset
    pub fn slot(&self, slot: AssetSlot) -> Option<&str> {
        let value = match slot {
            AssetSlot::Landscape => &self.imagelandscape,
            AssetSlot::Portrait => &self.imageportrait,
            AssetSlot::Icon => &self.icon,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Replace the value of a slot
    pub fn set_slot(&mut self, slot: AssetSlot, value: impl Into<String>) {
        let value = Some(value.into());
        match slot {
            AssetSlot::Landscape => self.imagelandscape = value,
            AssetSlot::Portrait => self.imageportrait = value,
            AssetSlot::Icon => self.icon = value,
        }
    }
}

/// A game record in the library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Identity and media fields
    pub info: GameInfo,

    /// Identity hash; missing on legacy records until reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<GameHash>,

    /// Hash held before the edit currently in progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<GameHash>,
}

impl GameRecord {
    /// Create a new record without media
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            info: GameInfo {
                title: title.into(),
                year: year.into(),
                ..Default::default()
            },
            hash: None,
            prev_hash: None,
        }
    }

    /// Set a slot value
    pub fn with_slot(mut self, slot: AssetSlot, value: impl Into<String>) -> Self {
        self.info.set_slot(slot, value);
        self
    }

    /// Set the stored hash
    pub fn with_hash(mut self, hash: GameHash) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Mark the record as being edited from `prev_hash`
    pub fn with_prev_hash(mut self, prev_hash: GameHash) -> Self {
        self.prev_hash = Some(prev_hash);
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    })
}
