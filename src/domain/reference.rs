//! Asset slot values: virtual references, remote URLs and local paths.

use std::path::{Component, Path, PathBuf};

use super::game::AssetSlot;

/// Scheme prefix of virtual references
pub const MEDIA_SCHEME: &str = "@media://";

/// A portable `@media://<slot><.ext>` reference.
///
/// Names an asset without saying where it lives; resolving it needs the
/// owning game's hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualRef(String);

impl VirtualRef {
    /// Build the reference for a slot, keeping the source file's extension
    pub fn for_slot(slot: AssetSlot, source: &Path) -> Self {
        Self(format!("{}{}{}", MEDIA_SCHEME, slot.name(), extension_suffix(source)))
    }

    /// Parse a slot value, returning `None` unless it carries the media scheme
    pub fn parse(value: &str) -> Option<Self> {
        value.starts_with(MEDIA_SCHEME).then(|| Self(value.to_string()))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the part after the scheme into a path relative to a media directory.
    ///
    /// Returns `None` for references that would escape the directory.
    pub fn relative_path(&self) -> Option<PathBuf> {
        let encoded = &self.0[MEDIA_SCHEME.len()..];
        let decoded = urlencoding::decode(encoded)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| encoded.to_string());

        let mut relative = PathBuf::new();
        for component in Path::new(&decoded).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }

        (!relative.as_os_str().is_empty()).then_some(relative)
    }
}

impl std::fmt::Display for VirtualRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a slot value currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource<'a> {
    /// Already internalized
    Virtual(VirtualRef),

    /// Remote resource that has to be downloaded first
    Remote(&'a str),

    /// File on the local filesystem
    Local(&'a Path),
}

impl<'a> AssetSource<'a> {
    /// Classify a slot value; `None` for empty values
    pub fn classify(value: &'a str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        if let Some(reference) = VirtualRef::parse(value) {
            return Some(AssetSource::Virtual(reference));
        }
        if is_remote_url(value) {
            return Some(AssetSource::Remote(value));
        }
        Some(AssetSource::Local(Path::new(value)))
    }
}

/// Whether a value is an http(s) URL
pub fn is_remote_url(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// File extension including the leading dot, or an empty string
pub fn extension_suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
