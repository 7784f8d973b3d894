//! Turning slot values back into concrete paths and URLs.
//!
//! Resolvers share one in-flight [`Resolution`]. Each checks `handled` and
//! its own claim predicate before acting, so several resolver kinds can sit
//! in one [`ResolverChain`] without stepping on each other.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::debug;

use crate::domain::{is_remote_url, GameHash, VirtualRef};

/// Query parameter carrying the cache-busting token
pub const CACHE_BUST_PARAM: &str = "vt";

/// A value being resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The slot value as stored in the record
    pub value: String,

    /// Concrete filesystem path, once resolved
    pub path: Option<PathBuf>,

    /// Displayable URL, once resolved
    pub url: Option<String>,

    /// Set by whichever resolver claimed the value
    pub handled: bool,
}

impl Resolution {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}

/// Resolve a virtual reference to `root/<hash>/<slot file>`.
///
/// Passes through values that are already handled or not virtual.
pub fn resolve_path(root: &Path, hash: &GameHash, inflight: &mut Resolution) {
    if inflight.handled {
        return;
    }
    if let Some(path) = virtual_target(root, hash, &inflight.value) {
        inflight.path = Some(path);
        inflight.handled = true;
    }
}

/// Resolve a virtual reference to a `file://` URL.
///
/// When the file exists the URL gets `?vt=<mtime millis>` so displays pick
/// up replaced assets without a rename.
pub fn resolve_url(root: &Path, hash: &GameHash, inflight: &mut Resolution) {
    if inflight.handled {
        return;
    }
    let Some(path) = virtual_target(root, hash, &inflight.value) else {
        return;
    };
    let Some(url) = file_url(&path) else {
        debug!(path = %path.display(), "Cannot express media path as file URL");
        return;
    };

    let url = match modified_millis(&path) {
        Some(millis) => format!("{}?{}={}", url, CACHE_BUST_PARAM, millis),
        None => url.to_string(),
    };

    inflight.url = Some(url);
    inflight.path = Some(path);
    inflight.handled = true;
}

/// `file://` URL for `path`, resolving relative paths against the cwd
fn file_url(path: &Path) -> Option<Url> {
    if path.is_absolute() {
        return Url::from_file_path(path).ok();
    }
    let cwd = std::env::current_dir().ok()?;
    Url::from_file_path(cwd.join(path)).ok()
}

/// Claim plain local paths as-is
pub fn passthrough_path(_hash: &GameHash, inflight: &mut Resolution) {
    if inflight.handled || inflight.value.is_empty() || is_remote_url(&inflight.value) {
        return;
    }
    if VirtualRef::parse(&inflight.value).is_some() {
        return;
    }
    inflight.path = Some(PathBuf::from(&inflight.value));
    inflight.handled = true;
}

/// Claim remote URLs as-is and absolute local paths as `file://` URLs
pub fn passthrough_url(_hash: &GameHash, inflight: &mut Resolution) {
    if inflight.handled || inflight.value.is_empty() {
        return;
    }
    if is_remote_url(&inflight.value) {
        inflight.url = Some(inflight.value.clone());
        inflight.handled = true;
        return;
    }
    if VirtualRef::parse(&inflight.value).is_some() {
        return;
    }
    if let Ok(url) = Url::from_file_path(&inflight.value) {
        inflight.url = Some(url.to_string());
        inflight.path = Some(PathBuf::from(&inflight.value));
        inflight.handled = true;
    }
}

type Resolver<'a> = Box<dyn Fn(&GameHash, &mut Resolution) + Send + Sync + 'a>;

/// Ordered list of resolvers sharing one in-flight resolution
#[derive(Default)]
pub struct ResolverChain<'a> {
    resolvers: Vec<Resolver<'a>>,
}

impl<'a> ResolverChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver; earlier resolvers get first claim
    pub fn with(mut self, resolver: impl Fn(&GameHash, &mut Resolution) + Send + Sync + 'a) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Run every resolver in order over `inflight`
    pub fn run(&self, hash: &GameHash, inflight: &mut Resolution) {
        for resolver in &self.resolvers {
            resolver(hash, inflight);
        }
    }

    /// Resolve a raw value
    pub fn resolve(&self, hash: &GameHash, value: impl Into<String>) -> Resolution {
        let mut inflight = Resolution::new(value);
        self.run(hash, &mut inflight);
        inflight
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn virtual_target(root: &Path, hash: &GameHash, value: &str) -> Option<PathBuf> {
    let relative = VirtualRef::parse(value)?.relative_path()?;
    Some(root.join(hash.as_str()).join(relative))
}

fn modified_millis(path: &Path) -> Option<i64> {
    let modified: SystemTime = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified).timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_claims_virtual() {
        let hash = GameHash::new("abc");
        let mut inflight = Resolution::new("@media://icon.png");

        resolve_path(Path::new("/media"), &hash, &mut inflight);

        assert!(inflight.handled);
        assert_eq!(inflight.path, Some(PathBuf::from("/media/abc/icon.png")));
    }

    #[test]
    fn test_resolve_path_skips_foreign_values() {
        let hash = GameHash::new("abc");
        let mut inflight = Resolution::new("/tmp/icon.png");

        resolve_path(Path::new("/media"), &hash, &mut inflight);

        assert!(!inflight.handled);
        assert!(inflight.path.is_none());
    }

    #[test]
    fn test_handled_values_pass_through() {
        let hash = GameHash::new("abc");
        let mut inflight = Resolution {
            value: "@media://icon.png".to_string(),
            path: Some(PathBuf::from("/elsewhere/icon.png")),
            url: None,
            handled: true,
        };

        resolve_path(Path::new("/media"), &hash, &mut inflight);
        resolve_url(Path::new("/media"), &hash, &mut inflight);

        assert_eq!(inflight.path, Some(PathBuf::from("/elsewhere/icon.png")));
        assert!(inflight.url.is_none());
    }

    #[test]
    fn test_url_without_file_has_no_token() {
        let hash = GameHash::new("abc");
        let mut inflight = Resolution::new("@media://icon.png");

        resolve_url(Path::new("/nonexistent-media-root"), &hash, &mut inflight);

        assert!(inflight.handled);
        assert_eq!(
            inflight.url.as_deref(),
            Some("file:///nonexistent-media-root/abc/icon.png")
        );
    }

    #[test]
    fn test_relative_root_claims_path_and_url() {
        let hash = GameHash::new("abc");
        let root = Path::new("media");

        let mut as_path = Resolution::new("@media://icon.png");
        resolve_path(root, &hash, &mut as_path);

        let mut as_url = Resolution::new("@media://icon.png");
        resolve_url(root, &hash, &mut as_url);

        assert!(as_path.handled);
        assert!(as_url.handled);
        assert_eq!(as_url.path, as_path.path);

        let expected = Url::from_file_path(std::env::current_dir().unwrap().join("media/abc/icon.png"))
            .unwrap()
            .to_string();
        assert_eq!(as_url.url.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn test_chain_first_claim_wins() {
        let root = PathBuf::from("/media");
        let chain = ResolverChain::new()
            .with(|hash: &GameHash, r: &mut Resolution| resolve_path(&root, hash, r))
            .with(passthrough_path);
        let hash = GameHash::new("abc");

        let virtual_ref = chain.resolve(&hash, "@media://imageportrait.jpg");
        assert_eq!(virtual_ref.path, Some(PathBuf::from("/media/abc/imageportrait.jpg")));

        let local = chain.resolve(&hash, "/tmp/cover.jpg");
        assert_eq!(local.path, Some(PathBuf::from("/tmp/cover.jpg")));

        let remote = chain.resolve(&hash, "https://example.com/cover.jpg");
        assert!(!remote.handled);
    }

    #[test]
    fn test_passthrough_url_keeps_remote() {
        let hash = GameHash::new("abc");
        let mut inflight = Resolution::new("https://example.com/cover.jpg");
        passthrough_url(&hash, &mut inflight);

        assert!(inflight.handled);
        assert_eq!(inflight.url.as_deref(), Some("https://example.com/cover.jpg"));
    }
}
