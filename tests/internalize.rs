//! Internalization Integration Tests
//!
//! Tests for copying local and remote assets into the media store.

mod common;

use std::sync::Arc;

use common::{dir_names, hash_of, store, store_with, write_file, FakeDownloader};
use gamemedia::adapters::EnglishMessages;
use gamemedia::media::{internalize, IMAGE_CATEGORY};
use gamemedia::{AssetSlot, GameLibrary, GameRecord, ValidationErrorKind};
use tempfile::TempDir;

#[tokio::test]
async fn test_local_files_are_copied_with_extension() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let src = temp.path().join("src");
    write_file(&src.join("wide.JPG"), b"landscape");
    write_file(&src.join("chess.png"), b"icon");

    let mut record = GameRecord::new("Chess", "1990")
        .with_slot(AssetSlot::Landscape, src.join("wide.JPG").to_string_lossy())
        .with_slot(AssetSlot::Icon, src.join("chess.png").to_string_lossy());

    let hash = store(&root).save_record(&mut record).await.unwrap();
    let dir = root.join(hash.as_str());

    assert_eq!(record.info.slot(AssetSlot::Landscape), Some("@media://imagelandscape.JPG"));
    assert_eq!(record.info.slot(AssetSlot::Icon), Some("@media://icon.png"));
    assert_eq!(record.info.slot(AssetSlot::Portrait), None);
    assert_eq!(std::fs::read(dir.join("imagelandscape.JPG")).unwrap(), b"landscape");
    assert_eq!(std::fs::read(dir.join("icon.png")).unwrap(), b"icon");

    // Sources are copied, not moved
    assert!(src.join("chess.png").exists());
}

#[tokio::test]
async fn test_internalizing_twice_is_noop() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let src = temp.path().join("icon.png");
    write_file(&src, b"icon");

    let mut record = GameRecord::new("Chess", "1990").with_slot(AssetSlot::Icon, src.to_string_lossy());
    let hash = store(&root).save_record(&mut record).await.unwrap();

    let stored = root.join(hash.as_str()).join("icon.png");
    let modified = std::fs::metadata(&stored).unwrap().modified().unwrap();
    let before = record.clone();

    let downloader = FakeDownloader::default();
    let report = internalize(&root, &hash, &mut record, &downloader, &EnglishMessages)
        .await
        .unwrap();

    assert!(report.is_noop());
    assert_eq!(record, before);
    assert_eq!(std::fs::metadata(&stored).unwrap().modified().unwrap(), modified);
}

#[tokio::test]
async fn test_missing_icon_reports_file_not_found() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    std::fs::create_dir_all(&root).unwrap();
    let missing = temp.path().join("missing.png");
    let missing_str = missing.to_string_lossy().into_owned();

    let mut record = GameRecord::new("Chess", "1990").with_slot(AssetSlot::Icon, missing_str.as_str());

    let err = store(&root).save_record(&mut record).await.unwrap_err();
    let validation = err.validation().expect("validation error");

    assert_eq!(validation.kind, ValidationErrorKind::FileNotFound);
    assert_eq!(validation.locator.as_ref().unwrap().item, "icon");
    assert!(validation.message.contains(&missing_str));
    assert!(dir_names(&root).is_empty());
    assert_eq!(record.info.slot(AssetSlot::Icon), Some(missing_str.as_str()));
}

#[tokio::test]
async fn test_earlier_slots_stay_internalized_on_failure() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let src = temp.path().join("wide.png");
    write_file(&src, b"landscape");

    let mut record = GameRecord::new("Chess", "1990")
        .with_slot(AssetSlot::Landscape, src.to_string_lossy())
        .with_slot(AssetSlot::Icon, temp.path().join("nope.png").to_string_lossy());

    let err = store(&root).save_record(&mut record).await.unwrap_err();
    assert_eq!(err.validation().unwrap().locator.as_ref().unwrap().item, "icon");

    assert_eq!(record.info.slot(AssetSlot::Landscape), Some("@media://imagelandscape.png"));
    let dir = root.join(hash_of("Chess", "1990").as_str());
    assert!(dir.join("imagelandscape.png").exists());
}

#[tokio::test]
async fn test_remote_asset_is_downloaded_then_internalized() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let cached = temp.path().join("cache").join("images").join("0123abcd.jpg");
    write_file(&cached, b"remote cover");

    let url = "https://example.com/covers/chess.jpg";
    let downloader = Arc::new(FakeDownloader::default().with_file(url, &cached));

    let mut record = GameRecord::new("Chess", "1990").with_slot(AssetSlot::Portrait, url);
    let hash = store_with(&root, &GameLibrary::new(), downloader.clone())
        .save_record(&mut record)
        .await
        .unwrap();

    assert_eq!(
        downloader.calls(),
        vec![(url.to_string(), IMAGE_CATEGORY.to_string())]
    );
    assert_eq!(record.info.slot(AssetSlot::Portrait), Some("@media://imageportrait.jpg"));
    assert_eq!(
        std::fs::read(root.join(hash.as_str()).join("imageportrait.jpg")).unwrap(),
        b"remote cover"
    );
}

#[tokio::test]
async fn test_failed_download_is_not_fatal_until_existence_check() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let icon = temp.path().join("icon.png");
    write_file(&icon, b"icon");

    let url = "https://example.com/missing.jpg";
    let downloader = Arc::new(FakeDownloader::default());

    let mut record = GameRecord::new("Chess", "1990")
        .with_slot(AssetSlot::Portrait, url)
        .with_slot(AssetSlot::Icon, icon.to_string_lossy());

    let err = store_with(&root, &GameLibrary::new(), downloader.clone())
        .save_record(&mut record)
        .await
        .unwrap_err();

    assert_eq!(downloader.calls().len(), 1);
    let validation = err.validation().unwrap();
    assert_eq!(validation.kind, ValidationErrorKind::FileNotFound);
    assert_eq!(validation.locator.as_ref().unwrap().item, "imageportrait");
    assert_eq!(record.info.slot(AssetSlot::Portrait), Some(url));
}
