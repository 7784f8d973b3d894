//! Identity Validation Integration Tests
//!
//! Tests for required fields, rename conflicts and stale edits.

mod common;

use std::sync::Arc;

use common::{dir_names, hash_of, store, store_with, write_file, FakeDownloader};
use gamemedia::{AssetSlot, GameLibrary, GameRecord, ValidationErrorKind};
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_title_is_reported_first() {
    let temp = TempDir::new().unwrap();
    let mut record = GameRecord::new("", "");

    let err = store(temp.path()).save_record(&mut record).await.unwrap_err();
    let validation = err.validation().expect("validation error");

    assert_eq!(validation.kind, ValidationErrorKind::MissingField);
    let locator = validation.locator.as_ref().unwrap();
    assert_eq!(locator.tab, "info");
    assert_eq!(locator.item, "title");
}

#[tokio::test]
async fn test_missing_year() {
    let temp = TempDir::new().unwrap();
    let mut record = GameRecord::new("Chess", "");

    let err = store(temp.path()).save_record(&mut record).await.unwrap_err();
    let validation = err.validation().unwrap();

    assert_eq!(validation.kind, ValidationErrorKind::MissingField);
    assert_eq!(validation.locator.as_ref().unwrap().item, "year");
    assert!(validation.message.contains("Year"));
}

#[tokio::test]
async fn test_rename_onto_existing_game_conflicts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    let src = temp.path().join("src");
    write_file(&src.join("chess.png"), b"chess icon");
    write_file(&src.join("draughts.png"), b"draughts icon");

    let mut library = GameLibrary::new();

    // Create Chess 1990
    let mut chess = GameRecord::new("Chess", "1990")
        .with_slot(AssetSlot::Icon, src.join("chess.png").to_string_lossy());
    store_with(&root, &library, Arc::new(FakeDownloader::default()))
        .save_record(&mut chess)
        .await
        .unwrap();
    library.upsert(chess, None);

    // Create Draughts 1990
    let mut draughts = GameRecord::new("Draughts", "1990")
        .with_slot(AssetSlot::Icon, src.join("draughts.png").to_string_lossy());
    let draughts_hash = store_with(&root, &library, Arc::new(FakeDownloader::default()))
        .save_record(&mut draughts)
        .await
        .unwrap();
    library.upsert(draughts.clone(), None);

    // Edit Draughts into Chess
    let mut edited = draughts.with_prev_hash(draughts_hash.clone());
    edited.info.title = "Chess".to_string();

    let err = store_with(&root, &library, Arc::new(FakeDownloader::default()))
        .save_record(&mut edited)
        .await
        .unwrap_err();

    assert_eq!(
        err.validation().unwrap().kind,
        ValidationErrorKind::IdentityConflict
    );

    let chess_hash = hash_of("Chess", "1990");
    let mut expected = vec![chess_hash.to_string(), draughts_hash.to_string()];
    expected.sort();
    assert_eq!(dir_names(&root), expected);
    assert_eq!(
        std::fs::read(root.join(chess_hash.as_str()).join("icon.png")).unwrap(),
        b"chess icon"
    );
    assert_eq!(
        std::fs::read(root.join(draughts_hash.as_str()).join("icon.png")).unwrap(),
        b"draughts icon"
    );
}

#[tokio::test]
async fn test_edit_of_vanished_game_is_stale() {
    let temp = TempDir::new().unwrap();
    let hash = hash_of("Chess", "1990");
    let mut record = GameRecord::new("Chess", "1990").with_prev_hash(hash);

    let err = store(temp.path()).save_record(&mut record).await.unwrap_err();
    let validation = err.validation().unwrap();

    assert_eq!(validation.kind, ValidationErrorKind::StaleReference);
    assert!(validation.locator.is_none());
}

#[tokio::test]
async fn test_unchanged_edit_of_live_game_passes() {
    let temp = TempDir::new().unwrap();
    let hash = hash_of("Chess", "1990");

    let mut library = GameLibrary::new();
    library.upsert(GameRecord::new("Chess", "1990").with_hash(hash.clone()), None);

    let mut record = GameRecord::new("Chess", "1990")
        .with_hash(hash.clone())
        .with_prev_hash(hash.clone());
    let saved = store_with(temp.path(), &library, Arc::new(FakeDownloader::default()))
        .save_record(&mut record)
        .await
        .unwrap();

    assert_eq!(saved, hash);
    assert!(record.prev_hash.is_none());
}

#[tokio::test]
async fn test_new_game_gets_hash() {
    let temp = TempDir::new().unwrap();
    let mut record = GameRecord::new("Chess", 1990.to_string());

    let hash = store(temp.path()).save_record(&mut record).await.unwrap();

    assert_eq!(hash, hash_of("Chess", "1990"));
    assert_eq!(record.hash, Some(hash));
    // No media, no directory
    assert!(!temp.path().join(hash_of("Chess", "1990").as_str()).exists());
}

#[tokio::test]
async fn test_whitespace_fields_are_not_empty() {
    let temp = TempDir::new().unwrap();
    let mut record = GameRecord::new(" ", " ");

    let hash = store(temp.path()).save_record(&mut record).await.unwrap();
    assert_eq!(hash, hash_of(" ", " "));
}
