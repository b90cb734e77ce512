//! File-backed persistence of the audio library and onboarding handoff.

use std::sync::Arc;

use tempfile::TempDir;

use meditate_core::library::{AudioFile, AudioLibraryStore};
use meditate_core::onboarding::{OnboardingManager, RatingDimension};
use meditate_core::store::{
    DirectoryPayloadStore, FileStore, KeyValueStore, PayloadStore, keys,
};

struct Dirs {
    _tmp: TempDir,
    storage: Arc<dyn KeyValueStore>,
    payloads: Arc<dyn PayloadStore>,
}

fn dirs() -> Dirs {
    let tmp = TempDir::new().unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(tmp.path().join("store")));
    let payloads: Arc<dyn PayloadStore> =
        Arc::new(DirectoryPayloadStore::new(tmp.path().join("audio")));
    Dirs {
        _tmp: tmp,
        storage,
        payloads,
    }
}

#[tokio::test]
async fn library_survives_reopen() {
    let d = dirs();
    let library = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;

    let a = AudioFile::new("a.mp3", "stressed", vec!["Sleep".into()]);
    let b = AudioFile::new("b.mp3", "tired", vec!["Focus".into(), "Relaxation".into()]);
    library.insert_new(a.clone()).await.unwrap();
    library.insert_new(b.clone()).await.unwrap();
    library.toggle_favorite(a.id).await.unwrap();
    library.mark_played(b.id).await.unwrap();
    let before = library.all().await;
    drop(library);

    let reopened = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;
    assert_eq!(reopened.all().await, before);
    assert_eq!(before[0].id, b.id);
    assert!(before[1].is_favorite);
    assert!(before[0].has_been_played);
}

#[tokio::test]
async fn corrupt_file_loads_empty() {
    let d = dirs();
    d.storage
        .set(keys::AUDIO_FILES, b"\x00\x01 definitely not json")
        .await
        .unwrap();

    let library = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;
    assert!(library.all().await.is_empty());
}

#[tokio::test]
async fn delete_removes_payload_file() {
    let d = dirs();
    let library = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;

    let path = d.payloads.write("a.mp3", b"ID3").await.unwrap();
    let a = AudioFile::new("a.mp3", "stressed", vec![]);
    library.insert_new(a.clone()).await.unwrap();
    assert_eq!(library.payload_path(&a), path);

    library.delete(a.id).await.unwrap();
    assert!(!path.exists());

    // Second delete: record and payload already gone, still fine
    library.delete(a.id).await.unwrap();
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn delete_with_missing_payload_still_removes_record() {
    let d = dirs();
    let library = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;

    let a = AudioFile::new("never-written.mp3", "stressed", vec![]);
    library.insert_new(a.clone()).await.unwrap();
    library.delete(a.id).await.unwrap();

    let reopened = AudioLibraryStore::load(d.storage.clone(), d.payloads.clone()).await;
    assert!(reopened.is_empty().await);
}

#[tokio::test]
async fn onboarding_handoff_is_durable() {
    let d = dirs();
    assert!(!OnboardingManager::is_complete(d.storage.as_ref()).await);

    let manager = OnboardingManager::new(d.storage.clone());
    manager
        .update(|c| {
            for _ in 0..19 {
                c.advance();
            }
            c.record_name("Ada");
            c.record_rating(RatingDimension::Esteem, 120);
            c.record_goals(["Improve Sleep"]);
        })
        .await;
    let data = manager.complete().await.unwrap();
    assert_eq!(data.esteem, 100);

    assert!(OnboardingManager::is_complete(d.storage.as_ref()).await);
    assert_eq!(OnboardingManager::stored_user_name(d.storage.as_ref()).await, "Ada");
    assert_eq!(
        OnboardingManager::stored_data(d.storage.as_ref()).await,
        Some(data)
    );
}
