use std::sync::Arc;

use bnpl_client::storage::{FileStore, KeyValueStore, LastLogin, SessionStore};
use chrono::Utc;
use tempfile::TempDir;

#[tokio::test]
async fn test_session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionStore::new(Arc::new(FileStore::new(&path)));
    session.set_token("tok-1").await.unwrap();
    session.set_biometric_enabled(true).await.unwrap();
    session
        .set_last_login(&LastLogin {
            phone_number: "+201000000000".to_string(),
            display_name: Some("Mona".to_string()),
            logged_in_at: Utc::now(),
        })
        .await
        .unwrap();

    let reopened = SessionStore::new(Arc::new(FileStore::new(&path)));
    assert_eq!(reopened.token().await.unwrap().as_deref(), Some("tok-1"));
    assert!(reopened.biometric_enabled().await.unwrap());
    assert_eq!(
        reopened.last_login().await.unwrap().unwrap().phone_number,
        "+201000000000"
    );
}

#[tokio::test]
async fn test_end_session_keeps_device_settings() {
    let dir = TempDir::new().unwrap();
    let session = SessionStore::new(Arc::new(FileStore::new(dir.path().join("s.json"))));
    session.set_token("tok").await.unwrap();
    session.set_pin_hash("abc").await.unwrap();
    session.set_failed_attempts(3).await.unwrap();

    session.end_session().await.unwrap();

    assert!(session.token().await.unwrap().is_none());
    assert_eq!(session.failed_attempts().await.unwrap(), 0);
    assert_eq!(session.pin_hash().await.unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_missing_file_reads_empty_and_clear_removes_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested.json");
    let store = FileStore::new(&path);

    assert_eq!(store.get("anything").await.unwrap(), None);
    store.set("k", "v").await.unwrap();
    assert!(path.exists());

    store.clear().await.unwrap();
    assert!(!path.exists());
    assert_eq!(store.get("k").await.unwrap(), None);
}
