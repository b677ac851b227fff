//! State, history and error records written by complete runs

use cardsync_core::{
    domain::{Fingerprint, SyncError},
    ports::{IErrorLog, IStateStore},
    usecases::RunOutcome,
};
use cardsync_store::{FileStateStore, TextErrorLog};
use tempfile::TempDir;

use crate::common::{executor, Archive, Card, RecordFiles};

async fn seed_state(files: &RecordFiles) -> Vec<u8> {
    FileStateStore::new(files.state.clone())
        .save(&"20250501".parse().unwrap(), &Fingerprint::from_digest(&[9u8; 32]))
        .await
        .unwrap();
    std::fs::read(&files.state).unwrap()
}

#[tokio::test]
async fn test_rejected_upload_leaves_state_file_byte_identical() {
    let dir = TempDir::new().unwrap();
    let files = RecordFiles::in_dir(dir.path());
    let before = seed_state(&files).await;

    let outcome = executor(
        Card::new(&["20250501", "20250502"]),
        Archive::rejecting_upload(),
        &files,
    )
    .run(None)
    .await;

    assert!(matches!(outcome, RunOutcome::Failed(SyncError::TransferFailure(_))));
    assert_eq!(std::fs::read(&files.state).unwrap(), before);
    assert!(!dir.path().join("last_sync.txt.tmp").exists());
    assert!(!files.history.exists());

    let errors = TextErrorLog::new(files.errors.clone()).tail(10).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(" - Transfer failed: "));
}

#[tokio::test]
async fn test_rejected_upload_on_first_run_creates_no_state_file() {
    let dir = TempDir::new().unwrap();
    let files = RecordFiles::in_dir(dir.path());

    let outcome = executor(Card::new(&["20250501"]), Archive::rejecting_upload(), &files)
        .run(None)
        .await;

    assert!(!outcome.is_success());
    assert!(!files.state.exists());
}

#[tokio::test]
async fn test_successful_upload_rewrites_state_file() {
    let dir = TempDir::new().unwrap();
    let files = RecordFiles::in_dir(dir.path());
    let before = seed_state(&files).await;

    let outcome = executor(
        Card::new(&["20250501", "20250502"]),
        Archive::default(),
        &files,
    )
    .run(None)
    .await;

    let RunOutcome::Uploaded(summary) = outcome else {
        panic!("expected an upload, got {outcome:?}");
    };
    let after = std::fs::read_to_string(&files.state).unwrap();
    assert_ne!(after.as_bytes(), before.as_slice());
    assert_eq!(
        after,
        format!("date=20250502\nhash={}\n", summary.fingerprint)
    );

    let history = std::fs::read_to_string(&files.history).unwrap();
    assert_eq!(history.lines().count(), 1);
    assert!(!files.errors.exists());
}
