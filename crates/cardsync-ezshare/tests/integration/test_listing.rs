//! Folder navigation and listing through the port

use cardsync_core::domain::RemotePath;
use cardsync_core::ports::IRemoteListing;

use crate::common;

fn remote(p: &str) -> RemotePath {
    RemotePath::new(p.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_root() {
    let (_server, listing) = common::setup_card_mock().await;

    let entries = listing.list(&RemotePath::root()).await.expect("list root");
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["STR.edf", "Identification.json", "SETTINGS", "DATALOG"]);
    assert!(!entries[0].is_container);
    assert!(entries[3].is_container);
}

#[tokio::test]
async fn test_list_nested_folder_follows_labels() {
    let (server, listing) = common::setup_card_mock().await;

    let entries = listing
        .list(&remote("/DATALOG/20250501"))
        .await
        .expect("list date folder");
    let files: Vec<_> = entries
        .iter()
        .filter(|e| !e.is_container)
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(files, vec!["BRP.edf", "BRP.crc", "photo.jpg"]);
    assert!(entries[1].href.starts_with(&server.uri()));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "root, DATALOG, date folder");
}

#[tokio::test]
async fn test_list_is_stable_across_calls() {
    let (_server, listing) = common::setup_card_mock().await;
    let path = remote("/DATALOG/20250501");

    let first = listing.list(&path).await.unwrap();
    let second = listing.list(&path).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_folder_fails() {
    let (_server, listing) = common::setup_card_mock().await;

    let err = listing
        .list(&remote("/DATALOG/20250601"))
        .await
        .expect_err("folder does not exist");
    let message = format!("{err:#}");
    assert!(message.contains("Folder '20250601' not found"), "{message}");
}

#[tokio::test]
async fn test_http_error_fails() {
    let (_server, listing) = common::setup_card_mock().await;

    // SETTINGS page is not mounted, wiremock answers 404
    let err = listing.list(&remote("/SETTINGS")).await.expect_err("404");
    assert!(format!("{err:#}").contains("HTTP 404"));
}
