//! Size probes and downloads through the port

use std::time::Duration;

use cardsync_core::domain::RemotePath;
use cardsync_core::ports::IRemoteListing;
use cardsync_ezshare::{EzShareClient, EzShareListing};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn date_entries(listing: &EzShareListing) -> Vec<cardsync_core::ports::RemoteEntry> {
    listing
        .list(&RemotePath::new("/DATALOG/20250501".to_string()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_probe_reads_content_length() {
    let (_server, listing) = common::setup_card_mock().await;
    let entries = date_entries(&listing).await;
    let brp = entries.iter().find(|e| e.name == "BRP.edf").unwrap();

    let size = listing.probe_size(&brp.href).await.expect("probe");
    assert_eq!(size, 1234);
}

#[tokio::test]
async fn test_probe_error_status_fails() {
    let (_server, listing) = common::setup_card_mock().await;
    let entries = date_entries(&listing).await;
    let photo = entries.iter().find(|e| e.name == "photo.jpg").unwrap();

    assert!(listing.probe_size(&photo.href).await.is_err());
}

#[tokio::test]
async fn test_fetch_downloads_body() {
    let (_server, listing) = common::setup_card_mock().await;
    let entries = date_entries(&listing).await;
    let crc = entries.iter().find(|e| e.name == "BRP.crc").unwrap();

    let body = listing.fetch(&crc.href).await.expect("download");
    assert_eq!(body, b"crc!");
}

#[tokio::test]
async fn test_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = EzShareClient::new(
        &server.uri(),
        Duration::from_secs(2),
        Duration::from_millis(50),
    )
    .unwrap();
    let listing = EzShareListing::new(client);

    let href = format!("{}/download?file=slow.edf", server.uri());
    assert!(listing.probe_size(&href).await.is_err());
}
