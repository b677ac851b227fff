//! Authentication and team resolution

use cardsync_archive::{ArchiveCredentials, ArchiveError, SleepHqArchive};
use cardsync_core::ports::IArchiveService;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_connect_resolves_token_and_first_team() {
    let (_server, _dir, archive) = common::setup_archive_mock().await;

    let account = archive.connect().await.expect("connect");
    assert_eq!(account.access_token, common::TOKEN);
    assert_eq!(account.team_id, "77");
}

#[tokio::test]
async fn test_rejected_credentials_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive = SleepHqArchive::new(common::client(&server), common::write_credentials(&dir));

    let err = archive.connect().await.expect_err("401");
    let message = format!("{err:#}");
    assert!(message.contains("HTTP 401"), "{message}");
    assert!(message.contains("invalid_grant"), "{message}");
}

#[tokio::test]
async fn test_account_without_team_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "t"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let creds = ArchiveCredentials::load(&common::write_credentials(&dir)).unwrap();
    let client = common::client(&server);

    let token = client.request_token(&creds).await.unwrap();
    assert!(matches!(client.first_team(&token).await, Err(ArchiveError::NoTeam)));
}

#[tokio::test]
async fn test_missing_credentials_file_fails_before_any_request() {
    let server = MockServer::start().await;
    let archive = SleepHqArchive::new(
        common::client(&server),
        "/nonexistent/credentials.json".into(),
    );

    assert!(archive.connect().await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}
