//! Import session, upload and processing

use std::path::PathBuf;

use cardsync_core::ports::{ArchivePackage, IArchiveService};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn mount_import(server: &MockServer, upload_status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/v1/teams/77/imports"))
        .and(header("accept", "application/vnd.api+json"))
        .and(body_string_contains("\"programatic\":false"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {"id": 9001, "type": "import"}
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/imports/9001/files"))
        .and(body_string_contains("name=\"content_hash\""))
        .and(body_string_contains("abc123"))
        .and(body_string_contains("filename=\"upload.zip\""))
        .respond_with(ResponseTemplate::new(upload_status))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/imports/9001/process_files"))
        .respond_with(ResponseTemplate::new(200))
        .expect(if upload_status < 300 { 1 } else { 0 })
        .mount(server)
        .await;
}

fn package(dir: &tempfile::TempDir) -> ArchivePackage {
    let path: PathBuf = dir.path().join("upload.zip");
    std::fs::write(&path, b"PK\x03\x04 fake zip").unwrap();
    ArchivePackage {
        path,
        file_name: "upload.zip".to_string(),
        size_bytes: 16,
    }
}

#[tokio::test]
async fn test_full_import_exchange() {
    let (server, dir, archive) = common::setup_archive_mock().await;
    mount_import(&server, 201).await;

    let account = archive.connect().await.unwrap();
    let session = archive.begin_session(&account).await.expect("session");
    assert_eq!(session, "9001");

    archive
        .upload(&account, &session, &package(&dir), "abc123")
        .await
        .expect("upload");
    archive.process(&account, &session).await.expect("process");

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path().ends_with("/files"))
        .unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("PK"));
    assert!(body.contains("name=\"path\""));
}

#[tokio::test]
async fn test_upload_error_is_reported() {
    let (server, dir, archive) = common::setup_archive_mock().await;
    mount_import(&server, 500).await;

    let account = archive.connect().await.unwrap();
    let session = archive.begin_session(&account).await.unwrap();
    let err = archive
        .upload(&account, &session, &package(&dir), "abc123")
        .await
        .expect_err("500");
    assert!(format!("{err:#}").contains("upload failed with HTTP 500"));
}

#[tokio::test]
async fn test_missing_archive_file_fails() {
    let (_server, _dir, archive) = common::setup_archive_mock().await;

    let account = archive.connect().await.unwrap();
    let missing = ArchivePackage {
        path: "/nonexistent/upload.zip".into(),
        file_name: "upload.zip".to_string(),
        size_bytes: 0,
    };
    assert!(archive.upload(&account, "9001", &missing, "x").await.is_err());
}
