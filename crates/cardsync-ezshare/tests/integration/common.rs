//! Shared helpers: a mock card with a root page, SETTINGS and DATALOG

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardsync_ezshare::{EzShareClient, EzShareListing};

fn page(links: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><pre>\n");
    for (href, label) in links {
        html.push_str(&format!("   2025- 5- 1  12:00:00   <a href=\"{href}\"> {label}</a>\n"));
    }
    html.push_str("</pre></body></html>");
    html
}

async fn mount_page(server: &MockServer, dir: &str, links: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/dir"))
        .and(query_param("dir", dir))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(links)))
        .mount(server)
        .await;
}

/// Mounts a card holding:
///
/// - root: `STR.edf`, `Identification.json`, `SETTINGS/`, `DATALOG/`
/// - `DATALOG`: `20250430/`, `20250501/`, `System/`
/// - `DATALOG/20250501`: `BRP.edf` (1234 bytes), `BRP.crc` (4 bytes), `photo.jpg`
pub async fn setup_card_mock() -> (MockServer, EzShareListing) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dir"))
        .and(wiremock::matchers::query_param_is_missing("dir"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&[
            ("download?file=STR.edf", "STR.edf"),
            ("download?file=Identification.json", "Identification.json"),
            ("dir?dir=A:%5CSETTINGS", "SETTINGS"),
            ("dir?dir=A:%5CDATALOG", "DATALOG"),
        ])))
        .mount(&server)
        .await;

    mount_page(
        &server,
        "A:\\DATALOG",
        &[
            ("dir?dir=A:", ".."),
            ("dir?dir=A:%5CDATALOG%5C20250430", "20250430"),
            ("dir?dir=A:%5CDATALOG%5C20250501", "20250501"),
            ("dir?dir=A:%5CDATALOG%5CSystem", "System"),
        ],
    )
    .await;

    mount_page(
        &server,
        "A:\\DATALOG\\20250501",
        &[
            ("dir?dir=A:%5CDATALOG", ".."),
            ("download?file=DATALOG%5C20250501%5CBRP.edf", "BRP.edf"),
            ("download?file=DATALOG%5C20250501%5CBRP.crc", "BRP.crc"),
            ("download?file=DATALOG%5C20250501%5Cphoto.jpg", "photo.jpg"),
        ],
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/download"))
        .and(query_param("file", "DATALOG\\20250501\\BRP.edf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1234]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/download"))
        .and(query_param("file", "DATALOG\\20250501\\BRP.crc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"crc!".to_vec()))
        .mount(&server)
        .await;

    let client = EzShareClient::new(
        &server.uri(),
        Duration::from_secs(2),
        Duration::from_secs(2),
    )
    .expect("client");

    (server, EzShareListing::new(client))
}
