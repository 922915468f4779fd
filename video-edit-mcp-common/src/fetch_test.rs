//! Tests for the remote media fetcher.

use crate::error::FetchError;
use crate::fetch::{is_http_url, HttpFetcher, MediaUrl};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// MediaUrl parsing
// =============================================================================

#[test]
fn parse_accepts_http_and_https() {
    assert!(MediaUrl::parse("https://example.com/clip.mp4").is_ok());
    assert!(MediaUrl::parse("http://example.com/clip.mp4").is_ok());
    assert!(MediaUrl::parse("  https://example.com/clip.mp4  ").is_ok());
}

#[test]
fn parse_rejects_other_schemes() {
    assert!(matches!(
        MediaUrl::parse("gs://bucket/clip.mp4"),
        Err(FetchError::InvalidUrl(_))
    ));
    assert!(MediaUrl::parse("ftp://example.com/clip.mp4").is_err());
    assert!(MediaUrl::parse("file:///tmp/clip.mp4").is_err());
    assert!(MediaUrl::parse("/local/path/clip.mp4").is_err());
    assert!(MediaUrl::parse("clip.mp4").is_err());
}

#[test]
fn parse_rejects_missing_host() {
    assert!(MediaUrl::parse("https://").is_err());
    assert!(MediaUrl::parse("http:///clip.mp4").is_err());
}

#[test]
fn file_name_extraction() {
    let url = MediaUrl::parse("https://cdn.example.com/media/clip.mp4?token=abc").unwrap();
    assert_eq!(url.file_name(), Some("clip.mp4"));

    let url = MediaUrl::parse("https://cdn.example.com/a/b/frame.png#top").unwrap();
    assert_eq!(url.file_name(), Some("frame.png"));

    let url = MediaUrl::parse("https://cdn.example.com").unwrap();
    assert_eq!(url.file_name(), None);
}

#[test]
fn is_http_url_detection() {
    assert!(is_http_url("https://example.com/v.mp4"));
    assert!(is_http_url("http://example.com/v.mp4"));
    assert!(!is_http_url("/local/v.mp4"));
    assert!(!is_http_url("clip://abcd"));
    assert!(!is_http_url("gs://bucket/v.mp4"));
}

// =============================================================================
// HttpFetcher against a mock server
// =============================================================================

#[tokio::test]
async fn fetch_to_file_writes_body() {
    let server = MockServer::start().await;
    let body = b"not really an mp4 but bytes all the same".to_vec();

    Mock::given(method("GET"))
        .and(path("/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("clip.mp4");
    let url = MediaUrl::parse(&format!("{}/clip.mp4", server.uri())).unwrap();

    let fetcher = HttpFetcher::new();
    let written = fetcher.fetch_to_file(&url, &dest).await.unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn fetch_to_file_surfaces_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.mp4"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such clip"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing.mp4");
    let url = MediaUrl::parse(&format!("{}/missing.mp4", server.uri())).unwrap();

    let fetcher = HttpFetcher::new();
    let err = fetcher.fetch_to_file(&url, &dest).await.unwrap_err();

    match err {
        FetchError::Status { status_code, message, .. } => {
            assert_eq!(status_code, 404);
            assert!(message.contains("no such clip"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn content_length_reads_head_response() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/sized.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 12345]))
        .mount(&server)
        .await;

    let url = MediaUrl::parse(&format!("{}/sized.mp4", server.uri())).unwrap();
    let fetcher = HttpFetcher::new();
    let length = fetcher.content_length(&url).await.unwrap();

    assert_eq!(length, Some(12345));
}
