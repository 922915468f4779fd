//! Tests for the unified error hierarchy.

use crate::error::{ConfigError, Error, FetchError};

#[test]
fn ffmpeg_error_preserves_stderr() {
    let err = Error::ffmpeg("ffmpeg failed: Invalid data found when processing input");
    let msg = err.to_string();
    assert!(msg.contains("FFmpeg"), "Should mention FFmpeg");
    assert!(msg.contains("Invalid data"), "Should carry stderr text");
}

#[test]
fn downloader_error_preserves_stderr() {
    let err = Error::downloader("yt-dlp failed: ERROR: Unsupported URL");
    let msg = err.to_string();
    assert!(msg.contains("Downloader"), "Should mention the downloader");
    assert!(msg.contains("Unsupported URL"), "Should carry stderr text");
}

#[test]
fn validation_error_message() {
    let err = Error::validation("start time must be less than end time");
    let msg = err.to_string();
    assert!(msg.contains("Validation"));
    assert!(msg.contains("start time must be less than end time"));
}

#[test]
fn clip_not_found_names_the_reference() {
    let err = Error::clip_not_found("clip://does-not-exist");
    assert!(err.to_string().contains("clip://does-not-exist"));
}

#[test]
fn timeout_error_mentions_seconds() {
    let err = Error::timeout(300);
    let msg = err.to_string();
    assert!(msg.contains("300"));
    assert!(msg.contains("seconds"));
}

#[test]
fn fetch_status_error_includes_url_and_status() {
    let err = FetchError::status("https://cdn.example.com/clip.mp4", 404, "Not Found");
    let msg = err.to_string();
    assert!(msg.contains("cdn.example.com"), "Should contain URL");
    assert!(msg.contains("404"), "Should contain status code");
    assert!(msg.contains("Not Found"), "Should contain message");
}

#[test]
fn config_error_includes_var_name() {
    let err = ConfigError::missing_env_var("OUTPUT_DIR");
    assert!(err.to_string().contains("OUTPUT_DIR"));

    let err = ConfigError::invalid_value("PORT", "not a port number: banana");
    let msg = err.to_string();
    assert!(msg.contains("PORT"));
    assert!(msg.contains("banana"));
}

#[test]
fn error_from_config_error() {
    let config_err = ConfigError::missing_env_var("TEST_VAR");
    let err: Error = config_err.into();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn error_from_fetch_error() {
    let fetch_err = FetchError::invalid_url("ftp://example.com/file.mp4");
    let err: Error = fetch_err.into();
    assert!(matches!(err, Error::Fetch(_)));
}

#[test]
fn error_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn invalid_input_classification() {
    assert!(Error::validation("bad speed").is_invalid_input());
    assert!(Error::clip_not_found("clip://x").is_invalid_input());
    assert!(Error::from(FetchError::invalid_url("ftp://x")).is_invalid_input());

    assert!(!Error::ffmpeg("boom").is_invalid_input());
    assert!(!Error::downloader("boom").is_invalid_input());
    assert!(!Error::timeout(10).is_invalid_input());
}
