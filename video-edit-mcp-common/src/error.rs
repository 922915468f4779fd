//! Error types for the common library.
//!
//! A unified error hierarchy using `thiserror`, shared by the server crate.
//!
//! # Error Categories
//!
//! - `ConfigError`: missing or invalid configuration
//! - `FetchError`: fetching remote `http(s)://` inputs
//! - `Error::Validation`: input validation failures
//! - `Error::Io`: file system operations
//! - `Error::Ffmpeg`: ffmpeg/ffprobe execution errors (carries stderr)
//! - `Error::Downloader`: yt-dlp execution errors (carries stderr)
//! - `Error::ClipNotFound`: dangling clip-store references
//! - `Error::Timeout`: long-running operation timeouts

use thiserror::Error;

/// Unified error type for the video-edit MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Remote input fetch errors (bad URLs, HTTP failures)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// FFmpeg/FFprobe execution errors
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// yt-dlp execution errors
    #[error("Downloader error: {0}")]
    Downloader(String),

    /// A clip reference that is not registered in the store
    #[error("Unknown clip reference: {0}")]
    ClipNotFound(String),

    /// Operation timeout errors
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),
}

impl Error {
    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new FFmpeg error.
    pub fn ffmpeg(message: impl Into<String>) -> Self {
        Error::Ffmpeg(message.into())
    }

    /// Create a new downloader error.
    pub fn downloader(message: impl Into<String>) -> Self {
        Error::Downloader(message.into())
    }

    /// Create a new clip-not-found error.
    pub fn clip_not_found(clip_ref: impl Into<String>) -> Self {
        Error::ClipNotFound(clip_ref.into())
    }

    /// Create a new timeout error.
    pub fn timeout(seconds: u64) -> Self {
        Error::Timeout(seconds)
    }

    /// Whether this error is the caller's fault (maps to MCP invalid_params).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::ClipNotFound(_) | Error::Fetch(FetchError::InvalidUrl(_))
        )
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables or tool arguments that map into configured paths.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable or derived setting has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Remote fetch errors.
///
/// These errors occur while resolving `http(s)://` tool inputs to local
/// scratch files.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL is not a valid http(s) URL
    #[error("Invalid media URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the body could not be read
    #[error("Fetch failed for {url}: {message}")]
    RequestFailed {
        /// URL that was being fetched
        url: String,
        /// Error message describing the failure
        message: String,
    },

    /// The server answered with a non-success status
    #[error("Fetch failed for {url} (HTTP {status_code}): {message}")]
    Status {
        /// URL that was being fetched
        url: String,
        /// HTTP status code returned
        status_code: u16,
        /// Response body or status description
        message: String,
    },
}

impl FetchError {
    /// Create a new invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        FetchError::InvalidUrl(url.into())
    }

    /// Create a new request failure error.
    pub fn request_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::RequestFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new HTTP status error.
    pub fn status(url: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        FetchError::Status {
            url: url.into(),
            status_code,
            message: message.into(),
        }
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
