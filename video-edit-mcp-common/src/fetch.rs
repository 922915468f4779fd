//! Fetching remote media inputs over HTTP.
//!
//! Tool inputs may be `http(s)://` URLs; they are streamed to a local
//! scratch file before ffmpeg sees them.

use crate::error::FetchError;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// A validated http(s) media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(String);

impl MediaUrl {
    /// Parse and validate an `http://` or `https://` URL.
    ///
    /// # Errors
    /// Returns `FetchError::InvalidUrl` for other schemes or a missing host.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let url = url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                FetchError::InvalidUrl(format!("URL must start with http:// or https://: {url}"))
            })?;

        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        if host.is_empty() {
            return Err(FetchError::InvalidUrl(format!("URL has no host: {url}")));
        }

        Ok(Self(url.to_string()))
    }

    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment of the URL, if any (query/fragment stripped).
    pub fn file_name(&self) -> Option<&str> {
        let rest = self
            .0
            .strip_prefix("https://")
            .or_else(|| self.0.strip_prefix("http://"))?;
        let path = rest.split(['?', '#']).next().unwrap_or(rest);
        let name = path.rsplit('/').next().unwrap_or("");
        // A bare host has no file segment
        if name.is_empty() || !path.contains('/') {
            None
        } else {
            Some(name)
        }
    }
}

impl std::fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a tool input string names a remote URL rather than a local path.
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Streaming HTTP client for remote media inputs.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new fetcher.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Stream the resource at `url` into `dest`, returning the byte count.
    ///
    /// # Errors
    /// Returns `FetchError::Status` on non-success responses and
    /// `FetchError::RequestFailed` on transport or write failures.
    pub async fn fetch_to_file(&self, url: &MediaUrl, dest: &Path) -> Result<u64, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::request_failed(url.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(url.as_str(), status.as_u16(), body));
        }

        let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
            FetchError::request_failed(url.as_str(), format!("cannot create {}: {e}", dest.display()))
        })?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| FetchError::request_failed(url.as_str(), e.to_string()))?;
            file.write_all(&chunk).await.map_err(|e| {
                FetchError::request_failed(url.as_str(), format!("write failed: {e}"))
            })?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| FetchError::request_failed(url.as_str(), format!("flush failed: {e}")))?;

        Ok(written)
    }

    /// Probe the resource size with a HEAD request, if the server reports it.
    ///
    /// # Errors
    /// Returns `FetchError::Status` on non-success responses.
    pub async fn content_length(&self, url: &MediaUrl) -> Result<Option<u64>, FetchError> {
        let response = self
            .client
            .head(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::request_failed(url.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::status(
                url.as_str(),
                response.status().as_u16(),
                "HEAD request rejected",
            ));
        }

        Ok(response.content_length())
    }
}
