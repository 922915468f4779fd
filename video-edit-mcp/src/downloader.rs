//! Video retrieval handler built on yt-dlp.
//!
//! The downloader is the second external binary the server orchestrates.
//! Like the FFmpeg handler, it validates arguments, spawns the tool, and
//! marshals the result; the retrieval logic itself lives in yt-dlp.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};
use video_edit_mcp_common::config::Config;
use video_edit_mcp_common::error::Error;
use video_edit_mcp_common::fetch::MediaUrl;

// =============================================================================
// Constants
// =============================================================================

/// Format selector used when no height cap is requested.
pub const DEFAULT_FORMAT_SELECTOR: &str = "bestvideo+bestaudio/best";

/// Container the merged download is remuxed into.
pub const DOWNLOAD_CONTAINER: &str = "mp4";

/// Audio format for audio-only downloads.
pub const DOWNLOAD_AUDIO_FORMAT: &str = "mp3";

// =============================================================================
// Parameter Types
// =============================================================================

/// Parameters for downloading a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DownloadVideoParams {
    /// Video page or direct media URL (http/https).
    pub url: String,
    /// Output file name like `talk.mp4`; defaults to the video title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Cap the video height (e.g. 1080, 720); best available when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
}

/// Parameters for downloading the audio track only.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DownloadAudioParams {
    /// Video page or direct media URL (http/https).
    pub url: String,
    /// Output file name like `talk.mp3`; defaults to the video title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
}

/// Parameters for probing download metadata without downloading.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GetDownloadInfoParams {
    /// Video page or direct media URL (http/https).
    pub url: String,
}

// =============================================================================
// Output Types
// =============================================================================

/// Result of a completed download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// Path of the downloaded file
    pub output_path: String,
}

/// Metadata reported by the downloader for a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadInfo {
    /// Source-side video identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Video title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Uploader/channel name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    /// Canonical page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpage_url: Option<String>,
    /// View count, when the source exposes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    /// Number of downloadable formats on offer
    pub format_count: usize,
}

/// Build the yt-dlp format selector for an optional height cap.
pub fn format_selector(max_height: Option<u32>) -> String {
    match max_height {
        Some(h) => format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]"),
        None => DEFAULT_FORMAT_SELECTOR.to_string(),
    }
}

/// Extract a `DownloadInfo` from yt-dlp `-J` output.
pub fn download_info_from_json(json: &serde_json::Value) -> DownloadInfo {
    DownloadInfo {
        id: json.get("id").and_then(|v| v.as_str()).map(str::to_string),
        title: json.get("title").and_then(|v| v.as_str()).map(str::to_string),
        duration: json.get("duration").and_then(|v| v.as_f64()),
        uploader: json
            .get("uploader")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        webpage_url: json
            .get("webpage_url")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        view_count: json.get("view_count").and_then(|v| v.as_u64()),
        format_count: json
            .get("formats")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0),
    }
}

// =============================================================================
// DownloadHandler
// =============================================================================

/// Handler for yt-dlp-based retrieval operations.
pub struct DownloadHandler {
    /// Application configuration.
    pub config: Config,
}

impl DownloadHandler {
    /// Create a new DownloadHandler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Output template for yt-dlp: a fixed name when given, otherwise the
    /// video title with the native extension.
    fn output_template(&self, output_name: Option<&str>) -> Result<String, Error> {
        match output_name {
            Some(name) => {
                let path = self.config.output_path(name)?;
                Ok(path.display().to_string())
            }
            None => Ok(self
                .config
                .output_dir
                .join("%(title)s.%(ext)s")
                .display()
                .to_string()),
        }
    }

    /// Run yt-dlp, returning trimmed stdout.
    async fn run_ytdlp(&self, args: &[&str]) -> Result<String, Error> {
        debug!(args = ?args, "Running yt-dlp");

        let output = Command::new(&self.config.ytdlp_bin)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::downloader(format!("yt-dlp failed: {}", stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    // =========================================================================
    // Tool Implementations
    // =========================================================================

    /// Download a video, merged into an mp4 in the output directory.
    #[instrument(level = "info", skip(self))]
    pub async fn download_video(
        &self,
        params: DownloadVideoParams,
    ) -> Result<DownloadOutcome, Error> {
        let url = MediaUrl::parse(&params.url).map_err(Error::Fetch)?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let selector = format_selector(params.max_height);
        let template = self.output_template(params.output_name.as_deref())?;

        let stdout = self
            .run_ytdlp(&[
                "--no-playlist",
                "--no-progress",
                "-f", &selector,
                "--merge-output-format", DOWNLOAD_CONTAINER,
                "-o", &template,
                "--print", "after_move:filepath",
                "--no-simulate",
                url.as_str(),
            ])
            .await?;

        let output_path = final_path_from_stdout(&stdout, url.as_str())?;
        info!(output = %output_path, "Downloaded video");
        Ok(DownloadOutcome { output_path })
    }

    /// Download only the audio track, converted to mp3.
    #[instrument(level = "info", skip(self))]
    pub async fn download_audio(
        &self,
        params: DownloadAudioParams,
    ) -> Result<DownloadOutcome, Error> {
        let url = MediaUrl::parse(&params.url).map_err(Error::Fetch)?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let template = self.output_template(params.output_name.as_deref())?;

        let stdout = self
            .run_ytdlp(&[
                "--no-playlist",
                "--no-progress",
                "-x",
                "--audio-format", DOWNLOAD_AUDIO_FORMAT,
                "-o", &template,
                "--print", "after_move:filepath",
                "--no-simulate",
                url.as_str(),
            ])
            .await?;

        let output_path = final_path_from_stdout(&stdout, url.as_str())?;
        info!(output = %output_path, "Downloaded audio");
        Ok(DownloadOutcome { output_path })
    }

    /// Probe metadata for a URL without downloading anything.
    #[instrument(level = "info", skip(self))]
    pub async fn get_download_info(
        &self,
        params: GetDownloadInfoParams,
    ) -> Result<DownloadInfo, Error> {
        let url = MediaUrl::parse(&params.url).map_err(Error::Fetch)?;

        let stdout = self
            .run_ytdlp(&["--no-playlist", "-J", url.as_str()])
            .await?;

        let json: serde_json::Value = serde_json::from_str(&stdout)
            .map_err(|e| Error::downloader(format!("Failed to parse yt-dlp metadata: {}", e)))?;

        let download_info = download_info_from_json(&json);
        info!(
            title = ?download_info.title,
            duration = ?download_info.duration,
            formats = download_info.format_count,
            "Got download info"
        );
        Ok(download_info)
    }
}

/// The `--print after_move:filepath` line is the last non-empty stdout line.
fn final_path_from_stdout(stdout: &str, url: &str) -> Result<String, Error> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::downloader(format!("yt-dlp reported no output file for {url}"))
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            output_dir: PathBuf::from("/srv/media/out"),
            work_dir: PathBuf::from("/tmp/video-edit-mcp"),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            ytdlp_bin: "yt-dlp".to_string(),
            port: 8080,
        }
    }

    #[test]
    fn test_format_selector_uncapped() {
        assert_eq!(format_selector(None), "bestvideo+bestaudio/best");
    }

    #[test]
    fn test_format_selector_capped() {
        assert_eq!(
            format_selector(Some(720)),
            "bestvideo[height<=720]+bestaudio/best[height<=720]"
        );
        assert_eq!(
            format_selector(Some(1080)),
            "bestvideo[height<=1080]+bestaudio/best[height<=1080]"
        );
    }

    #[test]
    fn test_output_template_with_name() {
        let handler = DownloadHandler::new(test_config());
        let template = handler.output_template(Some("talk.mp4")).unwrap();
        assert_eq!(template, "/srv/media/out/talk.mp4");
    }

    #[test]
    fn test_output_template_default_uses_title() {
        let handler = DownloadHandler::new(test_config());
        let template = handler.output_template(None).unwrap();
        assert_eq!(template, "/srv/media/out/%(title)s.%(ext)s");
    }

    #[test]
    fn test_output_template_rejects_paths() {
        let handler = DownloadHandler::new(test_config());
        assert!(handler.output_template(Some("../escape.mp4")).is_err());
        assert!(handler.output_template(Some("a/b.mp4")).is_err());
    }

    #[test]
    fn test_final_path_from_stdout() {
        let path = final_path_from_stdout("warning: x\n/out/talk.mp4\n", "u").unwrap();
        assert_eq!(path, "/out/talk.mp4");

        let path = final_path_from_stdout("/out/talk.mp4", "u").unwrap();
        assert_eq!(path, "/out/talk.mp4");

        assert!(final_path_from_stdout("\n  \n", "u").is_err());
    }

    #[test]
    fn test_download_info_from_json_full() {
        let json = serde_json::json!({
            "id": "abc123",
            "title": "A Conference Talk",
            "duration": 1830.5,
            "uploader": "ConfChannel",
            "webpage_url": "https://video.example.com/watch?v=abc123",
            "view_count": 4212,
            "formats": [{"format_id": "18"}, {"format_id": "22"}]
        });

        let info = download_info_from_json(&json);
        assert_eq!(info.id.as_deref(), Some("abc123"));
        assert_eq!(info.title.as_deref(), Some("A Conference Talk"));
        assert_eq!(info.duration, Some(1830.5));
        assert_eq!(info.uploader.as_deref(), Some("ConfChannel"));
        assert_eq!(info.view_count, Some(4212));
        assert_eq!(info.format_count, 2);
    }

    #[test]
    fn test_download_info_from_json_sparse() {
        let info = download_info_from_json(&serde_json::json!({"title": "clip"}));
        assert_eq!(info.title.as_deref(), Some("clip"));
        assert!(info.id.is_none());
        assert!(info.duration.is_none());
        assert!(info.view_count.is_none());
        assert_eq!(info.format_count, 0);
    }

    #[test]
    fn test_download_params_defaults() {
        let params: DownloadVideoParams =
            serde_json::from_str(r#"{"url": "https://video.example.com/v"}"#).unwrap();
        assert!(params.output_name.is_none());
        assert!(params.max_height.is_none());
    }

    #[tokio::test]
    async fn test_download_rejects_bad_url() {
        let handler = DownloadHandler::new(test_config());
        let err = handler
            .download_video(DownloadVideoParams {
                url: "ftp://example.com/v.mp4".to_string(),
                output_name: None,
                max_height: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
