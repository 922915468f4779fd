//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where rendered outputs are written
    pub output_dir: PathBuf,
    /// Scratch directory for intermediate clips and fetched inputs
    pub work_dir: PathBuf,
    /// ffmpeg executable
    pub ffmpeg_bin: String,
    /// ffprobe executable
    pub ffprobe_bin: String,
    /// yt-dlp executable
    pub ytdlp_bin: String,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// All variables have defaults; only a malformed `PORT` is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));

        let work_dir = std::env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("video-edit-mcp"));

        let ffmpeg_bin = std::env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string());
        let ffprobe_bin = std::env::var("FFPROBE_BIN").unwrap_or_else(|_| "ffprobe".to_string());
        let ytdlp_bin = std::env::var("YTDLP_BIN").unwrap_or_else(|_| "yt-dlp".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid_value("PORT", format!("not a port number: {raw}")))?,
            Err(_) => 8080,
        };

        Ok(Self {
            output_dir,
            work_dir,
            ffmpeg_bin,
            ffprobe_bin,
            ytdlp_bin,
            port,
        })
    }

    /// Map a bare output file name into the output directory.
    ///
    /// Tool callers supply names like `trimmed.mp4`, never paths. Empty
    /// names, path separators, and `..` components are rejected.
    pub fn output_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        validate_output_name(name)?;
        Ok(self.output_dir.join(name))
    }
}

/// Reject output names that are empty or attempt to escape the output dir.
pub fn validate_output_name(name: &str) -> Result<(), ConfigError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::invalid_value("output_name", "name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ConfigError::invalid_value(
            "output_name",
            format!("name must not contain path separators: {name}"),
        ));
    }
    if Path::new(name).components().any(|c| c.as_os_str() == "..") {
        return Err(ConfigError::invalid_value(
            "output_name",
            format!("name must not traverse directories: {name}"),
        ));
    }
    Ok(())
}
