//! Video editing handler built on FFmpeg.
//!
//! This module provides the `VideoEditHandler` struct and parameter types
//! for the editing tools. All media work is delegated to `ffmpeg`/`ffprobe`
//! subprocesses; this code validates arguments, builds filter graphs, and
//! routes inputs and outputs.
//!
//! Inputs accepted by every tool:
//! - a local file path
//! - a `clip://` reference produced by an earlier tool call (see
//!   [`crate::store::ClipStore`])
//! - an `http(s)://` URL, fetched to the scratch directory first

use crate::store::ClipStore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, instrument};
use video_edit_mcp_common::config::Config;
use video_edit_mcp_common::error::Error;
use video_edit_mcp_common::fetch::{is_http_url, HttpFetcher, MediaUrl};
use video_edit_mcp_common::formats::{resolve_format, resolve_video_codec};

// =============================================================================
// Constants
// =============================================================================

/// Default video encoder for re-encoding operations.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Default audio encoder for re-encoding operations.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// x264 preset used for intermediate renders.
pub const DEFAULT_PRESET: &str = "veryfast";

/// Fallback output extension when a name carries none.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Single-instance range of ffmpeg's `atempo` filter.
pub const ATEMPO_MIN: f64 = 0.5;
/// Single-instance range of ffmpeg's `atempo` filter.
pub const ATEMPO_MAX: f64 = 2.0;

/// Image extensions recognized when building a video from a frame folder.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

// =============================================================================
// Output Types
// =============================================================================

/// Result of an editing tool call.
///
/// `Saved` carries a final path under the output directory; `Stored` carries
/// a `clip://` reference for further chaining. The `Many` variants are
/// produced by tools that emit one artifact per segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EditOutcome {
    /// Rendered to a final output file.
    Saved {
        /// Path of the rendered file
        output_path: String,
    },
    /// Kept in the scratch directory for chaining.
    Stored {
        /// Clip reference resolvable by any later tool call
        clip_ref: String,
    },
    /// Rendered to multiple final output files.
    SavedMany {
        /// Paths of the rendered files, in order
        output_paths: Vec<String>,
    },
    /// Kept as multiple scratch clips for chaining.
    StoredMany {
        /// Clip references, in order
        clip_refs: Vec<String>,
    },
}

/// Media file information assembled from ffprobe output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Path the caller asked about
    pub file_path: String,
    /// File name component
    pub filename: String,
    /// Duration in seconds
    pub duration: f64,
    /// Frames per second (parsed from the stream's rational rate)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    /// Video width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Video height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Width/height rounded to two decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Video codec name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    /// Pixel format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_fmt: Option<String>,
    /// Whether the file carries an audio stream
    pub has_audio: bool,
    /// Audio codec name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Audio sample rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_sample_rate: Option<u32>,
    /// Number of audio channels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_channels: Option<u32>,
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    /// File size in megabytes, rounded to two decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
    /// Estimated total frame count (fps × duration)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<u64>,
    /// Average bitrate in kbps derived from size and duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_bitrate_kbps: Option<f64>,
}

// =============================================================================
// Parameter Types
// =============================================================================

fn default_true() -> bool {
    true
}

/// Parameters for getting video file information.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GetVideoInfoParams {
    /// Input video (local path, clip:// reference, or http(s) URL).
    pub video_path: String,
}

/// Parameters for trimming a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TrimVideoParams {
    /// Input video (local path, clip:// reference, or http(s) URL).
    pub video_path: String,
    /// Trim start in seconds.
    pub start_time: f64,
    /// Trim end in seconds (must be greater than start_time).
    pub end_time: f64,
    /// Output file name like `trimmed.mp4` (a name, not a path).
    pub output_name: String,
    /// True to render to the output directory; false to keep the result as
    /// a clip:// reference for further editing steps. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for merging two videos end to end.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MergeVideoParams {
    /// First input video.
    pub video_path: String,
    /// Second input video, appended after the first.
    pub video_path2: String,
    /// Output file name like `merged.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for resizing a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ResizeVideoParams {
    /// Input video.
    pub video_path: String,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Output file name like `resized.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for cropping a video to a rectangle.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CropVideoParams {
    /// Input video.
    pub video_path: String,
    /// Left edge of the crop rectangle.
    pub x1: u32,
    /// Top edge of the crop rectangle.
    pub y1: u32,
    /// Right edge of the crop rectangle (must exceed x1).
    pub x2: u32,
    /// Bottom edge of the crop rectangle (must exceed y1).
    pub y2: u32,
    /// Output file name like `cropped.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for rotating a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RotateVideoParams {
    /// Input video.
    pub video_path: String,
    /// Clockwise rotation angle in degrees.
    pub angle: f64,
    /// Output file name like `rotated.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for changing playback speed.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SpeedUpVideoParams {
    /// Input video.
    pub video_path: String,
    /// Speed multiplier (e.g. 2.0 for double speed, 0.5 for half).
    pub speed: f64,
    /// Output file name like `speed_up.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for replacing a video's audio track.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddAudioParams {
    /// Input video.
    pub video_path: String,
    /// Audio file to lay under the video.
    pub audio_path: String,
    /// Output file name like `with_audio.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for a fade-in from black.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FadeInParams {
    /// Input video.
    pub video_path: String,
    /// Fade duration in seconds.
    pub fade_duration: f64,
    /// Output file name like `fadein.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for a fade-out to black at the end of the clip.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FadeOutParams {
    /// Input video.
    pub video_path: String,
    /// Fade duration in seconds.
    pub fade_duration: f64,
    /// Output file name like `fadeout.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for drawing text on a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddTextOverlayParams {
    /// Input video.
    pub video_path: String,
    /// Text to draw.
    pub text: String,
    /// X position of the text (from left).
    pub x: i32,
    /// Y position of the text (from top).
    pub y: i32,
    /// Font size in points.
    pub font_size: u32,
    /// Font color (ffmpeg color name or 0xRRGGBB).
    pub color: String,
    /// How long the text stays visible, from the start, in seconds.
    pub duration: f64,
    /// Output file name like `titled.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
    /// Optional font file for systems without a usable default font.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<String>,
}

/// Parameters for overlaying an image (watermark/logo) on a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddImageOverlayParams {
    /// Input video.
    pub video_path: String,
    /// Image file to overlay.
    pub image_path: String,
    /// X position of the overlay (from left).
    pub x: i32,
    /// Y position of the overlay (from top).
    pub y: i32,
    /// How long the overlay stays visible, from the start, in seconds.
    pub duration: f64,
    /// Output file name like `watermarked.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for overlaying one video on another with transparency.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddVideoOverlayParams {
    /// Base video.
    pub base_video_path: String,
    /// Video to overlay on top of the base.
    pub overlay_video_path: String,
    /// X position of the overlay (from left).
    pub x: i32,
    /// Y position of the overlay (from top).
    pub y: i32,
    /// Overlay opacity in [0, 1].
    pub opacity: f64,
    /// How long the overlay stays visible, from the start, in seconds.
    pub duration: f64,
    /// Output file name like `overlaid.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for converting a video to grayscale.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GrayscaleVideoParams {
    /// Input video.
    pub video_path: String,
    /// Output file name like `grayscale.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for mirroring a video horizontally.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MirrorVideoParams {
    /// Input video.
    pub video_path: String,
    /// Output file name like `mirrored.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for building a video out of an image sequence.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ImagesToVideoParams {
    /// Folder containing the frames (png/jpeg/bmp, used in name order).
    /// Also accepts a clip:// reference to a frames directory.
    pub images_folder_path: String,
    /// Output frame rate.
    pub fps: u32,
    /// Output file name like `slideshow.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for extracting frames from a video as PNG images.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExtractFramesParams {
    /// Input video.
    pub video_path: String,
    /// Extraction window start in seconds.
    pub start_time: f64,
    /// Extraction window end in seconds.
    pub end_time: f64,
    /// Frames per second to sample.
    pub fps: u32,
    /// Output folder name like `frames` (a name, not a path).
    pub output_folder_name: String,
    /// True to write the folder under the output directory; false to keep
    /// the frames directory as a clip:// reference (consumable by
    /// images_to_video). Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for splitting a video at timestamps.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SplitVideoParams {
    /// Input video.
    pub video_path: String,
    /// Split points in seconds, strictly ascending, inside the clip.
    pub split_times: Vec<f64>,
    /// Base output name like `parts.mp4`; segments become
    /// `parts_part_1.mp4`, `parts_part_2.mp4`, ...
    pub output_name: String,
    /// True to render segments to the output directory; false to keep them
    /// as clip:// references. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for converting container format and codec.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ConvertVideoFormatParams {
    /// Input video.
    pub video_path: String,
    /// Output file name; the extension selects the container (mp4, mkv,
    /// webm, mov, avi, gif).
    pub output_name: String,
    /// Video codec override (e.g. "h264", "hevc", "vp9", "copy").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Output frame rate override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Video bitrate override (e.g. "2M", "800k").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
}

/// Parameters for burning subtitles into a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct BurnSubtitlesParams {
    /// Input video.
    pub video_path: String,
    /// Subtitle file (srt/ass; local path or http(s) URL).
    pub subtitle_path: String,
    /// Output file name like `subtitled.mp4`.
    pub output_name: String,
    /// True to render to the output directory; false to keep a clip://
    /// reference. Default: true.
    #[serde(default = "default_true")]
    pub return_path: bool,
    /// Optional subtitle font size override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

// =============================================================================
// Filter Builders
// =============================================================================
//
// Pure functions so the filter-graph text can be tested without ffmpeg.

/// Round to two decimal places (for probe-derived metrics).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse an ffprobe rational like "30000/1001" into a float.
pub fn parse_rational(raw: &str) -> Option<f64> {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        Some(num / den)
    } else {
        raw.trim().parse().ok()
    }
}

/// Build the `crop` filter from a corner pair.
pub fn crop_filter(x1: u32, y1: u32, x2: u32, y2: u32) -> String {
    format!("crop={}:{}:{}:{}", x2 - x1, y2 - y1, x1, y1)
}

/// Build the rotation filter for a clockwise angle in degrees.
///
/// Right-angle multiples use lossless `transpose`/flip graphs; anything
/// else uses `rotate` with the output canvas recomputed to fit.
pub fn rotate_filter(angle: f64) -> String {
    let normalized = angle.rem_euclid(360.0);
    let eps = 1e-9;
    if normalized.abs() < eps {
        "null".to_string()
    } else if (normalized - 90.0).abs() < eps {
        "transpose=1".to_string()
    } else if (normalized - 180.0).abs() < eps {
        "hflip,vflip".to_string()
    } else if (normalized - 270.0).abs() < eps {
        "transpose=2".to_string()
    } else {
        format!(
            "rotate={a}*PI/180:ow=rotw({a}*PI/180):oh=roth({a}*PI/180)",
            a = normalized
        )
    }
}

/// Factor a speed multiplier into `atempo` stages, each within
/// [`ATEMPO_MIN`, `ATEMPO_MAX`].
pub fn atempo_chain(speed: f64) -> Vec<f64> {
    let mut factors = Vec::new();
    let mut remaining = speed;
    while remaining > ATEMPO_MAX {
        factors.push(ATEMPO_MAX);
        remaining /= ATEMPO_MAX;
    }
    while remaining < ATEMPO_MIN {
        factors.push(ATEMPO_MIN);
        remaining /= ATEMPO_MIN;
    }
    factors.push(remaining);
    factors
}

/// Build the audio tempo filter text for a speed multiplier.
pub fn atempo_filter(speed: f64) -> String {
    atempo_chain(speed)
        .into_iter()
        .map(|f| format!("atempo={}", f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape text for use inside a quoted `drawtext` argument.
pub fn escape_drawtext_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            ':' => out.push_str("\\:"),
            '%' => out.push_str("\\%"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a file path for use inside a quoted filter argument.
pub fn escape_filter_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            ':' => out.push_str("\\:"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the `drawtext` filter for a timed text overlay.
pub fn drawtext_filter(
    text: &str,
    x: i32,
    y: i32,
    font_size: u32,
    color: &str,
    duration: f64,
    font_file: Option<&str>,
) -> String {
    let mut filter = format!(
        "drawtext=text='{}':x={}:y={}:fontsize={}:fontcolor={}",
        escape_drawtext_text(text),
        x,
        y,
        font_size,
        color
    );
    if let Some(font) = font_file {
        filter.push_str(&format!(":fontfile='{}'", escape_filter_path(font)));
    }
    filter.push_str(&format!(":enable='between(t,0,{})'", duration));
    filter
}

/// Build the filter_complex for a timed, alpha-mixed video overlay.
pub fn video_overlay_filter(x: i32, y: i32, opacity: f64, duration: f64) -> String {
    format!(
        "[1:v]format=yuva420p,colorchannelmixer=aa={opacity}[ov];\
         [0:v][ov]overlay={x}:{y}:enable='between(t,0,{duration})'"
    )
}

/// Build the `subtitles` filter, optionally forcing a font size.
pub fn subtitles_filter(subtitle_path: &str, font_size: Option<u32>) -> String {
    let mut filter = format!("subtitles='{}'", escape_filter_path(subtitle_path));
    if let Some(size) = font_size {
        filter.push_str(&format!(":force_style='Fontsize={}'", size));
    }
    filter
}

/// Build a concat-demuxer list for an image sequence with per-frame
/// durations at the given rate. The last frame is repeated, as the concat
/// demuxer ignores the duration of the final entry.
pub fn image_concat_list(paths: &[PathBuf], fps: u32) -> String {
    let frame_duration = 1.0 / fps as f64;
    let mut list = String::new();
    for path in paths {
        list.push_str(&format!("file '{}'\n", path.display()));
        list.push_str(&format!("duration {}\n", frame_duration));
    }
    if let Some(last) = paths.last() {
        list.push_str(&format!("file '{}'\n", last.display()));
    }
    list
}

/// Extension of an output name, falling back to mp4.
fn extension_of(output_name: &str) -> &str {
    Path::new(output_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Stem of an output name, falling back to the whole name.
fn stem_of(output_name: &str) -> &str {
    Path::new(output_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(output_name)
}

// =============================================================================
// Input Resolution
// =============================================================================

/// A tool input resolved to a local path.
struct ResolvedInput {
    path: PathBuf,
    /// True when the file was fetched from a URL and should be removed
    /// after the operation.
    fetched: bool,
}

// =============================================================================
// VideoEditHandler
// =============================================================================

/// Handler for FFmpeg-based editing operations.
pub struct VideoEditHandler {
    /// Application configuration.
    pub config: Config,
    /// Clip store backing `return_path = false` chaining.
    store: Arc<ClipStore>,
    /// Fetcher for http(s) inputs.
    fetcher: HttpFetcher,
}

impl VideoEditHandler {
    /// Create a new handler, preparing the scratch and output directories.
    ///
    /// # Errors
    /// Returns an error if either directory cannot be created.
    #[instrument(level = "debug", name = "video_edit_handler_new", skip_all)]
    pub async fn new(config: Config) -> Result<Self, Error> {
        debug!("Initializing VideoEditHandler");

        tokio::fs::create_dir_all(&config.work_dir).await?;
        tokio::fs::create_dir_all(&config.output_dir).await?;

        let store = Arc::new(ClipStore::new(config.work_dir.clone()));

        Ok(Self {
            config,
            store,
            fetcher: HttpFetcher::new(),
        })
    }

    /// The clip store shared with the server.
    pub fn store(&self) -> Arc<ClipStore> {
        Arc::clone(&self.store)
    }

    // =========================================================================
    // Path Resolution Helpers
    // =========================================================================

    /// Resolve a tool input to a local path, fetching URLs and looking up
    /// clip references.
    #[instrument(level = "debug", skip(self))]
    async fn resolve_input(&self, input: &str) -> Result<ResolvedInput, Error> {
        if ClipStore::is_clip_ref(input) {
            let path = self.store.resolve(input).await?;
            return Ok(ResolvedInput { path, fetched: false });
        }

        if is_http_url(input) {
            let url = MediaUrl::parse(input).map_err(Error::Fetch)?;
            let filename = url.file_name().unwrap_or("input").to_string();
            let local_path = self
                .config
                .work_dir
                .join(format!("{}_{}", uuid::Uuid::new_v4(), filename));

            debug!(url = %input, local_path = %local_path.display(), "Fetching remote input");
            self.fetcher
                .fetch_to_file(&url, &local_path)
                .await
                .map_err(Error::Fetch)?;

            return Ok(ResolvedInput { path: local_path, fetched: true });
        }

        Ok(ResolvedInput {
            path: PathBuf::from(input),
            fetched: false,
        })
    }

    /// Remove the scratch copy of a fetched input.
    async fn discard(&self, input: &ResolvedInput) {
        if input.fetched {
            let _ = tokio::fs::remove_file(&input.path).await;
        }
    }

    /// Move a rendered scratch file to its final output location.
    async fn save_output(&self, scratch: &Path, output_name: &str) -> Result<String, Error> {
        let dest = self.config.output_path(output_name)?;
        tokio::fs::copy(scratch, &dest).await?;
        let _ = tokio::fs::remove_file(scratch).await;
        Ok(dest.display().to_string())
    }

    /// Apply the outcome contract: save to the output directory or register
    /// the scratch file as a clip reference.
    async fn finish(
        &self,
        scratch: PathBuf,
        output_name: &str,
        return_path: bool,
    ) -> Result<EditOutcome, Error> {
        if return_path {
            let output_path = self.save_output(&scratch, output_name).await?;
            Ok(EditOutcome::Saved { output_path })
        } else {
            let clip_ref = self.store.register(scratch).await;
            Ok(EditOutcome::Stored { clip_ref })
        }
    }

    // =========================================================================
    // FFmpeg/FFprobe Execution
    // =========================================================================

    /// Execute ffprobe and return parsed JSON output.
    async fn run_ffprobe(&self, input: &Path) -> Result<serde_json::Value, Error> {
        let output = Command::new(&self.config.ffprobe_bin)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(input)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ffmpeg(format!(
                "ffprobe failed for '{}': {}",
                input.display(),
                stderr
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::ffmpeg(format!("Failed to parse ffprobe output: {}", e)))?;

        Ok(json)
    }

    /// Execute ffmpeg with the given arguments.
    async fn run_ffmpeg(&self, args: &[&str]) -> Result<(), Error> {
        debug!(args = ?args, "Running ffmpeg");

        let output = Command::new(&self.config.ffmpeg_bin)
            .args(["-y"]) // Overwrite output files
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ffmpeg(format!("ffmpeg failed: {}", stderr)));
        }

        Ok(())
    }

    /// Probe a file's duration in seconds.
    async fn probe_duration(&self, input: &Path) -> Result<f64, Error> {
        let json = self.run_ffprobe(input).await?;
        json.get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                Error::ffmpeg(format!("no duration reported for '{}'", input.display()))
            })
    }

    /// Whether a file carries an audio stream.
    async fn probe_has_audio(&self, input: &Path) -> Result<bool, Error> {
        let json = self.run_ffprobe(input).await?;
        Ok(json
            .get("streams")
            .and_then(|s| s.as_array())
            .map(|streams| {
                streams
                    .iter()
                    .any(|s| s.get("codec_type").and_then(|c| c.as_str()) == Some("audio"))
            })
            .unwrap_or(false))
    }

    // =========================================================================
    // Tool Implementations
    // =========================================================================

    /// Get comprehensive information about a video file.
    #[instrument(level = "info", skip(self))]
    pub async fn get_video_info(&self, params: GetVideoInfoParams) -> Result<VideoInfo, Error> {
        let input = self.resolve_input(&params.video_path).await?;

        let json = self.run_ffprobe(&input.path).await?;
        let file_size = tokio::fs::metadata(&input.path).await.ok().map(|m| m.len());
        let info = video_info_from_probe(&params.video_path, &json, file_size);

        self.discard(&input).await;

        info!(
            duration = info.duration,
            width = ?info.width,
            height = ?info.height,
            has_audio = info.has_audio,
            "Got video info"
        );
        Ok(info)
    }

    /// Trim a video to a time window.
    #[instrument(level = "info", skip(self))]
    pub async fn trim_video(&self, params: TrimVideoParams) -> Result<EditOutcome, Error> {
        if params.start_time < 0.0 || params.end_time < 0.0 {
            return Err(Error::validation("Start and end times must be non-negative"));
        }
        if params.start_time >= params.end_time {
            return Err(Error::validation("Start time must be less than end time"));
        }

        let input = self.resolve_input(&params.video_path).await?;
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        let input_str = input.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();
        let start = params.start_time.to_string();
        let end = params.end_time.to_string();

        let result = self
            .run_ffmpeg(&[
                "-i", &input_str,
                "-ss", &start,
                "-to", &end,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", DEFAULT_AUDIO_CODEC,
                &scratch_str,
            ])
            .await;

        self.discard(&input).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Trimmed video");
        Ok(outcome)
    }

    /// Merge two videos end to end.
    #[instrument(level = "info", skip(self))]
    pub async fn merge_video(&self, params: MergeVideoParams) -> Result<EditOutcome, Error> {
        let first = self.resolve_input(&params.video_path).await?;
        let second = self.resolve_input(&params.video_path2).await?;
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        // Concat demuxer list; re-encode so mismatched codec parameters
        // between the inputs still produce a coherent stream.
        let concat_file = self
            .config
            .work_dir
            .join(format!("{}_concat.txt", uuid::Uuid::new_v4()));
        let concat_content = format!(
            "file '{}'\nfile '{}'\n",
            first.path.display(),
            second.path.display()
        );
        tokio::fs::write(&concat_file, &concat_content).await?;

        let concat_str = concat_file.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-f", "concat",
                "-safe", "0",
                "-i", &concat_str,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", DEFAULT_AUDIO_CODEC,
                &scratch_str,
            ])
            .await;

        self.discard(&first).await;
        self.discard(&second).await;
        let _ = tokio::fs::remove_file(&concat_file).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Merged videos");
        Ok(outcome)
    }

    /// Resize a video to exact dimensions.
    #[instrument(level = "info", skip(self))]
    pub async fn resize_video(&self, params: ResizeVideoParams) -> Result<EditOutcome, Error> {
        if params.width == 0 || params.height == 0 {
            return Err(Error::validation("Width and height must be positive"));
        }

        let filter = format!("scale={}:{}", params.width, params.height);
        self.single_input_filter(
            &params.video_path,
            &filter,
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Crop a video to a rectangle given by two corners.
    #[instrument(level = "info", skip(self))]
    pub async fn crop_video(&self, params: CropVideoParams) -> Result<EditOutcome, Error> {
        if params.x2 <= params.x1 || params.y2 <= params.y1 {
            return Err(Error::validation(
                "Invalid crop coordinates: x2 must exceed x1 and y2 must exceed y1",
            ));
        }

        let filter = crop_filter(params.x1, params.y1, params.x2, params.y2);
        self.single_input_filter(
            &params.video_path,
            &filter,
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Rotate a video clockwise by an angle in degrees.
    #[instrument(level = "info", skip(self))]
    pub async fn rotate_video(&self, params: RotateVideoParams) -> Result<EditOutcome, Error> {
        if !params.angle.is_finite() {
            return Err(Error::validation("Angle must be a finite number"));
        }

        let filter = rotate_filter(params.angle);
        self.single_input_filter(
            &params.video_path,
            &filter,
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Change playback speed, keeping audio pitch-corrected.
    #[instrument(level = "info", skip(self))]
    pub async fn speed_up_video(&self, params: SpeedUpVideoParams) -> Result<EditOutcome, Error> {
        if !(params.speed.is_finite() && params.speed > 0.0) {
            return Err(Error::validation(
                "Speed must be positive (e.g., 2.0 for 2x speed)",
            ));
        }

        let input = self.resolve_input(&params.video_path).await?;
        let has_audio = match self.probe_has_audio(&input.path).await {
            Ok(flag) => flag,
            Err(e) => {
                self.discard(&input).await;
                return Err(e);
            }
        };

        let scratch = self.store.scratch_path(extension_of(&params.output_name));
        let input_str = input.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = if has_audio {
            let filter = format!(
                "[0:v]setpts=PTS/{speed}[v];[0:a]{atempo}[a]",
                speed = params.speed,
                atempo = atempo_filter(params.speed)
            );
            self.run_ffmpeg(&[
                "-i", &input_str,
                "-filter_complex", &filter,
                "-map", "[v]",
                "-map", "[a]",
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", DEFAULT_AUDIO_CODEC,
                &scratch_str,
            ])
            .await
        } else {
            let filter = format!("setpts=PTS/{}", params.speed);
            self.run_ffmpeg(&[
                "-i", &input_str,
                "-vf", &filter,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                &scratch_str,
            ])
            .await
        };

        self.discard(&input).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(speed = params.speed, outcome = ?outcome, "Changed video speed");
        Ok(outcome)
    }

    /// Replace a video's audio track.
    #[instrument(level = "info", skip(self))]
    pub async fn add_audio(&self, params: AddAudioParams) -> Result<EditOutcome, Error> {
        let video = self.resolve_input(&params.video_path).await?;
        let audio = self.resolve_input(&params.audio_path).await?;
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        let video_str = video.path.to_string_lossy();
        let audio_str = audio.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &video_str,
                "-i", &audio_str,
                "-c:v", "copy",
                "-c:a", DEFAULT_AUDIO_CODEC,
                "-map", "0:v:0",
                "-map", "1:a:0",
                "-shortest",
                &scratch_str,
            ])
            .await;

        self.discard(&video).await;
        self.discard(&audio).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Added audio");
        Ok(outcome)
    }

    /// Fade in from black at the start of the clip.
    #[instrument(level = "info", skip(self))]
    pub async fn fadein_video(&self, params: FadeInParams) -> Result<EditOutcome, Error> {
        if params.fade_duration <= 0.0 {
            return Err(Error::validation("Fade duration must be positive"));
        }

        let filter = format!("fade=t=in:st=0:d={}", params.fade_duration);
        self.single_input_filter(
            &params.video_path,
            &filter,
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Fade out to black, ending at the end of the clip.
    #[instrument(level = "info", skip(self))]
    pub async fn fadeout_video(&self, params: FadeOutParams) -> Result<EditOutcome, Error> {
        if params.fade_duration <= 0.0 {
            return Err(Error::validation("Fade duration must be positive"));
        }

        let input = self.resolve_input(&params.video_path).await?;
        let duration = match self.probe_duration(&input.path).await {
            Ok(d) => d,
            Err(e) => {
                self.discard(&input).await;
                return Err(e);
            }
        };
        if params.fade_duration > duration {
            self.discard(&input).await;
            return Err(Error::validation(format!(
                "Fade duration {}s exceeds clip duration {}s",
                params.fade_duration, duration
            )));
        }

        let start = duration - params.fade_duration;
        let filter = format!("fade=t=out:st={}:d={}", start, params.fade_duration);

        let scratch = self.store.scratch_path(extension_of(&params.output_name));
        let input_str = input.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &input_str,
                "-vf", &filter,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", "copy",
                &scratch_str,
            ])
            .await;

        self.discard(&input).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Added fade out");
        Ok(outcome)
    }

    /// Draw timed text on a video.
    #[instrument(level = "info", skip(self, params), fields(video = %params.video_path))]
    pub async fn add_text_overlay(
        &self,
        params: AddTextOverlayParams,
    ) -> Result<EditOutcome, Error> {
        if params.text.trim().is_empty() {
            return Err(Error::validation("Text cannot be empty"));
        }
        if params.font_size == 0 {
            return Err(Error::validation("Font size must be positive"));
        }
        if params.duration <= 0.0 {
            return Err(Error::validation("Duration must be positive"));
        }

        let filter = drawtext_filter(
            &params.text,
            params.x,
            params.y,
            params.font_size,
            &params.color,
            params.duration,
            params.font_file.as_deref(),
        );
        self.single_input_filter(
            &params.video_path,
            &filter,
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Overlay an image (watermark/logo) on a video.
    #[instrument(level = "info", skip(self))]
    pub async fn add_image_overlay(
        &self,
        params: AddImageOverlayParams,
    ) -> Result<EditOutcome, Error> {
        if params.duration <= 0.0 {
            return Err(Error::validation("Duration must be positive"));
        }

        let video = self.resolve_input(&params.video_path).await?;
        let image = self.resolve_input(&params.image_path).await?;
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        let filter = format!(
            "[0:v][1:v]overlay={}:{}:enable='between(t,0,{})'",
            params.x, params.y, params.duration
        );

        let video_str = video.path.to_string_lossy();
        let image_str = image.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &video_str,
                "-i", &image_str,
                "-filter_complex", &filter,
                "-c:a", "copy",
                &scratch_str,
            ])
            .await;

        self.discard(&video).await;
        self.discard(&image).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Added image overlay");
        Ok(outcome)
    }

    /// Overlay a video on another with transparency.
    #[instrument(level = "info", skip(self))]
    pub async fn add_video_overlay(
        &self,
        params: AddVideoOverlayParams,
    ) -> Result<EditOutcome, Error> {
        if !(0.0..=1.0).contains(&params.opacity) {
            return Err(Error::validation("Opacity must be between 0 and 1"));
        }
        if params.duration <= 0.0 {
            return Err(Error::validation("Duration must be positive"));
        }

        let base = self.resolve_input(&params.base_video_path).await?;
        let overlay = self.resolve_input(&params.overlay_video_path).await?;
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        let filter = video_overlay_filter(params.x, params.y, params.opacity, params.duration);

        let base_str = base.path.to_string_lossy();
        let overlay_str = overlay.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &base_str,
                "-i", &overlay_str,
                "-filter_complex", &filter,
                "-c:a", "copy",
                &scratch_str,
            ])
            .await;

        self.discard(&base).await;
        self.discard(&overlay).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Added video overlay");
        Ok(outcome)
    }

    /// Convert a video to grayscale.
    #[instrument(level = "info", skip(self))]
    pub async fn grayscale_video(
        &self,
        params: GrayscaleVideoParams,
    ) -> Result<EditOutcome, Error> {
        self.single_input_filter(
            &params.video_path,
            "hue=s=0",
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Mirror a video horizontally.
    #[instrument(level = "info", skip(self))]
    pub async fn mirror_video(&self, params: MirrorVideoParams) -> Result<EditOutcome, Error> {
        self.single_input_filter(
            &params.video_path,
            "hflip",
            &params.output_name,
            params.return_path,
        )
        .await
    }

    /// Build a video from an image sequence folder.
    #[instrument(level = "info", skip(self))]
    pub async fn images_to_video(
        &self,
        params: ImagesToVideoParams,
    ) -> Result<EditOutcome, Error> {
        if params.fps == 0 {
            return Err(Error::validation("FPS must be positive"));
        }

        let folder = if ClipStore::is_clip_ref(&params.images_folder_path) {
            self.store.resolve(&params.images_folder_path).await?
        } else {
            PathBuf::from(&params.images_folder_path)
        };

        let mut frames = Vec::new();
        let mut entries = tokio::fs::read_dir(&folder).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                frames.push(path);
            }
        }
        if frames.is_empty() {
            return Err(Error::validation(format!(
                "No images found in '{}'",
                folder.display()
            )));
        }
        frames.sort();

        let list_file = self
            .config
            .work_dir
            .join(format!("{}_frames.txt", uuid::Uuid::new_v4()));
        tokio::fs::write(&list_file, image_concat_list(&frames, params.fps)).await?;

        let scratch = self.store.scratch_path(extension_of(&params.output_name));
        let list_str = list_file.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();
        let fps_filter = format!("fps={},format=yuv420p", params.fps);

        let result = self
            .run_ffmpeg(&[
                "-f", "concat",
                "-safe", "0",
                "-i", &list_str,
                "-vf", &fps_filter,
                "-c:v", DEFAULT_VIDEO_CODEC,
                &scratch_str,
            ])
            .await;

        let _ = tokio::fs::remove_file(&list_file).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(frames = frames.len(), outcome = ?outcome, "Built video from images");
        Ok(outcome)
    }

    /// Extract frames from a time window as PNG images.
    #[instrument(level = "info", skip(self))]
    pub async fn extract_frames(&self, params: ExtractFramesParams) -> Result<EditOutcome, Error> {
        if params.start_time < 0.0 || params.end_time < 0.0 {
            return Err(Error::validation("Start and end times must be non-negative"));
        }
        if params.start_time >= params.end_time {
            return Err(Error::validation("Start time must be less than end time"));
        }
        if params.fps == 0 {
            return Err(Error::validation("FPS must be positive"));
        }

        // Frames render straight into their final home; there is no single
        // scratch file to move afterwards.
        let frames_dir = if params.return_path {
            self.config.output_path(&params.output_folder_name)?
        } else {
            self.store.scratch_dir()
        };
        tokio::fs::create_dir_all(&frames_dir).await?;

        let input = self.resolve_input(&params.video_path).await?;

        let input_str = input.path.to_string_lossy();
        let start = params.start_time.to_string();
        let end = params.end_time.to_string();
        let fps_filter = format!("fps={}", params.fps);
        let pattern = frames_dir.join("frame_%04d.png");
        let pattern_str = pattern.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &input_str,
                "-ss", &start,
                "-to", &end,
                "-vf", &fps_filter,
                &pattern_str,
            ])
            .await;

        self.discard(&input).await;
        result?;

        let outcome = if params.return_path {
            EditOutcome::Saved {
                output_path: frames_dir.display().to_string(),
            }
        } else {
            EditOutcome::Stored {
                clip_ref: self.store.register(frames_dir).await,
            }
        };
        info!(outcome = ?outcome, "Extracted frames");
        Ok(outcome)
    }

    /// Split a video into segments at the given timestamps.
    #[instrument(level = "info", skip(self))]
    pub async fn split_video_at_times(
        &self,
        params: SplitVideoParams,
    ) -> Result<EditOutcome, Error> {
        if params.split_times.is_empty() {
            return Err(Error::validation("At least one split time is required"));
        }

        let input = self.resolve_input(&params.video_path).await?;
        let duration = match self.probe_duration(&input.path).await {
            Ok(d) => d,
            Err(e) => {
                self.discard(&input).await;
                return Err(e);
            }
        };

        let mut boundaries = vec![0.0];
        for &t in &params.split_times {
            let last = *boundaries.last().unwrap_or(&0.0);
            if t <= last || t >= duration {
                self.discard(&input).await;
                return Err(Error::validation(format!(
                    "Split times must be strictly ascending and inside (0, {duration}); got {t}"
                )));
            }
            boundaries.push(t);
        }
        boundaries.push(duration);

        let stem = stem_of(&params.output_name).to_string();
        let ext = extension_of(&params.output_name).to_string();
        let input_str = input.path.to_string_lossy().to_string();

        let mut output_paths = Vec::new();
        let mut clip_refs = Vec::new();

        for (i, window) in boundaries.windows(2).enumerate() {
            let scratch = self.store.scratch_path(&ext);
            let scratch_str = scratch.to_string_lossy().to_string();
            let start = window[0].to_string();
            let end = window[1].to_string();

            let result = self
                .run_ffmpeg(&[
                    "-i", &input_str,
                    "-ss", &start,
                    "-to", &end,
                    "-c:v", DEFAULT_VIDEO_CODEC,
                    "-preset", DEFAULT_PRESET,
                    "-c:a", DEFAULT_AUDIO_CODEC,
                    &scratch_str,
                ])
                .await;
            if let Err(e) = result {
                self.discard(&input).await;
                return Err(e);
            }

            if params.return_path {
                let part_name = format!("{}_part_{}.{}", stem, i + 1, ext);
                output_paths.push(self.save_output(&scratch, &part_name).await?);
            } else {
                clip_refs.push(self.store.register(scratch).await);
            }
        }

        self.discard(&input).await;

        let outcome = if params.return_path {
            EditOutcome::SavedMany { output_paths }
        } else {
            EditOutcome::StoredMany { clip_refs }
        };
        info!(segments = boundaries.len() - 1, "Split video");
        Ok(outcome)
    }

    /// Convert container format, codec, frame rate, and bitrate.
    #[instrument(level = "info", skip(self))]
    pub async fn convert_video_format(
        &self,
        params: ConvertVideoFormatParams,
    ) -> Result<EditOutcome, Error> {
        let ext = extension_of(&params.output_name);
        let format = resolve_format(ext).ok_or_else(|| {
            Error::validation(format!("Unsupported output container: {ext}"))
        })?;

        let video_codec = match &params.codec {
            Some(name) => resolve_video_codec(name)
                .ok_or_else(|| Error::validation(format!("Unknown video codec: {name}")))?,
            None => format.video_codec,
        };

        let input = self.resolve_input(&params.video_path).await?;
        let scratch = self.store.scratch_path(ext);

        let mut args: Vec<String> = vec![
            "-i".to_string(),
            input.path.to_string_lossy().to_string(),
        ];
        if let Some(fps) = params.fps {
            args.push("-r".to_string());
            args.push(fps.to_string());
        }
        if let Some(bitrate) = &params.bitrate {
            args.push("-b:v".to_string());
            args.push(bitrate.clone());
        }
        args.push("-c:v".to_string());
        args.push(video_codec.to_string());
        if format.supports_audio {
            args.push("-c:a".to_string());
            args.push(format.audio_codec.to_string());
        } else {
            args.push("-an".to_string());
        }
        args.push(scratch.to_string_lossy().to_string());

        let args_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = self.run_ffmpeg(&args_refs).await;

        self.discard(&input).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(codec = video_codec, container = format.extension, "Converted video format");
        Ok(outcome)
    }

    /// Burn a subtitle file into the video stream.
    #[instrument(level = "info", skip(self))]
    pub async fn burn_subtitles(&self, params: BurnSubtitlesParams) -> Result<EditOutcome, Error> {
        let video = self.resolve_input(&params.video_path).await?;
        let subs = self.resolve_input(&params.subtitle_path).await?;

        let filter = subtitles_filter(&subs.path.to_string_lossy(), params.font_size);
        let scratch = self.store.scratch_path(extension_of(&params.output_name));

        let video_str = video.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &video_str,
                "-vf", &filter,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", "copy",
                &scratch_str,
            ])
            .await;

        self.discard(&video).await;
        self.discard(&subs).await;
        result?;

        let outcome = self.finish(scratch, &params.output_name, params.return_path).await?;
        info!(outcome = ?outcome, "Burned subtitles");
        Ok(outcome)
    }

    // =========================================================================
    // Shared op shape
    // =========================================================================

    /// Run a one-input `-vf` operation: resolve, filter, re-encode video,
    /// copy audio, finish.
    async fn single_input_filter(
        &self,
        video_path: &str,
        filter: &str,
        output_name: &str,
        return_path: bool,
    ) -> Result<EditOutcome, Error> {
        let input = self.resolve_input(video_path).await?;
        let scratch = self.store.scratch_path(extension_of(output_name));

        let input_str = input.path.to_string_lossy();
        let scratch_str = scratch.to_string_lossy();

        let result = self
            .run_ffmpeg(&[
                "-i", &input_str,
                "-vf", filter,
                "-c:v", DEFAULT_VIDEO_CODEC,
                "-preset", DEFAULT_PRESET,
                "-c:a", "copy",
                &scratch_str,
            ])
            .await;

        self.discard(&input).await;
        result?;

        let outcome = self.finish(scratch, output_name, return_path).await?;
        info!(filter, outcome = ?outcome, "Applied filter");
        Ok(outcome)
    }
}

// =============================================================================
// Probe Parsing
// =============================================================================

/// Assemble a `VideoInfo` from raw ffprobe JSON and an optional file size.
pub fn video_info_from_probe(
    file_path: &str,
    json: &serde_json::Value,
    file_size: Option<u64>,
) -> VideoInfo {
    let format = json.get("format");
    let duration: f64 = format
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);

    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .cloned()
        .unwrap_or_default();

    let video_stream = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|c| c.as_str()) == Some("video"));
    let audio_stream = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|c| c.as_str()) == Some("audio"));

    let width = video_stream
        .and_then(|s| s.get("width"))
        .and_then(|w| w.as_u64())
        .map(|w| w as u32);
    let height = video_stream
        .and_then(|s| s.get("height"))
        .and_then(|h| h.as_u64())
        .map(|h| h as u32);
    let fps = video_stream
        .and_then(|s| s.get("r_frame_rate"))
        .and_then(|r| r.as_str())
        .and_then(parse_rational)
        .filter(|f| *f > 0.0);

    let aspect_ratio = match (width, height) {
        (Some(w), Some(h)) if h > 0 => Some(round2(w as f64 / h as f64)),
        _ => None,
    };

    let filename = Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path)
        .to_string();

    let total_frames = match (fps, duration > 0.0) {
        (Some(fps), true) => Some((fps * duration) as u64),
        _ => None,
    };
    let average_bitrate_kbps = match (file_size, duration > 0.0) {
        (Some(size), true) => Some(round2(size as f64 * 8.0 / (duration * 1000.0))),
        _ => None,
    };

    VideoInfo {
        file_path: file_path.to_string(),
        filename,
        duration,
        fps,
        width,
        height,
        aspect_ratio,
        video_codec: video_stream
            .and_then(|s| s.get("codec_name"))
            .and_then(|c| c.as_str())
            .map(str::to_string),
        pix_fmt: video_stream
            .and_then(|s| s.get("pix_fmt"))
            .and_then(|p| p.as_str())
            .map(str::to_string),
        has_audio: audio_stream.is_some(),
        audio_codec: audio_stream
            .and_then(|s| s.get("codec_name"))
            .and_then(|c| c.as_str())
            .map(str::to_string),
        audio_sample_rate: audio_stream
            .and_then(|s| s.get("sample_rate"))
            .and_then(|r| r.as_str())
            .and_then(|s| s.parse().ok()),
        audio_channels: audio_stream
            .and_then(|s| s.get("channels"))
            .and_then(|c| c.as_u64())
            .map(|c| c as u32),
        file_size_bytes: file_size,
        file_size_mb: file_size.map(|s| round2(s as f64 / (1024.0 * 1024.0))),
        total_frames,
        average_bitrate_kbps,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================


// =============================================================================
// Property-Based Tests
// =============================================================================
