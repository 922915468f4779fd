//! MCP server implementation for the video-edit server.
//!
//! Exposes the FFmpeg editing tools and the yt-dlp retrieval tools over the
//! Model Context Protocol.

use crate::downloader::{
    DownloadAudioParams, DownloadHandler, DownloadVideoParams, GetDownloadInfoParams,
};
use crate::handler::{
    AddAudioParams, AddImageOverlayParams, AddTextOverlayParams, AddVideoOverlayParams,
    BurnSubtitlesParams, ConvertVideoFormatParams, CropVideoParams, ExtractFramesParams,
    FadeInParams, FadeOutParams, GetVideoInfoParams, GrayscaleVideoParams, ImagesToVideoParams,
    MergeVideoParams, MirrorVideoParams, ResizeVideoParams, RotateVideoParams, SpeedUpVideoParams,
    SplitVideoParams, TrimVideoParams, VideoEditHandler,
};
use rmcp::{
    model::{
        CallToolResult, Content, ListResourcesResult, ReadResourceResult, ServerCapabilities,
        ServerInfo,
    },
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use video_edit_mcp_common::config::Config;
use video_edit_mcp_common::error::Error;

/// MCP server for video editing and retrieval.
#[derive(Clone)]
pub struct VideoEditServer {
    /// Handler for FFmpeg operations (initialized lazily: it creates the
    /// scratch and output directories)
    handler: Arc<RwLock<Option<VideoEditHandler>>>,
    /// Handler for yt-dlp operations
    downloader: Arc<DownloadHandler>,
    /// Server configuration
    config: Config,
}

impl VideoEditServer {
    /// Create a new VideoEditServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            handler: Arc::new(RwLock::new(None)),
            downloader: Arc::new(DownloadHandler::new(config.clone())),
            config,
        }
    }

    /// Initialize the edit handler (called lazily on first use).
    async fn ensure_handler(&self) -> Result<(), McpError> {
        let mut handler = self.handler.write().await;
        if handler.is_none() {
            *handler = Some(VideoEditHandler::new(self.config.clone()).await.map_err(
                |e| McpError::internal_error(format!("Failed to initialize handler: {}", e), None),
            )?);
        }
        Ok(())
    }

    // =========================================================================
    // Editing tools
    // =========================================================================

    /// Get video file information.
    pub async fn get_video_info(
        &self,
        params: GetVideoInfoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, "Getting video info");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let video_info = handler.get_video_info(params).await.map_err(to_mcp_error)?;
        json_result(&video_info)
    }

    /// Trim a video to a time window.
    pub async fn trim_video(&self, params: TrimVideoParams) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, start = params.start_time, end = params.end_time, "Trimming video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.trim_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Merge two videos.
    pub async fn merge_video(&self, params: MergeVideoParams) -> Result<CallToolResult, McpError> {
        info!(first = %params.video_path, second = %params.video_path2, "Merging videos");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.merge_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Resize a video.
    pub async fn resize_video(
        &self,
        params: ResizeVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, width = params.width, height = params.height, "Resizing video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.resize_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Crop a video.
    pub async fn crop_video(&self, params: CropVideoParams) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, "Cropping video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.crop_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Rotate a video.
    pub async fn rotate_video(
        &self,
        params: RotateVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, angle = params.angle, "Rotating video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.rotate_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Change playback speed.
    pub async fn speed_up_video(
        &self,
        params: SpeedUpVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, speed = params.speed, "Changing video speed");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.speed_up_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Replace a video's audio track.
    pub async fn add_audio(&self, params: AddAudioParams) -> Result<CallToolResult, McpError> {
        info!(video = %params.video_path, audio = %params.audio_path, "Adding audio");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.add_audio(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Fade in from black.
    pub async fn fadein_video(&self, params: FadeInParams) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, duration = params.fade_duration, "Adding fade in");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.fadein_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Fade out to black.
    pub async fn fadeout_video(&self, params: FadeOutParams) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, duration = params.fade_duration, "Adding fade out");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.fadeout_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Draw timed text on a video.
    pub async fn add_text_overlay(
        &self,
        params: AddTextOverlayParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, "Adding text overlay");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.add_text_overlay(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Overlay an image on a video.
    pub async fn add_image_overlay(
        &self,
        params: AddImageOverlayParams,
    ) -> Result<CallToolResult, McpError> {
        info!(video = %params.video_path, image = %params.image_path, "Adding image overlay");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.add_image_overlay(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Overlay a video on another with transparency.
    pub async fn add_video_overlay(
        &self,
        params: AddVideoOverlayParams,
    ) -> Result<CallToolResult, McpError> {
        info!(base = %params.base_video_path, overlay = %params.overlay_video_path, "Adding video overlay");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.add_video_overlay(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Convert a video to grayscale.
    pub async fn grayscale_video(
        &self,
        params: GrayscaleVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, "Converting to grayscale");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.grayscale_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Mirror a video horizontally.
    pub async fn mirror_video(
        &self,
        params: MirrorVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, "Mirroring video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.mirror_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Build a video from an image sequence.
    pub async fn images_to_video(
        &self,
        params: ImagesToVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(folder = %params.images_folder_path, fps = params.fps, "Building video from images");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.images_to_video(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Extract frames from a video.
    pub async fn extract_frames(
        &self,
        params: ExtractFramesParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, fps = params.fps, "Extracting frames");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.extract_frames(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Split a video at timestamps.
    pub async fn split_video_at_times(
        &self,
        params: SplitVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, splits = params.split_times.len(), "Splitting video");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler
            .split_video_at_times(params)
            .await
            .map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Convert container format and codec.
    pub async fn convert_video_format(
        &self,
        params: ConvertVideoFormatParams,
    ) -> Result<CallToolResult, McpError> {
        info!(input = %params.video_path, output = %params.output_name, "Converting video format");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler
            .convert_video_format(params)
            .await
            .map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Burn subtitles into the video stream.
    pub async fn burn_subtitles(
        &self,
        params: BurnSubtitlesParams,
    ) -> Result<CallToolResult, McpError> {
        info!(video = %params.video_path, subtitles = %params.subtitle_path, "Burning subtitles");
        self.ensure_handler().await?;
        let guard = self.handler.read().await;
        let handler = edit_handler(&guard)?;
        let outcome = handler.burn_subtitles(params).await.map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    // =========================================================================
    // Retrieval tools
    // =========================================================================

    /// Download a video.
    pub async fn download_video(
        &self,
        params: DownloadVideoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(url = %params.url, "Downloading video");
        let outcome = self
            .downloader
            .download_video(params)
            .await
            .map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Download only the audio track.
    pub async fn download_audio(
        &self,
        params: DownloadAudioParams,
    ) -> Result<CallToolResult, McpError> {
        info!(url = %params.url, "Downloading audio");
        let outcome = self
            .downloader
            .download_audio(params)
            .await
            .map_err(to_mcp_error)?;
        json_result(&outcome)
    }

    /// Probe download metadata for a URL.
    pub async fn get_download_info(
        &self,
        params: GetDownloadInfoParams,
    ) -> Result<CallToolResult, McpError> {
        info!(url = %params.url, "Getting download info");
        let download_info = self
            .downloader
            .get_download_info(params)
            .await
            .map_err(to_mcp_error)?;
        json_result(&download_info)
    }
}

impl ServerHandler for VideoEditServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Video editing and retrieval server. Editing tools delegate to FFmpeg \
                 (trim, merge, resize, crop, rotate, speed, overlays, subtitles, format \
                 conversion); download tools delegate to yt-dlp. Editing tools called \
                 with return_path=false keep their result as a clip:// reference that \
                 later tools accept in place of a file path."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            use rmcp::model::ListToolsResult;

            Ok(ListToolsResult {
                tools: tool_definitions(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                "get_video_info" => {
                    self.get_video_info(parse_params(params.arguments)?).await
                }
                "trim_video" => self.trim_video(parse_params(params.arguments)?).await,
                "merge_video" => self.merge_video(parse_params(params.arguments)?).await,
                "resize_video" => self.resize_video(parse_params(params.arguments)?).await,
                "crop_video" => self.crop_video(parse_params(params.arguments)?).await,
                "rotate_video" => self.rotate_video(parse_params(params.arguments)?).await,
                "speed_up_video" => self.speed_up_video(parse_params(params.arguments)?).await,
                "add_audio" => self.add_audio(parse_params(params.arguments)?).await,
                "fadein_video" => self.fadein_video(parse_params(params.arguments)?).await,
                "fadeout_video" => self.fadeout_video(parse_params(params.arguments)?).await,
                "add_text_overlay" => {
                    self.add_text_overlay(parse_params(params.arguments)?).await
                }
                "add_image_overlay" => {
                    self.add_image_overlay(parse_params(params.arguments)?).await
                }
                "add_video_overlay" => {
                    self.add_video_overlay(parse_params(params.arguments)?).await
                }
                "grayscale_video" => {
                    self.grayscale_video(parse_params(params.arguments)?).await
                }
                "mirror_video" => self.mirror_video(parse_params(params.arguments)?).await,
                "images_to_video" => {
                    self.images_to_video(parse_params(params.arguments)?).await
                }
                "extract_frames" => self.extract_frames(parse_params(params.arguments)?).await,
                "split_video_at_times" => {
                    self.split_video_at_times(parse_params(params.arguments)?)
                        .await
                }
                "convert_video_format" => {
                    self.convert_video_format(parse_params(params.arguments)?)
                        .await
                }
                "burn_subtitles" => self.burn_subtitles(parse_params(params.arguments)?).await,
                "download_video" => self.download_video(parse_params(params.arguments)?).await,
                "download_audio" => self.download_audio(parse_params(params.arguments)?).await,
                "get_download_info" => {
                    self.get_download_info(parse_params(params.arguments)?).await
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", params.name),
                    None,
                )),
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            // This server exposes tools only
            Ok(ListResourcesResult {
                resources: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            Err(McpError::resource_not_found(
                format!("Unknown resource: {}", params.uri),
                None,
            ))
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Every tool this server exposes, with schemars-generated input schemas.
pub fn tool_definitions() -> Vec<rmcp::model::Tool> {
    vec![
        create_tool::<GetVideoInfoParams>(
            "get_video_info",
            "Get information about a video file: duration, fps, resolution, codecs, \
             audio details, and size metrics.",
        ),
        create_tool::<TrimVideoParams>(
            "trim_video",
            "Trim a video to a start/end window in seconds. Set return_path=false to \
             keep the result as a clip:// reference for further steps.",
        ),
        create_tool::<MergeVideoParams>(
            "merge_video",
            "Merge two videos end to end into one file.",
        ),
        create_tool::<ResizeVideoParams>(
            "resize_video",
            "Resize a video to exact pixel dimensions.",
        ),
        create_tool::<CropVideoParams>(
            "crop_video",
            "Crop a video to the rectangle between (x1,y1) and (x2,y2).",
        ),
        create_tool::<RotateVideoParams>(
            "rotate_video",
            "Rotate a video clockwise by an angle in degrees.",
        ),
        create_tool::<SpeedUpVideoParams>(
            "speed_up_video",
            "Change playback speed (e.g. 2.0 for double speed, 0.5 for half); audio \
             tempo is adjusted to match.",
        ),
        create_tool::<AddAudioParams>(
            "add_audio",
            "Replace a video's audio track with an audio file.",
        ),
        create_tool::<FadeInParams>(
            "fadein_video",
            "Add a fade-in from black over the given duration.",
        ),
        create_tool::<FadeOutParams>(
            "fadeout_video",
            "Add a fade-out to black ending at the end of the clip.",
        ),
        create_tool::<AddTextOverlayParams>(
            "add_text_overlay",
            "Draw text on the video at a position, with font size, color, and display \
             duration.",
        ),
        create_tool::<AddImageOverlayParams>(
            "add_image_overlay",
            "Overlay an image (watermark/logo) at a position for a duration.",
        ),
        create_tool::<AddVideoOverlayParams>(
            "add_video_overlay",
            "Overlay a video on another at a position with opacity (0-1) for a \
             duration.",
        ),
        create_tool::<GrayscaleVideoParams>(
            "grayscale_video",
            "Convert a video to grayscale.",
        ),
        create_tool::<MirrorVideoParams>(
            "mirror_video",
            "Mirror a video horizontally.",
        ),
        create_tool::<ImagesToVideoParams>(
            "images_to_video",
            "Build a video from a folder of images at the given frame rate.",
        ),
        create_tool::<ExtractFramesParams>(
            "extract_frames",
            "Extract PNG frames from a time window at the given sampling rate.",
        ),
        create_tool::<SplitVideoParams>(
            "split_video_at_times",
            "Split a video into segments at the given timestamps; produces one output \
             per segment.",
        ),
        create_tool::<ConvertVideoFormatParams>(
            "convert_video_format",
            "Convert container format with optional codec, fps, and bitrate control; \
             the output extension selects the container.",
        ),
        create_tool::<BurnSubtitlesParams>(
            "burn_subtitles",
            "Burn a subtitle file (srt/ass) into the video stream.",
        ),
        create_tool::<DownloadVideoParams>(
            "download_video",
            "Download a video from a URL via yt-dlp, optionally capped to a maximum \
             height, merged into an mp4.",
        ),
        create_tool::<DownloadAudioParams>(
            "download_audio",
            "Download only the audio track from a URL via yt-dlp, converted to mp3.",
        ),
        create_tool::<GetDownloadInfoParams>(
            "get_download_info",
            "Probe a URL via yt-dlp and report title, duration, uploader, and \
             available formats without downloading.",
        ),
    ]
}

/// Borrow the initialized edit handler out of the lazy cell.
fn edit_handler<'a>(
    guard: &'a tokio::sync::RwLockReadGuard<'_, Option<VideoEditHandler>>,
) -> Result<&'a VideoEditHandler, McpError> {
    guard
        .as_ref()
        .ok_or_else(|| McpError::internal_error("Handler not initialized", None))
}

/// Map a handler error to an MCP error code.
fn to_mcp_error(err: Error) -> McpError {
    if err.is_invalid_input() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

/// Serialize a tool result as pretty JSON text content.
fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Create a tool definition from a parameter type.
fn create_tool<T: JsonSchema>(name: &'static str, description: &'static str) -> rmcp::model::Tool {
    use schemars::schema_for;

    let schema = schema_for!(T);
    let schema_value = serde_json::to_value(&schema).unwrap_or_default();

    let input_schema = match schema_value {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    };

    rmcp::model::Tool {
        name: Cow::Borrowed(name),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

/// Parse tool parameters from JSON arguments.
fn parse_params<T: for<'de> Deserialize<'de>>(
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<T, McpError> {
    arguments
        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            output_dir: PathBuf::from("output"),
            work_dir: std::env::temp_dir().join("video-edit-mcp-server-test"),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            ytdlp_bin: "yt-dlp".to_string(),
            port: 8080,
        }
    }

    #[test]
    fn test_server_info() {
        let server = VideoEditServer::new(test_config());
        let server_info = server.get_info();
        let instructions = server_info.instructions.expect("should have instructions");
        assert!(instructions.contains("FFmpeg"));
        assert!(instructions.contains("yt-dlp"));
    }

    #[test]
    fn test_tool_definitions_complete() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 23);

        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(tool.description.is_some());
            assert!(!tool.input_schema.is_empty(), "{} has empty schema", tool.name);
        }

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"trim_video"));
        assert!(names.contains(&"burn_subtitles"));
        assert!(names.contains(&"download_video"));
        assert!(names.contains(&"get_download_info"));
    }

    #[test]
    fn test_tool_names_are_unique() {
        let tools = tool_definitions();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_create_tool() {
        let tool = create_tool::<GetVideoInfoParams>("get_video_info", "Get video info");
        assert_eq!(tool.name.as_ref(), "get_video_info");
        assert!(tool.description.is_some());
    }

    #[test]
    fn test_parse_params_valid() {
        let mut args = serde_json::Map::new();
        args.insert(
            "video_path".to_string(),
            serde_json::Value::String("test.mp4".to_string()),
        );

        let result: Result<GetVideoInfoParams, _> = parse_params(Some(args));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().video_path, "test.mp4");
    }

    #[test]
    fn test_parse_params_missing() {
        let result: Result<GetVideoInfoParams, _> = parse_params(None);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_mcp_error_classification() {
        let invalid = to_mcp_error(Error::validation("bad input"));
        let internal = to_mcp_error(Error::ffmpeg("boom"));
        // invalid_params and internal_error use distinct JSON-RPC codes
        assert_ne!(invalid.code, internal.code);
    }
}
