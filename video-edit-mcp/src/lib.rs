//! video-edit-mcp library
//!
//! MCP server for video editing (FFmpeg) and video retrieval (yt-dlp).
//!
//! Editing tools: `get_video_info`, `trim_video`, `merge_video`,
//! `resize_video`, `crop_video`, `rotate_video`, `speed_up_video`,
//! `add_audio`, `fadein_video`, `fadeout_video`, `add_text_overlay`,
//! `add_image_overlay`, `add_video_overlay`, `grayscale_video`,
//! `mirror_video`, `images_to_video`, `extract_frames`,
//! `split_video_at_times`, `convert_video_format`, `burn_subtitles`.
//!
//! Retrieval tools: `download_video`, `download_audio`, `get_download_info`.
//!
//! Editing tools called with `return_path = false` keep their result as a
//! `clip://` reference in the in-memory store; later tools accept those
//! references in place of file paths, so edits compose without naming
//! intermediates.

pub mod downloader;
pub mod handler;
pub mod server;
pub mod store;

pub use downloader::{
    DownloadAudioParams, DownloadHandler, DownloadInfo, DownloadOutcome, DownloadVideoParams,
    GetDownloadInfoParams,
};
pub use handler::{
    AddAudioParams, AddImageOverlayParams, AddTextOverlayParams, AddVideoOverlayParams,
    BurnSubtitlesParams, ConvertVideoFormatParams, CropVideoParams, EditOutcome,
    ExtractFramesParams, FadeInParams, FadeOutParams, GetVideoInfoParams, GrayscaleVideoParams,
    ImagesToVideoParams, MergeVideoParams, MirrorVideoParams, ResizeVideoParams,
    RotateVideoParams, SpeedUpVideoParams, SplitVideoParams, TrimVideoParams, VideoEditHandler,
    VideoInfo,
};
pub use server::VideoEditServer;
pub use store::ClipStore;
