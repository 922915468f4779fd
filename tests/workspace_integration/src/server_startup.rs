//! Server startup integration tests.
//!
//! Tests that the MCP server can be instantiated and provides correct
//! server info and capabilities.

use std::path::PathBuf;
use video_edit_mcp_common::Config;

/// Test configuration for integration tests.
pub fn test_config() -> Config {
    Config {
        output_dir: PathBuf::from("output"),
        work_dir: std::env::temp_dir().join("video-edit-mcp-ws-tests"),
        ffmpeg_bin: "ffmpeg".to_string(),
        ffprobe_bin: "ffprobe".to_string(),
        ytdlp_bin: "yt-dlp".to_string(),
        port: 8080,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::ServerHandler;
    use video_edit_mcp::VideoEditServer;

    /// Test that the server can be created and provides server info.
    #[test]
    fn test_server_startup() {
        let server = VideoEditServer::new(test_config());
        let info = server.get_info();

        let instructions = info.instructions.expect("server should have instructions");
        let lower = instructions.to_lowercase();
        assert!(lower.contains("video"), "Instructions should mention 'video'");
        assert!(lower.contains("ffmpeg"), "Instructions should mention ffmpeg");
        assert!(lower.contains("yt-dlp"), "Instructions should mention yt-dlp");
    }

    /// Test that the server advertises the tools capability.
    #[test]
    fn test_server_advertises_tools() {
        let server = VideoEditServer::new(test_config());
        let info = server.get_info();

        assert!(
            info.capabilities.tools.is_some(),
            "Server should advertise tools capability"
        );
    }

    /// Test that server creation is cheap and repeatable (the edit handler
    /// initializes lazily, so no directories are created here).
    #[test]
    fn test_server_creation_is_repeatable() {
        for _ in 0..3 {
            let server = VideoEditServer::new(test_config());
            let _ = server.get_info();
        }
    }
}
