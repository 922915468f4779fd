//! video-edit-mcp server binary
//!
//! MCP server for video editing (FFmpeg) and video retrieval (yt-dlp).
//!
//! # Usage
//!
//! ```bash
//! # Run with stdio transport (default)
//! video-edit-mcp
//!
//! # Run with HTTP transport
//! video-edit-mcp --transport http --port 8080
//! ```
//!
//! Configuration comes from the environment (or a `.env` file):
//! `OUTPUT_DIR`, `WORK_DIR`, `FFMPEG_BIN`, `FFPROBE_BIN`, `YTDLP_BIN`,
//! `PORT`.

use anyhow::Result;
use clap::Parser;
use video_edit_mcp::VideoEditServer;
use video_edit_mcp_common::{Config, McpServerBuilder, TransportArgs};

#[derive(Parser, Debug)]
#[command(name = "video-edit-mcp")]
#[command(about = "MCP server for video editing (FFmpeg) and retrieval (yt-dlp)")]
#[command(version)]
struct Args {
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        output_dir = %config.output_dir.display(),
        work_dir = %config.work_dir.display(),
        "Starting video-edit-mcp server"
    );

    // Create server
    let server = VideoEditServer::new(config);

    // Get transport configuration
    let transport = args.transport.into_transport();

    // Run server
    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
