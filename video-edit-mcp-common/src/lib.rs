//! video-edit-mcp common library
//!
//! Shared runtime for the video-edit MCP server: configuration, the unified
//! error hierarchy, the HTTP fetcher for remote media inputs, the container
//! format registry, transport selection, and the MCP server builder.

pub mod config;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod fetch_test;
#[cfg(test)]
mod server_test;

pub use config::Config;
pub use error::{ConfigError, Error, FetchError, Result};
pub use fetch::{HttpFetcher, MediaUrl};
pub use formats::{ContainerFormat, resolve_format, resolve_video_codec};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
