//! Container format and codec registry.
//!
//! Static definitions of the output containers the server knows how to
//! target, with a registry for resolving names and aliases. Used by the
//! format-conversion tool and for picking default encoders from an output
//! file extension.

use serde::Serialize;

/// Output container format definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContainerFormat {
    /// Canonical file extension
    pub extension: &'static str,
    /// Aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Default video encoder
    pub video_codec: &'static str,
    /// Default audio encoder
    pub audio_codec: &'static str,
    /// Whether the container carries audio
    pub supports_audio: bool,
}

// =============================================================================
// Static Format Definitions
// =============================================================================

/// MP4 container (H.264 + AAC)
pub const MP4: ContainerFormat = ContainerFormat {
    extension: "mp4",
    aliases: &["mpeg4", "m4v"],
    video_codec: "libx264",
    audio_codec: "aac",
    supports_audio: true,
};

/// Matroska container (H.264 + AAC)
pub const MKV: ContainerFormat = ContainerFormat {
    extension: "mkv",
    aliases: &["matroska"],
    video_codec: "libx264",
    audio_codec: "aac",
    supports_audio: true,
};

/// WebM container (VP9 + Opus)
pub const WEBM: ContainerFormat = ContainerFormat {
    extension: "webm",
    aliases: &[],
    video_codec: "libvpx-vp9",
    audio_codec: "libopus",
    supports_audio: true,
};

/// QuickTime container (H.264 + AAC)
pub const MOV: ContainerFormat = ContainerFormat {
    extension: "mov",
    aliases: &["quicktime"],
    video_codec: "libx264",
    audio_codec: "aac",
    supports_audio: true,
};

/// AVI container (MPEG-4 Part 2 + MP3)
pub const AVI: ContainerFormat = ContainerFormat {
    extension: "avi",
    aliases: &[],
    video_codec: "mpeg4",
    audio_codec: "libmp3lame",
    supports_audio: true,
};

/// Animated GIF (video only)
pub const GIF: ContainerFormat = ContainerFormat {
    extension: "gif",
    aliases: &[],
    video_codec: "gif",
    audio_codec: "",
    supports_audio: false,
};

/// All known container formats
pub const CONTAINER_FORMATS: &[ContainerFormat] = &[MP4, MKV, WEBM, MOV, AVI, GIF];

// =============================================================================
// Registry Lookups
// =============================================================================

/// Resolve a container format by extension or alias (case-insensitive).
pub fn resolve_format(name: &str) -> Option<&'static ContainerFormat> {
    let name = name.trim().trim_start_matches('.').to_lowercase();
    CONTAINER_FORMATS.iter().find(|f| {
        f.extension == name || f.aliases.iter().any(|a| *a == name)
    })
}

/// Resolve a user-supplied video codec name to an ffmpeg encoder.
///
/// Accepts common names (`h264`, `hevc`, `vp9`, ...), actual encoder names
/// (`libx264`, ...), and `copy` for stream passthrough.
pub fn resolve_video_codec(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "h264" | "x264" | "avc" | "libx264" => Some("libx264"),
        "h265" | "hevc" | "x265" | "libx265" => Some("libx265"),
        "vp8" | "libvpx" => Some("libvpx"),
        "vp9" | "libvpx-vp9" => Some("libvpx-vp9"),
        "av1" | "libaom-av1" => Some("libaom-av1"),
        "mpeg4" => Some("mpeg4"),
        "gif" => Some("gif"),
        "copy" => Some("copy"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_format_by_extension() {
        assert_eq!(resolve_format("mp4").unwrap().video_codec, "libx264");
        assert_eq!(resolve_format("webm").unwrap().video_codec, "libvpx-vp9");
        assert_eq!(resolve_format("webm").unwrap().audio_codec, "libopus");
        assert_eq!(resolve_format("mkv").unwrap().extension, "mkv");
    }

    #[test]
    fn resolve_format_by_alias() {
        assert_eq!(resolve_format("matroska").unwrap().extension, "mkv");
        assert_eq!(resolve_format("quicktime").unwrap().extension, "mov");
        assert_eq!(resolve_format("mpeg4").unwrap().extension, "mp4");
    }

    #[test]
    fn resolve_format_is_case_insensitive_and_trims_dots() {
        assert_eq!(resolve_format("MP4").unwrap().extension, "mp4");
        assert_eq!(resolve_format(".mkv").unwrap().extension, "mkv");
        assert_eq!(resolve_format("  webm ").unwrap().extension, "webm");
    }

    #[test]
    fn resolve_format_unknown() {
        assert!(resolve_format("ogv").is_none());
        assert!(resolve_format("").is_none());
    }

    #[test]
    fn gif_has_no_audio() {
        let gif = resolve_format("gif").unwrap();
        assert!(!gif.supports_audio);
    }

    #[test]
    fn resolve_video_codec_names_and_aliases() {
        assert_eq!(resolve_video_codec("h264"), Some("libx264"));
        assert_eq!(resolve_video_codec("H264"), Some("libx264"));
        assert_eq!(resolve_video_codec("hevc"), Some("libx265"));
        assert_eq!(resolve_video_codec("vp9"), Some("libvpx-vp9"));
        assert_eq!(resolve_video_codec("libx264"), Some("libx264"));
        assert_eq!(resolve_video_codec("copy"), Some("copy"));
    }

    #[test]
    fn resolve_video_codec_unknown() {
        assert_eq!(resolve_video_codec("prores"), None);
        assert_eq!(resolve_video_codec(""), None);
    }

    #[test]
    fn every_format_with_audio_names_an_audio_codec() {
        for format in CONTAINER_FORMATS {
            if format.supports_audio {
                assert!(
                    !format.audio_codec.is_empty(),
                    "{} supports audio but has no audio codec",
                    format.extension
                );
            }
        }
    }
}
