//! Media reference classification.
//!
//! Backend results are opaque URLs. Each is classified as a still image or
//! a video/animation purely from its trailing extension; nothing is
//! downloaded or sniffed. A video without one of the recognised
//! extensions is therefore treated as an image.

use std::fmt;

use serde::Serialize;

/// Extensions (lowercase, without the dot) rendered as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "gif"];

/// How a media reference must be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback flags every video item is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoPlayback {
    pub controls: bool,
    pub looped: bool,
    pub autoplay: bool,
    pub muted: bool,
}

/// Controls shown, looped, auto-starting, sound on.
pub const VIDEO_PLAYBACK: VideoPlayback = VideoPlayback {
    controls: true,
    looped: true,
    autoplay: true,
    muted: false,
};

/// A single result item that could not be loaded.
///
/// Non-fatal: the remaining items are still presented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to load {kind} #{index} ({reference}): {reason}")]
pub struct MediaLoadError {
    /// Position of the item in the result list.
    pub index: usize,
    pub reference: String,
    pub kind: MediaKind,
    pub reason: String,
}

/// Classify a media reference by its extension.
pub fn classify(reference: &str) -> MediaKind {
    match extension_of(reference) {
        Some(ext) if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) => {
            MediaKind::Video
        }
        _ => MediaKind::Image,
    }
}

/// Extract the trailing extension of a reference.
///
/// Any `?query` or `#fragment` is ignored. When the path itself has no
/// extension, a `filename=` query parameter is consulted instead, which
/// covers backend `/view?filename=...` links.
pub fn extension_of(reference: &str) -> Option<&str> {
    let without_fragment = reference.split('#').next().unwrap_or(reference);
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    };

    file_extension(path).or_else(|| {
        query?
            .split('&')
            .find_map(|pair| pair.strip_prefix("filename="))
            .and_then(file_extension)
    })
}

/// Extension of the last path segment, if it has a non-empty one.
fn file_extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}
