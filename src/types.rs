//! Core types for compcat

use crate::utils::safe_file_name;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a cat is a still image or an animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image (JPEG, PNG, ...)
    Image,
    /// Animated image (GIF)
    AnimatedImage,
}

impl MediaKind {
    /// Detect the kind from the envelope's media type
    pub fn from_mimetype(mimetype: &str) -> Self {
        if mimetype.trim().eq_ignore_ascii_case("image/gif") {
            MediaKind::AnimatedImage
        } else {
            MediaKind::Image
        }
    }

    /// Whether this is an animation
    pub fn is_animated(self) -> bool {
        matches!(self, MediaKind::AnimatedImage)
    }
}

/// JSON envelope returned by the metadata endpoints
///
/// Older API versions send a relative `url` plus a `file` name; newer ones
/// send an absolute `url` and an `_id`. Both shapes are accepted.
#[derive(Clone, Debug, Deserialize)]
pub struct CatMetadata {
    /// Relative path (or absolute URL) of the binary resource
    pub url: String,
    /// Suggested file name
    #[serde(default)]
    pub file: Option<String>,
    /// Media type of the resource
    #[serde(default)]
    pub mimetype: String,
    /// Resource identifier
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
}

impl CatMetadata {
    /// Kind of media this envelope describes
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mimetype(&self.mimetype)
    }

    /// File name to suggest when saving
    ///
    /// Uses `file` when present, otherwise derives a name from the id or URL
    /// path and adds an extension matching the media type. Every source is
    /// reduced to a bare file name, so the result is always safe to join onto
    /// a folder.
    pub fn suggested_file_name(&self) -> String {
        if let Some(file) = self.file.as_deref().and_then(safe_file_name) {
            return file;
        }

        let stem = self
            .id
            .as_deref()
            .and_then(safe_file_name)
            .unwrap_or_else(|| crate::utils::file_name_from_url(&self.url));

        if std::path::Path::new(&stem).extension().is_some() {
            stem
        } else {
            format!("{stem}.{}", extension_for_mimetype(&self.mimetype))
        }
    }
}

fn extension_for_mimetype(mimetype: &str) -> &'static str {
    match mimetype.trim().to_ascii_lowercase().as_str() {
        "image/gif" => "gif",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// The result of a successful fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatItem {
    /// Still or animated
    pub kind: MediaKind,
    /// Absolute URL of the binary resource
    pub remote_url: String,
    /// File name suggested when saving
    pub suggested_file_name: String,
    /// The downloaded media bytes
    pub raw_bytes: Vec<u8>,
}

/// Busy flags of the two coordinators
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestState {
    /// A fetch unit of work is running
    pub fetch_in_flight: bool,
    /// A transfer unit of work is running
    pub transfer_in_flight: bool,
}

/// Parameters of one fetch, snapshotted when the fetch is triggered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Requested width in pixels (already clamped)
    pub size_hint: u32,
    /// Ask the animated endpoint
    pub want_animated: bool,
    /// Accept animated results from the still endpoint
    pub allow_animated: bool,
    /// Metadata request ceiling while filtering animations
    pub max_attempts: u32,
}

/// Session events
///
/// Subscribers receive these through
/// [`CatSession::subscribe`](crate::CatSession::subscribe).
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fetch was started
    FetchStarted {
        /// Requested width
        size_hint: u32,
        /// Animated endpoint requested
        animated: bool,
    },

    /// A new cat is displayed
    CatLoaded {
        /// Still or animated
        kind: MediaKind,
        /// Suggested file name
        file_name: String,
        /// Payload size
        bytes: usize,
    },

    /// A fetch failed
    FetchFailed {
        /// Message shown to the user
        error: String,
    },

    /// A transfer was started
    TransferStarted {
        /// Destination file
        destination: PathBuf,
    },

    /// A cat was saved and a read node created
    CatImported {
        /// Destination file
        destination: PathBuf,
    },

    /// A transfer (or node creation) failed
    TransferFailed {
        /// Message shown to the user
        error: String,
    },

    /// Project settings were saved and re-read
    SettingsReloaded,
}
