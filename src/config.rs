//! Configuration types for compcat
//!
//! Two layers of configuration exist:
//! - [`Config`]: runtime settings supplied by the embedding host when a
//!   session is created (API endpoint, timeouts, worker pool, retry ceiling).
//!   Serializable, every field has a default.
//! - [`ProjectSettings`]: the five user-editable settings persisted as named
//!   fields on the host's current project and read back with all-or-nothing
//!   semantics.

use crate::error::{Error, Result};
use crate::host::{FieldValue, ProjectStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Smallest size hint the slider allows
pub const MIN_SIZE_HINT: u32 = 300;
/// Largest size hint the slider allows
pub const MAX_SIZE_HINT: u32 = 1000;
/// Initial slider position
pub const DEFAULT_SIZE_HINT: u32 = 400;

/// Project field holding the folder cat images are saved to
pub const FIELD_FOLDER_PATH: &str = "CompCatFolderPath";
/// Project field holding the read node colorspace
pub const FIELD_COLORSPACE: &str = "CompCatColorspace";
/// Project field holding the GIF support flag
pub const FIELD_GIF_SUPPORT: &str = "CompCatGifSupport";
/// Project field holding the always-on-top flag
pub const FIELD_WINDOW_ON_TOP: &str = "CompCatWindowOnTop";
/// Project field holding the secure transport flag
pub const FIELD_SECURE_TRANSPORT: &str = "CompCatHTTPS";

/// Main runtime configuration for a [`CatSession`](crate::CatSession)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the cat API (default: "https://cataas.com")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout applied to every HTTP request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Number of units of work that may run at the same time (default: 2)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Maximum metadata requests while filtering out GIFs (default: 10)
    ///
    /// When GIF support is disabled and the API keeps answering with animated
    /// items, the fetch gives up after this many metadata requests instead of
    /// looping forever.
    #[serde(default = "default_max_static_attempts")]
    pub max_static_attempts: u32,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory the save dialog starts in when no project folder is configured
    #[serde(default)]
    pub fallback_save_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout: default_request_timeout(),
            worker_threads: default_worker_threads(),
            max_static_attempts: default_max_static_attempts(),
            user_agent: default_user_agent(),
            fallback_save_dir: None,
        }
    }
}

impl Config {
    /// Check the settings that would otherwise fail deep inside a unit of work
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = url::Url::parse(&self.api_base_url) {
            return Err(Error::Config {
                message: format!("api_base_url '{}' is not a valid URL: {}", self.api_base_url, e),
                key: Some("api_base_url".to_string()),
            });
        }
        if self.worker_threads == 0 {
            return Err(Error::Config {
                message: "worker_threads must be at least 1".to_string(),
                key: Some("worker_threads".to_string()),
            });
        }
        if self.max_static_attempts == 0 {
            return Err(Error::Config {
                message: "max_static_attempts must be at least 1".to_string(),
                key: Some("max_static_attempts".to_string()),
            });
        }
        Ok(())
    }
}

/// Clamp a requested size to the slider bounds
pub fn clamp_size_hint(size_hint: u32) -> u32 {
    size_hint.clamp(MIN_SIZE_HINT, MAX_SIZE_HINT)
}

/// User-editable settings persisted on the host project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Folder where cat images are saved ("" = not set)
    pub folder_path: String,
    /// Colorspace tag applied to created read nodes
    pub colorspace: String,
    /// Allow animated results for plain image requests
    pub gif_support_enabled: bool,
    /// Keep the panel above other windows
    pub window_always_on_top: bool,
    /// Verify TLS certificates
    pub use_secure_transport: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            folder_path: String::new(),
            colorspace: "rec709".to_string(),
            gif_support_enabled: false,
            window_always_on_top: true,
            use_secure_transport: false,
        }
    }
}

impl ProjectSettings {
    /// Read settings from the project store
    ///
    /// All five fields must be present with the right value type. If any one is
    /// missing the full defaults are returned, even when the other fields exist.
    pub fn load(store: &dyn ProjectStore) -> Self {
        let mut folder_path = None;
        let mut colorspace = None;
        let mut gif_support_enabled = None;
        let mut window_always_on_top = None;
        let mut use_secure_transport = None;

        for (name, value) in store.fields() {
            match (name.as_str(), value) {
                (FIELD_FOLDER_PATH, FieldValue::Text(v)) => folder_path = Some(v),
                (FIELD_COLORSPACE, FieldValue::Text(v)) => colorspace = Some(v),
                (FIELD_GIF_SUPPORT, FieldValue::Flag(v)) => gif_support_enabled = Some(v),
                (FIELD_WINDOW_ON_TOP, FieldValue::Flag(v)) => window_always_on_top = Some(v),
                (FIELD_SECURE_TRANSPORT, FieldValue::Flag(v)) => use_secure_transport = Some(v),
                (
                    FIELD_FOLDER_PATH
                    | FIELD_COLORSPACE
                    | FIELD_GIF_SUPPORT
                    | FIELD_WINDOW_ON_TOP
                    | FIELD_SECURE_TRANSPORT,
                    other,
                ) => {
                    tracing::warn!(field = %name, value = ?other, "project field has unexpected type");
                }
                _ => {}
            }
        }

        match (
            folder_path,
            colorspace,
            gif_support_enabled,
            window_always_on_top,
            use_secure_transport,
        ) {
            (Some(folder_path), Some(colorspace), Some(gif), Some(on_top), Some(secure)) => Self {
                folder_path,
                colorspace,
                gif_support_enabled: gif,
                window_always_on_top: on_top,
                use_secure_transport: secure,
            },
            _ => {
                tracing::debug!("project settings incomplete, using defaults");
                Self::default()
            }
        }
    }

    /// Write all five settings to the project store
    ///
    /// Existing fields are updated by name, missing ones are added.
    pub fn save(&self, store: &mut dyn ProjectStore) -> Result<()> {
        for (name, value) in self.as_fields() {
            if !store.set_field(name, value.clone()) {
                store.add_field(name, value)?;
            }
        }
        tracing::info!(
            folder = %self.folder_path,
            colorspace = %self.colorspace,
            gif = self.gif_support_enabled,
            on_top = self.window_always_on_top,
            secure = self.use_secure_transport,
            "project settings saved"
        );
        Ok(())
    }

    fn as_fields(&self) -> [(&'static str, FieldValue); 5] {
        [
            (FIELD_FOLDER_PATH, FieldValue::Text(self.folder_path.clone())),
            (FIELD_COLORSPACE, FieldValue::Text(self.colorspace.clone())),
            (FIELD_GIF_SUPPORT, FieldValue::Flag(self.gif_support_enabled)),
            (FIELD_WINDOW_ON_TOP, FieldValue::Flag(self.window_always_on_top)),
            (FIELD_SECURE_TRANSPORT, FieldValue::Flag(self.use_secure_transport)),
        ]
    }
}

fn default_api_base_url() -> String {
    "https://cataas.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_worker_threads() -> usize {
    2
}

fn default_max_static_attempts() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("compcat/{}", env!("CARGO_PKG_VERSION"))
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
