//! Host application boundary
//!
//! The compositing application provides the window, the node graph, the
//! project-scoped field store and the file dialogs. compcat only talks to them
//! through the traits in this module, always from the UI thread, so none of
//! them need to be `Send`.
//!
//! [`memory`] contains in-process implementations used for headless sessions
//! and tests.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod memory;

/// Buttons whose label changes while work is in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// "New image"
    NewImage,
    /// "New GIF"
    NewAnimated,
    /// "Import cat"
    Import,
}

impl Button {
    /// Label shown while the button is idle
    pub fn idle_label(self) -> &'static str {
        match self {
            Button::NewImage => "New image",
            Button::NewAnimated => "New GIF",
            Button::Import => "Import cat",
        }
    }

    /// Label shown while the button's operation is running
    pub fn busy_label(self) -> &'static str {
        match self {
            Button::NewImage | Button::NewAnimated => "Loading...",
            Button::Import => "Downloading...",
        }
    }
}

/// The panel's widgets as seen by the session
///
/// Image bytes are handed over undecoded; decoding and playback belong to the
/// host toolkit.
pub trait View {
    /// Change a button label
    fn set_button_label(&mut self, button: Button, label: &str);

    /// Show an error message; an empty string clears it
    fn set_error_text(&mut self, text: &str);

    /// Show the loading placeholder in the image area
    fn show_loading_placeholder(&mut self);

    /// Show the error placeholder in the image area
    fn show_error_placeholder(&mut self);

    /// Show a static image
    fn show_image(&mut self, bytes: &[u8]);

    /// Start playing an animated image
    fn start_animation(&mut self, bytes: &[u8]);

    /// Stop the animation currently playing
    ///
    /// Must be called before another image replaces a playing animation.
    fn stop_animation(&mut self);

    /// Resize the window to fit its content
    fn fit_to_content(&mut self);

    /// Keep the window above other windows or not
    fn set_always_on_top(&mut self, on_top: bool);
}

/// The host's node graph
pub trait NodeGraph {
    /// Create a read node for a media file
    ///
    /// `colorspace` is applied to the node when the host supports it.
    fn create_read_node(&mut self, path: &Path, colorspace: Option<&str>) -> Result<()>;
}

/// Value of a named project field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// String field
    Text(String),
    /// Boolean field
    Flag(bool),
}

/// Named fields attached to the current project
pub trait ProjectStore {
    /// Every field currently stored on the project
    fn fields(&self) -> Vec<(String, FieldValue)>;

    /// Set an existing field by name; returns false when no such field exists
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;

    /// Add a new (hidden) field to the project
    fn add_field(&mut self, name: &str, value: FieldValue) -> Result<()>;
}

/// Native dialogs
pub trait FileDialog {
    /// Ask for a destination file; `None` when cancelled
    fn save_file(&mut self, suggested: &Path) -> Option<PathBuf>;

    /// Ask for a folder; `None` when cancelled
    fn select_folder(&mut self) -> Option<PathBuf>;
}

/// Everything a session needs from the host
pub struct HostBindings {
    /// Panel widgets
    pub view: Box<dyn View>,
    /// Node graph
    pub nodes: Box<dyn NodeGraph>,
    /// Project field store
    pub store: Box<dyn ProjectStore>,
    /// Native dialogs
    pub dialogs: Box<dyn FileDialog>,
}

impl HostBindings {
    /// Bundle host implementations
    pub fn new(
        view: impl View + 'static,
        nodes: impl NodeGraph + 'static,
        store: impl ProjectStore + 'static,
        dialogs: impl FileDialog + 'static,
    ) -> Self {
        Self {
            view: Box::new(view),
            nodes: Box::new(nodes),
            store: Box::new(store),
            dialogs: Box::new(dialogs),
        }
    }
}
