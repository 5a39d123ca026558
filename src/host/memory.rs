//! In-process host implementations
//!
//! Each type is cheaply cloneable and clones share state, so a caller can hand
//! one clone to a [`CatSession`](crate::CatSession) and keep another to inspect
//! what the session did.

use super::{Button, FieldValue, FileDialog, NodeGraph, ProjectStore, View};
use crate::error::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Project field store kept in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryProjectStore {
    fields: Arc<Mutex<Vec<(String, FieldValue)>>>,
}

impl MemoryProjectStore {
    /// Create a store pre-populated with fields
    pub fn with_fields(fields: Vec<(&str, FieldValue)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self {
            fields: Arc::new(Mutex::new(fields)),
        }
    }

    /// Overwrite a field regardless of its current type, adding it if missing
    pub fn replace(&self, name: &str, value: FieldValue) {
        let mut fields = lock(&self.fields);
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => fields.push((name.to_string(), value)),
        }
    }

    /// Look up a single field
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        lock(&self.fields)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

impl ProjectStore for MemoryProjectStore {
    fn fields(&self) -> Vec<(String, FieldValue)> {
        lock(&self.fields).clone()
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        let mut fields = lock(&self.fields);
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => false,
        }
    }

    fn add_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let mut fields = lock(&self.fields);
        if fields.iter().any(|(n, _)| n == name) {
            return Err(Error::Host(format!("project field '{name}' already exists")));
        }
        fields.push((name.to_string(), value));
        Ok(())
    }
}

/// A read node created through [`RecordingNodeGraph`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadNode {
    /// Media file the node reads
    pub path: PathBuf,
    /// Colorspace applied to the node
    pub colorspace: Option<String>,
}

#[derive(Debug, Default)]
struct NodeGraphState {
    nodes: Vec<ReadNode>,
    failure: Option<String>,
}

/// Node graph that records every read node it is asked to create
#[derive(Clone, Debug, Default)]
pub struct RecordingNodeGraph {
    state: Arc<Mutex<NodeGraphState>>,
}

impl RecordingNodeGraph {
    /// Nodes created so far
    pub fn nodes(&self) -> Vec<ReadNode> {
        lock(&self.state).nodes.clone()
    }

    /// Make every following node creation fail with `message`
    pub fn fail_with(&self, message: &str) {
        lock(&self.state).failure = Some(message.to_string());
    }
}

impl NodeGraph for RecordingNodeGraph {
    fn create_read_node(&mut self, path: &Path, colorspace: Option<&str>) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(message) = &state.failure {
            return Err(Error::Host(message.clone()));
        }
        state.nodes.push(ReadNode {
            path: path.to_path_buf(),
            colorspace: colorspace.map(str::to_string),
        });
        Ok(())
    }
}

/// One call made on a [`RecordingView`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCall {
    /// Button label changed
    Label(Button, String),
    /// Error text changed
    ErrorText(String),
    /// Loading placeholder shown
    LoadingPlaceholder,
    /// Error placeholder shown
    ErrorPlaceholder,
    /// Static image shown (byte length)
    Image(usize),
    /// Animation started (byte length)
    AnimationStarted(usize),
    /// Animation stopped
    AnimationStopped,
    /// Window resized to content
    FitToContent,
    /// Always-on-top changed
    AlwaysOnTop(bool),
}

#[derive(Debug, Default)]
struct ViewState {
    calls: Vec<ViewCall>,
    labels: HashMap<Button, String>,
    error_text: String,
    animation_playing: bool,
    overlapping_animations: usize,
    always_on_top: Option<bool>,
}

/// View that records every call and tracks the resulting widget state
#[derive(Clone, Debug, Default)]
pub struct RecordingView {
    state: Arc<Mutex<ViewState>>,
}

impl RecordingView {
    /// Every call in order
    pub fn calls(&self) -> Vec<ViewCall> {
        lock(&self.state).calls.clone()
    }

    /// Current label of a button (the idle label if it was never changed)
    pub fn label(&self, button: Button) -> String {
        lock(&self.state)
            .labels
            .get(&button)
            .cloned()
            .unwrap_or_else(|| button.idle_label().to_string())
    }

    /// Current error text
    pub fn error_text(&self) -> String {
        lock(&self.state).error_text.clone()
    }

    /// Whether an animation is playing
    pub fn animation_playing(&self) -> bool {
        lock(&self.state).animation_playing
    }

    /// Number of animations started while another one was still playing
    ///
    /// Real hosts crash on this, so callers driving a session should expect
    /// zero.
    pub fn overlapping_animations(&self) -> usize {
        lock(&self.state).overlapping_animations
    }

    /// Last always-on-top value applied
    pub fn always_on_top(&self) -> Option<bool> {
        lock(&self.state).always_on_top
    }

    fn record(&self, call: ViewCall) -> MutexGuard<'_, ViewState> {
        let mut state = lock(&self.state);
        state.calls.push(call);
        state
    }
}

impl View for RecordingView {
    fn set_button_label(&mut self, button: Button, label: &str) {
        let mut state = self.record(ViewCall::Label(button, label.to_string()));
        state.labels.insert(button, label.to_string());
    }

    fn set_error_text(&mut self, text: &str) {
        let mut state = self.record(ViewCall::ErrorText(text.to_string()));
        state.error_text = text.to_string();
    }

    fn show_loading_placeholder(&mut self) {
        drop(self.record(ViewCall::LoadingPlaceholder));
    }

    fn show_error_placeholder(&mut self) {
        drop(self.record(ViewCall::ErrorPlaceholder));
    }

    fn show_image(&mut self, bytes: &[u8]) {
        drop(self.record(ViewCall::Image(bytes.len())));
    }

    fn start_animation(&mut self, bytes: &[u8]) {
        let mut state = self.record(ViewCall::AnimationStarted(bytes.len()));
        if state.animation_playing {
            state.overlapping_animations += 1;
        }
        state.animation_playing = true;
    }

    fn stop_animation(&mut self) {
        let mut state = self.record(ViewCall::AnimationStopped);
        state.animation_playing = false;
    }

    fn fit_to_content(&mut self) {
        drop(self.record(ViewCall::FitToContent));
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        let mut state = self.record(ViewCall::AlwaysOnTop(on_top));
        state.always_on_top = Some(on_top);
    }
}

#[derive(Debug, Default)]
struct DialogState {
    save_answers: VecDeque<Option<PathBuf>>,
    folder_answers: VecDeque<Option<PathBuf>>,
    save_suggestions: Vec<PathBuf>,
}

/// File dialog answering from queued responses
///
/// An empty queue behaves like the user pressing cancel.
#[derive(Clone, Debug, Default)]
pub struct ScriptedFileDialog {
    state: Arc<Mutex<DialogState>>,
}

impl ScriptedFileDialog {
    /// Queue the answer for the next save dialog
    pub fn answer_save(&self, answer: Option<PathBuf>) {
        lock(&self.state).save_answers.push_back(answer);
    }

    /// Queue the answer for the next folder dialog
    pub fn answer_folder(&self, answer: Option<PathBuf>) {
        lock(&self.state).folder_answers.push_back(answer);
    }

    /// Paths the save dialog was pre-filled with
    pub fn save_suggestions(&self) -> Vec<PathBuf> {
        lock(&self.state).save_suggestions.clone()
    }
}

impl FileDialog for ScriptedFileDialog {
    fn save_file(&mut self, suggested: &Path) -> Option<PathBuf> {
        let mut state = lock(&self.state);
        state.save_suggestions.push(suggested.to_path_buf());
        state.save_answers.pop_front().flatten()
    }

    fn select_folder(&mut self) -> Option<PathBuf> {
        lock(&self.state).folder_answers.pop_front().flatten()
    }
}
