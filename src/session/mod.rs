//! Window session split into focused submodules.
//!
//! A [`CatSession`] is the context object of one open panel. It is created
//! when the window opens, dropped when it closes, and only ever touched from
//! the thread that owns the window. Its methods are organized by domain:
//! - [`fetch`] - Fetch coordinator (new image / new GIF)
//! - [`transfer`] - Download-and-import coordinator
//! - [`config_ops`] - Config panel and settings reload

mod config_ops;
mod fetch;
mod transfer;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use config_ops::ConfigPanel;

use crate::client::CatApiClient;
use crate::config::{Config, DEFAULT_SIZE_HINT, ProjectSettings, clamp_size_hint};
use crate::error::Result;
use crate::host::HostBindings;
use crate::runner::{Completion, CompletionReceiver, TaskId, TaskKind, TaskRunner, TaskSlot};
use crate::types::{CatItem, Event, FetchRequest, RequestState};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A fetch that has been submitted and not yet completed
#[derive(Debug)]
pub(crate) struct PendingFetch {
    pub(crate) id: TaskId,
    pub(crate) request: FetchRequest,
}

/// A transfer that has been submitted and not yet completed
#[derive(Debug)]
pub(crate) struct PendingTransfer {
    pub(crate) id: TaskId,
    pub(crate) destination: PathBuf,
    pub(crate) colorspace: String,
}

/// Fetch coordinator state
#[derive(Default)]
pub(crate) struct FetchState {
    /// Result slot shared with the running unit of work
    pub(crate) slot: TaskSlot<CatItem>,
    /// Submitted fetch waiting for its completion
    pub(crate) pending: Option<PendingFetch>,
}

/// Download-and-import coordinator state
#[derive(Default)]
pub(crate) struct TransferState {
    /// Result slot shared with the running unit of work (bytes written)
    pub(crate) slot: TaskSlot<u64>,
    /// Submitted transfer waiting for its completion
    pub(crate) pending: Option<PendingTransfer>,
}

/// One open cat panel
pub struct CatSession {
    /// Runtime configuration
    pub(crate) config: Config,
    /// Project settings as last read from the host
    pub(crate) settings: ProjectSettings,
    /// HTTP client matching the secure-transport setting
    pub(crate) client: CatApiClient,
    /// Background task runner
    pub(crate) runner: TaskRunner,
    /// Completion notifications from the runner
    pub(crate) completions: CompletionReceiver,
    /// Busy flags
    pub(crate) state: RequestState,
    /// The cat currently displayed
    pub(crate) current: Option<CatItem>,
    /// Whether the view is playing an animation
    pub(crate) animation_playing: bool,
    /// Slider position
    pub(crate) size_hint: u32,
    /// Fetch coordinator
    pub(crate) fetch: FetchState,
    /// Download-and-import coordinator
    pub(crate) transfer: TransferState,
    /// Message currently displayed in the error label
    pub(crate) last_error: Option<String>,
    /// Host application
    pub(crate) host: HostBindings,
    /// Event broadcast channel sender
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl CatSession {
    /// Create a session for a newly opened window
    ///
    /// Reads the project settings, builds the HTTP client and applies the
    /// always-on-top setting. No request is made until [`open`](Self::open)
    /// or a trigger is called. Units of work are spawned on `runtime`.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be built
    pub fn new(
        config: Config,
        mut host: HostBindings,
        runtime: tokio::runtime::Handle,
    ) -> Result<Self> {
        config.validate()?;

        let settings = ProjectSettings::load(host.store.as_ref());
        let client = CatApiClient::new(&config, settings.use_secure_transport)?;
        let (runner, completions) = TaskRunner::new(runtime, config.worker_threads);
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        host.view.set_always_on_top(settings.window_always_on_top);

        tracing::info!(
            api = %config.api_base_url,
            workers = config.worker_threads,
            secure = settings.use_secure_transport,
            gif_support = settings.gif_support_enabled,
            "cat session created"
        );

        Ok(Self {
            config,
            settings,
            client,
            runner,
            completions,
            state: RequestState::default(),
            current: None,
            animation_playing: false,
            size_hint: DEFAULT_SIZE_HINT,
            fetch: FetchState::default(),
            transfer: TransferState::default(),
            last_error: None,
            host,
            event_tx,
        })
    }

    /// Show the loading placeholder and fetch the first cat
    pub fn open(&mut self) {
        self.host.view.show_loading_placeholder();
        self.request_new_image();
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Busy flags
    pub fn request_state(&self) -> RequestState {
        self.state
    }

    /// Whether a cat has been fetched and can be imported
    pub fn has_cat_stored(&self) -> bool {
        self.current.is_some()
    }

    /// The cat currently displayed
    pub fn current_cat(&self) -> Option<&CatItem> {
        self.current.as_ref()
    }

    /// Message currently displayed in the error label
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Project settings in effect
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Runtime configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Slider position
    pub fn size_hint(&self) -> u32 {
        self.size_hint
    }

    /// Move the slider; values are clamped to the slider bounds
    pub fn set_size_hint(&mut self, size_hint: u32) {
        self.size_hint = clamp_size_hint(size_hint);
    }

    /// Handle every completion that has already arrived, without blocking
    ///
    /// Call this from the host's event loop. Returns the number handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.handle_completion(completion);
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion and handle it
    ///
    /// Only returns `None` if the runner is gone, which cannot happen while the
    /// session is alive; callers should only await this with work in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let completion = self.completions.recv().await?;
        self.handle_completion(completion);
        Some(completion)
    }

    /// Handle completions until neither coordinator is busy
    pub async fn wait_idle(&mut self) {
        while self.state.fetch_in_flight || self.state.transfer_in_flight {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        tracing::debug!(task_id = completion.id.0, kind = ?completion.kind, "completion received");
        match completion.kind {
            TaskKind::Fetch => self.finish_fetch(completion.id),
            TaskKind::Transfer => self.finish_transfer(completion.id),
        }
    }

    fn show_error(&mut self, message: &str) {
        self.host.view.set_error_text(message);
        self.last_error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.host.view.set_error_text("");
        self.last_error = None;
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        self.event_tx.send(event).ok();
    }
}
