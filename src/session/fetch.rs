//! Fetch coordinator (new image / new GIF)

use super::{CatSession, PendingFetch};
use crate::config::clamp_size_hint;
use crate::error::{Error, Result};
use crate::host::Button;
use crate::runner::{TaskId, TaskKind};
use crate::types::{CatItem, Event, FetchRequest};

impl CatSession {
    /// "New image" at the current slider position
    pub fn request_new_image(&mut self) -> bool {
        self.request_new_cat(self.size_hint, false)
    }

    /// "New GIF" at the current slider position
    pub fn request_new_gif(&mut self) -> bool {
        self.request_new_cat(self.size_hint, true)
    }

    /// Start fetching a new cat
    ///
    /// Does nothing while a fetch is already in flight. The GIF support
    /// setting and retry ceiling are captured now; later settings changes do
    /// not affect a fetch that has started. Returns whether a fetch started.
    pub fn request_new_cat(&mut self, size_hint: u32, want_animated: bool) -> bool {
        if self.state.fetch_in_flight {
            tracing::debug!(want_animated, "fetch already in flight, ignoring trigger");
            return false;
        }

        let request = FetchRequest {
            size_hint: clamp_size_hint(size_hint),
            want_animated,
            allow_animated: self.settings.gif_support_enabled,
            max_attempts: self.config.max_static_attempts,
        };

        self.state.fetch_in_flight = true;
        self.clear_error();
        let button = if want_animated {
            Button::NewAnimated
        } else {
            Button::NewImage
        };
        self.host.view.set_button_label(button, button.busy_label());

        let client = self.client.clone();
        let id = self.runner.submit(
            TaskKind::Fetch,
            self.fetch.slot.clone(),
            async move { client.fetch_cat(request).await },
        );
        self.fetch.pending = Some(PendingFetch { id, request });

        tracing::info!(
            task_id = id.0,
            size_hint = request.size_hint,
            animated = want_animated,
            "fetching new cat"
        );
        self.emit(Event::FetchStarted {
            size_hint: request.size_hint,
            animated: want_animated,
        });
        true
    }

    pub(super) fn finish_fetch(&mut self, id: TaskId) {
        let pending = match self.fetch.pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                tracing::warn!(task_id = id.0, "completion for unknown fetch ignored");
                self.fetch.pending = other;
                return;
            }
        };

        let result: Result<CatItem> = self
            .fetch
            .slot
            .take()
            .unwrap_or_else(|| Err(Error::Other("fetch finished without a result".into())));

        // A playing animation must stop before anything replaces it.
        if self.animation_playing {
            self.host.view.stop_animation();
            self.animation_playing = false;
        }

        match result {
            Ok(item) => {
                if item.kind.is_animated() {
                    self.host.view.start_animation(&item.raw_bytes);
                    self.animation_playing = true;
                } else {
                    self.host.view.show_image(&item.raw_bytes);
                }

                self.emit(Event::CatLoaded {
                    kind: item.kind,
                    file_name: item.suggested_file_name.clone(),
                    bytes: item.raw_bytes.len(),
                });
                self.current = Some(item);
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(
                    task_id = id.0,
                    size_hint = pending.request.size_hint,
                    animated = pending.request.want_animated,
                    error = %e,
                    "fetch failed"
                );
                self.host.view.show_error_placeholder();
                self.show_error(&message);
                self.emit(Event::FetchFailed { error: message });
            }
        }

        self.state.fetch_in_flight = false;
        for button in [Button::NewImage, Button::NewAnimated] {
            self.host.view.set_button_label(button, button.idle_label());
        }
        self.host.view.fit_to_content();
    }
}
