//! Download-and-import coordinator

use super::{CatSession, PendingTransfer};
use crate::error::{Error, Result, messages};
use crate::host::Button;
use crate::runner::{TaskId, TaskKind};
use crate::types::Event;
use crate::utils::suggested_save_path;
use std::path::{Path, PathBuf};

impl CatSession {
    /// "Import cat": ask the host for a destination, then import there
    ///
    /// The save dialog is pre-filled with the project folder and the cat's
    /// suggested file name. A cancelled dialog shows the "file path was not
    /// set" message. Returns whether a transfer started.
    pub fn import_cat(&mut self) -> bool {
        let Some(file_name) = self.importable_file_name() else {
            return false;
        };

        let suggested = suggested_save_path(
            &self.settings.folder_path,
            self.config.fallback_save_dir.as_deref(),
            &file_name,
        );
        match self.host.dialogs.save_file(&suggested) {
            Some(destination) => self.import_current_cat(destination),
            None => {
                tracing::debug!("save dialog cancelled");
                self.reject_destination(messages::EMPTY_DESTINATION);
                false
            }
        }
    }

    /// Import into the configured project folder without asking
    pub fn import_to_project_folder(&mut self) -> bool {
        let Some(file_name) = self.importable_file_name() else {
            return false;
        };

        let folder = self.settings.folder_path.trim();
        if folder.is_empty() {
            self.reject_destination(messages::FOLDER_NOT_SET);
            return false;
        }
        let destination = Path::new(folder).join(file_name);
        self.import_current_cat(destination)
    }

    /// Save the current cat to `destination` and create a read node for it
    ///
    /// Does nothing while a transfer is in flight or before any cat has been
    /// fetched. The remote URL and colorspace are captured now, so a fetch
    /// started afterwards does not change what this transfer writes.
    pub fn import_current_cat(&mut self, destination: impl AsRef<Path>) -> bool {
        if self.state.transfer_in_flight {
            tracing::debug!("transfer already in flight, ignoring trigger");
            return false;
        }
        let Some(remote_url) = self.current.as_ref().map(|item| item.remote_url.clone()) else {
            tracing::debug!("no cat fetched yet, nothing to import");
            return false;
        };

        let destination = destination.as_ref();
        if destination.as_os_str().is_empty() {
            self.reject_destination(messages::EMPTY_DESTINATION);
            return false;
        }

        let destination: PathBuf = destination.to_path_buf();
        let colorspace = self.settings.colorspace.clone();

        self.state.transfer_in_flight = true;
        self.clear_error();
        self.host
            .view
            .set_button_label(Button::Import, Button::Import.busy_label());

        let client = self.client.clone();
        let target = destination.clone();
        let id = self.runner.submit(
            TaskKind::Transfer,
            self.transfer.slot.clone(),
            async move { client.download_to_file(&remote_url, &target).await },
        );

        tracing::info!(
            task_id = id.0,
            destination = %destination.display(),
            colorspace = %colorspace,
            "importing cat"
        );
        self.emit(Event::TransferStarted {
            destination: destination.clone(),
        });
        self.transfer.pending = Some(PendingTransfer {
            id,
            destination,
            colorspace,
        });
        true
    }

    pub(super) fn finish_transfer(&mut self, id: TaskId) {
        let pending = match self.transfer.pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                tracing::warn!(task_id = id.0, "completion for unknown transfer ignored");
                self.transfer.pending = other;
                return;
            }
        };

        let result: Result<u64> = self
            .transfer
            .slot
            .take()
            .unwrap_or_else(|| Err(Error::Other("transfer finished without a result".into())));

        let imported = result.and_then(|bytes| {
            let colorspace = Some(pending.colorspace.as_str()).filter(|c| !c.is_empty());
            self.host
                .nodes
                .create_read_node(&pending.destination, colorspace)?;
            Ok(bytes)
        });

        match imported {
            Ok(bytes) => {
                tracing::info!(
                    task_id = id.0,
                    destination = %pending.destination.display(),
                    bytes,
                    "cat imported"
                );
                self.emit(Event::CatImported {
                    destination: pending.destination,
                });
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(
                    task_id = id.0,
                    destination = %pending.destination.display(),
                    error = %e,
                    "import failed"
                );
                self.show_error(&message);
                self.emit(Event::TransferFailed { error: message });
            }
        }

        self.state.transfer_in_flight = false;
        self.host
            .view
            .set_button_label(Button::Import, Button::Import.idle_label());
        self.host.view.fit_to_content();
    }

    /// Suggested file name of the current cat, if an import may start now
    fn importable_file_name(&self) -> Option<String> {
        if self.state.transfer_in_flight {
            tracing::debug!("transfer already in flight, ignoring trigger");
            return None;
        }
        self.current
            .as_ref()
            .map(|item| item.suggested_file_name.clone())
    }

    fn reject_destination(&mut self, message: &str) {
        self.show_error(message);
        self.host.view.fit_to_content();
    }
}
