//! Config panel and settings reload

use super::CatSession;
use crate::client::CatApiClient;
use crate::config::ProjectSettings;
use crate::error::Result;
use crate::host::FileDialog;
use crate::types::Event;

/// Draft of the five project settings while the config panel is open
///
/// Nothing is persisted until the draft is passed to
/// [`CatSession::save_config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigPanel {
    draft: ProjectSettings,
}

impl ConfigPanel {
    /// Start a draft from existing settings
    pub fn new(settings: ProjectSettings) -> Self {
        Self { draft: settings }
    }

    /// Settings as currently edited
    pub fn settings(&self) -> &ProjectSettings {
        &self.draft
    }

    /// Set the save folder
    pub fn set_folder_path(&mut self, folder_path: impl Into<String>) {
        self.draft.folder_path = folder_path.into();
    }

    /// Set the read node colorspace
    pub fn set_colorspace(&mut self, colorspace: impl Into<String>) {
        self.draft.colorspace = colorspace.into();
    }

    /// Allow animated results for plain image requests
    pub fn set_gif_support(&mut self, enabled: bool) {
        self.draft.gif_support_enabled = enabled;
    }

    /// Keep the panel above other windows
    pub fn set_window_always_on_top(&mut self, on_top: bool) {
        self.draft.window_always_on_top = on_top;
    }

    /// Verify TLS certificates
    pub fn set_secure_transport(&mut self, secure: bool) {
        self.draft.use_secure_transport = secure;
    }

    /// Pick the save folder with the host's folder dialog
    ///
    /// A cancelled dialog leaves the draft unchanged. Returns whether the
    /// folder changed.
    pub fn browse_folder(&mut self, dialogs: &mut dyn FileDialog) -> bool {
        match dialogs.select_folder() {
            Some(folder) => {
                self.draft.folder_path = folder.to_string_lossy().into_owned();
                true
            }
            None => false,
        }
    }
}

impl CatSession {
    /// Open the config panel with the settings currently stored on the project
    pub fn open_config_panel(&self) -> ConfigPanel {
        ConfigPanel::new(ProjectSettings::load(self.host.store.as_ref()))
    }

    /// "Browse" button of the config panel
    pub fn browse_config_folder(&mut self, panel: &mut ConfigPanel) -> bool {
        panel.browse_folder(self.host.dialogs.as_mut())
    }

    /// Persist the panel's draft and apply it
    ///
    /// # Errors
    /// Returns error if the host store rejects a field or the HTTP client cannot be rebuilt
    pub fn save_config(&mut self, panel: ConfigPanel) -> Result<()> {
        panel.draft.save(self.host.store.as_mut())?;
        self.reload_settings()
    }

    /// Re-read the project settings and apply them to the session
    ///
    /// Work already in flight keeps the settings it was started with.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be rebuilt
    pub fn reload_settings(&mut self) -> Result<()> {
        let settings = ProjectSettings::load(self.host.store.as_ref());

        if settings.use_secure_transport != self.settings.use_secure_transport {
            self.client = CatApiClient::new(&self.config, settings.use_secure_transport)?;
            tracing::info!(
                secure = settings.use_secure_transport,
                "HTTP client rebuilt for new transport setting"
            );
        }
        self.host.view.set_always_on_top(settings.window_always_on_top);
        self.settings = settings;

        self.emit(Event::SettingsReloaded);
        Ok(())
    }
}
