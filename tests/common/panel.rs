//! Session construction over the in-memory host

use compcat::host::memory::{
    MemoryProjectStore, RecordingNodeGraph, RecordingView, ScriptedFileDialog,
};
use compcat::{CatSession, Config, Event, HostBindings};
use std::time::Duration;
use tokio::sync::broadcast;
use wiremock::MockServer;

/// Handles onto the host a session under test talks to
#[derive(Clone, Default)]
pub struct TestPanel {
    pub view: RecordingView,
    pub nodes: RecordingNodeGraph,
    pub store: MemoryProjectStore,
    pub dialogs: ScriptedFileDialog,
}

/// Create a session against a stubbed cat API
pub fn create_session(server: &MockServer) -> (CatSession, TestPanel) {
    let panel = TestPanel::default();
    let host = HostBindings::new(
        panel.view.clone(),
        panel.nodes.clone(),
        panel.store.clone(),
        panel.dialogs.clone(),
    );
    let config = Config {
        api_base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    };
    let session = CatSession::new(config, host, tokio::runtime::Handle::current())
        .expect("session should start");
    (session, panel)
}

/// Handle completions until the session is idle, failing after `timeout`
pub async fn settle(session: &mut CatSession, timeout: Duration) {
    tokio::time::timeout(timeout, session.wait_idle())
        .await
        .expect("session did not become idle in time");
}

/// Drain every event already broadcast
pub fn drain_events(events: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}
