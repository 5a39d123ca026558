//! Shared test helpers for creating CatSession instances in tests.

use crate::config::{
    Config, FIELD_COLORSPACE, FIELD_FOLDER_PATH, FIELD_GIF_SUPPORT, FIELD_SECURE_TRANSPORT,
    FIELD_WINDOW_ON_TOP,
};
use crate::host::memory::{MemoryProjectStore, RecordingNodeGraph, RecordingView, ScriptedFileDialog};
use crate::host::{FieldValue, HostBindings};
use crate::session::CatSession;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Payload served for still images
pub(crate) const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0 a very small tabby \xFF\xD9";

/// Payload served for animations
pub(crate) const GIF_BYTES: &[u8] = b"GIF89a a dancing cat";

/// Handles onto the in-memory host a test session talks to
#[derive(Clone, Default)]
pub(crate) struct TestHost {
    pub(crate) view: RecordingView,
    pub(crate) nodes: RecordingNodeGraph,
    pub(crate) store: MemoryProjectStore,
    pub(crate) dialogs: ScriptedFileDialog,
}

impl TestHost {
    /// Host whose project already carries all five settings
    pub(crate) fn with_settings(folder: &str, gif_support: bool, on_top: bool) -> Self {
        Self {
            store: MemoryProjectStore::with_fields(vec![
                (FIELD_FOLDER_PATH, FieldValue::Text(folder.to_string())),
                (FIELD_COLORSPACE, FieldValue::Text("sRGB".to_string())),
                (FIELD_GIF_SUPPORT, FieldValue::Flag(gif_support)),
                (FIELD_WINDOW_ON_TOP, FieldValue::Flag(on_top)),
                (FIELD_SECURE_TRANSPORT, FieldValue::Flag(false)),
            ]),
            ..Self::default()
        }
    }

    fn bindings(&self) -> HostBindings {
        HostBindings::new(
            self.view.clone(),
            self.nodes.clone(),
            self.store.clone(),
            self.dialogs.clone(),
        )
    }
}

/// Config pointing at a mock server
pub(crate) fn test_config(server: &MockServer) -> Config {
    Config {
        api_base_url: server.uri(),
        max_static_attempts: 5,
        ..Config::default()
    }
}

/// Session against a mock server with an empty project
pub(crate) fn create_test_session(server: &MockServer) -> (CatSession, TestHost) {
    create_test_session_with(TestHost::default(), test_config(server))
}

/// Session with a given host and config
pub(crate) fn create_test_session_with(host: TestHost, config: Config) -> (CatSession, TestHost) {
    let session =
        CatSession::new(config, host.bindings(), tokio::runtime::Handle::current()).unwrap();
    (session, host)
}

/// Serve one metadata envelope from `endpoint` (`/cat` or `/cat/gif`)
pub(crate) async fn mount_envelope(server: &MockServer, endpoint: &str, file: &str, mimetype: &str) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": format!("/cat/{file}"),
            "file": file,
            "mimetype": mimetype,
        })))
        .mount(server)
        .await;
}

/// Serve a binary resource at `/cat/<file>`
pub(crate) async fn mount_resource(server: &MockServer, file: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/cat/{file}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

/// A still cat at `/cat` plus its payload
pub(crate) async fn mount_static_cat(server: &MockServer) {
    mount_envelope(server, "/cat", "abc.jpg", "image/jpeg").await;
    mount_resource(server, "abc.jpg", JPEG_BYTES).await;
}

/// An animated cat at `/cat/gif` plus its payload
pub(crate) async fn mount_animated_cat(server: &MockServer) {
    mount_envelope(server, "/cat/gif", "dance.gif", "image/gif").await;
    mount_resource(server, "dance.gif", GIF_BYTES).await;
}

/// Number of requests the server received for an exact path
pub(crate) async fn requests_to(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .count()
}
