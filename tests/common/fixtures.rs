//! Cat API stubs and payloads

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Known payload served for `/cat/abc.jpg`
pub const ABC_JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF abc cat payload \xFF\xD9";

/// Known payload served for `/cat/loop.gif`
pub const LOOP_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00 looping cat";

/// Stub a metadata endpoint answering with the legacy envelope shape
pub async fn stub_envelope(server: &MockServer, endpoint: &str, file: &str, mimetype: &str) {
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

/// Stub the binary resource behind an envelope
pub async fn stub_payload(server: &MockServer, file: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/cat/{file}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

/// Stub `/cat` with `abc.jpg` and `/cat/gif` with `loop.gif`
pub async fn stub_cat_api(server: &MockServer) {
    stub_envelope(server, "/cat", "abc.jpg", "image/jpeg").await;
    stub_payload(server, "abc.jpg", ABC_JPEG).await;
    stub_envelope(server, "/cat/gif", "loop.gif", "image/gif").await;
    stub_payload(server, "loop.gif", LOOP_GIF).await;
}
