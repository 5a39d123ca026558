use super::*;
use crate::config::MIN_SIZE_HINT;
use crate::types::MediaKind;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_open_shows_placeholder_then_static_cat() {
    let server = MockServer::start().await;
    mount_static_cat(&server).await;
    let (mut session, host) = create_test_session(&server);

    session.open();
    assert!(session.request_state().fetch_in_flight);
    assert_eq!(host.view.label(Button::NewImage), "Loading...");

    session.wait_idle().await;

    let calls = host.view.calls();
    assert_eq!(calls.first(), Some(&ViewCall::AlwaysOnTop(true)));
    assert!(calls.contains(&ViewCall::LoadingPlaceholder));
    assert!(calls.contains(&ViewCall::Image(JPEG_BYTES.len())));
    assert_eq!(calls.last(), Some(&ViewCall::FitToContent));

    let cat = session.current_cat().unwrap();
    assert_eq!(cat.kind, MediaKind::Image);
    assert_eq!(cat.suggested_file_name, "abc.jpg");
    assert_eq!(cat.raw_bytes, JPEG_BYTES);
    assert!(session.has_cat_stored());
    assert!(!session.request_state().fetch_in_flight);
    assert_eq!(host.view.label(Button::NewImage), "New image");
    assert_eq!(host.view.label(Button::NewAnimated), "New GIF");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_trigger_while_fetching_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "url": "/cat/abc.jpg", "file": "abc.jpg", "mimetype": "image/jpeg"
                }))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    mount_resource(&server, "abc.jpg", JPEG_BYTES).await;
    let (mut session, host) = create_test_session(&server);

    assert!(session.request_new_image());
    let calls_after_first = host.view.calls().len();
    let state_after_first = session.request_state();

    assert!(!session.request_new_image());
    assert!(!session.request_new_gif());
    assert_eq!(host.view.calls().len(), calls_after_first, "no state change");
    assert_eq!(session.request_state(), state_after_first);

    session.wait_idle().await;
    assert_eq!(requests_to(&server, "/cat").await, 1);
    assert_eq!(requests_to(&server, "/cat/gif").await, 0);
    assert_eq!(requests_to(&server, "/cat/abc.jpg").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_fetch_clears_flag_and_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (mut session, host) = create_test_session(&server);

    session.request_new_image();
    session.wait_idle().await;

    assert!(!session.request_state().fetch_in_flight);
    assert!(!session.has_cat_stored());
    assert_eq!(session.last_error(), Some(messages::CONNECTIVITY));
    assert_eq!(host.view.error_text(), messages::CONNECTIVITY);
    assert!(host.view.calls().contains(&ViewCall::ErrorPlaceholder));
    assert_eq!(host.view.label(Button::NewImage), "New image");
    assert_eq!(host.view.calls().last(), Some(&ViewCall::FitToContent));

    // The next attempt clears the old message.
    server.reset().await;
    mount_static_cat(&server).await;
    session.request_new_image();
    assert_eq!(session.last_error(), None);
    assert_eq!(host.view.error_text(), "");
    session.wait_idle().await;
    assert!(session.has_cat_stored());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_animated_results_are_skipped_until_a_static_one() {
    let server = MockServer::start().await;
    let skipped = 3;
    Mock::given(method("GET"))
        .and(path("/cat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "/cat/dance.gif", "file": "dance.gif", "mimetype": "image/gif"
        })))
        .up_to_n_times(skipped)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_envelope(&server, "/cat", "abc.jpg", "image/jpeg").await;
    mount_resource(&server, "abc.jpg", JPEG_BYTES).await;
    mount_resource(&server, "dance.gif", GIF_BYTES).await;
    let (mut session, host) = create_test_session(&server);

    session.request_new_image();
    session.wait_idle().await;

    assert_eq!(requests_to(&server, "/cat").await, skipped as usize + 1);
    assert_eq!(requests_to(&server, "/cat/abc.jpg").await, 1);
    assert_eq!(requests_to(&server, "/cat/dance.gif").await, 0);
    assert_eq!(session.current_cat().unwrap().kind, MediaKind::Image);
    assert!(!host.view.animation_playing());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_static_retry_ceiling_shows_distinct_message() {
    let server = MockServer::start().await;
    mount_envelope(&server, "/cat", "dance.gif", "image/gif").await;
    let config = Config {
        max_static_attempts: 3,
        ..test_config(&server)
    };
    let (mut session, host) = create_test_session_with(TestHost::default(), config);

    session.request_new_image();
    session.wait_idle().await;

    assert_eq!(requests_to(&server, "/cat").await, 3);
    assert_eq!(requests_to(&server, "/cat/dance.gif").await, 0);
    let message = session.last_error().unwrap();
    assert!(message.contains("isn't a GIF after 3 attempts"), "{message}");
    assert_eq!(host.view.error_text(), message);
    assert!(!session.request_state().fetch_in_flight);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_gif_support_accepts_animated_result_from_image_endpoint() {
    let server = MockServer::start().await;
    mount_envelope(&server, "/cat", "dance.gif", "image/gif").await;
    mount_resource(&server, "dance.gif", GIF_BYTES).await;
    let (mut session, host) =
        create_test_session_with(TestHost::with_settings("", true, true), test_config(&server));

    session.request_new_image();
    session.wait_idle().await;

    assert_eq!(requests_to(&server, "/cat").await, 1);
    assert_eq!(session.current_cat().unwrap().kind, MediaKind::AnimatedImage);
    assert!(host.view.animation_playing());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_playing_animation_is_stopped_before_next_item() {
    let server = MockServer::start().await;
    mount_animated_cat(&server).await;
    mount_static_cat(&server).await;
    let (mut session, host) = create_test_session(&server);

    session.request_new_gif();
    session.wait_idle().await;
    assert_eq!(host.view.label(Button::NewAnimated), "New GIF");
    session.request_new_gif();
    session.wait_idle().await;
    session.request_new_image();
    session.wait_idle().await;

    let media: Vec<ViewCall> = host
        .view
        .calls()
        .into_iter()
        .filter(|call| {
            matches!(
                call,
                ViewCall::AnimationStarted(_) | ViewCall::AnimationStopped | ViewCall::Image(_)
            )
        })
        .collect();
    assert_eq!(
        media,
        vec![
            ViewCall::AnimationStarted(GIF_BYTES.len()),
            ViewCall::AnimationStopped,
            ViewCall::AnimationStarted(GIF_BYTES.len()),
            ViewCall::AnimationStopped,
            ViewCall::Image(JPEG_BYTES.len()),
        ]
    );
    assert_eq!(host.view.overlapping_animations(), 0);
    assert!(!host.view.animation_playing());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_size_hint_is_clamped_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat"))
        .and(query_param("width", MIN_SIZE_HINT.to_string()))
        .and(query_param("json", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "/cat/abc.jpg", "file": "abc.jpg", "mimetype": "image/jpeg"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_resource(&server, "abc.jpg", JPEG_BYTES).await;
    let (mut session, _host) = create_test_session(&server);

    session.request_new_cat(12, false);
    session.wait_idle().await;
    assert!(session.has_cat_stored());

    session.set_size_hint(4000);
    assert_eq!(session.size_hint(), 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pump_delivers_completion_without_blocking() {
    let server = MockServer::start().await;
    mount_static_cat(&server).await;
    let (mut session, _host) = create_test_session(&server);

    assert_eq!(session.pump(), 0);
    session.request_new_image();

    let mut handled = 0;
    for _ in 0..200 {
        handled += session.pump();
        if handled > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(handled, 1);
    assert!(!session.request_state().fetch_in_flight);
    assert!(session.has_cat_stored());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_events_are_broadcast() {
    let server = MockServer::start().await;
    mount_static_cat(&server).await;
    let (mut session, _host) = create_test_session(&server);
    let mut events = session.subscribe();

    session.request_new_cat(500, false);
    session.wait_idle().await;

    match events.try_recv().unwrap() {
        Event::FetchStarted { size_hint, animated } => {
            assert_eq!(size_hint, 500);
            assert!(!animated);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match events.try_recv().unwrap() {
        Event::CatLoaded {
            kind,
            file_name,
            bytes,
        } => {
            assert_eq!(kind, MediaKind::Image);
            assert_eq!(file_name, "abc.jpg");
            assert_eq!(bytes, JPEG_BYTES.len());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
