//! Integration tests for lock, hide and send-message using wiremock.
//!
//! These commands are bodyless POSTs with their parameters in the query
//! string. The tests check the form content type, the query encoding, and
//! how action-style response bodies map to results.

use maas360_api::auth::Session;
use maas360_api::device_control::*;
use maas360_api::error::MaasError;
use maas360_api::transport::Transport;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_transport(server: &MockServer) -> (Transport, Session) {
    let transport = Transport::with_endpoint(&server.uri()).unwrap();
    let session = Session::new("123456", "mock-token").unwrap();
    (transport, session)
}

// ── lock_device ────────────────────────────────────────────────────────

#[tokio::test]
async fn lock_device_posts_form_request() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/lockDevice/123456"))
        .and(query_param("deviceId", "ApplF17"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header("Authorization", r#"MaaS token="mock-token""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actionResponse": {
                "maas360DeviceID": "ApplF17",
                "actionStatus": 0,
                "description": "Lock scheduled"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = lock_device(&transport, &session, "ApplF17").await.unwrap();
    assert_eq!(response.description.as_deref(), Some("Lock scheduled"));
}

#[tokio::test]
async fn lock_device_failure_status_is_reported() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/lockDevice/123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "maas360DeviceId": "ApplF17",
            "actionStatus": "2",
            "description": "Device is not enrolled in MDM"
        })))
        .mount(&server)
        .await;

    let err = lock_device(&transport, &session, "ApplF17").await.unwrap_err();
    match err {
        MaasError::RemoteActionFailed {
            status,
            description,
        } => {
            assert_eq!(status, 2);
            assert_eq!(description, "Device is not enrolled in MDM");
        }
        other => panic!("expected RemoteActionFailed, got {other:?}"),
    }
}

// ── hide_device ────────────────────────────────────────────────────────

#[tokio::test]
async fn hide_device_accepts_empty_body() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/hideDevice/123456"))
        .and(query_param("deviceId", "Andr42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = hide_device(&transport, &session, "Andr42").await.unwrap();
    assert!(!response.maas360_device_id.is_present());
}

#[tokio::test]
async fn hide_device_forbidden_is_unexpected_status() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/hideDevice/123456"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Insufficient rights"))
        .mount(&server)
        .await;

    let err = hide_device(&transport, &session, "Andr42").await.unwrap_err();
    assert!(matches!(err, MaasError::UnexpectedStatus { .. }));
    assert!(err.to_string().contains("Insufficient rights"));
}

// ── send_message ───────────────────────────────────────────────────────

#[tokio::test]
async fn send_message_encodes_title_and_body() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/sendMessage/123456"))
        .and(query_param("deviceId", "ApplF17"))
        .and(query_param("messageTitle", "Lost & found"))
        .and(query_param("message", "Please return this device to IT, floor 3."))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actionResponse": {
                "maas360DeviceID": "ApplF17",
                "actionStatus": 0,
                "description": "Message sent"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = send_message(
        &transport,
        &session,
        "ApplF17",
        "Lost & found",
        "Please return this device to IT, floor 3.",
    )
    .await
    .unwrap();
    assert_eq!(response.maas360_device_id.as_deref(), Some("ApplF17"));
}

#[tokio::test]
async fn send_message_without_device_id_in_response_fails() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .and(path("/device-apis/devices/1.0/sendMessage/123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "actionResponse": {"actionStatus": 0, "description": "ok"}
        })))
        .mount(&server)
        .await;

    let err = send_message(&transport, &session, "ApplF17", "Hi", "There")
        .await
        .unwrap_err();
    assert!(
        matches!(err, MaasError::IncompleteActionResponse { missing: "device ID" }),
        "got {err:?}"
    );
    assert!(!err.to_string().contains("status 0"));
}

#[tokio::test]
async fn send_message_rejects_empty_device_id() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = send_message(&transport, &session, "", "Hi", "There")
        .await
        .unwrap_err();
    assert!(matches!(err, MaasError::InvalidArgument { .. }));
}
