mod auth_support;

use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liminaldb::auth::device_code::{MIN_POLL_INTERVAL_SECS, SLOW_DOWN_PENALTY_SECS};
use liminaldb::auth::{AuthError, DeviceAuthorization, DeviceFlow, PollClock};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{epoch, FakeClock, InMemoryTokenStore};

const CLIENT_ID: &str = "client_123";

fn device_flow(
    server: &MockServer,
    store: Arc<InMemoryTokenStore>,
    clock: Arc<dyn PollClock>,
) -> DeviceFlow {
    DeviceFlow::new(store)
        .with_device_authorization_url(format!("{}/authorize/device", server.uri()))
        .with_token_url(format!("{}/authenticate", server.uri()))
        .with_clock(clock)
}

fn grant_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({ "error": code }))
}

fn token_success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "user": { "id": "user_1", "email": "a@example.com" }
    }))
}

async fn mount_pending(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(grant_error("authorization_pending"))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

async fn token_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/authenticate")
        .count()
}

#[tokio::test]
async fn device_code_fields_are_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize/device"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("client_id=client_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dev-1",
            "user_code": "ABCD-EFGH",
            "verification_uri": "https://auth.example.com/device",
            "verification_uri_complete": "https://auth.example.com/device?code=ABCD-EFGH",
            "expires_in": 600,
            "interval": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));
    let device = flow.request_device_code(CLIENT_ID).await.expect("device code");

    assert_eq!(
        device,
        DeviceAuthorization {
            device_code: "dev-1".to_string(),
            user_code: "ABCD-EFGH".to_string(),
            verification_uri: "https://auth.example.com/device".to_string(),
            verification_uri_complete: "https://auth.example.com/device?code=ABCD-EFGH"
                .to_string(),
            expires_in: 600,
            interval: 2,
        }
    );
}

#[tokio::test]
async fn device_code_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize/device"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
        .mount(&server)
        .await;

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));
    let err = flow.request_device_code(CLIENT_ID).await.unwrap_err();

    match err {
        AuthError::DeviceAuthorization { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid client");
        }
        other => panic!("expected DeviceAuthorization, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_client_id_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));

    assert!(matches!(
        flow.request_device_code("  ").await,
        Err(AuthError::MissingClientId)
    ));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 0);
}

#[tokio::test]
async fn pending_twice_then_success_polls_three_times() {
    let server = MockServer::start().await;
    mount_pending(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code",
        ))
        .and(body_string_contains("device_code=dev-1"))
        .and(body_string_contains("client_id=client_123"))
        .respond_with(token_success())
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryTokenStore::new());
    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, store.clone(), clock.clone());

    let credential = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .expect("approved");

    assert_eq!(token_calls(&server).await, 3);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 3]);
    assert_eq!(credential.access_token, "access-1");
    assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(
        credential.expires_at,
        Some(epoch() + chrono::Duration::seconds(15 + 3600))
    );
    assert_eq!(store.get(), Some(credential));
}

#[tokio::test]
async fn slow_down_adds_one_extra_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(grant_error("slow_down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(token_success())
        .mount(&server)
        .await;

    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock.clone());

    flow.poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .expect("approved");

    assert_eq!(token_calls(&server).await, 2);
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(SLOW_DOWN_PENALTY_SECS),
            Duration::from_secs(5),
        ]
    );
}

#[tokio::test]
async fn access_denied_fails_after_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "access_denied",
            "error_description": "User denied the request"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryTokenStore::new());
    let flow = device_flow(&server, store.clone(), Arc::new(FakeClock::new()));
    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    assert_eq!(token_calls(&server).await, 1);
    assert_eq!(err.to_string(), "Authentication failed: User denied the request");
    assert!(matches!(err, AuthError::AuthorizationFailed { ref code, .. } if code == "access_denied"));
    assert!(store.get().is_none());
}

#[tokio::test]
async fn expired_token_without_description_reports_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(grant_error("expired_token"))
        .mount(&server)
        .await;

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));
    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Authentication failed: expired_token");
}

#[tokio::test]
async fn unrecognised_error_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));
    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    match err {
        AuthError::InvalidResponse(message) => {
            assert_eq!(message, "Token request failed with status 502: Bad Gateway")
        }
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_expiry_times_out_without_polling() {
    let server = MockServer::start().await;
    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock.clone());

    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 0)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TimedOut));
    assert_eq!(token_calls(&server).await, 0);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn pending_until_deadline_times_out() {
    let server = MockServer::start().await;
    mount_pending(&server, 100).await;

    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock.clone());

    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 12)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TimedOut));
    assert_eq!(err.to_string(), "Device authorization timed out. Please try again.");
    // Deadline 12 is checked before each sleep: polls at t=5, 10 and 15.
    assert_eq!(token_calls(&server).await, 3);
    assert_eq!(clock.total_slept(), Duration::from_secs(15));
}

#[tokio::test]
async fn interval_below_floor_is_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(token_success())
        .mount(&server)
        .await;

    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock.clone());
    flow.poll_for_token(CLIENT_ID, "dev-1", 1, 900)
        .await
        .expect("approved");

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(MIN_POLL_INTERVAL_SECS)]);
}

#[tokio::test]
async fn poll_uses_device_authorization_timing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(token_success())
        .mount(&server)
        .await;

    let clock = Arc::new(FakeClock::new());
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock.clone());
    let device = DeviceAuthorization {
        device_code: "dev-1".to_string(),
        user_code: "ABCD".to_string(),
        verification_uri: "https://auth.example.com/device".to_string(),
        verification_uri_complete: "https://auth.example.com/device?code=ABCD".to_string(),
        expires_in: 600,
        interval: 8,
    };
    flow.poll(CLIENT_ID, &device).await.expect("approved");

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(8)]);
}

#[tokio::test]
async fn cancelled_before_polling_makes_no_requests() {
    let server = MockServer::start().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()))
        .with_cancellation(cancel);
    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Cancelled));
    assert_eq!(token_calls(&server).await, 0);
}

/// Cancels the token during the `n`th sleep and never wakes.
struct CancellingClock {
    cancel: CancellationToken,
    cancel_on: usize,
    sleeps: AtomicUsize,
}

#[async_trait]
impl PollClock for CancellingClock {
    fn now(&self) -> DateTime<Utc> {
        epoch()
    }

    async fn sleep(&self, _duration: Duration) {
        if self.sleeps.fetch_add(1, Ordering::SeqCst) + 1 == self.cancel_on {
            self.cancel.cancel();
            future::pending::<()>().await;
        }
    }
}

#[tokio::test]
async fn cancellation_during_sleep_stops_polling() {
    let server = MockServer::start().await;
    mount_pending(&server, 100).await;

    let cancel = CancellationToken::new();
    let clock = Arc::new(CancellingClock {
        cancel: cancel.clone(),
        cancel_on: 3,
        sleeps: AtomicUsize::new(0),
    });
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), clock)
        .with_cancellation(cancel);

    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Cancelled));
    assert_eq!(token_calls(&server).await, 2);
}

#[tokio::test]
async fn empty_access_token_is_rejected_and_not_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "" })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryTokenStore::new());
    let flow = device_flow(&server, store.clone(), Arc::new(FakeClock::new()));
    let err = flow
        .poll_for_token(CLIENT_ID, "dev-1", 5, 900)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(_)));
    assert!(store.get().is_none());
}

fn stalled_token_endpoint() -> ResponseTemplate {
    grant_error("authorization_pending").set_delay(Duration::from_secs(600))
}

#[tokio::test]
async fn cancellation_interrupts_a_stalled_token_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(stalled_token_endpoint())
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()))
        .with_cancellation(cancel.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        flow.poll_for_token(CLIENT_ID, "dev-1", 5, 900),
    )
    .await
    .expect("poll should stop once cancelled");

    assert!(matches!(result, Err(AuthError::Cancelled)));
    assert_eq!(token_calls(&server).await, 1);
}

#[tokio::test]
async fn stalled_token_request_is_cut_off_at_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(stalled_token_endpoint())
        .mount(&server)
        .await;

    let flow = device_flow(&server, Arc::new(InMemoryTokenStore::new()), Arc::new(FakeClock::new()));

    // First poll happens at t=5, leaving one second before the deadline.
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        flow.poll_for_token(CLIENT_ID, "dev-1", 5, 6),
    )
    .await
    .expect("poll should give up at the deadline");

    assert!(matches!(result, Err(AuthError::TimedOut)));
}
