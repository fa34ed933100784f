//! Refresh-cycle behavior: single-flight, queueing, replay, and the
//! fatal-failure path

use futures::future::join_all;
use motordesk_client::ApiClient;
use motordesk_client::error::ApiError;
use motordesk_client::types::MotorQuery;
use motordesk_core::{MemorySessionStore, Session, SessionStore, User};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_session(access: &str, refresh: &str) -> Session {
    Session {
        user: User {
            id: "u-1".to_string(),
            display_name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            role: None,
        },
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

struct Harness {
    client: ApiClient,
    store: Arc<MemorySessionStore>,
    expired: Arc<AtomicBool>,
}

async fn harness(server: &MockServer) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&test_session("T1", "R1")).await.unwrap();
    let expired = Arc::new(AtomicBool::new(false));
    let flag = expired.clone();
    let client = ApiClient::builder()
        .base_url(server.uri())
        .session_store(store.clone())
        .on_session_expired(move || flag.store(true, Ordering::SeqCst))
        .build()
        .unwrap();
    client.restore_session().await.unwrap();
    Harness {
        client,
        store,
        expired,
    }
}

fn mount_refresh(delay_ms: u64) -> Mock {
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "R1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(delay_ms))
                .set_body_json(json!({
                    "access_token": "T2",
                    "refresh_token": "R2"
                })),
        )
        .expect(1)
}

#[tokio::test]
async fn expired_token_is_refreshed_and_replayed_invisibly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "u-2",
                "display_name": "Ravi",
                "email": "ravi@example.com"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_refresh(0).mount(&mock_server).await;

    let h = harness(&mock_server).await;

    // The caller never observes the intermediate 401.
    let users = h.client.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].display_name, "Ravi");

    // The session was replaced wholesale, live and persisted.
    let session = h.client.session().await.unwrap();
    assert_eq!(session.access_token, "T2");
    assert_eq!(session.refresh_token, "R2");
    let persisted = h.store.load().await.unwrap().unwrap();
    assert_eq!(persisted.access_token, "T2");
    assert!(!h.expired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
    let mock_server = MockServer::start().await;
    const CALLERS: usize = 8;

    Mock::given(method("GET"))
        .and(path("/v1/motors"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/motors"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [], "total": 0 })),
        )
        .expect(CALLERS as u64)
        .mount(&mock_server)
        .await;
    // expect(1) on the refresh mock is the single-flight assertion.
    mount_refresh(200).mount(&mock_server).await;

    let h = harness(&mock_server).await;
    let calls = (0..CALLERS).map(|_| {
        let client = h.client.clone();
        async move { client.list_motors(&MotorQuery::default()).await }
    });
    let results = join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(h.client.session().await.unwrap().access_token, "T2");
}

#[tokio::test]
async fn replay_that_fails_again_is_terminal() {
    let mock_server = MockServer::start().await;

    // 401 regardless of which token the request carries.
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "account disabled" })),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_refresh(0).mount(&mock_server).await;

    let h = harness(&mock_server).await;
    let result = h.client.list_users().await;

    // One refresh, one replay, then the 401 surfaces; never a third try.
    assert!(matches!(result, Err(ApiError::AuthRequired(msg)) if msg == "account disabled"));
}

#[tokio::test]
async fn failed_refresh_rejects_every_queued_caller_and_clears_the_session() {
    let mock_server = MockServer::start().await;
    const CALLERS: usize = 4;

    Mock::given(method("GET"))
        .and(path("/v1/motors"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_delay(Duration::from_millis(200))
                .set_body_json(json!({ "message": "refresh token expired" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server).await;
    let calls = (0..CALLERS).map(|_| {
        let client = h.client.clone();
        async move { client.list_motors(&MotorQuery::default()).await }
    });
    let results = join_all(calls).await;

    for result in results {
        assert!(
            matches!(result, Err(ApiError::SessionExpired(msg)) if msg == "refresh token expired")
        );
    }

    // Session cleared everywhere; the host was told to go to login.
    assert!(h.client.session().await.is_none());
    assert!(h.store.load().await.unwrap().is_none());
    assert!(h.expired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn queued_replays_resolve_independently() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/motors"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/motors"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&mock_server)
        .await;
    mount_refresh(200).mount(&mock_server).await;

    let h = harness(&mock_server).await;
    let users_client = h.client.clone();
    let motors_client = h.client.clone();
    let (users, motors) = tokio::join!(
        async move { users_client.list_users().await },
        async move { motors_client.list_motors(&MotorQuery::default()).await },
    );

    // One replay failing must not poison the other.
    assert!(users.is_ok());
    assert!(matches!(
        motors,
        Err(ApiError::Server { status: 500, message }) if message == "boom"
    ));
}
