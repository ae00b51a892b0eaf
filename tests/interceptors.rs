//! Interceptor behaviour observed through real HTTP exchanges.

use std::sync::Arc;
use std::time::Duration;

use api_dispatcher::{
    CredentialStore, Credentials, DispatchError, FileCredentialStore, MemoryCredentialStore,
    RequestOptions,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::CountingStore;

#[tokio::test]
async fn test_bearer_token_attached_on_every_endpoint() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&second)
        .await;

    let store = Arc::new(CountingStore::with_token("tok-abc"));
    let dispatcher = common::dispatcher(&[first.uri(), second.uri()], store, Duration::from_secs(5));

    let resp = dispatcher.get("/user", RequestOptions::new()).await.unwrap();
    assert_eq!(resp.data().unwrap(), json!({"id": 1}));
}

#[tokio::test]
async fn test_stored_token_wins_over_caller_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::with_token("stored"));
    let dispatcher = common::dispatcher(&[server.uri()], store, Duration::from_secs(5));

    let options = RequestOptions::new().header("authorization", "Bearer caller");
    dispatcher.get("/user", options).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: Vec<&str> = requests[0]
        .headers
        .get_all("authorization")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(sent, vec!["Bearer stored"]);
}

#[tokio::test]
async fn test_post_without_token_proceeds_and_401_keeps_store_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::default());
    let dispatcher = common::dispatcher(&[server.uri()], store.clone(), Duration::from_secs(5));

    let err = dispatcher
        .post("/companies", json!({"name": "Acme"}), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.get().unwrap(), None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_credentials_once_without_failover() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&second)
        .await;

    let store = Arc::new(CountingStore::with_token("expired"));
    let dispatcher =
        common::dispatcher(&[first.uri(), second.uri()], store.clone(), Duration::from_secs(5));

    let err = dispatcher
        .get("/api/admin/users", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.clears(), 1);
    assert_eq!(store.get().unwrap(), None);
}

#[tokio::test]
async fn test_forbidden_keeps_credentials_and_exposes_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/companies/9"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Super admin role required"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::with_token("tok"));
    let dispatcher = common::dispatcher(&[server.uri()], store.clone(), Duration::from_secs(5));

    let err = dispatcher
        .delete("/companies/9", RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.server_message(), Some("Super admin role required"));
    assert_eq!(store.clears(), 0);
    assert_eq!(store.token().unwrap().as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_not_found_is_returned_unchanged() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such faq"))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&second)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let dispatcher = common::dispatcher(&[first.uri(), second.uri()], store, Duration::from_secs(5));

    let err = dispatcher.get("/faqs/42", RequestOptions::new()).await.unwrap_err();
    match err {
        DispatchError::Http { status, body, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such faq");
            assert_eq!(message, None);
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_setup_error_sends_nothing() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    let store = Arc::new(MemoryCredentialStore::new());
    let dispatcher = common::dispatcher(&[first.uri(), second.uri()], store, Duration::from_secs(5));

    let options = RequestOptions::new().header("x-note", "line one\nline two");
    let err = dispatcher.get("/user", options).await.unwrap_err();

    assert!(matches!(err, DispatchError::Setup(_)));
    assert_eq!(err.user_message(), "An error occurred while preparing the request.");
}

#[tokio::test]
async fn test_file_store_login_and_401_reset() {
    let dir = tempfile::tempdir().unwrap();
    let file_store = Arc::new(FileCredentialStore::new(dir.path().join("credentials.json")));
    file_store
        .set(Credentials::new("file-token").with_user(json!({"email": "admin@example.com"})))
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/locations/countries/KR"))
        .and(header("authorization", "Bearer file-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher =
        common::dispatcher(&[server.uri()], file_store.clone(), Duration::from_secs(5));

    let err = dispatcher
        .put("/locations/countries/KR", json!({"name": "Korea"}), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!file_store.path().exists());
    assert_eq!(file_store.get().unwrap(), None);
}
