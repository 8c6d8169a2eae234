use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde_json::json;

use ctag_store::{CreateOutcome, EtcdClient, ReadOutcome, SlotStore, StoreConfig, StoreError};

/// In-process stand-in for the etcd v2 keys API.
#[derive(Clone, Default)]
struct MockEtcd {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    keys: HashMap<String, String>,
    /// Number of upcoming requests answered with a relative redirect to themselves.
    redirects_left: u32,
    /// Every request is redirected to this `host:port` when set.
    leader: Option<String>,
    /// Replaces every reply with this status.
    status: Option<StatusCode>,
    /// Replaces the body of successful reads.
    raw_body: Option<String>,
    requests: u32,
    writes: Vec<(String, String)>,
}

impl MockEtcd {
    fn with(f: impl FnOnce(&mut Inner)) -> Self {
        let mock = Self::default();
        f(&mut mock.inner.lock().unwrap());
        mock
    }

    fn requests(&self) -> u32 {
        self.inner.lock().unwrap().requests
    }

    fn writes(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().writes.clone()
    }

    fn value(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().keys.get(key).cloned()
    }
}

fn intercept(inner: &mut Inner, uri: &Uri) -> Option<Response> {
    inner.requests += 1;
    let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    if let Some(leader) = &inner.leader {
        return Some(Redirect::temporary(&format!("http://{leader}{target}")).into_response());
    }
    if inner.redirects_left > 0 {
        inner.redirects_left -= 1;
        return Some(Redirect::temporary(target).into_response());
    }
    inner.status.map(|status| status.into_response())
}

async fn get_key(
    State(mock): State<MockEtcd>,
    Path(key): Path<String>,
    uri: Uri,
) -> Response {
    let mut inner = mock.inner.lock().unwrap();
    if let Some(reply) = intercept(&mut inner, &uri) {
        return reply;
    }
    if let Some(body) = &inner.raw_body {
        return (StatusCode::OK, body.clone()).into_response();
    }

    let key = format!("/{key}");
    match inner.keys.get(&key) {
        Some(value) => Json(json!({
            "action": "get",
            "node": { "key": key, "value": value, "modifiedIndex": 4, "createdIndex": 4 }
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errorCode": 100, "message": "Key not found", "cause": key })),
        )
            .into_response(),
    }
}

async fn put_key(
    State(mock): State<MockEtcd>,
    Path(key): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    uri: Uri,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut inner = mock.inner.lock().unwrap();
    if let Some(reply) = intercept(&mut inner, &uri) {
        return reply;
    }

    let key = format!("/{key}");
    let value = form.get("value").cloned().unwrap_or_default();
    let must_be_absent = query.get("prevExist").map(String::as_str) == Some("false");

    if must_be_absent && inner.keys.contains_key(&key) {
        return (
            StatusCode::PRECONDITION_FAILED,
            Json(json!({ "errorCode": 105, "message": "Key already exists", "cause": key })),
        )
            .into_response();
    }

    inner.writes.push((key.clone(), value.clone()));
    inner.keys.insert(key.clone(), value.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "action": "create", "node": { "key": key, "value": value } })),
    )
        .into_response()
}

async fn spawn(mock: MockEtcd) -> String {
    let app = Router::new()
        .route("/v2/keys/{*key}", get(get_key).put(put_key))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("127.0.0.1:{}", addr.port())
}

fn client(endpoint: &str, max_redirects: u32) -> EtcdClient {
    EtcdClient::new(&StoreConfig {
        endpoint: endpoint.to_string(),
        max_redirects,
    })
    .unwrap()
}

const KEY: &str = "/cloudtag/machine-Name/1";

#[tokio::test]
async fn read_missing_key_is_not_found() {
    let mock = MockEtcd::default();
    let etcd = client(&spawn(mock).await, 10);

    assert_eq!(etcd.read(KEY).await.unwrap(), ReadOutcome::NotFound);
}

#[tokio::test]
async fn read_existing_key_returns_value() {
    let mock = MockEtcd::with(|m| {
        m.keys.insert(KEY.into(), "host-A".into());
    });
    let etcd = client(&spawn(mock).await, 10);

    assert_eq!(
        etcd.read(KEY).await.unwrap(),
        ReadOutcome::Found("host-A".into())
    );
}

#[tokio::test]
async fn read_with_garbage_body_is_protocol_error() {
    let mock = MockEtcd::with(|m| m.raw_body = Some("<html>proxy</html>".into()));
    let etcd = client(&spawn(mock).await, 10);

    let err = etcd.read(KEY).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidResponse(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn read_with_unknown_status_is_protocol_error() {
    let mock = MockEtcd::with(|m| m.status = Some(StatusCode::INTERNAL_SERVER_ERROR));
    let etcd = client(&spawn(mock).await, 10);

    let err = etcd.read(KEY).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStatus { status: 500, .. }));
}

#[tokio::test]
async fn redirect_without_location_is_rejected() {
    let mock = MockEtcd::with(|m| m.status = Some(StatusCode::TEMPORARY_REDIRECT));
    let etcd = client(&spawn(mock.clone()).await, 10);

    let err = etcd.create_if_absent(KEY, "host-A").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidRedirect(_)));
    assert!(!err.is_transport());
    assert_eq!(mock.requests(), 1);

    let err = etcd.read(KEY).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidRedirect(_)));
}

#[tokio::test]
async fn create_then_conflict() {
    let mock = MockEtcd::default();
    let etcd = client(&spawn(mock.clone()).await, 10);

    assert_eq!(
        etcd.create_if_absent(KEY, "host-A").await.unwrap(),
        CreateOutcome::Created
    );
    assert_eq!(
        etcd.create_if_absent(KEY, "host-B").await.unwrap(),
        CreateOutcome::AlreadyExists
    );

    assert_eq!(mock.value(KEY).as_deref(), Some("host-A"));
    assert_eq!(mock.writes(), vec![(KEY.to_string(), "host-A".to_string())]);
}

#[tokio::test]
async fn create_value_is_form_encoded() {
    let mock = MockEtcd::default();
    let etcd = client(&spawn(mock.clone()).await, 10);

    etcd.create_if_absent(KEY, "a b&c=d").await.unwrap();
    assert_eq!(mock.value(KEY).as_deref(), Some("a b&c=d"));
}

#[tokio::test]
async fn create_with_unknown_status_is_protocol_error() {
    let mock = MockEtcd::with(|m| m.status = Some(StatusCode::FORBIDDEN));
    let etcd = client(&spawn(mock).await, 10);

    let err = etcd.create_if_absent(KEY, "host-A").await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStatus { status: 403, .. }));
}

#[tokio::test]
async fn create_follows_redirect_to_leader() {
    let leader = MockEtcd::default();
    let leader_addr = spawn(leader.clone()).await;

    let follower = MockEtcd::with(|m| m.leader = Some(leader_addr));
    let etcd = client(&spawn(follower.clone()).await, 10);

    assert_eq!(
        etcd.create_if_absent(KEY, "host-A").await.unwrap(),
        CreateOutcome::Created
    );
    assert_eq!(follower.requests(), 1);
    assert_eq!(leader.value(KEY).as_deref(), Some("host-A"));
    assert!(follower.writes().is_empty());
}

#[tokio::test]
async fn redirect_keeps_create_precondition() {
    let leader = MockEtcd::with(|m| {
        m.keys.insert(KEY.into(), "host-A".into());
    });
    let leader_addr = spawn(leader.clone()).await;

    let follower = MockEtcd::with(|m| m.leader = Some(leader_addr));
    let etcd = client(&spawn(follower).await, 10);

    assert_eq!(
        etcd.create_if_absent(KEY, "host-B").await.unwrap(),
        CreateOutcome::AlreadyExists
    );
    assert_eq!(leader.value(KEY).as_deref(), Some("host-A"));
}

#[tokio::test]
async fn follows_exactly_the_redirect_bound() {
    let mock = MockEtcd::with(|m| m.redirects_left = 10);
    let etcd = client(&spawn(mock.clone()).await, 10);

    assert_eq!(
        etcd.create_if_absent(KEY, "host-A").await.unwrap(),
        CreateOutcome::Created
    );
    assert_eq!(mock.requests(), 11);
}

#[tokio::test]
async fn too_many_redirects_is_an_error() {
    let mock = MockEtcd::with(|m| m.redirects_left = 11);
    let etcd = client(&spawn(mock.clone()).await, 10);

    let err = etcd.create_if_absent(KEY, "host-A").await.unwrap_err();
    assert!(matches!(err, StoreError::TooManyRedirects { max: 10, .. }));
    assert_eq!(mock.requests(), 11);
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn endless_redirect_loop_terminates() {
    let mock = MockEtcd::with(|m| m.redirects_left = u32::MAX);
    let etcd = client(&spawn(mock.clone()).await, 3);

    let err = etcd.create_if_absent(KEY, "host-A").await.unwrap_err();
    assert!(matches!(err, StoreError::TooManyRedirects { max: 3, .. }));
    assert_eq!(mock.requests(), 4);
}

#[tokio::test]
async fn read_follows_redirects_too() {
    let mock = MockEtcd::with(|m| {
        m.redirects_left = 2;
        m.keys.insert(KEY.into(), "host-A".into());
    });
    let etcd = client(&spawn(mock.clone()).await, 10);

    assert_eq!(
        etcd.read(KEY).await.unwrap(),
        ReadOutcome::Found("host-A".into())
    );
    assert_eq!(mock.requests(), 3);
}

#[tokio::test]
async fn unreachable_store_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let etcd = client(&addr.to_string(), 10);
    let err = etcd.read(KEY).await.unwrap_err();
    assert!(matches!(err, StoreError::HttpRequest(_)));
    assert!(err.is_transport());
}
