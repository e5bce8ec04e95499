#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use subscriptions_review::config::Config;
use subscriptions_review::error::TransportError;
use subscriptions_review::semp::{
    MonitorApi, MsgVpnClient, MsgVpnClientSubscription, MsgVpnQueue, MsgVpnQueueSubscription, Page,
};
use tempfile::TempDir;

pub const VPN: &str = "vpn1";
pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";
/// base64("admin:secret")
const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

// ========================================
// BROKER FIXTURE
// ========================================

/// Broker contents shared by the in-memory fake and the HTTP mock.
#[derive(Clone, Default)]
pub struct Broker {
    pub vpn: String,
    pub clients: Vec<(MsgVpnClient, Vec<String>)>,
    pub queues: Vec<(MsgVpnQueue, Vec<String>)>,
    /// Insert an empty page (still carrying a cursor) after every non-final page.
    pub empty_gaps: bool,
    /// Resource key that answers with a SEMP error, e.g. `clients/clientB/subscriptions`.
    pub failing: Option<String>,
}

impl Broker {
    pub fn new(vpn: &str) -> Self {
        Self { vpn: vpn.to_string(), ..Self::default() }
    }

    pub fn client(mut self, name: &str, username: &str, topics: &[&str]) -> Self {
        let client = MsgVpnClient {
            client_name: name.to_string(),
            client_username: username.to_string(),
        };
        self.clients.push((client, topics.iter().map(|t| t.to_string()).collect()));
        self
    }

    pub fn queue(mut self, name: &str, owner: Option<&str>, permission: Option<&str>, topics: &[&str]) -> Self {
        let queue = MsgVpnQueue {
            queue_name: name.to_string(),
            owner: owner.map(str::to_string),
            permission: permission.map(str::to_string),
        };
        self.queues.push((queue, topics.iter().map(|t| t.to_string()).collect()));
        self
    }

    pub fn with_empty_gaps(mut self) -> Self {
        self.empty_gaps = true;
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing = Some(key.to_string());
        self
    }

    fn check(&self, vpn: &str, key: &str) -> Result<(), (u16, String)> {
        if vpn != self.vpn {
            return Err((400, semp_error_body(11, "NOT_FOUND", &format!("Could not find match for msgVpnName {}", vpn))));
        }
        if self.failing.as_deref() == Some(key) {
            return Err((400, semp_error_body(89, "NOT_ALLOWED", &format!("Access to {} is not allowed", key))));
        }
        Ok(())
    }

    fn client_topics(&self, name: &str) -> Option<Vec<MsgVpnClientSubscription>> {
        self.clients.iter().find(|(c, _)| c.client_name == name).map(|(_, topics)| {
            topics
                .iter()
                .map(|t| MsgVpnClientSubscription { subscription_topic: t.clone() })
                .collect()
        })
    }

    fn queue_topics(&self, name: &str) -> Option<Vec<MsgVpnQueueSubscription>> {
        self.queues.iter().find(|(q, _)| q.queue_name == name).map(|(_, topics)| {
            topics
                .iter()
                .map(|t| MsgVpnQueueSubscription { subscription_topic: t.clone() })
                .collect()
        })
    }

    fn client_list(&self) -> Vec<MsgVpnClient> {
        self.clients.iter().map(|(c, _)| c.clone()).collect()
    }

    fn queue_list(&self) -> Vec<MsgVpnQueue> {
        self.queues.iter().map(|(q, _)| q.clone()).collect()
    }
}

/// The two-client / one-queue broker used throughout the examples.
pub fn sample_broker() -> Broker {
    Broker::new(VPN)
        .client("clientA", "userA", &["topic/a", "topic/b"])
        .client("clientB", "userB", &[])
        .queue("q1", Some("ownerX"), Some("consume"), &["t/1"])
}

pub fn semp_error_body(code: i64, status: &str, description: &str) -> String {
    json!({
        "meta": {
            "error": { "code": code, "description": description, "status": status },
            "request": { "method": "GET", "uri": "" },
            "responseCode": 400
        }
    })
    .to_string()
}

/// Slices `items` the way the broker pages them. Cursors are `o:<offset>` for a
/// data page and `g:<offset>` for an empty gap page.
pub fn page_of<T: Clone>(items: &[T], count: u32, cursor: Option<&str>, empty_gaps: bool) -> Page<T> {
    let count = count.max(1) as usize;
    let (gap, offset) = match cursor {
        None => (false, 0),
        Some(c) => {
            let (kind, offset) = c.split_once(':').expect("cursor issued by page_of");
            (kind == "g", offset.parse::<usize>().expect("numeric cursor offset"))
        }
    };

    if gap {
        return Page::new(Vec::new(), Some(format!("o:{}", offset)));
    }

    let end = (offset + count).min(items.len());
    let slice = items.get(offset..end).unwrap_or_default().to_vec();
    let next = if end < items.len() {
        let kind = if empty_gaps { "g" } else { "o" };
        Some(format!("{}:{}", kind, end))
    } else {
        None
    };
    Page::new(slice, next)
}

// ========================================
// IN-MEMORY MONITOR API
// ========================================

pub struct FakeMonitor {
    pub broker: Broker,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMonitor {
    pub fn new(broker: Broker) -> Self {
        Self { broker, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, key: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(&format!("{} ", key))).count()
    }

    fn record(&self, key: &str, cursor: &Option<String>) {
        let cursor = cursor.clone().unwrap_or_else(|| "-".to_string());
        self.calls.lock().unwrap().push(format!("{} {}", key, cursor));
    }

    fn answer<T: Clone>(&self, vpn: &str, key: &str, items: Option<Vec<T>>, count: u32, cursor: Option<String>) -> Result<Page<T>, TransportError> {
        self.record(key, &cursor);
        self.broker.check(vpn, key).map_err(|(status, body)| TransportError::Status {
            status,
            url: key.to_string(),
            body,
        })?;
        let items = items.ok_or_else(|| TransportError::Status {
            status: 400,
            url: key.to_string(),
            body: semp_error_body(6, "NOT_FOUND", "Could not find match"),
        })?;
        Ok(page_of(&items, count, cursor.as_deref(), self.broker.empty_gaps))
    }
}

impl MonitorApi for FakeMonitor {
    async fn list_clients(&self, vpn: &str, count: u32, cursor: Option<String>) -> Result<Page<MsgVpnClient>, TransportError> {
        self.answer(vpn, "clients", Some(self.broker.client_list()), count, cursor)
    }

    async fn list_client_subscriptions(
        &self,
        vpn: &str,
        client_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnClientSubscription>, TransportError> {
        let key = format!("clients/{}/subscriptions", client_name);
        self.answer(vpn, &key, self.broker.client_topics(client_name), count, cursor)
    }

    async fn list_queues(&self, vpn: &str, count: u32, cursor: Option<String>) -> Result<Page<MsgVpnQueue>, TransportError> {
        self.answer(vpn, "queues", Some(self.broker.queue_list()), count, cursor)
    }

    async fn list_queue_subscriptions(
        &self,
        vpn: &str,
        queue_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnQueueSubscription>, TransportError> {
        let key = format!("queues/{}/subscriptions", queue_name);
        self.answer(vpn, &key, self.broker.queue_topics(queue_name), count, cursor)
    }
}

// ========================================
// MOCK SEMP SERVER (axum)
// ========================================

struct ServerState {
    broker: Broker,
    requests: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    count: u32,
    cursor: Option<String>,
}

/// Serves the broker under `/SEMP/v2/monitor` on an ephemeral port.
/// Returns the management root URL and the log of served request URIs.
pub async fn spawn_semp_server(broker: Broker) -> (String, Arc<Mutex<Vec<String>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(ServerState { broker, requests: requests.clone() });

    let app = Router::new()
        .route("/SEMP/v2/monitor/msgVpns/{vpn}/clients", get(serve_clients))
        .route("/SEMP/v2/monitor/msgVpns/{vpn}/clients/{client}/subscriptions", get(serve_client_subscriptions))
        .route("/SEMP/v2/monitor/msgVpns/{vpn}/queues", get(serve_queues))
        .route("/SEMP/v2/monitor/msgVpns/{vpn}/queues/{queue}/subscriptions", get(serve_queue_subscriptions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), requests)
}

fn gate(state: &ServerState, headers: &HeaderMap, vpn: &str, key: &str) -> Result<(), Response> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == BASIC_AUTH)
        .unwrap_or(false);
    if !authorized {
        let body = semp_error_body(-1, "UNAUTHORIZED", "Basic authentication failed");
        return Err((StatusCode::UNAUTHORIZED, body).into_response());
    }
    state.broker.check(vpn, key).map_err(|(status, body)| {
        (StatusCode::from_u16(status).unwrap(), body).into_response()
    })
}

fn respond<T: Serialize>(page: Page<T>) -> Response {
    let mut meta = json!({ "request": { "method": "GET" }, "responseCode": 200 });
    if let Some(cursor) = page.next_cursor {
        meta["paging"] = json!({ "cursorQuery": cursor, "nextPageUri": "" });
    }
    Json(json!({ "data": page.items, "links": [], "meta": meta })).into_response()
}

fn log(state: &ServerState, key: &str, q: &PageQuery) {
    let cursor = q.cursor.clone().unwrap_or_else(|| "-".to_string());
    state.requests.lock().unwrap().push(format!("{} count={} {}", key, q.count, cursor));
}

async fn serve_clients(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    UrlPath(vpn): UrlPath<String>,
    Query(q): Query<PageQuery>,
) -> Response {
    log(&state, "clients", &q);
    if let Err(rejection) = gate(&state, &headers, &vpn, "clients") {
        return rejection;
    }
    respond(page_of(&state.broker.client_list(), q.count, q.cursor.as_deref(), state.broker.empty_gaps))
}

async fn serve_client_subscriptions(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    UrlPath((vpn, client)): UrlPath<(String, String)>,
    Query(q): Query<PageQuery>,
) -> Response {
    let key = format!("clients/{}/subscriptions", client);
    log(&state, &key, &q);
    if let Err(rejection) = gate(&state, &headers, &vpn, &key) {
        return rejection;
    }
    match state.broker.client_topics(&client) {
        Some(items) => respond(page_of(&items, q.count, q.cursor.as_deref(), state.broker.empty_gaps)),
        None => (StatusCode::BAD_REQUEST, semp_error_body(6, "NOT_FOUND", "Could not find match")).into_response(),
    }
}

async fn serve_queues(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    UrlPath(vpn): UrlPath<String>,
    Query(q): Query<PageQuery>,
) -> Response {
    log(&state, "queues", &q);
    if let Err(rejection) = gate(&state, &headers, &vpn, "queues") {
        return rejection;
    }
    respond(page_of(&state.broker.queue_list(), q.count, q.cursor.as_deref(), state.broker.empty_gaps))
}

async fn serve_queue_subscriptions(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    UrlPath((vpn, queue)): UrlPath<(String, String)>,
    Query(q): Query<PageQuery>,
) -> Response {
    let key = format!("queues/{}/subscriptions", queue);
    log(&state, &key, &q);
    if let Err(rejection) = gate(&state, &headers, &vpn, &key) {
        return rejection;
    }
    match state.broker.queue_topics(&queue) {
        Some(items) => respond(page_of(&items, q.count, q.cursor.as_deref(), state.broker.empty_gaps)),
        None => (StatusCode::BAD_REQUEST, semp_error_body(6, "NOT_FOUND", "Could not find match")).into_response(),
    }
}

// ========================================
// SETUP
// ========================================

/// Small pages so every listing needs several round trips.
pub fn test_config(output_dir: &Path, page_limit: u32) -> Config {
    let mut config = Config::default();
    config.semp.page_limit = page_limit;
    config.review.output_dir = output_dir.to_path_buf();
    config
}

pub fn setup_output_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}
