//! Fake console REST API server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves, under `/api`:
//! - `POST /tools/json_tester` — configured matches; records each request body
//! - `GET /streams` — configured streams
//! - `GET /streams/alerts?since=` — all configured alerts
//! - `GET /streams/{id}/alerts?since=` — configured alerts of one stream
//!
//! Point an `HttpConsoleApi` at [`FakeConsoleServer::base_url`].
//!
//! # Example
//!
//! ```rust,ignore
//! use common::fake_console_api::FakeConsoleServer;
//!
//! let server = FakeConsoleServer::start().await.unwrap();
//! server.add_stream("s1", "Stream One").await;
//! server.add_alert("s1", "2016-03-01T12:00:00.000Z", "too many errors").await;
//! let url = server.base_url();
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
#[derive(Default)]
struct ApiState {
    matches: serde_json::Map<String, serde_json::Value>,
    streams: Vec<serde_json::Value>,
    alerts: Vec<serde_json::Value>,
    /// Bodies received by the JSON tester, in arrival order.
    tester_requests: Vec<serde_json::Value>,
    /// `since` values received by the alert endpoints.
    alert_queries: Vec<i64>,
    /// When set, every endpoint answers with this status.
    fail_with: Option<StatusCode>,
    tester_delay: Option<Duration>,
}

type Shared = Arc<Mutex<ApiState>>;

/// Handle to the running fake console API server.
pub struct FakeConsoleServer {
    addr: SocketAddr,
    state: Shared,
}

impl FakeConsoleServer {
    /// Start the fake server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/api/tools/json_tester", post(json_tester))
            .route("/api/streams", get(list_streams))
            .route("/api/streams/alerts", get(list_all_alerts))
            .route("/api/streams/{stream_id}/alerts", get(list_stream_alerts))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT/api`).
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub async fn set_match(&self, name: &str, value: impl Into<serde_json::Value>) {
        self.state.lock().await.matches.insert(name.to_string(), value.into());
    }

    pub async fn add_stream(&self, id: &str, title: &str) {
        self.state.lock().await.streams.push(serde_json::json!({
            "id": id,
            "title": title,
            "description": null,
            "disabled": false,
            "rules": [],
        }));
    }

    pub async fn add_alert(&self, stream_id: &str, triggered_at: &str, description: &str) {
        self.state.lock().await.alerts.push(serde_json::json!({
            "id": format!("alert-{}", triggered_at),
            "stream_id": stream_id,
            "triggered_at": triggered_at,
            "description": description,
            "condition_id": "cond-1",
        }));
    }

    /// Make every endpoint answer with `status`.
    pub async fn fail_with(&self, status: u16) {
        self.state.lock().await.fail_with = StatusCode::from_u16(status).ok();
    }

    /// Delay the JSON tester's answers.
    pub async fn slow_tester(&self, delay: Duration) {
        self.state.lock().await.tester_delay = Some(delay);
    }

    pub async fn tester_requests(&self) -> Vec<serde_json::Value> {
        self.state.lock().await.tester_requests.clone()
    }

    pub async fn alert_queries(&self) -> Vec<i64> {
        self.state.lock().await.alert_queries.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Since {
    since: i64,
}

async fn json_tester(
    State(state): State<Shared>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let (delay, fail_with, matches) = {
        let mut state = state.lock().await;
        state.tester_requests.push(body);
        (state.tester_delay, state.fail_with, state.matches.clone())
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    match fail_with {
        Some(status) => (status, Json(serde_json::json!({ "message": "tester failed" }))),
        None => (StatusCode::OK, Json(serde_json::json!({ "matches": matches }))),
    }
}

async fn list_streams(State(state): State<Shared>) -> impl IntoResponse {
    let state = state.lock().await;
    if let Some(status) = state.fail_with {
        return (status, Json(serde_json::Value::Null));
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "total": state.streams.len(), "streams": state.streams })),
    )
}

async fn list_all_alerts(
    State(state): State<Shared>,
    Query(q): Query<Since>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.alert_queries.push(q.since);
    if let Some(status) = state.fail_with {
        return (status, Json(serde_json::Value::Null));
    }
    let alerts = state.alerts.clone();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "total": alerts.len(), "alerts": alerts })),
    )
}

async fn list_stream_alerts(
    Path(stream_id): Path<String>,
    State(state): State<Shared>,
    Query(q): Query<Since>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.alert_queries.push(q.since);
    if let Some(status) = state.fail_with {
        return (status, Json(serde_json::Value::Null));
    }
    let alerts: Vec<serde_json::Value> = state
        .alerts
        .iter()
        .filter(|a| a["stream_id"] == stream_id.as_str())
        .cloned()
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "total": alerts.len(), "alerts": alerts })),
    )
}
