//! In-memory [`ConsoleApi`] for tests.
//!
//! Serves canned matches, streams and alerts, records every call, and can be
//! told to fail with an HTTP status or to answer slowly.

use crate::error::{ApiError, ApiResult};
use crate::wire::JsonTestResult;
use crate::ConsoleApi;
use async_trait::async_trait;
use lcon_core::{Alert, Stream, TrialRequest};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// A call received by [`FakeConsoleApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    TestJson(TrialRequest),
    ListStreams,
    ListAlerts { stream_id: String, since: i64 },
    ListAllAlerts { since: i64 },
}

#[derive(Default)]
struct FakeState {
    matches: BTreeMap<String, serde_json::Value>,
    streams: Vec<Stream>,
    alerts: Vec<Alert>,
    fail_with: Option<u16>,
    delay: Option<Duration>,
    calls: Vec<ApiCall>,
}

#[derive(Default)]
pub struct FakeConsoleApi {
    state: Mutex<FakeState>,
}

impl FakeConsoleApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.lock().matches.insert(name.to_string(), value.into());
        self
    }

    pub fn with_stream(self, id: &str, title: &str) -> Self {
        self.lock().streams.push(Stream {
            id: id.to_string(),
            title: title.to_string(),
        });
        self
    }

    pub fn with_alert(self, stream_id: &str, triggered_at: &str, description: &str) -> Self {
        self.lock().alerts.push(Alert {
            stream_id: stream_id.to_string(),
            triggered_at: triggered_at.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Answer every call with `status`.
    pub fn failing(self, status: u16) -> Self {
        self.lock().fail_with = Some(status);
        self
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `call`, wait out the configured delay, then fail if configured.
    async fn answer(&self, call: ApiCall, path: &str) -> ApiResult<()> {
        let (delay, fail_with) = {
            let mut state = self.lock();
            state.calls.push(call);
            (state.delay, state.fail_with)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match fail_with {
            Some(status) => Err(ApiError::Status { url: format!("fake:{path}"), status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConsoleApi for FakeConsoleApi {
    async fn test_json(&self, request: &TrialRequest) -> ApiResult<JsonTestResult> {
        self.answer(ApiCall::TestJson(request.clone()), "/tools/json_tester").await?;
        Ok(JsonTestResult {
            matches: self.lock().matches.clone(),
        })
    }

    async fn list_streams(&self) -> ApiResult<Vec<Stream>> {
        self.answer(ApiCall::ListStreams, "/streams").await?;
        Ok(self.lock().streams.clone())
    }

    async fn list_alerts(&self, stream_id: &str, since: i64) -> ApiResult<Vec<Alert>> {
        let call = ApiCall::ListAlerts {
            stream_id: stream_id.to_string(),
            since,
        };
        self.answer(call, "/streams/{id}/alerts").await?;
        Ok(self
            .lock()
            .alerts
            .iter()
            .filter(|a| a.stream_id == stream_id)
            .cloned()
            .collect())
    }

    async fn list_all_alerts(&self, since: i64) -> ApiResult<Vec<Alert>> {
        self.answer(ApiCall::ListAllAlerts { since }, "/streams/alerts").await?;
        Ok(self.lock().alerts.clone())
    }
}
