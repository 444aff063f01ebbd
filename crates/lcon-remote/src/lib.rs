//! lcon-remote — console REST API adapters for lcon.
//!
//! The workflow layer talks to the console through the [`ConsoleApi`] trait.
//! [`HttpConsoleApi`] is the production implementation; the `test-utils`
//! feature adds an in-memory fake for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod wire;

use async_trait::async_trait;
use lcon_core::{Alert, Stream, TrialRequest};

pub use client::HttpConsoleApi;
pub use error::{ApiError, ApiResult};
pub use wire::JsonTestResult;

/// The remote capabilities the console client depends on.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Run the JSON extractor with the request's settings against its sample
    /// message and return the fields it would extract.
    async fn test_json(&self, request: &TrialRequest) -> ApiResult<JsonTestResult>;

    /// Every stream the caller can see, in server order.
    async fn list_streams(&self) -> ApiResult<Vec<Stream>>;

    /// Alerts of one stream triggered at or after `since` (epoch seconds).
    async fn list_alerts(&self, stream_id: &str, since: i64) -> ApiResult<Vec<Alert>>;

    /// Alerts across all streams triggered at or after `since`.
    async fn list_all_alerts(&self, since: i64) -> ApiResult<Vec<Alert>>;
}
