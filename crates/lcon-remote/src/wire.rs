//! Response envelopes of the console API.

use lcon_core::{Alert, Preview, Stream};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `POST /tools/json_tester` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonTestResult {
    #[serde(default)]
    pub matches: BTreeMap<String, serde_json::Value>,
}

impl JsonTestResult {
    /// Preview of the matches, or `None` when nothing was extracted.
    pub fn into_preview(self) -> Option<Preview> {
        Preview::from_matches(self.matches)
    }
}

/// `GET /streams` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamList {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub streams: Vec<Stream>,
}

/// `GET /streams/alerts` and `GET /streams/{id}/alerts` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertList {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}
