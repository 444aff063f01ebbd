//! Core record types exchanged with the console API.
//!
//! This module defines the [`TrialRequest`] sent to the extraction tester,
//! the [`Stream`] and [`Alert`] records returned by the streams and alerts
//! endpoints, and the chart-side [`HistogramPoint`] and [`AlertAnnotation`].

use crate::extractor::ExtractorConfiguration;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trial request
// ---------------------------------------------------------------------------

/// Immutable snapshot of an extractor configuration plus the sample message
/// to run it against.
///
/// The only constructor requires a non-empty sample message, so a trial
/// cannot be issued without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialRequest {
    flatten: bool,
    list_separator: String,
    key_separator: String,
    kv_separator: String,
    /// The console API names the sample message `string`.
    #[serde(rename = "string")]
    message: String,
}

impl TrialRequest {
    /// Snapshot `configuration` together with `sample`. Returns `None` when
    /// there is no sample message to try against.
    pub fn new(configuration: &ExtractorConfiguration, sample: Option<&str>) -> Option<Self> {
        let message = sample.filter(|s| !s.is_empty())?;
        Some(Self {
            flatten: configuration.flatten(),
            list_separator: configuration.list_separator().to_string(),
            key_separator: configuration.key_separator().to_string(),
            kv_separator: configuration.kv_separator().to_string(),
            message: message.to_string(),
        })
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    pub fn list_separator(&self) -> &str {
        &self.list_separator
    }

    pub fn key_separator(&self) -> &str {
        &self.key_separator
    }

    pub fn kv_separator(&self) -> &str {
        &self.kv_separator
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Streams and alerts
// ---------------------------------------------------------------------------

/// A named routing category for messages and alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub title: String,
}

/// An alert raised by a stream's alert condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub stream_id: String,
    /// ISO-8601 UTC timestamp, e.g. `2016-03-01T12:00:00.000Z`.
    pub triggered_at: String,
    #[serde(default)]
    pub description: String,
}

impl Alert {
    /// Trigger time as epoch seconds, or `None` if the timestamp is malformed.
    pub fn triggered_at_epoch(&self) -> Option<i64> {
        chrono::DateTime::parse_from_rfc3339(&self.triggered_at)
            .ok()
            .map(|ts| ts.timestamp())
    }
}

// ---------------------------------------------------------------------------
// Chart side
// ---------------------------------------------------------------------------

/// One bucket of a message-count histogram. `x` is epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub x: Option<i64>,
    #[serde(default)]
    pub y: f64,
}

impl HistogramPoint {
    pub fn new(x: i64, y: f64) -> Self {
        Self { x: Some(x), y }
    }
}

/// Text placed on a chart's annotation track at `timestamp` (epoch seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertAnnotation {
    pub timestamp: i64,
    pub text: String,
}

impl AlertAnnotation {
    pub fn new(timestamp: i64, stream_title: &str, description: &str) -> Self {
        Self {
            timestamp,
            text: format!(
                "<i class='fa fa-warning'></i> Stream \"{stream_title}\" triggered an alert: {description}"
            ),
        }
    }
}
