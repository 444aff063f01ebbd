//! Test builders — hosts, sinks and clients wired the way harnesses need them.
//!
//! These are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use lcon_core::{ExtractorConfiguration, HistogramPoint, Preview};
use lcon_remote::{ConsoleApi, HttpConsoleApi};
use lcon_workflow::{AnnotatorSink, ExtractorHost};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// HTTP client pointed at a fake server, with a short request timeout.
pub fn http_api(base_url: &str) -> Arc<dyn ConsoleApi> {
    Arc::new(HttpConsoleApi::with_base_url(base_url, Duration::from_secs(5)))
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// `buckets` one-minute histogram points starting at `start`.
pub fn histogram(start: i64, buckets: usize) -> Vec<HistogramPoint> {
    (0..buckets)
        .map(|i| HistogramPoint::new(start + 60 * i as i64, (i % 7) as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Recording host
// ---------------------------------------------------------------------------

/// One upward notification from an `ExtractorForm`.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Changed(ExtractorConfiguration),
    Preview(Option<Preview>),
}

/// `ExtractorHost` that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    /// The most recent preview notification, if any.
    pub fn last_preview(&self) -> Option<&Option<Preview>> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Preview(p) => Some(p),
            HostEvent::Changed(_) => None,
        })
    }

    pub fn change_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HostEvent::Changed(_)))
            .count()
    }
}

impl ExtractorHost for RecordingHost {
    fn on_change(&mut self, configuration: &ExtractorConfiguration) {
        self.events.push(HostEvent::Changed(configuration.clone()));
    }

    fn on_preview_load(&mut self, preview: Option<Preview>) {
        self.events.push(HostEvent::Preview(preview));
    }
}

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

/// `AnnotatorSink` that records additions, redraws and completions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub added: Vec<(i64, String)>,
    pub redraws: usize,
    pub completions: Vec<usize>,
}

impl AnnotatorSink for RecordingSink {
    fn add(&mut self, timestamp: i64, text: &str) {
        self.added.push((timestamp, text.to_string()));
    }

    fn update(&mut self) {
        self.redraws += 1;
    }

    fn on_complete(&mut self, count: usize) {
        self.completions.push(count);
    }
}

// ---------------------------------------------------------------------------
// Captured logs
// ---------------------------------------------------------------------------

/// In-memory log sink for asserting on emitted `tracing` events.
///
/// Install with `tracing::subscriber::set_default(logs.subscriber())`; the
/// guard scopes it to the current thread, which is all a `#[tokio::test]`
/// runtime uses.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A plain-text subscriber writing WARN and above into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish()
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }

    /// WARN lines containing `needle`.
    pub fn warnings_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains("WARN") && line.contains(needle))
            .collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
