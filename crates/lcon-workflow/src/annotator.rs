//! Alert annotator — projects recent alerts onto a chart's annotation track.
//!
//! Stream titles come from a shared [`StreamStore`] that is loaded once
//! ([`AlertAnnotator::initialize`]). Annotating before the store is loaded
//! still works; unresolved streams are labelled [`UNRESOLVED_STREAM_TITLE`].

use lcon_core::{AlertAnnotation, HistogramPoint, StreamStore};
use lcon_remote::{ApiError, ConsoleApi};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

pub const UNRESOLVED_STREAM_TITLE: &str = "Undefined";

/// The chart-side annotation track.
pub trait AnnotatorSink {
    /// Place `text` at `timestamp` (epoch seconds).
    fn add(&mut self, timestamp: i64, text: &str);
    /// Redraw after an addition.
    fn update(&mut self);
    /// Called once after a batch of alerts has been added.
    fn on_complete(&mut self, _count: usize) {}
}

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("could not list alerts: {0}")]
    Alerts(#[from] ApiError),
}

/// Annotations produced for one histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationBatch {
    pub annotations: Vec<AlertAnnotation>,
    /// Alerts dropped because their trigger time could not be parsed.
    pub skipped: usize,
    /// The stream store was not loaded while alerts were present.
    pub streams_unloaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotateOutcome {
    /// No usable histogram; nothing was queried.
    Skipped,
    Annotated(AnnotationBatch),
}

pub struct AlertAnnotator {
    api: Arc<dyn ConsoleApi>,
    streams: Arc<StreamStore>,
}

impl AlertAnnotator {
    pub fn new(api: Arc<dyn ConsoleApi>, streams: Arc<StreamStore>) -> Self {
        Self { api, streams }
    }

    pub fn streams(&self) -> &StreamStore {
        &self.streams
    }

    /// Fetch the stream list into the store. Returns the number of streams
    /// the store holds afterwards.
    pub async fn load_streams(&self) -> Result<usize, ApiError> {
        load_into(self.api.as_ref(), &self.streams).await
    }

    /// Fire-and-forget [`load_streams`](Self::load_streams). A failed load is
    /// logged and leaves the store unloaded; it is not retried.
    pub fn initialize(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let streams = Arc::clone(&self.streams);
        tokio::spawn(async move {
            if let Err(e) = load_into(api.as_ref(), &streams).await {
                tracing::warn!(error = %e, "could not load stream list for alert annotations");
            }
        })
    }

    /// Annotate `sink` with the alerts triggered since the first histogram
    /// point, scoped to `stream_id` when given.
    ///
    /// Does nothing when the histogram is empty or its first point has no
    /// timestamp. When listing alerts fails, the sink is left untouched.
    pub async fn annotate<S>(
        &self,
        points: &[HistogramPoint],
        stream_id: Option<&str>,
        sink: &mut S,
    ) -> Result<AnnotateOutcome, AnnotateError>
    where
        S: AnnotatorSink + ?Sized,
    {
        let Some(since) = points.first().and_then(|p| p.x) else {
            return Ok(AnnotateOutcome::Skipped);
        };

        let alerts = match stream_id {
            Some(id) => self.api.list_alerts(id, since).await?,
            None => self.api.list_all_alerts(since).await?,
        };

        let mut batch = AnnotationBatch::default();
        if !alerts.is_empty() && !self.streams.is_loaded() {
            tracing::warn!(
                alerts = alerts.len(),
                "could not resolve stream names on alert annotations: stream list was not loaded"
            );
            batch.streams_unloaded = true;
        }

        for alert in &alerts {
            let Some(timestamp) = alert.triggered_at_epoch() else {
                tracing::warn!(
                    triggered_at = %alert.triggered_at,
                    stream_id = %alert.stream_id,
                    "skipping alert with unparseable trigger time"
                );
                batch.skipped += 1;
                continue;
            };

            let title = self
                .streams
                .title_of(&alert.stream_id)
                .unwrap_or(UNRESOLVED_STREAM_TITLE);
            let annotation = AlertAnnotation::new(timestamp, title, &alert.description);

            sink.add(annotation.timestamp, &annotation.text);
            sink.update();
            batch.annotations.push(annotation);
        }

        tracing::debug!(
            since,
            annotations = batch.annotations.len(),
            skipped = batch.skipped,
            "alert annotations added"
        );
        sink.on_complete(batch.annotations.len());
        Ok(AnnotateOutcome::Annotated(batch))
    }
}

async fn load_into(api: &dyn ConsoleApi, store: &StreamStore) -> Result<usize, ApiError> {
    let streams = api.list_streams().await?;
    let count = streams.len();
    if store.populate(streams) {
        tracing::debug!(count, "stream list loaded");
    } else {
        tracing::debug!("stream list already loaded, keeping the first one");
    }
    Ok(store.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
