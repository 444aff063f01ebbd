//! Commands behind the `lcon` binary.

use anyhow::Context;
use lcon_core::{
    AlertAnnotation, ExtractorConfiguration, HistogramPoint, InputValue, Preview, StreamStore,
};
use lcon_remote::ConsoleApi;
use lcon_workflow::{
    AlertAnnotator, AnnotateOutcome, AnnotatorSink, ExtractorForm, ExtractorHost, TrialOutcome,
    TrialRunner,
};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// try
// ---------------------------------------------------------------------------

/// Form host that keeps only the latest configuration and preview.
#[derive(Debug, Default)]
pub struct LatestState {
    pub configuration: Option<ExtractorConfiguration>,
    pub preview: Option<Preview>,
}

impl ExtractorHost for LatestState {
    fn on_change(&mut self, configuration: &ExtractorConfiguration) {
        self.configuration = Some(configuration.clone());
    }

    fn on_preview_load(&mut self, preview: Option<Preview>) {
        self.preview = preview;
    }
}

/// Run one extraction trial of `message` against the console.
///
/// `supplied` is the stored extractor configuration (if any); `edits` are
/// applied on top of it the way a user would edit the form.
pub async fn try_extraction(
    api: Arc<dyn ConsoleApi>,
    trial_timeout: Duration,
    supplied: Option<&ExtractorConfiguration>,
    edits: Vec<(String, InputValue)>,
    message: &str,
) -> anyhow::Result<Option<Preview>> {
    let runner = TrialRunner::new(api, trial_timeout);
    let mut form = ExtractorForm::initialize(LatestState::default(), runner, supplied);
    for (key, input) in edits {
        form.edit_field(&key, input);
    }

    let request = form
        .trial_request(Some(message))
        .context("cannot try an extractor without a sample message")?;

    match form.try_extraction(request).await? {
        TrialOutcome::Completed(_) => Ok(form.into_host().preview),
        TrialOutcome::Failed(e) => Err(e).context("extraction trial failed"),
        TrialOutcome::Cancelled => anyhow::bail!("extraction trial was cancelled"),
    }
}

// ---------------------------------------------------------------------------
// alerts
// ---------------------------------------------------------------------------

/// Annotation track that only records what it was given.
#[derive(Debug, Default)]
pub struct TrackSink {
    pub entries: Vec<(i64, String)>,
    pub redraws: usize,
}

impl AnnotatorSink for TrackSink {
    fn add(&mut self, timestamp: i64, text: &str) {
        self.entries.push((timestamp, text.to_string()));
    }

    fn update(&mut self) {
        self.redraws += 1;
    }
}

/// Alert annotations since `since` (epoch seconds), optionally for one stream.
///
/// Waits for the stream list before annotating so titles resolve; a failed
/// stream load only degrades titles to the placeholder.
pub async fn alert_annotations(
    api: Arc<dyn ConsoleApi>,
    since: i64,
    stream_id: Option<&str>,
) -> anyhow::Result<Vec<AlertAnnotation>> {
    let annotator = AlertAnnotator::new(api, Arc::new(StreamStore::new()));
    annotator
        .initialize()
        .await
        .context("stream list task panicked")?;

    let mut sink = TrackSink::default();
    let outcome = annotator
        .annotate(&[HistogramPoint::new(since, 0.0)], stream_id, &mut sink)
        .await?;

    Ok(match outcome {
        AnnotateOutcome::Skipped => Vec::new(),
        AnnotateOutcome::Annotated(batch) => batch.annotations,
    })
}
