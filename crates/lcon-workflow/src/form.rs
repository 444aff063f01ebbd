//! Extractor form — configuration state plus preview trials.
//!
//! The form is the parent of the preview workflow. Every edit clears the
//! host's preview *before* the host hears about the new configuration, so a
//! stale preview is never shown next to a changed configuration.
//!
//! Edits also cancel any in-flight trial, and trial outcomes are tagged with
//! the configuration revision they were started from: an outcome that
//! arrives after the configuration moved on is dropped instead of
//! overwriting the cleared preview.

use crate::trial::{TrialError, TrialHandle, TrialOutcome, TrialRunner};
use lcon_core::{ExtractorConfiguration, InputValue, Preview, TrialRequest};

/// Receives the form's upward notifications. Both are called synchronously
/// from within the form's methods.
pub trait ExtractorHost {
    fn on_change(&mut self, configuration: &ExtractorConfiguration);
    fn on_preview_load(&mut self, preview: Option<Preview>);
}

// ---------------------------------------------------------------------------
// Pending / settled trials
// ---------------------------------------------------------------------------

/// A trial started by the form, tagged with the revision it was started at.
#[derive(Debug)]
pub struct PendingTrial {
    revision: u64,
    handle: TrialHandle,
}

impl PendingTrial {
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Wait for the trial to end. Pass the result to [`ExtractorForm::apply`].
    pub async fn settle(self) -> SettledTrial {
        SettledTrial {
            revision: self.revision,
            outcome: self.handle.outcome().await,
        }
    }
}

#[derive(Debug)]
pub struct SettledTrial {
    revision: u64,
    outcome: TrialOutcome,
}

// ---------------------------------------------------------------------------
// ExtractorForm
// ---------------------------------------------------------------------------

pub struct ExtractorForm<H> {
    host: H,
    defaults: ExtractorConfiguration,
    configuration: ExtractorConfiguration,
    runner: TrialRunner,
    /// Bumped on every configuration change.
    revision: u64,
}

impl<H: ExtractorHost> ExtractorForm<H> {
    /// Create a JSON extractor form from the host's configuration and notify
    /// the host of the effective configuration once.
    pub fn initialize(
        host: H,
        runner: TrialRunner,
        supplied: Option<&ExtractorConfiguration>,
    ) -> Self {
        Self::with_defaults(ExtractorConfiguration::json_defaults(), host, runner, supplied)
    }

    pub fn with_defaults(
        defaults: ExtractorConfiguration,
        host: H,
        runner: TrialRunner,
        supplied: Option<&ExtractorConfiguration>,
    ) -> Self {
        let configuration = ExtractorConfiguration::merge(&defaults, supplied);
        let mut form = Self {
            host,
            defaults,
            configuration,
            runner,
            revision: 0,
        };
        form.host.on_change(&form.configuration);
        form
    }

    pub fn configuration(&self) -> &ExtractorConfiguration {
        &self.configuration
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn is_trying(&self) -> bool {
        self.runner.is_trying()
    }

    /// Whether the "try" trigger should be enabled for `sample`.
    pub fn is_try_enabled(&self, sample: Option<&str>) -> bool {
        self.runner.is_enabled(sample)
    }

    /// The host supplied a new configuration (e.g. a different extractor was
    /// selected). Replaces the local configuration wholesale, discarding
    /// local edits, and supersedes any in-flight trial.
    pub fn on_external_configuration_change(&mut self, supplied: Option<&ExtractorConfiguration>) {
        self.runner.cancel();
        self.revision += 1;
        self.configuration = ExtractorConfiguration::merge(&self.defaults, supplied);
    }

    /// Apply one field edit: clear the preview, store the coerced value, then
    /// report the full configuration to the host.
    pub fn edit_field(&mut self, key: &str, input: InputValue) {
        self.runner.cancel();
        self.revision += 1;

        self.host.on_preview_load(None);
        self.configuration.set(key, input.coerce());
        tracing::debug!(key, revision = self.revision, "extractor field edited");
        self.host.on_change(&self.configuration);
    }

    /// Snapshot the current configuration with `sample`; `None` when there is
    /// no sample to try against.
    pub fn trial_request(&self, sample: Option<&str>) -> Option<TrialRequest> {
        TrialRequest::new(&self.configuration, sample)
    }

    pub fn start_trial(&mut self, request: TrialRequest) -> Result<PendingTrial, TrialError> {
        let handle = self.runner.start(request)?;
        Ok(PendingTrial {
            revision: self.revision,
            handle,
        })
    }

    /// Deliver a settled trial to the host.
    ///
    /// A completed trial replaces the preview (with `None` for "no matches").
    /// A failed trial is logged and leaves the preview alone. Trials started
    /// before the latest configuration change come back as
    /// [`TrialOutcome::Cancelled`] and reach no callback.
    pub fn apply(&mut self, settled: SettledTrial) -> TrialOutcome {
        if settled.revision != self.revision {
            tracing::debug!(
                started_at = settled.revision,
                current = self.revision,
                "dropping stale extraction trial"
            );
            return TrialOutcome::Cancelled;
        }

        match &settled.outcome {
            TrialOutcome::Completed(preview) => self.host.on_preview_load(preview.clone()),
            TrialOutcome::Failed(e) => tracing::warn!(error = %e, "extraction trial failed"),
            TrialOutcome::Cancelled => tracing::debug!("extraction trial cancelled"),
        }
        settled.outcome
    }

    /// Start a trial, wait for it and apply the result.
    pub async fn try_extraction(
        &mut self,
        request: TrialRequest,
    ) -> Result<TrialOutcome, TrialError> {
        let settled = self.start_trial(request)?.settle().await;
        Ok(self.apply(settled))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
