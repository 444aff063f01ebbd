//! Trial runner — one cancellable extraction trial at a time.
//!
//! [`TrialRunner::start`] spawns the request on the tokio runtime and hands
//! back a [`TrialHandle`]. Each trial owns its own in-flight flag, cleared by
//! a drop guard inside the task, so the runner reports "not trying" however
//! the trial ends: success, API failure, timeout, cancellation or a panic.

use lcon_core::{Preview, TrialRequest};
use lcon_remote::{ApiError, ConsoleApi};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TrialError {
    #[error("an extraction trial is already running")]
    Busy,
    #[error("extraction trial failed: {0}")]
    Api(#[from] ApiError),
    #[error("extraction trial timed out after {0:?}")]
    TimedOut(Duration),
    #[error("extraction trial task aborted: {0}")]
    Aborted(String),
}

/// How a trial ended.
#[derive(Debug)]
pub enum TrialOutcome {
    /// The tester answered. `None` means it extracted nothing.
    Completed(Option<Preview>),
    Failed(TrialError),
    /// Cancelled or superseded before it could be applied.
    Cancelled,
}

impl TrialOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TrialOutcome::Cancelled)
    }

    pub fn preview(&self) -> Option<&Preview> {
        match self {
            TrialOutcome::Completed(preview) => preview.as_ref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TrialHandle
// ---------------------------------------------------------------------------

/// Handle to a running trial.
#[derive(Debug)]
pub struct TrialHandle {
    token: CancellationToken,
    join: JoinHandle<TrialOutcome>,
}

impl TrialHandle {
    /// Abandon the trial. Its outcome becomes [`TrialOutcome::Cancelled`]
    /// unless it had already finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the trial to end.
    pub async fn outcome(self) -> TrialOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => TrialOutcome::Cancelled,
            Err(e) => TrialOutcome::Failed(TrialError::Aborted(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TrialRunner
// ---------------------------------------------------------------------------

struct InFlight {
    token: CancellationToken,
    running: Arc<AtomicBool>,
}

/// Clears a trial's in-flight flag when the trial task ends, however it ends.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TrialRunner {
    api: Arc<dyn ConsoleApi>,
    timeout: Duration,
    current: Option<InFlight>,
}

impl TrialRunner {
    pub fn new(api: Arc<dyn ConsoleApi>, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            current: None,
        }
    }

    /// Whether the current trial is still in flight.
    pub fn is_trying(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.running.load(Ordering::Acquire))
    }

    /// Whether a "try" trigger should be enabled for `sample`.
    pub fn is_enabled(&self, sample: Option<&str>) -> bool {
        !self.is_trying() && sample.is_some_and(|s| !s.is_empty())
    }

    /// Start a trial. Fails with [`TrialError::Busy`] while another one is in
    /// flight; call [`cancel`](Self::cancel) first to supersede it.
    pub fn start(&mut self, request: TrialRequest) -> Result<TrialHandle, TrialError> {
        if self.is_trying() {
            return Err(TrialError::Busy);
        }

        let token = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));
        self.current = Some(InFlight {
            token: token.clone(),
            running: running.clone(),
        });

        let guard = RunningGuard(running);
        let api = Arc::clone(&self.api);
        let timeout = self.timeout;
        let cancelled = token.clone();

        tracing::debug!(
            flatten = request.flatten(),
            message_len = request.message().len(),
            "starting extraction trial"
        );

        let join = tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => TrialOutcome::Cancelled,
                result = tokio::time::timeout(timeout, api.test_json(&request)) => match result {
                    Ok(Ok(result)) => TrialOutcome::Completed(result.into_preview()),
                    Ok(Err(e)) => TrialOutcome::Failed(TrialError::Api(e)),
                    Err(_) => TrialOutcome::Failed(TrialError::TimedOut(timeout)),
                },
            }
        });

        Ok(TrialHandle { token, join })
    }

    /// Cancel the in-flight trial, if any. The runner is immediately free to
    /// start another one.
    pub fn cancel(&mut self) {
        if let Some(current) = self.current.take() {
            if current.running.load(Ordering::Acquire) {
                tracing::debug!("superseding in-flight extraction trial");
            }
            current.token.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
