//! lcon-workflow — the stateful pieces of the console client.
//!
//! - [`form::ExtractorForm`] owns an extractor configuration, applies field
//!   edits and reports every change to its [`form::ExtractorHost`].
//! - [`trial::TrialRunner`] runs cancellable extraction trials against the
//!   console's JSON tester.
//! - [`annotator::AlertAnnotator`] turns recent alerts into chart annotations.
//!
//! None of these know about any UI toolkit; hosts drive them through plain
//! method calls and receive results through the host and sink traits.

pub mod annotator;
pub mod form;
pub mod trial;

pub use annotator::{
    AlertAnnotator, AnnotateError, AnnotateOutcome, AnnotationBatch, AnnotatorSink,
    UNRESOLVED_STREAM_TITLE,
};
pub use form::{ExtractorForm, ExtractorHost, PendingTrial, SettledTrial};
pub use trial::{TrialError, TrialHandle, TrialOutcome, TrialRunner};
