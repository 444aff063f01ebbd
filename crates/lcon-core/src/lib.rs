//! lcon-core — shared types for the lcon console client.
//!
//! This crate holds everything the remote client and the workflow layer agree
//! on: the extractor configuration and its merge rules, trial previews, the
//! stream/alert records returned by the console API, the stream store and the
//! application configuration.
//!
//! # Architecture
//!
//! ```text
//! ExtractorForm ──► TrialRunner ──► ConsoleApi (HTTP)
//!                                      ▲
//! AlertAnnotator ──► StreamStore ──────┘
//! ```
//!
//! Nothing in here performs I/O except [`config::Config::load`].

pub mod config;
pub mod extractor;
pub mod preview;
pub mod store;
pub mod types;

pub use extractor::{ConfigValue, ExtractorConfiguration, InputValue};
pub use preview::Preview;
pub use store::StreamStore;
pub use types::{Alert, AlertAnnotation, HistogramPoint, Stream, TrialRequest};
