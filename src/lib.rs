//! lcon — log console client
//!
//! Client-side core of a log-management console: extractor previews run
//! against the console's JSON tester, and alert annotations for message
//! histograms. This crate re-exports the layers and holds the command
//! implementations behind the `lcon` binary, so integration tests can drive
//! them directly.
//!
//! # Architecture
//!
//! ```text
//! lcon-core ──► lcon-remote ──► lcon-workflow ──► commands / CLI
//! (types)       (ConsoleApi)    (form, trials,
//!                                annotations)
//! ```

pub mod commands;

pub use lcon_core;
pub use lcon_remote;
pub use lcon_workflow;
