//! Shared test utilities for lcon integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fake_console_api;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fake_console_api::FakeConsoleServer;
pub use fixtures::*;
