//! Shared infrastructure for the Quarry analysis engine.
//!
//! This crate provides the pieces every other Quarry crate leans on:
//! - **Options** - every engine tunable as an explicit value, no module-level
//!   configuration statics
//! - **Errors** - the closed set of failures that can reach a caller
//! - **Diagnostics** - a structured, deduplicating event sink for per-item
//!   skips that must not abort an analysis
//! - **Cancellation** - a cooperative flag checked between pipeline stages

pub mod cancel;
pub mod diagnostics;
pub mod error;
pub mod options;

pub use cancel::CancelFlag;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::AnalyzeError;
pub use options::{CurationCaps, Options};
