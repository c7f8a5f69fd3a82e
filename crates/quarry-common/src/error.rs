//! The closed set of errors an analysis can surface.
//!
//! Per-source parse failures and per-element scoring failures never reach
//! the caller; they are recorded on the [`Diagnostics`](crate::Diagnostics)
//! sink instead. Only the four kinds below propagate.

use thiserror::Error;

/// Failure modes of a full analysis run.
///
/// A zero-token analysis is a valid success, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The scan bundle was malformed before any parsing began:
    /// empty domain, empty URL, or no CSS sources at all.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Which field failed validation.
        reason: String,
    },

    /// Every supplied CSS source failed to parse. Individual failures are
    /// tolerated and diagnosed; total failure is not.
    #[error("none of the {source_count} CSS sources could be parsed")]
    NoParseableCss {
        /// How many sources were attempted.
        source_count: usize,
    },

    /// Cooperative cancellation was observed between pipeline stages.
    /// Partial results are discarded.
    #[error("analysis cancelled during stage '{stage}'")]
    Cancelled {
        /// The stage that observed the flag.
        stage: &'static str,
    },

    /// An internal contract was violated. This indicates a bug in the
    /// engine, never in the input.
    #[error("internal invariant violated in {location}: {detail}")]
    InternalInvariant {
        /// Module or function where the violation was detected.
        location: &'static str,
        /// Structured breadcrumb describing the violated contract.
        detail: String,
    },
}
