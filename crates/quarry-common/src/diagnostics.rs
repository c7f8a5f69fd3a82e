//! Structured diagnostics for per-item skips.
//!
//! Malformed sources, unresolvable variables, unparseable values, and
//! dropped elements must not abort an analysis. Each such event lands here
//! as a [`Diagnostic`] and is surfaced verbatim in the final artifact.
//!
//! The sink deduplicates repeated messages so a stylesheet with ten
//! thousand copies of the same vendor hack reports it once.

use std::collections::HashSet;

use serde::Serialize;
use strum_macros::Display;

/// What kind of event a diagnostic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A CSS source failed to parse and was skipped entirely.
    SourceParseFailed,
    /// Custom-property resolution hit the recursion bound; the
    /// partially-resolved string was retained.
    VariableRecursionBounded,
    /// A color or dimension literal could not be parsed.
    ValueParseFailed,
    /// A computed-style element was dropped by the component detector.
    ElementDropped,
}

/// A single structured diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The event category.
    pub kind: DiagnosticKind,
    /// Index into the bundle's CSS sources, when the event is source-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
    /// The element selector, when the event is element-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// An owned, deduplicating sink of [`Diagnostic`] events.
///
/// Plain value, no global state: the orchestrator creates one per run and
/// threads it through the stages. Duplicate (kind, message) pairs within a
/// run are recorded once.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
    seen: HashSet<(DiagnosticKind, String)>,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Repeats of the same (kind, message) pair are
    /// silently dropped.
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        source_index: Option<usize>,
        selector: Option<String>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        if self.seen.insert((kind, message.clone())) {
            self.events.push(Diagnostic {
                kind,
                source_index,
                selector,
                message,
            });
        }
    }

    /// Record a source-scoped parse failure.
    pub fn source_failed(&mut self, source_index: usize, message: impl Into<String>) {
        self.push(
            DiagnosticKind::SourceParseFailed,
            Some(source_index),
            None,
            message,
        );
    }

    /// Record a bounded-out variable resolution.
    pub fn variable_bounded(&mut self, name: &str) {
        self.push(
            DiagnosticKind::VariableRecursionBounded,
            None,
            None,
            format!("substitution depth exceeded while resolving '{name}'"),
        );
    }

    /// Record a value that failed to parse.
    pub fn value_failed(&mut self, message: impl Into<String>) {
        self.push(DiagnosticKind::ValueParseFailed, None, None, message);
    }

    /// Record a dropped element.
    pub fn element_dropped(&mut self, selector: &str, message: impl Into<String>) {
        self.push(
            DiagnosticKind::ElementDropped,
            None,
            Some(selector.to_string()),
            message,
        );
    }

    /// All recorded events, in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the sink is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the sink, yielding the events for the artifact.
    #[must_use]
    pub fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }

    /// Absorb another sink's events (used when joining parallel stages),
    /// preserving this sink's dedup set.
    pub fn merge(&mut self, other: Self) {
        for event in other.events {
            if self.seen.insert((event.kind, event.message.clone())) {
                self.events.push(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_repeated_messages() {
        let mut sink = Diagnostics::new();
        sink.value_failed("bad color 'bogus'");
        sink.value_failed("bad color 'bogus'");
        sink.value_failed("bad color 'other'");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn merge_preserves_dedup() {
        let mut a = Diagnostics::new();
        a.value_failed("same");
        let mut b = Diagnostics::new();
        b.value_failed("same");
        b.source_failed(3, "unreadable");
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.events()[1].source_index, Some(3));
    }

    #[test]
    fn different_kinds_are_distinct() {
        let mut sink = Diagnostics::new();
        sink.push(DiagnosticKind::ValueParseFailed, None, None, "x");
        sink.push(DiagnosticKind::ElementDropped, None, None, "x");
        assert_eq!(sink.len(), 2);
    }
}
