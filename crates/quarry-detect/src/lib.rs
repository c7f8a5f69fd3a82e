//! Component detection over computed-style snapshots.
//!
//! # Scope
//!
//! Given the crawler's per-element computed styles, this crate scores
//! every element against a closed table of component archetypes using
//! eight weighted signals (selector text, computed style, ARIA, semantic
//! tag, composition, visual signature, framework markers, behavioral
//! evidence), keeps matches above the confidence floor, deduplicates by
//! `(type, variant)`, boosts clusters that repeat consistently, and flags
//! low-confidence outliers.
//!
//! # Failure semantics
//!
//! The detector never panics on input: a malformed element is dropped and
//! recorded on the diagnostics sink. Per-element scoring is independent,
//! so element order only matters for deterministic tie-breaking.

pub mod archetype;
pub mod capture;
pub mod detect;
pub mod element;
pub mod facts;
pub mod signals;
pub mod variant;

pub use archetype::{patterns, ArchetypePattern, BehaviorProfile, ComponentKind, VisualCue};
pub use capture::{ComponentStates, ComponentTokens};
pub use detect::{detect_components, ComponentInstance, ComponentLibrary, ConfidenceLevel};
pub use element::ComputedStyleEntry;
pub use facts::ElementFacts;
