//! The Quarry analysis orchestrator.
//!
//! # Pipeline
//!
//! `analyze` is a pure function from a [`ScanBundle`] plus
//! [`quarry_common::Options`] to an [`AnalysisArtifact`]:
//!
//! 1. validate the bundle
//! 2. parse every CSS source (in parallel, joined by source index)
//! 3. build the custom-property table, last writer wins
//! 4. extract and aggregate tokens from the resolved declaration stream
//! 5. deduplicate, curate, and analyze relationships
//! 6. inspect layout, stacking, and motion patterns
//! 7. detect components when computed styles are present
//! 8. build the prompt pack and summary
//!
//! Given identical input the serialized output is byte-identical: every
//! map is ordered, every sort carries an explicit tie-break, and nothing
//! reads the clock or randomness. Cancellation is cooperative and checked
//! between stages.

pub mod analyze;
pub mod artifact;
pub mod bundle;
pub mod layout;
pub mod motion;
pub mod prompt_pack;
pub mod stacking;

pub use analyze::{analyze, analyze_with_cancel};
pub use artifact::{AnalysisArtifact, AnalysisSummary};
pub use bundle::{CssSource, ScanBundle, SourceKind};
pub use layout::{ContainerStrategy, GridSystem, LayoutDna};
pub use motion::MotionReport;
pub use prompt_pack::PromptPack;
pub use stacking::StackingReport;
