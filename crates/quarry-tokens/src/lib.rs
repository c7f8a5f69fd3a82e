//! Design-token aggregation, emission, deduplication, and curation.
//!
//! # Pipeline position
//!
//! This crate consumes the resolved declaration stream produced by
//! `quarry-css` and turns it into:
//! - a **W3C token set** (design-tokens.github.io shape, `$type`/`$value`
//!   per token with usage-derived `$extensions`)
//! - a **curated token set** - deduplicated, noise-filtered, usage-ranked
//!   tokens with semantic labels and previews
//! - a **relationship report** - shade ladders, modular scales, spacing
//!   grids, and hue palettes detected across the surviving tokens
//!
//! # Determinism
//!
//! Every iteration order here is pinned: buckets sort by usage descending
//! with the canonical value key as tie-break, and dedup passes walk that
//! order. Identical input produces identical output.

pub mod bucket;
pub mod category;
pub mod curate;
pub mod dedup;
pub mod extract;
pub mod relationships;
pub mod w3c;

pub use bucket::{CanonicalValue, RawTokenBucket};
pub use category::TokenCategory;
pub use curate::{curate, CuratedToken, CuratedTokenSet, TokenPreview};
pub use dedup::dedup_category;
pub use extract::{extract, Aggregation, StreamDeclaration};
pub use relationships::{analyze_relationships, RelationshipReport};
pub use w3c::{W3cMetadata, W3cSourceRef, W3cToken, W3cTokenSet};
