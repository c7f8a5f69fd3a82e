//! Tolerant CSS parsing for design-token extraction.
//!
//! # Scope
//!
//! This crate implements the parsing layer of the Quarry engine:
//! - **Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - span-carrying tokens so declaration values keep their authored text
//! - **Rule parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - style rules, `@media` blocks with `min-width` context, nested
//!     at-rules, error recovery that skips malformed constructs
//! - **Declaration stream** - the flat `(selector, property, value,
//!   media-context, source-index)` sequence token extraction consumes
//! - **Custom properties** ([CSS Variables Level 1](https://www.w3.org/TR/css-variables-1/))
//!   - last-writer-wins `--name` table and bounded `var()` resolution
//!
//! # Tolerance
//!
//! Each source parses independently; a malformed construct is skipped, not
//! fatal. A source counts as failed only when non-blank input produced no
//! rules at all - the orchestrator turns "every source failed" into an
//! error, anything less into diagnostics.

pub mod parser;
pub mod tokenizer;
pub mod vars;

pub use parser::{
    parse_source, Declaration, MediaContext, ParseOutcome, ParsedRule,
};
pub use tokenizer::{Spanned, Token, Tokenizer, Tokens};
pub use vars::VariableTable;
