//! CSS value parsing, canonicalization, and semantic naming.
//!
//! # Scope
//!
//! This crate implements the value layer of the Quarry engine:
//! - **Colors** ([CSS Color Level 4](https://www.w3.org/TR/css-color-4/))
//!   - hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`, the 147 named colors
//!   - sRGB / HSL / OKLCH representations
//! - **Dimensions** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - `px`, `rem`, `em`, `%`, viewport and font-relative units
//! - **Shadows** ([CSS Backgrounds Level 3](https://www.w3.org/TR/css-backgrounds-3/#box-shadow))
//! - **Borders** (lenient positional shorthand parsing)
//! - **Durations** ([CSS Values Level 4 § 6.2](https://www.w3.org/TR/css-values-4/#time))
//! - **Semantic names** - deterministic, scale-relative names for numeric
//!   ranges (`red-base-1`, `spacing-4`, `radius-lg`, `duration-fast`)
//!
//! # Failure semantics
//!
//! Every parser here is a total function returning `Option`: malformed
//! input yields `None`, never a panic. Callers route `None` to the
//! diagnostics sink.

pub mod border;
pub mod color;
pub mod dimension;
pub mod duration;
pub mod named;
pub mod semantic;
pub mod shadow;

pub use border::{parse_border, Border, BorderStyle};
pub use color::{parse_color, Hsl, Oklch, ParsedColor, Rgba};
pub use dimension::{literal_decimal_places, parse_dimension, Dimension, Unit};
pub use duration::parse_duration_ms;
pub use shadow::{parse_shadow, Shadow};
