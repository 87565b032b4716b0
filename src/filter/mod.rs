//! Filter model and single-line matching
//!
//! A filter is one rule applied to every line of a log:
//!
//! ```text
//! include     Show only lines matching at least one include filter
//! exclude     Hide matching lines (always wins over include)
//! highlight   Recolor matching visible lines
//! ```
//!
//! Patterns are literal substrings unless the filter is a regex, and are
//! case-insensitive unless the filter is case sensitive. A regex that fails
//! to compile matches nothing instead of raising an error.

pub mod color;
pub mod error;
pub mod matcher;
pub mod model;

pub use color::{Color, ColorPreset};
pub use error::FilterError;
pub use matcher::{CompiledPattern, PatternCache, matches, validate_pattern};
pub use model::{Filter, FilterId, FilterKind, FilterPatch, NewFilter};
