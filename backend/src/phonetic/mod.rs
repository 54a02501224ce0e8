//! German phonetic fingerprinting.
//!
//! - `rules`: rewrite-rule interpreter
//! - `german`: ordered German normalization rules
//! - `soundex`: Soundex encoding of normalized words
//!
//! ## Flow
//!
//! ```text
//! "Schmidt" → normalize → "schmidt" → encode → "S530"
//! ```

pub mod german;
pub mod rules;
pub mod soundex;

pub use german::{normalize, normalize_trace, GERMAN_RULES};
pub use rules::{apply_rules, trace_rules, Context, RewriteRule, TraceStep};
pub use soundex::{digit_class, encode, german_soundex};
