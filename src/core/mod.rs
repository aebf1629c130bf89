// Core pipeline exports
pub mod decoder;
pub mod formatter;

pub use decoder::{decode, DecodeError, UPSTREAM_ERROR_MAX_LEN};
pub use formatter::{format_results, format_score, DEFAULT_MAX_ITEMS};
