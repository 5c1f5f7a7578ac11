//! Configuration module for transcripts
//!
//! Settings come from an optional TOML file plus environment overrides, and
//! are resolved once at process entry.

mod settings;

pub use settings::{normalize_date_bound, DateRange, Settings};
