//! Shared utility functions.

mod format;

pub use format::{format_count, format_minutes, format_percent};
