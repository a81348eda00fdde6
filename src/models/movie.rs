//! Movie models for listing acquisition and storage.
//!
//! `RawScrapeItem` is the ephemeral text bundle the extraction adapter pulls
//! out of one listing item; `MovieRecord` is the normalized, persisted form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw per-item text as scraped from a listing page, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScrapeItem {
    /// Movie title text.
    pub name: String,
    /// Vote-count text; may contain thousand-separators, parentheses, or a
    /// `K` suffix.
    pub vote_text: String,
    /// Duration text in `XhYm`, `Xh`, or `Ym` form.
    pub duration_text: String,
    /// Rating text (decimal), absent for unrated titles.
    pub rating_text: Option<String>,
}

/// A normalized movie record.
///
/// Numeric fields are never negative; 0 means unknown/unparseable. That
/// lossy degradation happens at normalization time. Downstream consumers
/// treat 0 as "missing" where it matters (duration extremes, correlation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Movie title.
    pub name: String,
    /// Comma-separated genre tags, order-preserving, not validated.
    pub genre: String,
    /// Rating on the 0-10 scale; 0 = unknown.
    pub rating: u8,
    /// Vote count; 0 = unknown/invalid.
    pub votes: u64,
    /// Duration in whole minutes; 0 = unknown/unparseable.
    pub duration: u32,
    /// When the record was acquired.
    pub scraped_at: DateTime<Utc>,
}

impl MovieRecord {
    /// Create a record stamped with the current time.
    pub fn new(name: String, genre: String, rating: u8, votes: u64, duration: u32) -> Self {
        Self {
            name,
            genre,
            rating,
            votes,
            duration,
            scraped_at: Utc::now(),
        }
    }

    /// Whether the duration field holds a usable value.
    pub fn has_duration(&self) -> bool {
        self.duration > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = MovieRecord::new("Dune".to_string(), "Sci-Fi".to_string(), 8, 500_000, 155);
        assert_eq!(record.name, "Dune");
        assert_eq!(record.rating, 8);
        assert!(record.has_duration());
    }

    #[test]
    fn test_missing_duration() {
        let record = MovieRecord::new("Short".to_string(), "Drama".to_string(), 7, 10, 0);
        assert!(!record.has_duration());
    }
}
