//! Filter predicate composition for the interactive filter surface.

use crate::models::MovieRecord;

/// One of four mutually exclusive duration ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationBucket {
    /// Under 90 minutes.
    Under90,
    /// Under 120 minutes.
    #[default]
    Under120,
    /// 120 to 180 minutes inclusive.
    Between120And180,
    /// Over 180 minutes.
    Over180,
}

impl DurationBucket {
    /// All buckets in display order.
    pub fn all() -> [DurationBucket; 4] {
        [
            Self::Under90,
            Self::Under120,
            Self::Between120And180,
            Self::Over180,
        ]
    }

    /// Stable identifier used in query strings.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Under90 => "under-90",
            Self::Under120 => "under-120",
            Self::Between120And180 => "120-180",
            Self::Over180 => "over-180",
        }
    }

    /// Human-readable label, in hours like the source surface.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Under90 => "< 1.5 hrs",
            Self::Under120 => "< 2 hrs",
            Self::Between120And180 => "2-3 hrs",
            Self::Over180 => "> 3 hrs",
        }
    }

    /// Parse a query-string identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "under-90" => Some(Self::Under90),
            "under-120" => Some(Self::Under120),
            "120-180" => Some(Self::Between120And180),
            "over-180" => Some(Self::Over180),
            _ => None,
        }
    }

    /// Whether a duration in minutes falls into this bucket.
    pub fn contains(&self, minutes: u32) -> bool {
        match self {
            Self::Under90 => minutes < 90,
            Self::Under120 => minutes < 120,
            Self::Between120And180 => (120..=180).contains(&minutes),
            Self::Over180 => minutes > 180,
        }
    }
}

/// Independent filter criteria composed into a single record predicate.
///
/// The predicate is the AND of duration-in-bucket, rating floor, vote floor,
/// and genre membership. An empty genre set means no genre restriction; a
/// non-empty set matches records whose genre field contains *any* selected
/// tag as a case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub bucket: DurationBucket,
    pub min_rating: f64,
    pub min_votes: u64,
    pub genres: Vec<String>,
}

impl MovieFilter {
    /// Whether a single record passes every criterion.
    pub fn matches(&self, record: &MovieRecord) -> bool {
        if !self.bucket.contains(record.duration) {
            return false;
        }
        if (record.rating as f64) < self.min_rating {
            return false;
        }
        if record.votes < self.min_votes {
            return false;
        }
        if self.genres.is_empty() {
            return true;
        }
        let haystack = record.genre.to_lowercase();
        self.genres
            .iter()
            .any(|tag| haystack.contains(&tag.to_lowercase()))
    }

    /// The matching subset, preserving input order.
    pub fn apply<'a>(&self, records: &'a [MovieRecord]) -> Vec<&'a MovieRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
