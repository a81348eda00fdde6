//! Field normalizers for raw scraped text.
//!
//! Listings encode numbers inconsistently: vote counts arrive as `"1,234"`,
//! `"(1,234)"`, or `"1.5K"`; durations as `"2h 5m"`, `"2h"`, or `"95m"`;
//! ratings as decimal text or nothing at all. These functions convert that
//! text into numeric fields, degrading to a zero default on malformed input
//! instead of failing the record.
//!
//! The normalizers are pure and never log; callers decide whether a
//! [`Normalized::Degraded`] result is worth a log line.

/// Outcome of normalizing one raw field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized<T> {
    /// The text was interpreted successfully.
    Parsed(T),
    /// The text could not be interpreted; callers fall back to the default.
    Degraded,
}

impl<T: Default> Normalized<T> {
    /// Collapse to the parsed value, or the type default when degraded.
    pub fn value_or_default(self) -> T {
        match self {
            Normalized::Parsed(value) => value,
            Normalized::Degraded => T::default(),
        }
    }

    /// Whether this result fell back to the default.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Normalized::Degraded)
    }
}

/// Normalize a vote-count string to an integer count.
///
/// Parentheses, commas, and surrounding whitespace are stripped. A `K`
/// suffix scales the remaining decimal by 1000 (`"1.5K"` → 1500). The
/// decimal is truncated, not rounded. Empty, non-numeric, or negative
/// residue degrades.
pub fn normalize_votes(text: &str) -> Normalized<u64> {
    let cleaned = text.replace(['(', ')'], "").replace(',', "");
    let cleaned = cleaned.trim();

    let (numeric, scale) = if cleaned.contains('K') {
        (cleaned.replace('K', ""), 1000.0)
    } else {
        (cleaned.to_string(), 1.0)
    };

    match numeric.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => {
            Normalized::Parsed((value * scale) as u64)
        }
        _ => Normalized::Degraded,
    }
}

/// Normalize a duration string to whole minutes.
///
/// Recognized formats are `<H>h<M>m`, `<H>h`, and `<M>m` (lowercase markers
/// as scraped). Numeric substrings are trimmed before parsing. Anything
/// else, including text with neither marker, degrades.
pub fn normalize_duration(text: &str) -> Normalized<u32> {
    let has_hours = text.contains('h');
    let has_minutes = text.contains('m');

    if has_hours && has_minutes {
        let Some((hours_text, rest)) = text.split_once('h') else {
            return Normalized::Degraded;
        };
        let Some((minutes_text, _)) = rest.split_once('m') else {
            return Normalized::Degraded;
        };
        match (
            hours_text.trim().parse::<u32>(),
            minutes_text.trim().parse::<u32>(),
        ) {
            (Ok(hours), Ok(minutes)) => Normalized::Parsed(hours * 60 + minutes),
            _ => Normalized::Degraded,
        }
    } else if has_minutes {
        let Some((minutes_text, _)) = text.split_once('m') else {
            return Normalized::Degraded;
        };
        match minutes_text.trim().parse::<u32>() {
            Ok(minutes) => Normalized::Parsed(minutes),
            Err(_) => Normalized::Degraded,
        }
    } else if has_hours {
        let Some((hours_text, _)) = text.split_once('h') else {
            return Normalized::Degraded;
        };
        match hours_text.trim().parse::<u32>() {
            Ok(hours) => Normalized::Parsed(hours * 60),
            Err(_) => Normalized::Degraded,
        }
    } else {
        Normalized::Degraded
    }
}

/// Normalize optional rating text to an integer on the 0-10 scale.
///
/// Absent or empty text is the expected "not yet rated" case and parses to
/// 0. Present text is parsed as a float, rounded half away from zero
/// (7.5 → 8), and clamped into 0-10. Malformed non-empty text degrades.
pub fn normalize_rating(text: Option<&str>) -> Normalized<u8> {
    let trimmed = match text {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return Normalized::Parsed(0),
    };

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Normalized::Parsed(value.round().clamp(0.0, 10.0) as u8),
        _ => Normalized::Degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_votes_plain_and_separators() {
        assert_eq!(normalize_votes("1,234"), Normalized::Parsed(1234));
        assert_eq!(normalize_votes("(1,234)"), Normalized::Parsed(1234));
        assert_eq!(normalize_votes("  42  "), Normalized::Parsed(42));
    }

    #[test]
    fn test_votes_thousands_suffix() {
        assert_eq!(normalize_votes("1.5K"), Normalized::Parsed(1500));
        assert_eq!(normalize_votes("2K"), Normalized::Parsed(2000));
        assert_eq!(normalize_votes("(12K)"), Normalized::Parsed(12000));
    }

    #[test]
    fn test_votes_truncates_fraction() {
        assert_eq!(normalize_votes("1234.9"), Normalized::Parsed(1234));
        // 1.2345K = 1234.5, truncated not rounded
        assert_eq!(normalize_votes("1.2345K"), Normalized::Parsed(1234));
    }

    #[test]
    fn test_votes_malformed_degrades() {
        assert_eq!(normalize_votes("abc"), Normalized::Degraded);
        assert_eq!(normalize_votes(""), Normalized::Degraded);
        // a bare K still attempts the scaled path and fails on the residue
        assert_eq!(normalize_votes("K"), Normalized::Degraded);
        assert_eq!(normalize_votes("-5"), Normalized::Degraded);
    }

    #[test]
    fn test_votes_default_collapse() {
        assert_eq!(normalize_votes("junk").value_or_default(), 0);
        assert!(normalize_votes("junk").is_degraded());
        assert!(!normalize_votes("7").is_degraded());
    }

    #[test]
    fn test_duration_hours_and_minutes() {
        assert_eq!(normalize_duration("1h 30m"), Normalized::Parsed(90));
        assert_eq!(normalize_duration("2h5m"), Normalized::Parsed(125));
    }

    #[test]
    fn test_duration_single_marker() {
        assert_eq!(normalize_duration("90m"), Normalized::Parsed(90));
        assert_eq!(normalize_duration("2h"), Normalized::Parsed(120));
    }

    #[test]
    fn test_duration_unrecognized_degrades() {
        assert_eq!(normalize_duration(""), Normalized::Degraded);
        assert_eq!(normalize_duration("95"), Normalized::Degraded);
        assert_eq!(normalize_duration("h 30m"), Normalized::Degraded);
        assert_eq!(normalize_duration("hm"), Normalized::Degraded);
    }

    #[test]
    fn test_rating_rounding() {
        assert_eq!(normalize_rating(Some("7.6")), Normalized::Parsed(8));
        assert_eq!(normalize_rating(Some("7.5")), Normalized::Parsed(8));
        assert_eq!(normalize_rating(Some("7.4")), Normalized::Parsed(7));
    }

    #[test]
    fn test_rating_missing_defaults() {
        assert_eq!(normalize_rating(None), Normalized::Parsed(0));
        assert_eq!(normalize_rating(Some("")), Normalized::Parsed(0));
        assert_eq!(normalize_rating(Some("   ")), Normalized::Parsed(0));
    }

    #[test]
    fn test_rating_clamps_out_of_scale() {
        assert_eq!(normalize_rating(Some("11.2")), Normalized::Parsed(10));
        assert_eq!(normalize_rating(Some("-3")), Normalized::Parsed(0));
    }

    #[test]
    fn test_rating_malformed_degrades() {
        assert_eq!(normalize_rating(Some("great")), Normalized::Degraded);
        assert_eq!(normalize_rating(Some("great")).value_or_default(), 0);
    }
}
