//! Genre explosion: one row per (record, genre tag) pair.

use crate::models::MovieRecord;

/// A borrowed (record, single genre tag) pair.
///
/// Rows reference the record they came from so grouped aggregations can
/// recover name/rating/votes/duration without copying the canonical set.
#[derive(Debug, Clone, Copy)]
pub struct GenreRow<'a> {
    /// The originating record.
    pub record: &'a MovieRecord,
    /// One trimmed tag from the record's comma-separated genre field.
    pub genre: &'a str,
}

/// Explode each record's comma-separated genre field into per-tag rows.
///
/// Tags keep their comma order and are not deduplicated. Records with an
/// empty or blank genre field contribute nothing here but stay in the
/// canonical set.
pub fn explode_genres(records: &[MovieRecord]) -> Vec<GenreRow<'_>> {
    let mut rows = Vec::new();
    for record in records {
        for tag in record.genre.split(',') {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            rows.push(GenreRow { record, genre: tag });
        }
    }
    rows
}

/// Distinct genre tags from an exploded row set, sorted ascending.
pub fn distinct_genres(rows: &[GenreRow<'_>]) -> Vec<String> {
    let mut tags: Vec<String> = rows.iter().map(|row| row.genre.to_string()).collect();
    tags.sort();
    tags.dedup();
    tags
}
