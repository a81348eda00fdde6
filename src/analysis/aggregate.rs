//! Grouped aggregations over the record set and the exploded genre rows.
//!
//! These are the fixed derived views the dashboard and the `stats` command
//! render. Each consumes either the canonical record set or an exploded row
//! set and produces an owned table; nothing here mutates its input.

use std::collections::BTreeMap;

use crate::models::MovieRecord;

use super::explode::GenreRow;

/// Numeric field selector for grouped statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Rating,
    Votes,
    Duration,
}

impl StatField {
    /// Display name for table headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rating => "Rating",
            Self::Votes => "Votes",
            Self::Duration => "Duration",
        }
    }

    fn value(&self, record: &MovieRecord) -> f64 {
        match self {
            Self::Rating => record.rating as f64,
            Self::Votes => record.votes as f64,
            Self::Duration => record.duration as f64,
        }
    }
}

/// Per-genre summary statistics for one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreStats {
    pub genre: String,
    /// Mean, rounded to 2 decimal places for display.
    pub mean: f64,
    /// Median, rounded to 2 decimal places for display.
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Per-genre vote total with its share of the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreShare {
    pub genre: String,
    pub total_votes: u64,
    /// Percentage of the grand total; shares sum to 100 across all genres.
    pub share: f64,
}

/// The shortest and longest movies with a usable duration.
#[derive(Debug, Clone, Copy)]
pub struct DurationExtremes<'a> {
    pub shortest: &'a MovieRecord,
    pub longest: &'a MovieRecord,
}

/// Round to 2 decimal places for display tables.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Top K records by (rating, votes) descending.
///
/// The sort is stable: records with an identical composite key keep their
/// input order, which also resolves ties at the K boundary.
pub fn top_by_rating_votes(records: &[MovieRecord], k: usize) -> Vec<&MovieRecord> {
    let mut sorted: Vec<&MovieRecord> = records.iter().collect();
    sorted.sort_by(|a, b| (b.rating, b.votes).cmp(&(a.rating, a.votes)));
    sorted.truncate(k);
    sorted
}

/// Group exploded rows by tag, in first-appearance order.
fn group_rows<'a>(rows: &[GenreRow<'a>]) -> Vec<(&'a str, Vec<&'a MovieRecord>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&MovieRecord>> = BTreeMap::new();
    for row in rows {
        if !groups.contains_key(row.genre) {
            order.push(row.genre);
        }
        groups.entry(row.genre).or_default().push(row.record);
    }
    order
        .into_iter()
        .map(|tag| (tag, groups.remove(tag).unwrap_or_default()))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Per-genre mean/median/min/max/count of a numeric field, sorted by mean
/// descending (ties by tag ascending for determinism).
pub fn genre_stats(rows: &[GenreRow<'_>], field: StatField) -> Vec<GenreStats> {
    let mut stats: Vec<GenreStats> = group_rows(rows)
        .into_iter()
        .map(|(tag, records)| {
            let mut values: Vec<f64> = records.iter().map(|r| field.value(r)).collect();
            let group_mean = mean(&values);
            let group_median = median(&mut values);
            // values is sorted after the median pass
            let min = values.first().copied().unwrap_or(0.0);
            let max = values.last().copied().unwrap_or(0.0);
            GenreStats {
                genre: tag.to_string(),
                mean: round2(group_mean),
                median: round2(group_median),
                min,
                max,
                count: records.len(),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.genre.cmp(&b.genre)));
    stats
}

/// Number of exploded rows per genre tag, descending (ties by tag ascending).
pub fn genre_counts(rows: &[GenreRow<'_>]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = group_rows(rows)
        .into_iter()
        .map(|(tag, records)| (tag.to_string(), records.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Per-genre vote totals with percentage shares of the grand total,
/// descending by total.
///
/// Shares are computed over the exploded rows, so a multi-genre record
/// contributes its votes to every one of its tags.
pub fn genre_vote_totals(rows: &[GenreRow<'_>]) -> Vec<GenreShare> {
    let groups = group_rows(rows);
    let grand_total: u64 = groups
        .iter()
        .flat_map(|(_, records)| records.iter())
        .map(|r| r.votes)
        .sum();

    let mut shares: Vec<GenreShare> = groups
        .into_iter()
        .map(|(tag, records)| {
            let total: u64 = records.iter().map(|r| r.votes).sum();
            let share = if grand_total == 0 {
                0.0
            } else {
                total as f64 * 100.0 / grand_total as f64
            };
            GenreShare {
                genre: tag.to_string(),
                total_votes: total,
                share,
            }
        })
        .collect();

    shares.sort_by(|a, b| {
        b.total_votes
            .cmp(&a.total_votes)
            .then_with(|| a.genre.cmp(&b.genre))
    });
    shares
}

/// The top-rated record for each distinct genre tag.
///
/// Tags come from the exploded set in first-appearance order. A record
/// belongs to a tag when one of its own exploded tags matches exactly
/// (ASCII case-insensitive). The first record in table order wins rating
/// ties.
pub fn top_movie_per_genre(records: &[MovieRecord]) -> Vec<(String, &MovieRecord)> {
    let rows = super::explode_genres(records);

    let mut tags: Vec<&str> = Vec::new();
    for row in &rows {
        if !tags
            .iter()
            .any(|seen| seen.eq_ignore_ascii_case(row.genre))
        {
            tags.push(row.genre);
        }
    }

    tags.into_iter()
        .filter_map(|tag| {
            let mut best: Option<&MovieRecord> = None;
            for row in &rows {
                if !row.genre.eq_ignore_ascii_case(tag) {
                    continue;
                }
                match best {
                    Some(current) if row.record.rating <= current.rating => {}
                    _ => best = Some(row.record),
                }
            }
            best.map(|record| (tag.to_string(), record))
        })
        .collect()
}

/// The shortest and longest movies among records with a usable duration.
///
/// The 0 "unknown" sentinel is excluded by presence, never coerced, so a
/// missing duration can't win "shortest". Returns `None` when no record has
/// a positive duration. First occurrence wins ties on both ends.
pub fn duration_extremes(records: &[MovieRecord]) -> Option<DurationExtremes<'_>> {
    let mut shortest: Option<&MovieRecord> = None;
    let mut longest: Option<&MovieRecord> = None;

    for record in records.iter().filter(|r| r.has_duration()) {
        match shortest {
            Some(current) if record.duration >= current.duration => {}
            _ => shortest = Some(record),
        }
        match longest {
            Some(current) if record.duration <= current.duration => {}
            _ => longest = Some(record),
        }
    }

    Some(DurationExtremes {
        shortest: shortest?,
        longest: longest?,
    })
}

/// Pearson correlation between rating and votes.
///
/// Only records where both fields are present (> 0) participate; missing
/// values are excluded, not substituted. Returns `None` with fewer than two
/// complete pairs or zero variance in either field.
pub fn rating_votes_correlation(records: &[MovieRecord]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter(|r| r.rating > 0 && r.votes > 0)
        .map(|r| (r.rating as f64, r.votes as f64))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x * var_y).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::explode_genres;

    fn record(name: &str, genre: &str, rating: u8, votes: u64, duration: u32) -> MovieRecord {
        MovieRecord::new(name.to_string(), genre.to_string(), rating, votes, duration)
    }

    fn scenario() -> Vec<MovieRecord> {
        vec![
            record("A", "Action", 9, 500, 120),
            record("B", "Action,Drama", 7, 100, 0),
            record("C", "Drama", 9, 500, 200),
        ]
    }

    #[test]
    fn test_top_k_composite_key() {
        let records = vec![
            record("Low", "Drama", 5, 900, 100),
            record("High", "Drama", 9, 10, 100),
            record("Mid", "Drama", 7, 500, 100),
        ];
        let top = top_by_rating_votes(&records, 2);
        assert_eq!(top[0].name, "High");
        assert_eq!(top[1].name, "Mid");
    }

    #[test]
    fn test_top_k_stable_on_ties() {
        let records = vec![
            record("First", "Drama", 8, 100, 100),
            record("Second", "Drama", 8, 100, 100),
            record("Third", "Drama", 8, 100, 100),
        ];
        let top = top_by_rating_votes(&records, 2);
        assert_eq!(top[0].name, "First");
        assert_eq!(top[1].name, "Second");
    }

    #[test]
    fn test_scenario_top_two() {
        let records = scenario();
        let top = top_by_rating_votes(&records, 2);
        // A and C tie on (9, 500); input order breaks the tie
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "C");
    }

    #[test]
    fn test_scenario_genre_counts() {
        let records = scenario();
        let rows = explode_genres(&records);
        let counts = genre_counts(&rows);
        assert_eq!(counts.len(), 2);
        assert!(counts.contains(&("Action".to_string(), 2)));
        assert!(counts.contains(&("Drama".to_string(), 2)));
    }

    #[test]
    fn test_genre_stats_table() {
        let records = vec![
            record("A", "Action", 8, 100, 100),
            record("B", "Action", 7, 100, 110),
            record("C", "Drama", 5, 100, 200),
        ];
        let rows = explode_genres(&records);
        let stats = genre_stats(&rows, StatField::Rating);

        assert_eq!(stats[0].genre, "Action");
        assert_eq!(stats[0].mean, 7.5);
        assert_eq!(stats[0].median, 7.5);
        assert_eq!(stats[0].min, 7.0);
        assert_eq!(stats[0].max, 8.0);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].genre, "Drama");
        assert_eq!(stats[1].count, 1);
    }

    #[test]
    fn test_genre_stats_mean_rounding() {
        let records = vec![
            record("A", "Action", 7, 0, 0),
            record("B", "Action", 7, 0, 0),
            record("C", "Action", 8, 0, 0),
        ];
        let rows = explode_genres(&records);
        let stats = genre_stats(&rows, StatField::Rating);
        // 22/3 = 7.333... displayed as 7.33
        assert_eq!(stats[0].mean, 7.33);
    }

    #[test]
    fn test_vote_totals_match_exploded_sum() {
        let records = scenario();
        let rows = explode_genres(&records);
        let shares = genre_vote_totals(&rows);

        let total_from_groups: u64 = shares.iter().map(|s| s.total_votes).sum();
        let total_from_rows: u64 = rows.iter().map(|row| row.record.votes).sum();
        // multi-genre records count once per tag, so the grouped sum equals
        // the exploded-row sum, not the canonical sum
        assert_eq!(total_from_groups, total_from_rows);

        let share_sum: f64 = shares.iter().map(|s| s.share).sum();
        assert!((share_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_vote_totals_empty_rows() {
        let shares = genre_vote_totals(&[]);
        assert!(shares.is_empty());
    }

    #[test]
    fn test_top_movie_per_genre_exact_tags() {
        let records = vec![
            record("WarEpic", "War", 8, 100, 100),
            record("ModernWarfare", "Warfare", 9, 100, 100),
        ];
        let top = top_movie_per_genre(&records);

        let war = top.iter().find(|(tag, _)| tag == "War").unwrap();
        // exact tag matching: "Warfare" does not cross-match "War"
        assert_eq!(war.1.name, "WarEpic");
    }

    #[test]
    fn test_top_movie_per_genre_first_wins_ties() {
        let records = vec![
            record("First", "Drama", 9, 100, 100),
            record("Second", "Drama", 9, 999, 100),
        ];
        let top = top_movie_per_genre(&records);
        assert_eq!(top[0].1.name, "First");
    }

    #[test]
    fn test_extremes_exclude_missing_duration() {
        let records = scenario();
        let extremes = duration_extremes(&records).unwrap();
        // B has duration 0 and may not win "shortest"
        assert_eq!(extremes.shortest.name, "A");
        assert_eq!(extremes.longest.name, "C");
    }

    #[test]
    fn test_extremes_none_without_valid_durations() {
        let records = vec![record("A", "Drama", 7, 10, 0)];
        assert!(duration_extremes(&records).is_none());
    }

    #[test]
    fn test_correlation_linear() {
        let records = vec![
            record("A", "Drama", 2, 200, 100),
            record("B", "Drama", 4, 400, 100),
            record("C", "Drama", 6, 600, 100),
        ];
        let corr = rating_votes_correlation(&records).unwrap();
        assert!((corr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_excludes_missing() {
        let records = vec![
            record("A", "Drama", 2, 200, 100),
            record("B", "Drama", 4, 400, 100),
            record("Unrated", "Drama", 0, 9999, 100),
            record("Unvoted", "Drama", 9, 0, 100),
        ];
        let corr = rating_votes_correlation(&records).unwrap();
        // only the two complete pairs participate
        assert!((corr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_insufficient_pairs() {
        let records = vec![record("A", "Drama", 2, 200, 100)];
        assert!(rating_votes_correlation(&records).is_none());

        let flat = vec![
            record("A", "Drama", 5, 100, 100),
            record("B", "Drama", 5, 200, 100),
        ];
        assert!(rating_votes_correlation(&flat).is_none());
    }
}
