//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.
//! Row structs carry preformatted strings so the templates stay dumb.

use askama::Template;

use crate::analysis::{DurationExtremes, GenreShare, GenreStats};
use crate::models::MovieRecord;
use crate::utils::{format_count, format_minutes, format_percent};

/// One movie row in a listing table.
pub struct MovieRowDisplay {
    pub name: String,
    pub genre: String,
    pub rating: u8,
    pub votes_str: String,
    pub duration_str: String,
}

impl MovieRowDisplay {
    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            name: record.name.clone(),
            genre: record.genre.clone(),
            rating: record.rating,
            votes_str: format_count(record.votes),
            duration_str: if record.has_duration() {
                format_minutes(record.duration)
            } else {
                "unknown".to_string()
            },
        }
    }
}

/// Genre with a row count.
pub struct CountRow {
    pub genre: String,
    pub count: usize,
}

/// Genre with a mean value of one field.
pub struct MeanRow {
    pub genre: String,
    pub mean_str: String,
}

/// Per-genre rating summary row.
pub struct StatsRow {
    pub genre: String,
    pub mean_str: String,
    pub median_str: String,
    pub min_str: String,
    pub max_str: String,
    pub count: usize,
}

impl StatsRow {
    pub fn from_stats(stats: &GenreStats) -> Self {
        Self {
            genre: stats.genre.clone(),
            mean_str: format!("{:.2}", stats.mean),
            median_str: format!("{:.2}", stats.median),
            min_str: format!("{}", stats.min),
            max_str: format!("{}", stats.max),
            count: stats.count,
        }
    }
}

/// Top-rated movie for one genre.
pub struct TopGenreRow {
    pub genre: String,
    pub name: String,
    pub rating: u8,
    pub votes_str: String,
    pub duration_str: String,
}

/// Genre vote total with its share of the whole.
pub struct ShareRow {
    pub genre: String,
    pub total_str: String,
    pub share_str: String,
}

impl ShareRow {
    pub fn from_share(share: &GenreShare) -> Self {
        Self {
            genre: share.genre.clone(),
            total_str: format_count(share.total_votes),
            share_str: format_percent(share.share),
        }
    }
}

/// One end of the duration range.
pub struct ExtremeRow {
    pub label: String,
    pub name: String,
    pub genre: String,
    pub duration_str: String,
    pub rating: u8,
}

/// Build the shortest/longest pair for display.
pub fn extreme_rows(extremes: Option<DurationExtremes<'_>>) -> Vec<ExtremeRow> {
    match extremes {
        Some(e) => vec![
            ExtremeRow {
                label: "Shortest Movie".to_string(),
                name: e.shortest.name.clone(),
                genre: e.shortest.genre.clone(),
                duration_str: format_minutes(e.shortest.duration),
                rating: e.shortest.rating,
            },
            ExtremeRow {
                label: "Longest Movie".to_string(),
                name: e.longest.name.clone(),
                genre: e.longest.genre.clone(),
                duration_str: format_minutes(e.longest.duration),
                rating: e.longest.rating,
            },
        ],
        None => Vec::new(),
    }
}

/// Duration bucket option for the filter form.
pub struct BucketOption {
    pub id: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Dashboard page with the full fixed view sequence.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub total: usize,
    pub movies: Vec<MovieRowDisplay>,
    pub top: Vec<MovieRowDisplay>,
    pub genre_counts: Vec<CountRow>,
    pub duration_means: Vec<MeanRow>,
    pub vote_means: Vec<MeanRow>,
    pub rating_summary: Vec<StatsRow>,
    pub top_per_genre: Vec<TopGenreRow>,
    pub vote_shares: Vec<ShareRow>,
    pub extremes: Vec<ExtremeRow>,
    pub correlation: String,
}

/// Interactive filter page.
#[derive(Template)]
#[template(path = "filter.html")]
pub struct FilterTemplate {
    pub buckets: Vec<BucketOption>,
    pub min_rating_str: String,
    pub min_votes: u64,
    pub genres_value: String,
    pub available_genres: String,
    pub results: Vec<MovieRowDisplay>,
    pub total: usize,
}

/// Error or warning page.
#[derive(Template)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub title: String,
    pub kind: String,
    pub message: String,
}
