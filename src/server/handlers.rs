//! Page and API handlers.
//!
//! Load failures and the empty table are the only conditions surfaced to
//! the user, and both halt the request instead of rendering partial views.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::analysis::{
    distinct_genres, duration_extremes, explode_genres, genre_counts, genre_stats,
    genre_vote_totals, rating_votes_correlation, top_by_rating_votes, top_movie_per_genre,
    DurationBucket, MovieFilter, StatField,
};
use crate::models::MovieRecord;

use super::template_structs::{
    extreme_rows, BucketOption, CountRow, DashboardTemplate, FilterTemplate, MeanRow,
    MessageTemplate, MovieRowDisplay, ShareRow, StatsRow, TopGenreRow,
};
use super::AppState;

/// Number of entries in the top-movies view.
const TOP_K: usize = 10;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

fn render<T: Template>(template: T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| e.to_string()))
}

fn error_page(message: String) -> Html<String> {
    render(MessageTemplate {
        title: "Error".to_string(),
        kind: "error".to_string(),
        message,
    })
}

fn no_data_page() -> Html<String> {
    render(MessageTemplate {
        title: "No data".to_string(),
        kind: "warning".to_string(),
        message: "No data found in the movies table. Run a scrape first.".to_string(),
    })
}

/// Load the full record set, mapping the two terminal conditions.
async fn load_records(state: &AppState) -> Result<Vec<MovieRecord>, Html<String>> {
    let records = state
        .repo
        .load_all()
        .await
        .map_err(|e| error_page(format!("Could not load data: {}", e)))?;
    if records.is_empty() {
        return Err(no_data_page());
    }
    Ok(records)
}

/// Dashboard: the fixed aggregation views over the whole table.
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let records = match load_records(&state).await {
        Ok(records) => records,
        Err(page) => return page,
    };

    let rows = explode_genres(&records);

    let template = DashboardTemplate {
        total: records.len(),
        movies: records.iter().map(MovieRowDisplay::from_record).collect(),
        top: top_by_rating_votes(&records, TOP_K)
            .into_iter()
            .map(MovieRowDisplay::from_record)
            .collect(),
        genre_counts: genre_counts(&rows)
            .into_iter()
            .map(|(genre, count)| CountRow { genre, count })
            .collect(),
        duration_means: genre_stats(&rows, StatField::Duration)
            .iter()
            .map(|s| MeanRow {
                genre: s.genre.clone(),
                mean_str: format!("{:.2}", s.mean),
            })
            .collect(),
        vote_means: genre_stats(&rows, StatField::Votes)
            .iter()
            .map(|s| MeanRow {
                genre: s.genre.clone(),
                mean_str: format!("{:.2}", s.mean),
            })
            .collect(),
        rating_summary: genre_stats(&rows, StatField::Rating)
            .iter()
            .map(StatsRow::from_stats)
            .collect(),
        top_per_genre: top_movie_per_genre(&records)
            .into_iter()
            .map(|(genre, record)| {
                let display = MovieRowDisplay::from_record(record);
                TopGenreRow {
                    genre,
                    name: display.name,
                    rating: display.rating,
                    votes_str: display.votes_str,
                    duration_str: display.duration_str,
                }
            })
            .collect(),
        vote_shares: genre_vote_totals(&rows)
            .iter()
            .map(ShareRow::from_share)
            .collect(),
        extremes: extreme_rows(duration_extremes(&records)),
        correlation: match rating_votes_correlation(&records) {
            Some(corr) => format!("{:.2}", corr),
            None => "not enough data".to_string(),
        },
    };

    render(template)
}

/// Query params for the filter page.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterParams {
    pub bucket: Option<String>,
    pub min_rating: Option<f64>,
    pub min_votes: Option<u64>,
    /// Comma-separated genre tags; empty means no genre restriction.
    pub genres: Option<String>,
}

/// Parse a comma-separated query parameter into trimmed, non-empty tags.
fn parse_csv_param(param: Option<&String>) -> Vec<String> {
    param
        .map(|value| {
            value
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Interactive filter page.
pub async fn filter_movies(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let records = match load_records(&state).await {
        Ok(records) => records,
        Err(page) => return page,
    };

    let bucket = params
        .bucket
        .as_deref()
        .and_then(DurationBucket::from_id)
        .unwrap_or_default();
    let filter = MovieFilter {
        bucket,
        min_rating: params.min_rating.unwrap_or(5.0),
        min_votes: params.min_votes.unwrap_or(0),
        genres: parse_csv_param(params.genres.as_ref()),
    };

    let results: Vec<MovieRowDisplay> = filter
        .apply(&records)
        .into_iter()
        .map(MovieRowDisplay::from_record)
        .collect();

    let exploded = explode_genres(&records);
    let template = FilterTemplate {
        buckets: DurationBucket::all()
            .into_iter()
            .map(|b| BucketOption {
                id: b.id(),
                label: b.label(),
                selected: b == bucket,
            })
            .collect(),
        min_rating_str: format!("{}", filter.min_rating),
        min_votes: filter.min_votes,
        genres_value: filter.genres.join(", "),
        available_genres: distinct_genres(&exploded).join(", "),
        total: results.len(),
        results,
    };

    render(template)
}

/// All aggregate views as JSON.
pub async fn api_stats(State(state): State<AppState>) -> impl IntoResponse {
    let records = match state.repo.load_all().await {
        Ok(records) => records,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    if records.is_empty() {
        return axum::Json(serde_json::json!({
            "total": 0,
            "warning": "no data",
        }))
        .into_response();
    }

    let rows = explode_genres(&records);

    let genre_count_json: Vec<_> = genre_counts(&rows)
        .into_iter()
        .map(|(genre, count)| serde_json::json!({ "genre": genre, "count": count }))
        .collect();

    let rating_summary_json: Vec<_> = genre_stats(&rows, StatField::Rating)
        .iter()
        .map(|s| {
            serde_json::json!({
                "genre": s.genre,
                "mean": s.mean,
                "median": s.median,
                "min": s.min,
                "max": s.max,
                "count": s.count,
            })
        })
        .collect();

    let vote_share_json: Vec<_> = genre_vote_totals(&rows)
        .iter()
        .map(|s| {
            serde_json::json!({
                "genre": s.genre,
                "total_votes": s.total_votes,
                "share": s.share,
            })
        })
        .collect();

    let top_json: Vec<_> = top_by_rating_votes(&records, TOP_K)
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "rating": r.rating,
                "votes": r.votes,
                "duration": r.duration,
            })
        })
        .collect();

    axum::Json(serde_json::json!({
        "total": records.len(),
        "top": top_json,
        "genre_counts": genre_count_json,
        "rating_summary": rating_summary_json,
        "vote_shares": vote_share_json,
        "correlation": rating_votes_correlation(&records),
    }))
    .into_response()
}
