//! Analysis pipeline over the loaded record set.
//!
//! Everything here is pure and synchronous: the explosion of multi-valued
//! genre fields into per-tag rows, the fixed set of grouped aggregations the
//! dashboard renders, and the filter predicate composer backing the
//! interactive filter surface.

mod aggregate;
mod explode;
mod filter;

pub use aggregate::{
    duration_extremes, genre_counts, genre_stats, genre_vote_totals, rating_votes_correlation,
    top_by_rating_votes, top_movie_per_genre, DurationExtremes, GenreShare, GenreStats, StatField,
};
pub use explode::{distinct_genres, explode_genres, GenreRow};
pub use filter::{DurationBucket, MovieFilter};
