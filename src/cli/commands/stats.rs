//! Terminal aggregate views of the stored dataset.

use console::style;

use crate::analysis::{
    duration_extremes, explode_genres, genre_counts, genre_stats, genre_vote_totals,
    rating_votes_correlation, top_by_rating_votes, top_movie_per_genre, StatField,
};
use crate::config::Settings;
use crate::repository::MovieRepository;
use crate::utils::{format_count, format_minutes, format_percent};

/// Print the fixed aggregation views.
///
/// An unreachable database is a terminal error; an empty table is a warning
/// and a clean halt. Neither renders partial views.
pub async fn cmd_stats(settings: &Settings) -> anyhow::Result<()> {
    if !settings.database_exists() {
        println!(
            "{} Could not load data: no database at {}",
            style("✗").red(),
            settings.database_path().display()
        );
        return Err(anyhow::anyhow!("database not initialized"));
    }

    let repo = MovieRepository::new(settings.create_pool());
    let records = match repo.load_all().await {
        Ok(records) => records,
        Err(e) => {
            println!("{} Could not load data: {}", style("✗").red(), e);
            return Err(anyhow::anyhow!("failed to load movies: {}", e));
        }
    };

    if records.is_empty() {
        println!(
            "{} No data found in the movies table. Run a scrape first.",
            style("!").yellow()
        );
        return Ok(());
    }

    println!("{} {} movies loaded\n", style("→").cyan(), records.len());

    let rows = explode_genres(&records);

    println!("{}", style("Top 10 movies by rating and votes").bold());
    for record in top_by_rating_votes(&records, 10) {
        println!(
            "  {:<40} rating {:>2}  votes {:>10}",
            record.name,
            record.rating,
            format_count(record.votes)
        );
    }

    println!("\n{}", style("Movies per genre").bold());
    for (genre, count) in genre_counts(&rows) {
        println!("  {:<20} {:>5}", genre, count);
    }

    println!("\n{}", style("Average duration by genre (minutes)").bold());
    for stats in genre_stats(&rows, StatField::Duration) {
        println!("  {:<20} {:>8.2}", stats.genre, stats.mean);
    }

    println!("\n{}", style("Average votes by genre").bold());
    for stats in genre_stats(&rows, StatField::Votes) {
        println!("  {:<20} {:>12.2}", stats.genre, stats.mean);
    }

    println!("\n{}", style("Rating summary by genre").bold());
    println!(
        "  {:<20} {:>6} {:>6} {:>5} {:>5} {:>6}",
        "genre", "mean", "median", "min", "max", "count"
    );
    for stats in genre_stats(&rows, StatField::Rating) {
        println!(
            "  {:<20} {:>6.2} {:>6.2} {:>5} {:>5} {:>6}",
            stats.genre, stats.mean, stats.median, stats.min, stats.max, stats.count
        );
    }

    println!("\n{}", style("Top rated movie per genre").bold());
    for (genre, record) in top_movie_per_genre(&records) {
        println!("  {:<20} {:<40} rating {}", genre, record.name, record.rating);
    }

    println!("\n{}", style("Total votes by genre").bold());
    for share in genre_vote_totals(&rows) {
        println!(
            "  {:<20} {:>12} {:>7}",
            share.genre,
            format_count(share.total_votes),
            format_percent(share.share)
        );
    }

    println!("\n{}", style("Duration extremes").bold());
    match duration_extremes(&records) {
        Some(extremes) => {
            println!(
                "  shortest: {} ({})",
                extremes.shortest.name,
                format_minutes(extremes.shortest.duration)
            );
            println!(
                "  longest:  {} ({})",
                extremes.longest.name,
                format_minutes(extremes.longest.duration)
            );
        }
        None => println!("  no movies with a known duration"),
    }

    println!("\n{}", style("Correlation: rating vs votes").bold());
    match rating_votes_correlation(&records) {
        Some(corr) => println!("  {:.2}", corr),
        None => println!("  not enough data"),
    }

    Ok(())
}
