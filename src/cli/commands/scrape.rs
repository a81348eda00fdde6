//! Main scrape command implementation.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::repository::{run_migrations, MovieRepository};
use crate::scrape::{HttpClient, ListingRequest, ListingScraper};

/// Scrape movie listings for one or more genres.
pub async fn cmd_scrape(
    settings: &Settings,
    genres: &[String],
    all: bool,
    pages: usize,
) -> anyhow::Result<()> {
    let genres: Vec<String> = if all || genres.is_empty() {
        settings.genres.clone()
    } else {
        genres.to_vec()
    };

    if genres.is_empty() {
        println!(
            "{} No genres specified. Use --all or provide genre tags.",
            style("✗").red()
        );
        return Ok(());
    }

    settings.ensure_directories()?;
    run_migrations(&settings.database_url())
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    let repo = MovieRepository::new(settings.create_pool());

    let fetcher = HttpClient::new(&settings.user_agent, settings.timeout());
    let scraper =
        ListingScraper::new(Box::new(fetcher), settings.settle_delay()).with_page_limit(pages);

    println!(
        "{} Scraping {} genre{}...",
        style("→").cyan(),
        genres.len(),
        if genres.len() == 1 { "" } else { "s" }
    );

    let mut total_inserted = 0usize;
    for genre in &genres {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Scraping {} movies...", genre));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        let request = ListingRequest::new(genre.clone(), settings.date_from, settings.date_to);
        let (records, report) = scraper
            .scrape_genre(&settings.listing_base_url, &request)
            .await;

        pb.finish_and_clear();

        let inserted = repo
            .insert_batch(&records)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to store {} records: {}", genre, e))?;
        total_inserted += inserted;

        println!(
            "  {} {}: {} movies from {} page{} ({} skipped)",
            style("✓").green(),
            genre,
            inserted,
            report.pages,
            if report.pages == 1 { "" } else { "s" },
            report.skipped
        );

        let degraded = report.degraded_votes + report.degraded_durations + report.degraded_ratings;
        if degraded > 0 {
            println!(
                "    {} {} fields degraded to 0 (votes: {}, durations: {}, ratings: {})",
                style("!").yellow(),
                degraded,
                report.degraded_votes,
                report.degraded_durations,
                report.degraded_ratings
            );
        }
    }

    println!(
        "{} Stored {} movies in {}",
        style("✓").green(),
        total_inserted,
        settings.database_path().display()
    );

    Ok(())
}
