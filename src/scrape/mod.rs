//! Listing scraper: paging loop, extraction, and normalization fold.
//!
//! The upstream listing is paginated behind a "load more" continuation. The
//! scraper walks it sequentially (fetch, extract, settle, repeat) until the
//! continuation disappears, folding each page into an immutable batch of
//! normalized records. Per-item extraction failures skip the item; a failed
//! page fetch ends the run with whatever was collected so far.

pub mod extract;
mod http_client;

pub use extract::{parse_listing_page, ItemSelectors, ListingPage};
pub use http_client::{HttpClient, PageFetcher};

use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{MovieRecord, RawScrapeItem};
use crate::normalize::{normalize_duration, normalize_rating, normalize_votes};

/// Errors from the scraping boundary.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Fetch failure from a non-HTTP page source.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Parameters identifying one listing to walk.
#[derive(Debug, Clone)]
pub struct ListingRequest {
    /// Genre tag the listing is filtered by.
    pub genre: String,
    /// Inclusive start of the release-date range.
    pub date_from: NaiveDate,
    /// Inclusive end of the release-date range.
    pub date_to: NaiveDate,
}

impl ListingRequest {
    pub fn new(genre: impl Into<String>, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            genre: genre.into(),
            date_from,
            date_to,
        }
    }

    /// First-page URL for this listing.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/search/title/?title_type=feature&release_date={},{}&genres={}",
            base_url.trim_end_matches('/'),
            self.date_from,
            self.date_to,
            self.genre
        )
    }
}

/// Counters describing one genre's scrape run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapeReport {
    /// Pages fetched and parsed.
    pub pages: usize,
    /// Records produced.
    pub items: usize,
    /// Items dropped because extraction could not locate their fields.
    pub skipped: usize,
    /// Vote fields that degraded to 0.
    pub degraded_votes: usize,
    /// Duration fields that degraded to 0.
    pub degraded_durations: usize,
    /// Rating fields that degraded to 0.
    pub degraded_ratings: usize,
}

/// Sequential listing walker.
pub struct ListingScraper {
    fetcher: Box<dyn PageFetcher>,
    selectors: ItemSelectors,
    settle: Duration,
    page_limit: usize,
}

impl ListingScraper {
    /// Create a scraper with the default selector set.
    pub fn new(fetcher: Box<dyn PageFetcher>, settle: Duration) -> Self {
        Self {
            fetcher,
            selectors: ItemSelectors::default(),
            settle,
            page_limit: 0,
        }
    }

    /// Limit the number of pages fetched per run (0 = unlimited).
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    /// Replace the selector set.
    pub fn with_selectors(mut self, selectors: ItemSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Walk one genre's listing to exhaustion.
    ///
    /// Each page folds into an immutable batch; the batches concatenate into
    /// the returned record set. Every record carries the requested genre tag.
    /// Fetch errors end the run with the records collected so far.
    pub async fn scrape_genre(
        &self,
        base_url: &str,
        request: &ListingRequest,
    ) -> (Vec<MovieRecord>, ScrapeReport) {
        let mut records = Vec::new();
        let mut report = ScrapeReport::default();
        let mut url = request.url(base_url);

        loop {
            let html = match self.fetcher.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(genre = %request.genre, %url, "page fetch failed, ending run: {}", e);
                    break;
                }
            };

            let page = parse_listing_page(&html, &self.selectors);
            report.pages += 1;
            if page.skipped > 0 {
                warn!(
                    genre = %request.genre,
                    skipped = page.skipped,
                    "items missing required fields were skipped"
                );
                report.skipped += page.skipped;
            }

            let batch = normalize_batch(&page.items, &request.genre, &mut report);
            records.extend(batch);

            match page.next_page {
                Some(next) if self.page_limit == 0 || report.pages < self.page_limit => {
                    url = extract::resolve_url(base_url, &next);
                    tokio::time::sleep(self.settle).await;
                }
                Some(_) => {
                    info!(genre = %request.genre, pages = report.pages, "page limit reached");
                    break;
                }
                None => {
                    info!(genre = %request.genre, pages = report.pages, "listing exhausted");
                    break;
                }
            }
        }

        report.items = records.len();
        (records, report)
    }
}

/// Normalize one page's raw items into records tagged with the query genre.
///
/// Degradations are logged here, on the consuming side of the pure
/// normalizers, and counted in the report.
fn normalize_batch(
    items: &[RawScrapeItem],
    genre: &str,
    report: &mut ScrapeReport,
) -> Vec<MovieRecord> {
    items
        .iter()
        .map(|item| {
            let votes = normalize_votes(&item.vote_text);
            if votes.is_degraded() {
                report.degraded_votes += 1;
                debug!(name = %item.name, raw = %item.vote_text, "vote text degraded to 0");
            }

            let duration = normalize_duration(&item.duration_text);
            if duration.is_degraded() {
                report.degraded_durations += 1;
                debug!(name = %item.name, raw = %item.duration_text, "duration text degraded to 0");
            }

            let rating = normalize_rating(item.rating_text.as_deref());
            if rating.is_degraded() {
                report.degraded_ratings += 1;
                debug!(name = %item.name, "rating text degraded to 0");
            }

            MovieRecord::new(
                item.name.clone(),
                genre.to_string(),
                rating.value_or_default(),
                votes.value_or_default(),
                duration.value_or_default(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
            match self.pages.get(url) {
                Some(html) => Ok(html.clone()),
                None => Err(ScrapeError::Fetch(format!("no such page: {}", url))),
            }
        }
    }

    fn item(name: &str, rating: &str, votes: &str, duration: &str) -> String {
        format!(
            r#"<li class="ipc-metadata-list-summary-item">
                <h3 class="ipc-title__text">{name}</h3>
                <span class="dli-title-metadata-item">2024</span>
                <span class="dli-title-metadata-item">{duration}</span>
                <span class="ipc-rating-star--rating">{rating}</span>
                <span class="ipc-rating-star--voteCount">{votes}</span>
            </li>"#
        )
    }

    fn request() -> ListingRequest {
        ListingRequest::new(
            "fantasy",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_listing_url() {
        let url = request().url("https://example.com/");
        assert_eq!(
            url,
            "https://example.com/search/title/?title_type=feature&release_date=2024-01-01,2024-12-31&genres=fantasy"
        );
    }

    #[tokio::test]
    async fn test_scrape_walks_pages_to_exhaustion() {
        let first_url = request().url("https://example.com");
        let page_one = format!(
            r#"<ul>{}</ul><a class="next-page" href="/page2">More</a>"#,
            item("Alpha", "8.1", "(1,234)", "1h 30m")
        );
        let page_two = format!("<ul>{}</ul>", item("Beta", "6.9", "2.5K", "95m"));

        let mut pages = HashMap::new();
        pages.insert(first_url, page_one);
        pages.insert("https://example.com/page2".to_string(), page_two);

        let scraper = ListingScraper::new(Box::new(StubFetcher { pages }), Duration::ZERO);
        let (records, report) = scraper.scrape_genre("https://example.com", &request()).await;

        assert_eq!(report.pages, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alpha");
        assert_eq!(records[0].genre, "fantasy");
        assert_eq!(records[0].rating, 8);
        assert_eq!(records[0].votes, 1234);
        assert_eq!(records[0].duration, 90);
        assert_eq!(records[1].votes, 2500);
        assert_eq!(records[1].duration, 95);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_partial_batch() {
        let first_url = request().url("https://example.com");
        let page_one = format!(
            r#"<ul>{}</ul><a class="next-page" href="/missing">More</a>"#,
            item("Alpha", "8.1", "100", "1h 30m")
        );

        let mut pages = HashMap::new();
        pages.insert(first_url, page_one);

        let scraper = ListingScraper::new(Box::new(StubFetcher { pages }), Duration::ZERO);
        let (records, report) = scraper.scrape_genre("https://example.com", &request()).await;

        // the second page 404s; the first page's batch survives
        assert_eq!(records.len(), 1);
        assert_eq!(report.pages, 1);
    }

    #[tokio::test]
    async fn test_page_limit_stops_early() {
        let first_url = request().url("https://example.com");
        let page = format!(
            r#"<ul>{}</ul><a class="next-page" href="/page2">More</a>"#,
            item("Alpha", "8.1", "100", "90m")
        );

        let mut pages = HashMap::new();
        pages.insert(first_url, page);

        let scraper = ListingScraper::new(Box::new(StubFetcher { pages }), Duration::ZERO)
            .with_page_limit(1);
        let (records, report) = scraper.scrape_genre("https://example.com", &request()).await;

        assert_eq!(report.pages, 1);
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_degradations_counted_not_fatal() {
        let first_url = request().url("https://example.com");
        let page = format!(
            "<ul>{}{}</ul>",
            item("Good", "7.5", "(2K)", "2h"),
            item("Rough", "n/a", "soon", "TBD")
        );

        let mut pages = HashMap::new();
        pages.insert(first_url, page);

        let scraper = ListingScraper::new(Box::new(StubFetcher { pages }), Duration::ZERO);
        let (records, report) = scraper.scrape_genre("https://example.com", &request()).await;

        assert_eq!(records.len(), 2);
        assert_eq!(report.degraded_votes, 1);
        assert_eq!(report.degraded_durations, 1);
        assert_eq!(report.degraded_ratings, 1);
        assert_eq!(records[1].rating, 0);
        assert_eq!(records[1].votes, 0);
        assert_eq!(records[1].duration, 0);
    }
}
