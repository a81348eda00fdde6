//! Listing-item extraction rules.
//!
//! The upstream listing has a fixed, positional item layout. Extraction is
//! data-driven: a selector set locates the text nodes for one item, and a
//! missing title is the skip signal. The caller drops that item and keeps
//! iterating.

use scraper::{ElementRef, Html, Selector};

use crate::models::RawScrapeItem;

/// CSS selectors locating the fields of one listing item.
pub struct ItemSelectors {
    /// One listing item.
    pub item: Selector,
    /// Title node inside an item.
    pub name: Selector,
    /// Rating value node inside an item.
    pub rating: Selector,
    /// Vote-count node inside an item.
    pub votes: Selector,
    /// Positional metadata spans (year, duration, certification).
    pub metadata: Selector,
    /// Continuation link for the next slice of the listing.
    pub next_page: Selector,
}

/// Index of the duration span within the positional metadata run.
const METADATA_DURATION_INDEX: usize = 1;

impl Default for ItemSelectors {
    fn default() -> Self {
        Self {
            item: parse_selector("li.ipc-metadata-list-summary-item"),
            name: parse_selector("h3.ipc-title__text"),
            rating: parse_selector("span.ipc-rating-star--rating"),
            votes: parse_selector("span.ipc-rating-star--voteCount"),
            metadata: parse_selector("span.dli-title-metadata-item"),
            next_page: parse_selector("a.next-page"),
        }
    }
}

fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// One parsed listing page: extracted items plus the continuation, if any.
#[derive(Debug)]
pub struct ListingPage {
    /// Raw text bundles for every item whose title could be located.
    pub items: Vec<RawScrapeItem>,
    /// Href of the continuation link; `None` means the listing is exhausted.
    pub next_page: Option<String>,
    /// Items dropped because their title node was missing.
    pub skipped: usize,
}

/// Parse one page of the listing into raw items and a continuation.
pub fn parse_listing_page(html: &str, selectors: &ItemSelectors) -> ListingPage {
    let document = Html::parse_document(html);

    let mut items = Vec::new();
    let mut skipped = 0;
    for element in document.select(&selectors.item) {
        match extract_item(element, selectors) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    let next_page = document
        .select(&selectors.next_page)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    ListingPage {
        items,
        next_page,
        skipped,
    }
}

/// Extract one item's raw text bundle, or `None` when the title is missing.
///
/// Vote, duration, and rating nodes are optional: their absence yields
/// empty text, which the normalizers later degrade to the zero default.
pub fn extract_item(element: ElementRef<'_>, selectors: &ItemSelectors) -> Option<RawScrapeItem> {
    let name = element.select(&selectors.name).next().map(node_text)?;
    if name.is_empty() {
        return None;
    }

    let vote_text = element
        .select(&selectors.votes)
        .next()
        .map(node_text)
        .unwrap_or_default();

    let duration_text = element
        .select(&selectors.metadata)
        .nth(METADATA_DURATION_INDEX)
        .map(node_text)
        .unwrap_or_default();

    let rating_text = element.select(&selectors.rating).next().map(node_text);

    Some(RawScrapeItem {
        name,
        vote_text,
        duration_text,
        rating_text,
    })
}

fn node_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve a path to a full URL, handling both absolute and relative paths.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_html(name: &str, rating: &str, votes: &str, metadata: &[&str]) -> String {
        let metadata_spans: String = metadata
            .iter()
            .map(|m| format!(r#"<span class="dli-title-metadata-item">{}</span>"#, m))
            .collect();
        format!(
            r#"<li class="ipc-metadata-list-summary-item">
                <h3 class="ipc-title__text">{name}</h3>
                {metadata_spans}
                <span class="ipc-rating-star--rating">{rating}</span>
                <span class="ipc-rating-star--voteCount">{votes}</span>
            </li>"#
        )
    }

    #[test]
    fn test_parse_full_item() {
        let html = format!(
            "<ul>{}</ul>",
            item_html("Dune: Part Two", "8.5", "(512K)", &["2024", "2h 46m", "PG-13"])
        );
        let page = parse_listing_page(&html, &ItemSelectors::default());

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.skipped, 0);
        let item = &page.items[0];
        assert_eq!(item.name, "Dune: Part Two");
        assert_eq!(item.vote_text, "(512K)");
        assert_eq!(item.duration_text, "2h 46m");
        assert_eq!(item.rating_text.as_deref(), Some("8.5"));
    }

    #[test]
    fn test_missing_title_is_skip_signal() {
        let html = r#"<ul>
            <li class="ipc-metadata-list-summary-item">
                <span class="ipc-rating-star--rating">7.0</span>
            </li>
        </ul>"#;
        let page = parse_listing_page(html, &ItemSelectors::default());

        assert!(page.items.is_empty());
        assert_eq!(page.skipped, 1);
    }

    #[test]
    fn test_missing_optional_fields_default_empty() {
        let html = r#"<ul>
            <li class="ipc-metadata-list-summary-item">
                <h3 class="ipc-title__text">Unrated Short</h3>
            </li>
        </ul>"#;
        let page = parse_listing_page(html, &ItemSelectors::default());

        let item = &page.items[0];
        assert_eq!(item.vote_text, "");
        assert_eq!(item.duration_text, "");
        assert_eq!(item.rating_text, None);
    }

    #[test]
    fn test_next_page_link() {
        let html = r#"<div><a class="next-page" href="/search/title/?page=2">More</a></div>"#;
        let page = parse_listing_page(html, &ItemSelectors::default());
        assert_eq!(page.next_page.as_deref(), Some("/search/title/?page=2"));

        let done = parse_listing_page("<div></div>", &ItemSelectors::default());
        assert_eq!(done.next_page, None);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://example.com", "/search?page=2"),
            "https://example.com/search?page=2"
        );
        assert_eq!(
            resolve_url("https://example.com/", "/search"),
            "https://example.com/search"
        );
        assert_eq!(
            resolve_url("https://example.com", "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
