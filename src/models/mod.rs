//! Data models for cinescrape.

mod movie;

pub use movie::{MovieRecord, RawScrapeItem};
