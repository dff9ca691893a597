//! Crawler module for category listing crawls
//!
//! This module contains the crawl-and-extract pipeline, leaf first:
//! - HTTP fetching with per-request timeouts
//! - HTML parsing behind a small query interface
//! - Field extraction from ad-detail pages
//! - Bounded retry for ad-detail fetches
//! - Listing page walking
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod retry;
mod walker;

pub use coordinator::{Coordinator, MAX_PAGES};
pub use extractor::{background_image_url, extract_ad};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use parser::{Document, MarkupQuery, Node, NodeRead};
pub use retry::RetryPolicy;
pub use walker::ListingWalker;

use crate::config::Config;
use crate::dataset::CrawlResult;
use thiserror::Error;

/// Recoverable failures inside a crawl
///
/// Neither variant ever escapes [`Coordinator::crawl`]: a failed listing page
/// is skipped by the coordinator, a failed ad is skipped by the walker.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("listing page {page_index} unavailable: {source}")]
    PageFetch { page_index: u32, source: FetchError },

    #[error("ad {url} unavailable after {attempts} attempts: {source}")]
    AdFetch {
        url: String,
        attempts: u32,
        source: FetchError,
    },
}

/// Runs a complete category crawl over HTTP
///
/// This is the main entry point. It will:
/// 1. Build the category catalog and the HTTP client from `config`
/// 2. Validate the category and page count
/// 3. Walk listing pages 1..=`num_pages`, extracting every ad
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `category` - Display name (or slug) of a catalog category
/// * `num_pages` - Number of listing pages, 1 to 50
///
/// # Example
///
/// ```no_run
/// use ad_harvest::config::Config;
/// use ad_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = crawl(&Config::default(), "Dogs", 2).await?;
/// println!("{} ads", result.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, category: &str, num_pages: u32) -> crate::Result<CrawlResult> {
    Coordinator::from_config(config)?
        .crawl(category, num_pages)
        .await
}
