//! Crawler coordinator - category crawl orchestration
//!
//! This module drives a whole category crawl:
//! - Validating the category and page count up front
//! - Walking listing pages 1..=N strictly in order
//! - Folding page batches into the crawl result
//! - Reporting progress after every attempted page
//! - Pacing successive listing pages
//! - Stopping early when the caller raises the cancel flag

use crate::config::{CategoryCatalog, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::walker::ListingWalker;
use crate::dataset::CrawlResult;
use crate::{HarvestError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Largest number of listing pages a single crawl may request
pub const MAX_PAGES: u32 = 50;

/// Main crawl coordinator
///
/// A coordinator owns no per-crawl state, so one instance can serve several
/// sequential crawls. Concurrent crawls should each use their own instance.
pub struct Coordinator<F> {
    walker: ListingWalker<F>,
    catalog: CategoryCatalog,
    page_delay: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator backed by the HTTP fetcher
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid catalog or HTTP client construction failure
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.user_agent)?;
        let catalog = CategoryCatalog::from_config(config)?;
        Ok(Self::new(fetcher, catalog, config))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator over an arbitrary transport
    pub fn new(fetcher: F, catalog: CategoryCatalog, config: &Config) -> Self {
        let walker = ListingWalker::new(
            fetcher,
            RetryPolicy::from(&config.retry),
            Duration::from_secs(config.crawler.listing_timeout_secs),
        )
        .with_page_param(config.crawler.page_param.clone());

        Self {
            walker,
            catalog,
            page_delay: Duration::from_millis(config.crawler.page_delay_ms),
            cancel: None,
        }
    }

    /// Installs a flag that stops the crawl at the next page boundary once set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Crawls `num_pages` listing pages of `category` without progress reporting
    pub async fn crawl(&self, category: &str, num_pages: u32) -> Result<CrawlResult> {
        self.crawl_with_progress(category, num_pages, |_, _| {}).await
    }

    /// Crawls `num_pages` listing pages of `category`
    ///
    /// `progress` is called with `(page_index, num_pages)` once per attempted
    /// page, in increasing order, before the next page starts. Pages whose
    /// listing could not be fetched still count as attempted.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Every record that could be extracted, possibly none
    /// * `Err(HarvestError::InvalidCategory)` - `category` is not in the catalog
    /// * `Err(HarvestError::InvalidPageCount)` - `num_pages` outside 1..=50
    pub async fn crawl_with_progress<P>(
        &self,
        category: &str,
        num_pages: u32,
        mut progress: P,
    ) -> Result<CrawlResult>
    where
        P: FnMut(u32, u32),
    {
        let category = self
            .catalog
            .get(category)
            .ok_or_else(|| HarvestError::InvalidCategory {
                name: category.to_string(),
                available: self.catalog.names(),
            })?;

        if num_pages == 0 || num_pages > MAX_PAGES {
            return Err(HarvestError::InvalidPageCount {
                got: num_pages,
                max: MAX_PAGES,
            });
        }

        tracing::info!(
            "Crawling category '{}' ({} pages) from {}",
            category.name(),
            num_pages,
            category.base_url()
        );

        let start_time = std::time::Instant::now();
        let mut result = CrawlResult::default();

        for page_index in 1..=num_pages {
            if self.is_cancelled() {
                tracing::info!("Crawl cancelled before page {}", page_index);
                break;
            }

            result = match self.walker.walk_page(category.base_url(), page_index).await {
                Ok(batch) => {
                    tracing::info!(
                        "Page {}/{}: {} ads extracted, {} skipped",
                        page_index,
                        num_pages,
                        batch.len(),
                        batch.skipped.len()
                    );
                    result.merge(batch)
                }
                Err(e) => {
                    tracing::warn!("Page {}/{} skipped: {}", page_index, num_pages, e);
                    result.skip_page(page_index, e.to_string())
                }
            };

            progress(page_index, num_pages);

            if page_index < num_pages && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        tracing::info!(
            "Crawl finished: {} ads from {} pages in {:?} ({} pages and {} ads skipped)",
            result.len(),
            result.pages_attempted,
            start_time.elapsed(),
            result.pages_skipped(),
            result.ads_skipped()
        );

        Ok(result)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}
