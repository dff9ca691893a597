//! Listing walker
//!
//! Turns one listing page of a category into a [`PageBatch`]: the listing page
//! is fetched once, every ad container on it is resolved to its detail page,
//! and each detail page is fetched under the retry policy and extracted.

use crate::crawler::extractor::extract_ad;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{Document, MarkupQuery, NodeRead};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::CrawlError;
use crate::dataset::{AdRecord, PageBatch, Skipped};
use crate::url::{page_url, resolve_href};
use std::time::Duration;
use url::Url;

/// Tag and class of one listing card
const CONTAINER_TAG: &str = "div";
const CONTAINER_CLASS: &str = "col s6 m4 l3";

/// Walks listing pages of a category, one ad at a time
#[derive(Debug, Clone)]
pub struct ListingWalker<F> {
    fetcher: F,
    retry: RetryPolicy,
    listing_timeout: Duration,
    page_param: String,
}

impl<F: Fetcher> ListingWalker<F> {
    pub fn new(fetcher: F, retry: RetryPolicy, listing_timeout: Duration) -> Self {
        Self {
            fetcher,
            retry,
            listing_timeout,
            page_param: "page".to_string(),
        }
    }

    /// Overrides the name of the page-number query parameter
    pub fn with_page_param(mut self, page_param: impl Into<String>) -> Self {
        self.page_param = page_param.into();
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches listing page `page_index` of the category at `base_url`
    ///
    /// # Returns
    ///
    /// * `Ok(PageBatch)` - Records in container order; ads that could not be
    ///   fetched are listed in `skipped` instead
    /// * `Err(CrawlError::PageFetch)` - The listing page itself is unavailable
    pub async fn walk_page(&self, base_url: &Url, page_index: u32) -> Result<PageBatch, CrawlError> {
        let listing_url = page_url(base_url, &self.page_param, page_index);
        tracing::debug!("Fetching listing page {}", listing_url);

        let body = self
            .fetcher
            .fetch(listing_url.as_str(), self.listing_timeout)
            .await
            .map_err(|source| CrawlError::PageFetch { page_index, source })?;

        let hrefs = container_hrefs(&body);
        tracing::debug!(
            "Found {} ad containers on page {}",
            hrefs.len(),
            page_index
        );

        let mut batch = PageBatch::new(page_index);

        for (position, href) in hrefs.into_iter().enumerate() {
            let Some(href) = href else {
                tracing::warn!(
                    "Ad container {} on {} has no link, skipping",
                    position + 1,
                    listing_url
                );
                batch.skipped.push(Skipped::Ad {
                    url: listing_url.to_string(),
                    reason: format!("container {} has no link", position + 1),
                });
                continue;
            };

            let Some(ad_url) = resolve_href(base_url, &href) else {
                tracing::warn!("Unresolvable ad link '{}', skipping", href);
                batch.skipped.push(Skipped::Ad {
                    url: href,
                    reason: "unresolvable link".to_string(),
                });
                continue;
            };

            match self.fetch_ad(&ad_url).await {
                Ok(record) => {
                    tracing::debug!("Extracted {}", record);
                    batch.records.push(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping ad: {}", e);
                    batch.skipped.push(Skipped::Ad {
                        url: ad_url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }

    /// Fetches one ad-detail page under the retry policy and extracts it
    pub async fn fetch_ad(&self, ad_url: &Url) -> Result<AdRecord, CrawlError> {
        tracing::debug!("Fetching ad {}", ad_url);

        let timeout = self.retry.timeout;
        let body = self
            .retry
            .run(ad_url.as_str(), |_| self.fetcher.fetch(ad_url.as_str(), timeout))
            .await
            .map_err(|source| CrawlError::AdFetch {
                url: ad_url.to_string(),
                attempts: self.retry.max_attempts.max(1),
                source,
            })?;

        Ok(extract_ad(&Document::parse(&body)))
    }
}

/// Hrefs of the ad containers of a listing page, in document order
///
/// A container without a link yields `None` so its position is kept.
fn container_hrefs(body: &[u8]) -> Vec<Option<String>> {
    let document = Document::parse(body);
    document
        .all_with_class(CONTAINER_TAG, CONTAINER_CLASS)
        .iter()
        .map(|container| {
            container
                .first_with_attr("a", "href")
                .and_then(|link| link.attr("href").map(str::to_string))
        })
        .collect()
}
