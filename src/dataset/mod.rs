//! Dataset types produced by a crawl
//!
//! - `AdRecord`: the four fields extracted from one ad-detail page
//! - `PageBatch`: the records of one listing page, in container order
//! - `CrawlResult`: all page batches of a crawl, in page order

mod record;

pub use record::{AdRecord, NOT_AVAILABLE};

use std::fmt;

/// Something the crawl had to leave out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// A listing page that could not be fetched
    Page { index: u32, reason: String },

    /// An ad container whose detail page or href could not be used
    Ad { url: String, reason: String },
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skipped::Page { index, reason } => write!(f, "page {}: {}", index, reason),
            Skipped::Ad { url, reason } => write!(f, "ad {}: {}", url, reason),
        }
    }
}

/// Records extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBatch {
    /// 1-based page index
    pub page_index: u32,

    /// Records in document order of their ad containers
    pub records: Vec<AdRecord>,

    /// Containers that produced no record
    pub skipped: Vec<Skipped>,
}

impl PageBatch {
    pub fn new(page_index: u32) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of a full category crawl
///
/// An empty result is a valid outcome: it means no listing page yielded any
/// ad. Callers present it as "no data" rather than as a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlResult {
    /// Records of every page, in ascending page order
    pub records: Vec<AdRecord>,

    /// Pages and ads left out of `records`
    pub skipped: Vec<Skipped>,

    /// Number of listing pages attempted
    pub pages_attempted: u32,
}

impl CrawlResult {
    /// Folds one page batch into the result
    ///
    /// Batches must be merged in ascending page order.
    pub fn merge(mut self, batch: PageBatch) -> Self {
        self.records.extend(batch.records);
        self.skipped.extend(batch.skipped);
        self.pages_attempted += 1;
        self
    }

    /// Accounts for a listing page that produced no batch
    pub fn skip_page(mut self, index: u32, reason: String) -> Self {
        self.skipped.push(Skipped::Page { index, reason });
        self.pages_attempted += 1;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of listing pages that failed outright
    pub fn pages_skipped(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, Skipped::Page { .. }))
            .count()
    }

    /// Number of ads left out of the records
    pub fn ads_skipped(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, Skipped::Ad { .. }))
            .count()
    }
}
