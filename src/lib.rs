//! Ad-Harvest: a polite classified-ads harvester
//!
//! This crate walks the paginated listing of one marketplace category, follows
//! every ad container to its detail page, and extracts a small structured record
//! (title, price, location, primary image) per ad.

pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Ad-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown category '{name}', expected one of: {}", available.join(", "))]
    InvalidCategory {
        name: String,
        available: Vec<String>,
    },

    #[error("Page count must be between 1 and {max}, got {got}")]
    InvalidPageCount { got: u32, max: u32 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Ad-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CategoryCatalog, Config};
pub use crawler::{crawl, Coordinator, RetryPolicy};
pub use dataset::{AdRecord, CrawlResult, PageBatch, Skipped, NOT_AVAILABLE};
