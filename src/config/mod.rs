//! Configuration module for Ad-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and owns the read-only category catalog the crawler is driven by.
//!
//! # Example
//!
//! ```no_run
//! use ad_harvest::config::{load_config, CategoryCatalog};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! let catalog = CategoryCatalog::from_config(&config).unwrap();
//! println!("{} categories configured", catalog.len());
//! ```

mod catalog;
mod parser;
mod types;
mod validation;

pub use catalog::{Category, CategoryCatalog, UNCATEGORIZED};
pub use types::{
    CategoryEntry, Config, CrawlerConfig, OutputConfig, RetryConfig, UserAgentConfig,
};

pub use parser::{load_config, load_config_or_default};
