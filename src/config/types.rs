use serde::Deserialize;

/// Main configuration structure for Ad-Harvest
///
/// Every section is optional; a missing section falls back to the defaults the
/// crawler was tuned with against the live marketplace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Category overrides; empty means the built-in catalog is used
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Listing-walk behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause between two listing pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Timeout for a single listing page request (seconds)
    #[serde(rename = "listing-timeout-secs")]
    pub listing_timeout_secs: u64,

    /// Name of the query parameter carrying the page number
    #[serde(rename = "page-param")]
    pub page_param: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 700,
            listing_timeout_secs: 30,
            page_param: "page".to_string(),
        }
    }
}

/// Retry budget for ad-detail fetches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the first one included
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed pause between two attempts (milliseconds)
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,

    /// Timeout of one attempt (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 1000,
            timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "AdHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV datasets are written to and loaded from
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Leading component of every dataset file name
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            file_prefix: "coinafrique".to_string(),
        }
    }
}

/// One category of the marketplace taxonomy
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Display name (e.g. "Dogs")
    pub name: String,

    /// Base listing URL of the category
    pub url: String,

    /// Filename tag; defaults to the last path segment of `url`
    #[serde(default)]
    pub slug: Option<String>,
}
