//! URL handling module for Ad-Harvest
//!
//! This module builds paginated listing URLs and resolves the hrefs found in ad
//! containers against the category they were discovered on.

mod resolve;

pub use resolve::{page_url, resolve_href, site_origin};
