//! Ad-detail field extraction
//!
//! Each field is looked up independently and a miss only blanks that field.

use crate::crawler::parser::{MarkupQuery, NodeRead};
use crate::dataset::AdRecord;
use regex::Regex;
use std::sync::LazyLock;

const TITLE_TAG: &str = "h1";
const PRICE_TAG: &str = "p";
const PRICE_CLASS: &str = "price";
const ADDRESS_TAG: &str = "span";
const ADDRESS_ATTR: &str = "data-address";
const SLIDE_TAG: &str = "div";
const SLIDE_CLASS: &str = "swiper-slide";

/// Currency markers stripped from the end of a price, longest first
const CURRENCY_MARKERS: &[&str] = &["FCFA", "CFA"];

static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^"'\s)]+))\s*\)"#)
        .expect("background url regex")
});

/// Extracts the ad record from a parsed ad-detail page
///
/// # Field Rules
///
/// | Field | Source |
/// |-------|--------|
/// | title | text of the first `h1` |
/// | price | text of the first `p.price`, trailing currency marker removed |
/// | address | `data-address` of the first `span` carrying it |
/// | image_url | `url(...)` in the style of the first `div.swiper-slide` that has one |
///
/// Empty values count as missing.
pub fn extract_ad<Q: MarkupQuery>(doc: &Q) -> AdRecord {
    AdRecord {
        title: extract_title(doc),
        price: extract_price(doc),
        address: extract_address(doc),
        image_url: extract_image_url(doc),
    }
}

fn extract_title<Q: MarkupQuery>(doc: &Q) -> Option<String> {
    doc.first(TITLE_TAG).map(|h| h.text()).and_then(non_empty)
}

fn extract_price<Q: MarkupQuery>(doc: &Q) -> Option<String> {
    let text = doc.first_with_class(PRICE_TAG, PRICE_CLASS)?.text();
    non_empty(strip_currency(&text).to_string())
}

fn extract_address<Q: MarkupQuery>(doc: &Q) -> Option<String> {
    doc.first_with_attr(ADDRESS_TAG, ADDRESS_ATTR)
        .and_then(|span| span.attr(ADDRESS_ATTR).map(|a| a.trim().to_string()))
        .and_then(non_empty)
}

fn extract_image_url<Q: MarkupQuery>(doc: &Q) -> Option<String> {
    doc.all_with_class(SLIDE_TAG, SLIDE_CLASS)
        .iter()
        .filter_map(|slide| slide.attr("style"))
        .find_map(background_image_url)
}

/// Pulls the URL out of a CSS `url(...)` reference
///
/// Double-quoted, single-quoted and bare arguments are accepted.
///
/// # Example
///
/// ```
/// use ad_harvest::crawler::background_image_url;
///
/// assert_eq!(
///     background_image_url("background-image: url('https://img.example.com/a.jpg');"),
///     Some("https://img.example.com/a.jpg".to_string())
/// );
/// assert_eq!(background_image_url("color: red"), None);
/// ```
pub fn background_image_url(style: &str) -> Option<String> {
    let captures = BACKGROUND_URL.captures(style)?;
    let url = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?
        .as_str()
        .trim();

    non_empty(url.to_string())
}

fn strip_currency(price: &str) -> &str {
    let price = price.trim();
    CURRENCY_MARKERS
        .iter()
        .find_map(|marker| price.strip_suffix(marker))
        .unwrap_or(price)
        .trim()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
