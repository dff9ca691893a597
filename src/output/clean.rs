//! Dataset cleaning helpers
//!
//! The crawler keeps prices exactly as displayed. Turning them into numbers
//! and dropping duplicate ads happens here, on the stored dataset.

use crate::output::csv_output::DatasetRow;
use std::collections::HashSet;

/// Phrases marking a listing without a fixed price
const NO_PRICE_MARKERS: &[&str] = &[
    "demande",
    "négociable",
    "negociable",
    "on request",
    "negotiable",
];

/// Parses a displayed price into a whole amount
///
/// All digit groups are concatenated, so thousands separators of any kind
/// disappear ("250 000 CFA" → 250000). Prices "on request" or "negotiable"
/// and prices without any digit yield None.
///
/// # Example
///
/// ```
/// use ad_harvest::output::parse_price;
///
/// assert_eq!(parse_price("250 000 CFA"), Some(250_000));
/// assert_eq!(parse_price("Prix sur demande"), None);
/// ```
pub fn parse_price(price: &str) -> Option<u64> {
    let lower = price.trim().to_lowercase();

    if NO_PRICE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return None;
    }

    let digits: String = lower.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// Drops rows repeating the (title, price, address) of an earlier row
///
/// The first occurrence is kept and order is otherwise preserved.
pub fn dedupe(rows: Vec<DatasetRow>) -> Vec<DatasetRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            seen.insert((
                row.record.title.clone(),
                row.record.price.clone(),
                row.record.address.clone(),
            ))
        })
        .collect()
}
