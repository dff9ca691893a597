//! Dataset statistics
//!
//! This module aggregates a loaded dataset the way the dashboard presents it:
//! ads per category, most frequent locations, and the price distribution.

use crate::output::clean::parse_price;
use crate::output::csv_output::DatasetRow;
use std::collections::HashMap;

/// Price distribution over the ads that carry a usable price
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
}

/// Summary of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// Total number of ads
    pub total_ads: usize,

    /// Ads per category, most populated first
    pub ads_by_category: Vec<(String, usize)>,

    /// Most frequent locations, most frequent first
    pub top_locations: Vec<(String, usize)>,

    /// Distribution of parsed prices, None when no ad has one
    pub prices: Option<PriceSummary>,
}

/// Aggregates a dataset
///
/// # Arguments
///
/// * `rows` - The dataset rows
/// * `top_locations` - How many locations to keep in the ranking
pub fn summarize(rows: &[DatasetRow], top_locations: usize) -> DatasetSummary {
    let mut categories: HashMap<&str, usize> = HashMap::new();
    let mut locations: HashMap<&str, usize> = HashMap::new();
    let mut prices = Vec::new();

    for row in rows {
        *categories.entry(row.category.as_str()).or_default() += 1;

        if let Some(address) = row.record.address.as_deref() {
            *locations.entry(address).or_default() += 1;
        }

        if let Some(price) = row.record.price.as_deref().and_then(parse_price) {
            prices.push(price);
        }
    }

    let mut top = ranked(locations);
    top.truncate(top_locations);

    DatasetSummary {
        total_ads: rows.len(),
        ads_by_category: ranked(categories),
        top_locations: top,
        prices: price_summary(prices),
    }
}

/// Counts sorted by descending count, then by name
fn ranked(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Keeps the rows filed under `category`
pub fn filter_category(rows: Vec<DatasetRow>, category: &str) -> Vec<DatasetRow> {
    rows.into_iter()
        .filter(|row| row.category == category)
        .collect()
}

fn price_summary(mut prices: Vec<u64>) -> Option<PriceSummary> {
    if prices.is_empty() {
        return None;
    }
    prices.sort_unstable();

    let count = prices.len();
    let mean = prices.iter().map(|&p| p as f64).sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (prices[count / 2 - 1] as f64 + prices[count / 2] as f64) / 2.0
    } else {
        prices[count / 2] as f64
    };

    Some(PriceSummary {
        count,
        min: prices[0],
        max: prices[count - 1],
        mean,
        median,
    })
}

/// Prints a dataset summary to stdout in a formatted manner
pub fn print_summary(summary: &DatasetSummary) {
    println!("=== Dataset Summary ===\n");

    println!("Overview:");
    println!("  Total ads: {}", summary.total_ads);
    println!();

    if !summary.ads_by_category.is_empty() {
        println!("Ads by Category:");
        for (category, count) in &summary.ads_by_category {
            let percentage = (*count as f64 / summary.total_ads as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", category, count, percentage);
        }
        println!();
    }

    if !summary.top_locations.is_empty() {
        println!("Top Locations:");
        for (location, count) in &summary.top_locations {
            println!("  - {} ({})", location, count);
        }
        println!();
    }

    match &summary.prices {
        Some(prices) => {
            println!("Prices ({} ads with a price):", prices.count);
            println!("  Min: {} CFA", prices.min);
            println!("  Max: {} CFA", prices.max);
            println!("  Mean: {:.0} CFA", prices.mean);
            println!("  Median: {:.0} CFA", prices.median);
        }
        None => println!("Prices: no ad with a usable price"),
    }
}
