//! Output module for crawl datasets
//!
//! This module handles:
//! - Writing crawl results to CSV files named after their category
//! - Loading a directory of datasets back into one deduplicated table
//! - Price parsing and dataset summaries

mod clean;
mod csv_output;
pub mod stats;

pub use clean::{dedupe, parse_price};
pub use csv_output::{
    dataset_file_name, list_dataset_files, list_datasets, load_dataset, read_csv,
    read_dataset_file, save_dataset, write_csv, DatasetFile, DatasetRow, CSV_HEADER,
};
pub use stats::{filter_category, print_summary, summarize, DatasetSummary, PriceSummary};
