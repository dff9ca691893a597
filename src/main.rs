//! Ad-Harvest main entry point
//!
//! This is the command-line interface for the Ad-Harvest classified-ads crawler.

use ad_harvest::config::{load_config_or_default, CategoryCatalog, Config};
use ad_harvest::crawler::{Coordinator, MAX_PAGES};
use ad_harvest::output::{
    filter_category, list_datasets, load_dataset, print_summary, read_dataset_file, save_dataset,
    summarize,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ad-Harvest: a polite classified-ads harvester
///
/// Ad-Harvest walks the listing pages of one marketplace category, visits
/// every ad and extracts its title, price, location and main picture.
#[derive(Parser, Debug)]
#[command(name = "ad-harvest")]
#[command(version)]
#[command(about = "A polite classified-ads harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured categories
    Categories,

    /// Crawl the listing pages of one category
    Crawl {
        /// Category display name or slug
        category: String,

        /// Number of listing pages to crawl
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGES as i64))]
        pages: u32,

        /// Directory to write the dataset to (overrides the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not write the dataset to disk
        #[arg(long, conflicts_with = "output")]
        no_save: bool,
    },

    /// Summarize every dataset stored in a directory
    Stats {
        /// Data directory (defaults to the configured one)
        dir: Option<PathBuf>,

        /// Number of locations to rank
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Only summarize ads of this category (display name or slug)
        #[arg(long)]
        category: Option<String>,
    },

    /// List the dataset files stored in a directory
    Datasets {
        /// Data directory (defaults to the configured one)
        dir: Option<PathBuf>,

        /// Print the first N ads of every file
        #[arg(long, value_name = "N")]
        head: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    match cli.command {
        Command::Categories => handle_categories(&config),
        Command::Crawl {
            category,
            pages,
            output,
            no_save,
        } => handle_crawl(config, &category, pages, output, no_save).await,
        Command::Stats { dir, top, category } => {
            handle_stats(&config, dir, top, category.as_deref())
        }
        Command::Datasets { dir, head } => handle_datasets(&config, dir, head),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ad_harvest=info,warn"),
            1 => EnvFilter::new("ad_harvest=debug,info"),
            2 => EnvFilter::new("ad_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `categories`: prints the catalog
fn handle_categories(config: &Config) -> anyhow::Result<()> {
    let catalog = CategoryCatalog::from_config(config)?;

    println!("Categories ({}):", catalog.len());
    for category in catalog.iter() {
        println!("  - {} [{}]", category.name(), category.slug());
        println!("    {}", category.base_url());
    }

    Ok(())
}

/// Handles `crawl`: runs the crawl and stores the dataset
async fn handle_crawl(
    mut config: Config,
    category: &str,
    pages: u32,
    output: Option<PathBuf>,
    no_save: bool,
) -> anyhow::Result<()> {
    if let Some(dir) = output {
        config.output.data_dir = dir.to_string_lossy().into_owned();
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if is_repeated_interrupt(&cancel) {
                    tracing::warn!("Second interrupt, exiting immediately");
                    std::process::exit(130);
                }
                tracing::warn!(
                    "Interrupt received, stopping after the current page (press Ctrl-C again to force)"
                );
            }
        });
    }

    let coordinator = Coordinator::from_config(&config)?.with_cancel_flag(cancel);
    let category = coordinator
        .catalog()
        .get(category)
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown category '{}', expected one of: {}",
                category,
                coordinator.catalog().names().join(", ")
            )
        })?;

    let result = coordinator
        .crawl_with_progress(category.name(), pages, |current, total| {
            let percent = current * 100 / total;
            println!("[{:>3}%] page {}/{}", percent, current, total);
        })
        .await?;

    if result.is_empty() {
        println!("No ads found. Check your connection or try again later.");
        return Ok(());
    }

    println!(
        "✓ {} ads harvested from {} pages",
        result.len(),
        result.pages_attempted
    );
    if !result.skipped.is_empty() {
        println!("  {} items skipped:", result.skipped.len());
        for skipped in &result.skipped {
            println!("    - {}", skipped);
        }
    }

    if !no_save {
        let path = save_dataset(&result.records, &category, &config.output)
            .context("Failed to save dataset")?;
        println!("✓ Dataset written to: {}", path.display());
    }

    Ok(())
}

/// Raises the cancel flag, returning true when it was already raised
fn is_repeated_interrupt(cancel: &AtomicBool) -> bool {
    cancel.swap(true, Ordering::SeqCst)
}

/// Handles `stats`: loads stored datasets and prints their summary
fn handle_stats(
    config: &Config,
    dir: Option<PathBuf>,
    top: usize,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = CategoryCatalog::from_config(config)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output.data_dir));

    println!("Data directory: {}\n", dir.display());

    let mut rows = load_dataset(&dir, &catalog)
        .with_context(|| format!("Failed to load datasets from {}", dir.display()))?;

    if let Some(name) = category {
        let category = catalog.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown category '{}', expected one of: {}",
                name,
                catalog.names().join(", ")
            )
        })?;
        println!("Category: {}\n", category.name());
        rows = filter_category(rows, category.name());
    }

    if rows.is_empty() {
        println!("No data found.");
        return Ok(());
    }

    print_summary(&summarize(&rows, top));
    Ok(())
}

/// Handles `datasets`: lists stored files, optionally previewing each one
fn handle_datasets(config: &Config, dir: Option<PathBuf>, head: Option<usize>) -> anyhow::Result<()> {
    let catalog = CategoryCatalog::from_config(config)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output.data_dir));

    let files = list_datasets(&dir, &catalog)
        .with_context(|| format!("Failed to list datasets in {}", dir.display()))?;

    if files.is_empty() {
        println!("No dataset files in {}", dir.display());
        return Ok(());
    }

    println!("Datasets in {} ({}):", dir.display(), files.len());
    for file in &files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match file.rows {
            Some(rows) => println!("  - {} [{}] {} ads", name, file.category, rows),
            None => println!("  - {} [{}] unreadable", name, file.category),
        }

        if let (Some(n), Some(_)) = (head, file.rows) {
            for record in read_dataset_file(&file.path)?.iter().take(n) {
                println!("      {}", record);
            }
        }
    }

    Ok(())
}
