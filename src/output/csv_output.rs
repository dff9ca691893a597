//! CSV persistence of crawl datasets
//!
//! Files are named `<prefix>_<category-slug>_<timestamp>.csv`; the slug in the
//! name is what lets a stored file be tagged with its category again.

use crate::config::{Category, CategoryCatalog, OutputConfig};
use crate::crawler::background_image_url;
use crate::dataset::AdRecord;
use crate::output::clean::dedupe;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Column order of every dataset file written by the harvester
pub const CSV_HEADER: [&str; 4] = ["title", "price", "address", "image_url"];

/// An ad loaded back from a dataset file, with the category it was filed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub category: String,
    pub record: AdRecord,
}

/// Writes records as CSV, absent fields as "N/A"
///
/// The header is always written, even for an empty record list.
pub fn write_csv<W: Write>(records: &[AdRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads records from CSV with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<AdRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: AdRecord = row?;
        records.push(normalize_image_url(record));
    }
    Ok(records)
}

/// File name of a dataset for `category` saved at `timestamp`
pub fn dataset_file_name(prefix: &str, category: &Category, timestamp: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.csv",
        prefix,
        category.slug(),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Saves a crawl's records into the configured data directory
///
/// # Returns
///
/// The path of the written file
pub fn save_dataset(records: &[AdRecord], category: &Category, config: &OutputConfig) -> Result<PathBuf> {
    let dir = Path::new(&config.data_dir);
    fs::create_dir_all(dir)?;

    let path = dir.join(dataset_file_name(&config.file_prefix, category, Local::now()));
    let file = File::create(&path)?;
    write_csv(records, file)?;

    tracing::info!("Saved {} ads to {}", records.len(), path.display());
    Ok(path)
}

/// Lists the CSV files of a directory, sorted by name
pub fn list_dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Loads every dataset file of `dir` into one deduplicated table
///
/// Each row is tagged with the category recovered from its file name.
/// Unreadable files are skipped with a warning; a missing directory yields an
/// empty table.
pub fn load_dataset(dir: &Path, catalog: &CategoryCatalog) -> Result<Vec<DatasetRow>> {
    let mut rows = Vec::new();

    for path in list_dataset_files(dir)? {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let category = catalog.category_from_file_name(&file_name).to_string();

        let records = match read_dataset_file(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping unreadable dataset {}: {}", path.display(), e);
                continue;
            }
        };

        tracing::debug!("Loaded {} ads from {} ({})", records.len(), file_name, category);
        rows.extend(records.into_iter().map(|record| DatasetRow {
            category: category.clone(),
            record,
        }));
    }

    Ok(dedupe(rows))
}

/// A stored dataset file with the category its name maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub path: PathBuf,
    pub category: String,

    /// Number of ads in the file, None when it could not be read
    pub rows: Option<usize>,
}

/// Describes every dataset file of `dir`, sorted by name
pub fn list_datasets(dir: &Path, catalog: &CategoryCatalog) -> Result<Vec<DatasetFile>> {
    let files = list_dataset_files(dir)?
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let category = catalog.category_from_file_name(&file_name).to_string();
            let rows = match read_dataset_file(&path) {
                Ok(records) => Some(records.len()),
                Err(e) => {
                    tracing::warn!("Cannot read dataset {}: {}", path.display(), e);
                    None
                }
            };
            DatasetFile {
                path,
                category,
                rows,
            }
        })
        .collect();
    Ok(files)
}

/// Reads the records of a single dataset file
pub fn read_dataset_file(path: &Path) -> Result<Vec<AdRecord>> {
    read_csv(File::open(path)?)
}

/// Datasets exported by the browser extension store the raw slide style
/// instead of the URL itself.
fn normalize_image_url(mut record: AdRecord) -> AdRecord {
    if let Some(raw) = record.image_url.as_deref() {
        if raw.contains("url(") {
            record.image_url = background_image_url(raw);
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn record(title: &str, price: Option<&str>, address: Option<&str>) -> AdRecord {
        AdRecord {
            title: Some(title.to_string()),
            price: price.map(str::to_string),
            address: address.map(str::to_string),
            image_url: None,
        }
    }

    #[test]
    fn test_write_csv_uses_sentinel() {
        let mut out = Vec::new();
        write_csv(&[record("Bélier", Some("150 000"), None)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "title,price,address,image_url\nBélier,150 000,N/A,N/A\n"
        );
    }

    #[test]
    fn test_write_csv_empty_still_has_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "title,price,address,image_url\n");
    }

    #[test]
    fn test_read_csv_maps_sentinel_back_to_absent() {
        let records = read_csv("title,price,address,image_url\nChiot,N/A,Dakar,N/A\n".as_bytes())
            .unwrap();
        assert_eq!(records, vec![record("Chiot", None, Some("Dakar"))]);
    }

    #[test]
    fn test_read_extension_export_columns() {
        let csv = concat!(
            "web_scraper_order,Nom,prix,adresse,image_lien\n",
            "1-1,Poussins,2 500 CFA,Rufisque,\"background-image: url(\"\"https://img.example/p.jpg\"\");\"\n",
        );
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Poussins");
        assert_eq!(records[0].price(), "2 500 CFA");
        assert_eq!(records[0].address(), "Rufisque");
        assert_eq!(records[0].image_url(), "https://img.example/p.jpg");
    }

    #[test]
    fn test_dataset_file_name() {
        let catalog = CategoryCatalog::builtin();
        let category = catalog.get("Dogs").unwrap();
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            dataset_file_name("coinafrique", category, timestamp),
            "coinafrique_chiens_20240309_140507.csv"
        );
    }

    #[test]
    fn test_save_and_load_round_trip_tags_category() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
            file_prefix: "coinafrique".to_string(),
        };
        let catalog = CategoryCatalog::builtin();

        save_dataset(
            &[record("Ladoum", Some("900 000"), Some("Thiès"))],
            catalog.get("Sheep").unwrap(),
            &config,
        )
        .unwrap();

        let rows = load_dataset(Path::new(&config.data_dir), &catalog).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Sheep");
        assert_eq!(rows[0].record.title(), "Ladoum");
    }

    #[test]
    fn test_load_dataset_dedupes_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a_chiens.csv"),
            "title,price,address,image_url\nChiot,50 000,Dakar,N/A\nChiot,50 000,Dakar,https://x/1.jpg\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b_moutons.csv"),
            "title,price,address,image_url\nChiot,50 000,Dakar,N/A\nBélier,N/A,Touba,N/A\n",
        )
        .unwrap();
        fs::write(dir.path().join("c_broken.csv"), b"title,price\n\xff\xfe,1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let rows = load_dataset(dir.path(), &CategoryCatalog::builtin()).unwrap();

        let summary: Vec<_> = rows
            .iter()
            .map(|row| (row.category.as_str(), row.record.title()))
            .collect();
        assert_eq!(summary, vec![("Dogs", "Chiot"), ("Sheep", "Bélier")]);
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let rows = load_dataset(Path::new("/nonexistent/data"), &CategoryCatalog::builtin()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_list_datasets_reports_category_and_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("coinafrique_chiens_20240101_120000.csv"),
            "title,price,address,image_url\nChiot,50 000,Dakar,N/A\nTeckel,N/A,Thiès,N/A\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("coinafrique_moutons_20240102_120000.csv"),
            "title,price,address,image_url\n",
        )
        .unwrap();
        fs::write(dir.path().join("zz_broken.csv"), b"title,price\n\xff\xfe,1\n").unwrap();

        let files = list_datasets(dir.path(), &CategoryCatalog::builtin()).unwrap();

        let listing: Vec<_> = files
            .iter()
            .map(|f| (f.category.as_str(), f.rows))
            .collect();
        assert_eq!(
            listing,
            vec![("Dogs", Some(2)), ("Sheep", Some(0)), ("Uncategorized", None)]
        );
        assert!(files[0].path.ends_with("coinafrique_chiens_20240101_120000.csv"));
    }
}
