//! Input boundary: loading reference data and review CSVs
//!
//! The fetch stage that produces these files is outside this crate; the
//! formats here are its output contract. An unreadable product table is
//! fatal, an unreadable individual review file is reported and skipped so
//! the rest of the batch still processes.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ReviewCompareError, Result};
use crate::models::{Product, RawReviewRecord, Review};

/// Load the product reference table. Fatal when missing or malformed.
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ReviewCompareError::ProductTable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut products = Vec::new();
    for record in reader.deserialize() {
        let product: Product = record.map_err(|e| ReviewCompareError::ProductTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        products.push(product);
    }

    info!(count = products.len(), path = %path.display(), "loaded product table");
    Ok(products)
}

/// List raw review files (`reviews*.csv`) in a directory, sorted by name.
pub fn list_review_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ReviewCompareError::InputUnreadable {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("reviews") && n.ends_with(".csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load all raw review records from a directory of `reviews*.csv` files.
///
/// Malformed rows and unreadable files are counted and skipped; only a
/// completely unreadable directory is an error.
pub fn load_raw_reviews(dir: &Path) -> Result<Vec<RawReviewRecord>> {
    let files = list_review_files(dir)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "no reviews*.csv files found");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for file in files {
        match read_raw_file(&file) {
            Ok(mut file_records) => {
                info!(path = %file.display(), count = file_records.len(), "loaded raw reviews");
                records.append(&mut file_records);
            }
            Err(e) => {
                warn!(path = %file.display(), error = %e, "skipping unreadable review file");
            }
        }
    }
    Ok(records)
}

fn read_raw_file(path: &Path) -> Result<Vec<RawReviewRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    let mut malformed = 0usize;
    for record in reader.deserialize() {
        match record {
            Ok(raw) => records.push(raw),
            Err(_) => malformed += 1,
        }
    }
    if malformed > 0 {
        warn!(path = %path.display(), malformed, "skipped malformed raw rows");
    }
    Ok(records)
}

/// Load cleaned (or sentiment-scored) reviews written by an earlier stage.
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ReviewCompareError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut reviews = Vec::new();
    for record in reader.deserialize() {
        let review: Review = record?;
        reviews.push(review);
    }
    info!(count = reviews.len(), path = %path.display(), "loaded reviews");
    Ok(reviews)
}

/// Load a keyword table written by the keywords stage.
pub fn load_keywords(path: &Path) -> Result<Vec<crate::models::KeywordEntry>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ReviewCompareError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut entries = Vec::new();
    for record in reader.deserialize() {
        let entry: crate::models::KeywordEntry = record?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_products() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("products.csv");
        let mut file = fs::File::create(&path).expect("create");
        writeln!(file, "product_id,brand,product_name,flavor,size,notes").expect("write");
        writeln!(file, "p1,Acme,Acme Dry Mix,chicken,5 lb,").expect("write");
        drop(file);

        let products = load_products(&path).expect("load");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "p1");
        assert_eq!(products[0].brand, "Acme");
    }

    #[test]
    fn test_missing_product_table_is_fatal() {
        let result = load_products(Path::new("/nonexistent/products.csv"));
        assert!(matches!(
            result,
            Err(ReviewCompareError::ProductTable { .. })
        ));
    }

    #[test]
    fn test_load_raw_reviews_empty_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let records = load_raw_reviews(dir.path()).expect("load");
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_raw_reviews_missing_optional_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reviews_p1.csv");
        let mut file = fs::File::create(&path).expect("create");
        writeln!(file, "review_id,product_id,rating,text").expect("write");
        writeln!(file, "r1,p1,5,pretty good food overall").expect("write");
        drop(file);

        let records = load_raw_reviews(dir.path()).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].verified, None);
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn test_list_review_files_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["reviews_p2.csv", "reviews_p1.csv", "other.csv"] {
            let mut file = fs::File::create(dir.path().join(name)).expect("create");
            writeln!(file, "review_id,product_id").expect("write");
        }
        let files = list_review_files(dir.path()).expect("list");
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("reviews_p1.csv"));
        assert!(files[1].ends_with("reviews_p2.csv"));
    }
}
