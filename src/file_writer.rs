//! Output boundary: writing pipeline artifacts
//!
//! Every stage's data output lands here: cleaned/scored review CSVs, the
//! keyword table (tabular CSV plus nested JSON), and the comparison table
//! (flat CSV plus nested JSON). Writing happens once per run as the final
//! single-writer step; there is no partial output on failure beyond the file
//! being written at the time.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::{Bucket, ComparisonRecord, KeywordEntry, RankedTerm, Review};

/// Flat comparison row for the tabular serialization. The nested keyword
/// lists collapse to the top positive/negative terms joined with "; ".
#[derive(Debug, Serialize)]
struct ComparisonRow<'a> {
    product_id: &'a str,
    display_name: &'a str,
    brand: &'a str,
    product_name: &'a str,
    flavor: &'a str,
    size: &'a str,
    review_count: usize,
    r1: usize,
    r2: usize,
    r3: usize,
    r4: usize,
    r5: usize,
    avg_rating: Option<f64>,
    avg_length: Option<f64>,
    pct_positive: Option<f64>,
    pct_neutral: Option<f64>,
    pct_negative: Option<f64>,
    pct_verified: Option<f64>,
    score: Option<f64>,
    top_positive_terms: String,
    top_negative_terms: String,
}

/// Write reviews (cleaned or scored) to a CSV file.
pub fn write_reviews_csv(reviews: &[Review], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for review in reviews {
        writer.serialize(review)?;
    }
    writer.flush()?;
    info!(count = reviews.len(), path = %path.display(), "wrote reviews");
    Ok(())
}

/// Write the keyword table as CSV rows of (product_id, bucket, term, score, rank).
pub fn write_keywords_csv(entries: &[KeywordEntry], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    info!(count = entries.len(), path = %path.display(), "wrote keyword table");
    Ok(())
}

/// Write the keyword table as nested JSON keyed product -> bucket -> terms.
pub fn write_keywords_json(entries: &[KeywordEntry], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut nested: BTreeMap<&str, BTreeMap<Bucket, Vec<RankedTerm>>> = BTreeMap::new();
    for entry in entries {
        nested
            .entry(entry.product_id.as_str())
            .or_default()
            .entry(entry.bucket)
            .or_default()
            .push(RankedTerm {
                term: entry.term.clone(),
                score: entry.score,
            });
    }

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &nested)?;
    info!(path = %path.display(), "wrote keyword JSON");
    Ok(())
}

/// Write the comparison table as a flat CSV.
pub fn write_comparison_csv(records: &[ComparisonRecord], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for record in records {
        let row = ComparisonRow {
            product_id: &record.product_id,
            display_name: &record.display_name,
            brand: &record.brand,
            product_name: &record.product_name,
            flavor: &record.flavor,
            size: &record.size,
            review_count: record.review_count,
            r1: record.rating_distribution.r1,
            r2: record.rating_distribution.r2,
            r3: record.rating_distribution.r3,
            r4: record.rating_distribution.r4,
            r5: record.rating_distribution.r5,
            avg_rating: record.avg_rating,
            avg_length: record.avg_length,
            pct_positive: record.pct_positive,
            pct_neutral: record.pct_neutral,
            pct_negative: record.pct_negative,
            pct_verified: record.pct_verified,
            score: record.score,
            top_positive_terms: join_terms(record.keywords.get(&Bucket::Positive)),
            top_negative_terms: join_terms(record.keywords.get(&Bucket::Negative)),
        };
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(count = records.len(), path = %path.display(), "wrote comparison table");
    Ok(())
}

/// Write the comparison table as nested JSON, one object per product with
/// the full keyword structure.
pub fn write_comparison_json(records: &[ComparisonRecord], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, records)?;
    info!(path = %path.display(), "wrote comparison JSON");
    Ok(())
}

fn join_terms(terms: Option<&Vec<RankedTerm>>) -> String {
    terms.map_or_else(String::new, |t| {
        t.iter()
            .map(|entry| entry.term.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}
