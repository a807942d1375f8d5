//! Review cleaning and normalization
//!
//! First pipeline stage: turns raw per-product review records into canonical
//! cleaned reviews. Normalizes text, enforces a minimum length, coerces
//! ratings and flags, parses dates, and removes duplicates. Malformed records
//! are dropped and counted per product, never aborting the batch.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::{ReviewCompareError, Result};
use crate::models::{CleaningSummary, RawReviewRecord, Review};

/// Date formats tried in order when parsing review dates. The second and
/// third cover the source dataset's "09 1, 2016" style.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m %e, %Y", "%m/%d/%Y", "%B %e, %Y", "%b %e, %Y"];

/// Cleans raw review records into canonical form.
///
/// Sentence-ending punctuation (`.`, `!`, `?`) and apostrophes survive
/// normalization because the sentiment lexicon uses them downstream.
pub struct Cleaner {
    min_length: usize,
    markup_regex: Regex,
    noise_regex: Regex,
    extra_spaces_regex: Regex,
}

impl Cleaner {
    /// Create a cleaner that drops reviews shorter than `min_length`
    /// characters after normalization.
    pub fn new(min_length: usize) -> Result<Self> {
        let markup_regex = Regex::new(r"<[^>]+>")
            .map_err(|e| ReviewCompareError::Other(format!("Failed to compile markup regex: {e}")))?;
        let noise_regex = Regex::new(r"[^\w\s.!?']")
            .map_err(|e| ReviewCompareError::Other(format!("Failed to compile noise regex: {e}")))?;
        let extra_spaces_regex = Regex::new(r"\s+")
            .map_err(|e| ReviewCompareError::Other(format!("Failed to compile spaces regex: {e}")))?;

        Ok(Self {
            min_length,
            markup_regex,
            noise_regex,
            extra_spaces_regex,
        })
    }

    /// Normalize review text: NFC, strip markup and control characters,
    /// lowercase, collapse whitespace.
    #[must_use]
    pub fn normalize_text(&self, text: &str) -> String {
        let normalized = text.nfc().collect::<String>();
        let no_markup = self.markup_regex.replace_all(&normalized, " ");
        let lowered = no_markup.to_lowercase();
        let no_noise = self.noise_regex.replace_all(&lowered, " ");
        let collapsed = self.extra_spaces_regex.replace_all(&no_noise, " ");
        collapsed.trim().to_string()
    }

    /// Clean one product's raw records, preserving input order.
    ///
    /// Filters apply in a fixed order: text length, rating coercion,
    /// duplicate review_id, duplicate normalized text. First occurrence wins
    /// for both duplicate checks.
    pub fn clean_product(
        &self,
        product_id: &str,
        records: &[RawReviewRecord],
    ) -> (Vec<Review>, CleaningSummary) {
        let mut summary = CleaningSummary {
            product_id: product_id.to_string(),
            input: records.len(),
            ..CleaningSummary::default()
        };

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut seen_texts: HashSet<String> = HashSet::new();
        let mut cleaned = Vec::new();

        for record in records {
            let text = self.normalize_text(record.text.as_deref().unwrap_or(""));
            if text.len() < self.min_length {
                summary.dropped_short += 1;
                debug!(review_id = %record.review_id, "dropping review: too short");
                continue;
            }

            let Some(rating) = coerce_rating(record.rating.as_deref()) else {
                summary.dropped_rating += 1;
                debug!(review_id = %record.review_id, "dropping review: bad rating");
                continue;
            };

            if !seen_ids.insert(record.review_id.clone()) {
                summary.dropped_duplicate_id += 1;
                debug!(review_id = %record.review_id, "dropping review: duplicate id");
                continue;
            }

            if !seen_texts.insert(text.clone()) {
                summary.dropped_duplicate_text += 1;
                debug!(review_id = %record.review_id, "dropping review: duplicate text");
                continue;
            }

            let date = record.date.as_deref().and_then(parse_review_date);
            if date.is_none() && record.date.as_deref().is_some_and(|d| !d.trim().is_empty()) {
                summary.null_dates += 1;
            }

            cleaned.push(Review {
                review_id: record.review_id.clone(),
                product_id: product_id.to_string(),
                rating,
                text,
                verified: coerce_verified(record.verified.as_deref()),
                date,
                sentiment_score: None,
                sentiment_label: None,
            });
        }

        summary.kept = cleaned.len();
        info!(
            product_id,
            input = summary.input,
            kept = summary.kept,
            dropped_short = summary.dropped_short,
            dropped_rating = summary.dropped_rating,
            dropped_duplicate_id = summary.dropped_duplicate_id,
            dropped_duplicate_text = summary.dropped_duplicate_text,
            null_dates = summary.null_dates,
            "cleaned product reviews"
        );
        (cleaned, summary)
    }

    /// Clean a mixed batch of raw records.
    ///
    /// Records are grouped by product (input order preserved within each
    /// product) and products are processed in sorted id order, so output is
    /// deterministic regardless of input interleaving.
    pub fn clean_all(
        &self,
        records: &[RawReviewRecord],
    ) -> (Vec<Review>, Vec<CleaningSummary>) {
        let mut by_product: BTreeMap<&str, Vec<&RawReviewRecord>> = BTreeMap::new();
        for record in records {
            by_product.entry(&record.product_id).or_default().push(record);
        }

        let mut reviews = Vec::new();
        let mut summaries = Vec::new();
        for (product_id, group) in by_product {
            let owned: Vec<RawReviewRecord> = group.into_iter().cloned().collect();
            let (mut cleaned, summary) = self.clean_product(product_id, &owned);
            reviews.append(&mut cleaned);
            summaries.push(summary);
        }
        (reviews, summaries)
    }
}

/// Coerce a source rating value to an integer 1-5.
///
/// Accepts integers and floats with zero fraction ("5", "5.0"); anything
/// else, including out-of-range values, yields None.
fn coerce_rating(raw: Option<&str>) -> Option<u8> {
    let value: f64 = raw?.trim().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    let rating = value as i64;
    (1..=5).contains(&rating).then_some(rating as u8)
}

/// Parse a review date, trying each known source format.
fn parse_review_date(raw: &str) -> Option<chrono::NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Coerce a source verified flag to a boolean. Unknown or missing is false.
fn coerce_verified(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}
