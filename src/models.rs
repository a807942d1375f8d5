//! Data models for the review comparison pipeline
//!
//! This module contains all data structures flowing between pipeline stages:
//! raw and cleaned reviews, product reference data, keyword entries, and the
//! final per-product comparison records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Categorical sentiment label derived from a compound polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Compound score >= 0.05
    Positive,
    /// Compound score in (-0.05, 0.05)
    Neutral,
    /// Compound score <= -0.05
    Negative,
}

impl SentimentLabel {
    /// String form used in tabular outputs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Keyword extraction bucket: one per sentiment label plus the full review set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// All reviews for the product
    Overall,
    /// Reviews labeled positive
    Positive,
    /// Reviews labeled neutral
    Neutral,
    /// Reviews labeled negative
    Negative,
}

impl Bucket {
    /// All buckets in their fixed output order.
    pub const ALL: [Self; 4] = [Self::Overall, Self::Positive, Self::Neutral, Self::Negative];

    /// String form used in tabular outputs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// The bucket holding reviews with the given sentiment label.
    #[must_use]
    pub const fn from_label(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Self::Positive,
            SentimentLabel::Neutral => Self::Neutral,
            SentimentLabel::Negative => Self::Negative,
        }
    }
}

/// A raw review record as read from an input CSV.
///
/// Every field except the identifiers is permissive: ratings, dates, and the
/// verified flag may be missing or malformed and are coerced or dropped by the
/// cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReviewRecord {
    /// Opaque review identifier (unique within a product's review set)
    pub review_id: String,
    /// Foreign key into the product table
    pub product_id: String,
    /// Star rating as found in the source (may be "5", "5.0", empty, garbage)
    #[serde(default)]
    pub rating: Option<String>,
    /// Review body text
    #[serde(default)]
    pub text: Option<String>,
    /// Purchase-verification flag as found in the source
    #[serde(default)]
    pub verified: Option<String>,
    /// Review date as found in the source
    #[serde(default)]
    pub date: Option<String>,
}

/// A cleaned review, optionally carrying sentiment fields after scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Opaque review identifier (unique within a product's review set)
    pub review_id: String,
    /// Foreign key into the product table
    pub product_id: String,
    /// Star rating, coerced to 1-5
    pub rating: u8,
    /// Normalized review body (lowercased, whitespace-collapsed)
    pub text: String,
    /// Purchase-verification flag
    pub verified: bool,
    /// Review date; None when the source value was unparseable
    pub date: Option<NaiveDate>,
    /// Compound polarity score in [-1, 1]; absent before the scoring stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    /// Sentiment label; absent before the scoring stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_label: Option<SentimentLabel>,
}

/// Static product reference data, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub product_id: String,
    /// Brand name
    #[serde(default)]
    pub brand: String,
    /// Product name
    #[serde(default)]
    pub product_name: String,
    /// Flavor variant
    #[serde(default)]
    pub flavor: String,
    /// Size variant
    #[serde(default)]
    pub size: String,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
}

impl Product {
    /// Name shown in reports: brand when present, product id otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let brand = self.brand.trim();
        if brand.is_empty() {
            &self.product_id
        } else {
            brand
        }
    }
}

/// One extracted keyword for a (product, bucket) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Product the term was extracted for
    pub product_id: String,
    /// Sentiment bucket the term was extracted from
    pub bucket: Bucket,
    /// Single token or short n-gram
    pub term: String,
    /// TF-IDF weight summed across the bucket's documents
    pub score: f64,
    /// 1-based position within the bucket, ties broken by lexical term order
    pub rank: usize,
}

/// A ranked term as nested on a comparison record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTerm {
    /// The term itself
    pub term: String,
    /// TF-IDF weight
    pub score: f64,
}

/// Count of reviews at each star rating 1-5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub r1: usize,
    pub r2: usize,
    pub r3: usize,
    pub r4: usize,
    pub r5: usize,
}

impl RatingDistribution {
    /// Increment the count for a rating (1-5).
    pub fn record(&mut self, rating: u8) {
        match rating {
            1 => self.r1 += 1,
            2 => self.r2 += 1,
            3 => self.r3 += 1,
            4 => self.r4 += 1,
            5 => self.r5 += 1,
            _ => {}
        }
    }

    /// Total count across all ratings.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.r1 + self.r2 + self.r3 + self.r4 + self.r5
    }
}

/// Final per-product comparison record.
///
/// Percentage fields are `None` when the product has zero surviving reviews;
/// zero-review products still appear in the output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Product identifier
    pub product_id: String,
    /// Brand when present, product id otherwise
    pub display_name: String,
    /// Brand name from the product table
    pub brand: String,
    /// Product name from the product table
    pub product_name: String,
    /// Flavor variant from the product table
    pub flavor: String,
    /// Size variant from the product table
    pub size: String,
    /// Count of cleaned reviews
    pub review_count: usize,
    /// Count of reviews at each star rating
    pub rating_distribution: RatingDistribution,
    /// Mean star rating; None when review_count is 0
    pub avg_rating: Option<f64>,
    /// Mean normalized review text length; None when review_count is 0
    pub avg_length: Option<f64>,
    /// Share of positive reviews, percent, 2 decimals
    pub pct_positive: Option<f64>,
    /// Share of neutral reviews, percent, 2 decimals
    pub pct_neutral: Option<f64>,
    /// Share of negative reviews, percent, 2 decimals
    pub pct_negative: Option<f64>,
    /// Share of verified-purchase reviews, percent, 2 decimals
    pub pct_verified: Option<f64>,
    /// Composite score: pct_positive - pct_negative (post-rounding)
    pub score: Option<f64>,
    /// Top keywords per bucket
    pub keywords: BTreeMap<Bucket, Vec<RankedTerm>>,
}

/// Per-product record bookkeeping from the cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    /// Product the summary describes
    pub product_id: String,
    /// Raw records seen
    pub input: usize,
    /// Records surviving all filters
    pub kept: usize,
    /// Dropped: empty or shorter than min_length after normalization
    pub dropped_short: usize,
    /// Dropped: rating missing, unparseable, or out of 1-5
    pub dropped_rating: usize,
    /// Dropped: duplicate review_id within the product
    pub dropped_duplicate_id: usize,
    /// Dropped: duplicate normalized text within the product
    pub dropped_duplicate_text: usize,
    /// Dates that failed to parse (review kept with null date)
    pub null_dates: usize,
}

/// Bookkeeping from the aggregation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationSummary {
    /// Products present in the comparison table
    pub products: usize,
    /// Products with zero surviving reviews
    pub empty_products: usize,
    /// Reviews referencing a product_id absent from the product table
    pub orphaned_reviews: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_from_label() {
        assert_eq!(Bucket::from_label(SentimentLabel::Positive), Bucket::Positive);
        assert_eq!(Bucket::from_label(SentimentLabel::Neutral), Bucket::Neutral);
        assert_eq!(Bucket::from_label(SentimentLabel::Negative), Bucket::Negative);
    }

    #[test]
    fn test_rating_distribution() {
        let mut dist = RatingDistribution::default();
        dist.record(5);
        dist.record(5);
        dist.record(1);
        assert_eq!(dist.r5, 2);
        assert_eq!(dist.r1, 1);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_display_name_falls_back_to_product_id() {
        let product = Product {
            product_id: "p1".to_string(),
            brand: "  ".to_string(),
            product_name: String::new(),
            flavor: String::new(),
            size: String::new(),
            notes: String::new(),
        };
        assert_eq!(product.display_name(), "p1");
    }

    #[test]
    fn test_label_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Positive).expect("serialize");
        assert_eq!(json, "\"positive\"");
        let json = serde_json::to_string(&Bucket::Overall).expect("serialize");
        assert_eq!(json, "\"overall\"");
    }
}
