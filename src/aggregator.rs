//! Metric aggregation into the final comparison table
//!
//! Fourth pipeline stage: joins sentiment-labeled reviews, extracted
//! keywords, and product metadata into one comparison record per product.
//! Every product in the reference table appears in the output, including
//! those with zero surviving reviews. Reviews referencing an unknown
//! product_id are excluded and counted as orphaned.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

use crate::models::{
    AggregationSummary, Bucket, ComparisonRecord, KeywordEntry, Product, RankedTerm,
    RatingDistribution, Review, SentimentLabel,
};

/// Decimal places for all percentage fields.
const PCT_DECIMALS: i32 = 2;

/// Round half away from zero to the fixed percentage precision.
fn round_pct(value: f64) -> f64 {
    let factor = 10f64.powi(PCT_DECIMALS);
    (value * factor).round() / factor
}

/// Builds per-product comparison records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Aggregate all products into comparison records.
    ///
    /// Output is sorted by descending composite score; zero-review products
    /// (which have no score) sort last, then by product id for a total order.
    #[must_use]
    pub fn aggregate(
        &self,
        reviews: &[Review],
        keywords: &[KeywordEntry],
        products: &[Product],
    ) -> (Vec<ComparisonRecord>, AggregationSummary) {
        let known: HashSet<&str> = products.iter().map(|p| p.product_id.as_str()).collect();

        let mut by_product: BTreeMap<&str, Vec<&Review>> = BTreeMap::new();
        let mut orphaned = 0usize;
        for review in reviews {
            if known.contains(review.product_id.as_str()) {
                by_product.entry(&review.product_id).or_default().push(review);
            } else {
                orphaned += 1;
            }
        }
        if orphaned > 0 {
            warn!(orphaned, "reviews reference product ids absent from the product table");
        }

        let mut keywords_by_product: BTreeMap<&str, BTreeMap<Bucket, Vec<RankedTerm>>> =
            BTreeMap::new();
        for entry in keywords {
            keywords_by_product
                .entry(&entry.product_id)
                .or_default()
                .entry(entry.bucket)
                .or_default()
                .push(RankedTerm {
                    term: entry.term.clone(),
                    score: entry.score,
                });
        }

        let mut records: Vec<ComparisonRecord> = products
            .iter()
            .map(|product| {
                let product_reviews = by_product
                    .get(product.product_id.as_str())
                    .map_or(&[][..], Vec::as_slice);
                let product_keywords = keywords_by_product
                    .get(product.product_id.as_str())
                    .cloned()
                    .unwrap_or_default();
                self.build_record(product, product_reviews, product_keywords)
            })
            .collect();

        records.sort_by(|a, b| match (a.score, b.score) {
            (Some(x), Some(y)) => y
                .partial_cmp(&x)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.product_id.cmp(&b.product_id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.product_id.cmp(&b.product_id),
        });

        let summary = AggregationSummary {
            products: records.len(),
            empty_products: records.iter().filter(|r| r.review_count == 0).count(),
            orphaned_reviews: orphaned,
        };
        info!(
            products = summary.products,
            empty_products = summary.empty_products,
            orphaned_reviews = summary.orphaned_reviews,
            "aggregation complete"
        );
        (records, summary)
    }

    /// Build one product's record from its (possibly empty) review set.
    fn build_record(
        &self,
        product: &Product,
        reviews: &[&Review],
        keywords: BTreeMap<Bucket, Vec<RankedTerm>>,
    ) -> ComparisonRecord {
        let review_count = reviews.len();

        let mut rating_distribution = RatingDistribution::default();
        for review in reviews {
            rating_distribution.record(review.rating);
        }

        let (avg_rating, avg_length, pct_positive, pct_neutral, pct_negative, pct_verified, score) =
            if review_count == 0 {
                (None, None, None, None, None, None, None)
            } else {
                let total = review_count as f64;
                let count_label = |label: SentimentLabel| {
                    reviews
                        .iter()
                        .filter(|r| r.sentiment_label == Some(label))
                        .count() as f64
                };
                let pct_positive = round_pct(count_label(SentimentLabel::Positive) / total * 100.0);
                let pct_neutral = round_pct(count_label(SentimentLabel::Neutral) / total * 100.0);
                let pct_negative = round_pct(count_label(SentimentLabel::Negative) / total * 100.0);
                let verified = reviews.iter().filter(|r| r.verified).count() as f64;
                let rating_sum: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
                let length_sum: f64 = reviews.iter().map(|r| r.text.len() as f64).sum();
                (
                    Some(rating_sum / total),
                    Some(length_sum / total),
                    Some(pct_positive),
                    Some(pct_neutral),
                    Some(pct_negative),
                    Some(round_pct(verified / total * 100.0)),
                    // Composite score from the already-rounded percentages so
                    // the published fields stay arithmetically consistent.
                    Some(pct_positive - pct_negative),
                )
            };

        ComparisonRecord {
            product_id: product.product_id.clone(),
            display_name: product.display_name().to_string(),
            brand: product.brand.clone(),
            product_name: product.product_name.clone(),
            flavor: product.flavor.clone(),
            size: product.size.clone(),
            review_count,
            rating_distribution,
            avg_rating,
            avg_length,
            pct_positive,
            pct_neutral,
            pct_negative,
            pct_verified,
            score,
            keywords,
        }
    }
}
