//! Metrics collection for pipeline stages
//!
//! Thin wrapper over the `metrics` facade. Without an installed recorder the
//! macros are no-ops, so this costs nothing in library use; a binary can
//! install any recorder it likes.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

use crate::models::{AggregationSummary, CleaningSummary};

/// Metric names and recording helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    /// Record cleaning outcomes for one product.
    pub fn record_cleaning(&self, summary: &CleaningSummary) {
        let product = summary.product_id.clone();
        counter!("review_compare_reviews_kept_total", "product" => product.clone())
            .increment(summary.kept as u64);
        counter!("review_compare_reviews_dropped_total", "product" => product.clone(), "reason" => "short")
            .increment(summary.dropped_short as u64);
        counter!("review_compare_reviews_dropped_total", "product" => product.clone(), "reason" => "rating")
            .increment(summary.dropped_rating as u64);
        counter!("review_compare_reviews_dropped_total", "product" => product.clone(), "reason" => "duplicate_id")
            .increment(summary.dropped_duplicate_id as u64);
        counter!("review_compare_reviews_dropped_total", "product" => product, "reason" => "duplicate_text")
            .increment(summary.dropped_duplicate_text as u64);
    }

    /// Record one sentiment score.
    pub fn record_sentiment(&self, score: f64) {
        histogram!("review_compare_sentiment_scores").record(score);
    }

    /// Record keyword extraction output size.
    pub fn record_keywords(&self, entries: usize) {
        gauge!("review_compare_keyword_entries").set(entries as f64);
    }

    /// Record aggregation outcomes.
    pub fn record_aggregation(&self, summary: &AggregationSummary) {
        gauge!("review_compare_products").set(summary.products as f64);
        counter!("review_compare_orphaned_reviews_total")
            .increment(summary.orphaned_reviews as u64);
    }

    /// Record a stage duration.
    pub fn record_stage_duration(&self, stage: &'static str, duration: Duration) {
        histogram!("review_compare_stage_duration_seconds", "stage" => stage)
            .record(duration.as_secs_f64());
    }
}
