//! Stage orchestration
//!
//! Wires the four pipeline stages together, either one stage at a time
//! (reading the previous stage's artifact) or end to end in memory. Each
//! stage logs a summary of records kept and dropped so data-quality issues
//! are visible without re-deriving them.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::aggregator::Aggregator;
use crate::cleaner::Cleaner;
use crate::config::AppConfig;
use crate::error::Result;
use crate::file_writer;
use crate::keywords::{KeywordConfig, KeywordExtractor};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{CleaningSummary, KeywordEntry, Product, Review};
use crate::repository;
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::validation::InputValidator;

/// Intermediate artifact file names under the output directory.
const CLEANED_FILE: &str = "cleaned.csv";
const SCORED_FILE: &str = "with_sentiment.csv";
const KEYWORDS_CSV: &str = "keywords.csv";
const KEYWORDS_JSON: &str = "keywords.json";
const COMPARISON_CSV: &str = "comparison.csv";
const COMPARISON_JSON: &str = "comparison.json";

/// Runs pipeline stages against the configured directories.
pub struct Pipeline {
    config: AppConfig,
    metrics: MetricsCollector,
}

impl Pipeline {
    /// Create a pipeline over a validated configuration.
    pub fn new(config: AppConfig) -> Result<Self> {
        InputValidator::validate_output_dir(Path::new(&config.output.dir))?;
        Ok(Self {
            config,
            metrics: MetricsCollector,
        })
    }

    fn output_path(&self, name: &str) -> PathBuf {
        Path::new(&self.config.output.dir).join(name)
    }

    /// Load and validate the product reference table.
    fn load_products(&self) -> Result<Vec<Product>> {
        let products = repository::load_products(Path::new(&self.config.input.products_file))?;
        InputValidator::validate_product_table(&products)?;
        Ok(products)
    }

    /// Stage 1: clean raw reviews and write the cleaned artifact.
    pub fn run_clean(&self) -> Result<Vec<Review>> {
        let timer = OperationTimer::new("clean");
        let start = Instant::now();

        let raw = repository::load_raw_reviews(Path::new(&self.config.input.raw_dir))?;
        let cleaner = Cleaner::new(self.config.cleaning.min_length)?;
        let (reviews, summaries) = cleaner.clean_all(&raw);
        self.report_cleaning(&summaries);

        file_writer::write_reviews_csv(&reviews, &self.output_path(CLEANED_FILE))?;
        self.metrics.record_stage_duration("clean", start.elapsed());
        timer.finish();
        Ok(reviews)
    }

    /// Stage 2: attach sentiment to the cleaned artifact.
    pub fn run_sentiment(&self) -> Result<Vec<Review>> {
        let mut reviews = repository::load_reviews(&self.output_path(CLEANED_FILE))?;
        self.score_reviews(&mut reviews)?;
        file_writer::write_reviews_csv(&reviews, &self.output_path(SCORED_FILE))?;
        Ok(reviews)
    }

    /// Stage 3: extract keywords from the scored artifact.
    pub fn run_keywords(&self) -> Result<Vec<KeywordEntry>> {
        let products = self.load_products()?;
        let reviews = repository::load_reviews(&self.output_path(SCORED_FILE))?;
        let entries = self.extract_keywords(&reviews, &products)?;
        file_writer::write_keywords_csv(&entries, &self.output_path(KEYWORDS_CSV))?;
        file_writer::write_keywords_json(&entries, &self.output_path(KEYWORDS_JSON))?;
        Ok(entries)
    }

    /// Stage 4: aggregate the comparison table from earlier artifacts.
    pub fn run_aggregate(&self) -> Result<()> {
        let products = self.load_products()?;
        let reviews = repository::load_reviews(&self.output_path(SCORED_FILE))?;
        let keywords = repository::load_keywords(&self.output_path(KEYWORDS_CSV))?;
        self.aggregate_and_write(&reviews, &keywords, &products)
    }

    /// Run all four stages end to end in memory, writing every artifact.
    pub fn run_all(&self) -> Result<()> {
        let timer = OperationTimer::new("run_all");

        let products = self.load_products()?;
        let raw = repository::load_raw_reviews(Path::new(&self.config.input.raw_dir))?;

        let cleaner = Cleaner::new(self.config.cleaning.min_length)?;
        let (mut reviews, summaries) = cleaner.clean_all(&raw);
        self.report_cleaning(&summaries);
        file_writer::write_reviews_csv(&reviews, &self.output_path(CLEANED_FILE))?;

        self.score_reviews(&mut reviews)?;
        let keywords = self.extract_keywords(&reviews, &products)?;

        // Single-writer step: derived artifacts land together at the end.
        file_writer::write_reviews_csv(&reviews, &self.output_path(SCORED_FILE))?;
        file_writer::write_keywords_csv(&keywords, &self.output_path(KEYWORDS_CSV))?;
        file_writer::write_keywords_json(&keywords, &self.output_path(KEYWORDS_JSON))?;
        self.aggregate_and_write(&reviews, &keywords, &products)?;

        timer.finish();
        Ok(())
    }

    fn report_cleaning(&self, summaries: &[CleaningSummary]) {
        for summary in summaries {
            self.metrics.record_cleaning(summary);
        }
        let kept: usize = summaries.iter().map(|s| s.kept).sum();
        let input: usize = summaries.iter().map(|s| s.input).sum();
        info!(products = summaries.len(), input, kept, "cleaning summary");
    }

    fn score_reviews(&self, reviews: &mut [Review]) -> Result<()> {
        let start = Instant::now();
        let scorer = LexiconScorer::new();
        scorer.score_reviews(reviews);
        for review in reviews.iter() {
            if let Some(score) = review.sentiment_score {
                self.metrics.record_sentiment(score);
            }
        }
        self.metrics.record_stage_duration("sentiment", start.elapsed());
        info!(reviews = reviews.len(), "sentiment scoring complete");
        Ok(())
    }

    fn extract_keywords(
        &self,
        reviews: &[Review],
        products: &[Product],
    ) -> Result<Vec<KeywordEntry>> {
        let start = Instant::now();
        let extractor = KeywordExtractor::new(KeywordConfig::new(
            self.config.keywords.min_df,
            self.config.keywords.top_k,
            &self.config.keywords.extra_stopwords,
        ));
        let entries = extractor.extract(reviews, products);
        self.metrics.record_keywords(entries.len());
        self.metrics.record_stage_duration("keywords", start.elapsed());
        Ok(entries)
    }

    fn aggregate_and_write(
        &self,
        reviews: &[Review],
        keywords: &[KeywordEntry],
        products: &[Product],
    ) -> Result<()> {
        let start = Instant::now();
        let (records, summary) = Aggregator.aggregate(reviews, keywords, products);
        self.metrics.record_aggregation(&summary);

        file_writer::write_comparison_csv(&records, &self.output_path(COMPARISON_CSV))?;
        file_writer::write_comparison_json(&records, &self.output_path(COMPARISON_JSON))?;
        self.metrics.record_stage_duration("aggregate", start.elapsed());
        Ok(())
    }
}
