//! Review Compare - Product Review Analysis Pipeline
//!
//! A Rust library for turning raw product reviews into a per-product
//! comparison of sentiment, rating, and salient themes.
//!
//! # Pipeline stages
//!
//! - Cleaning: normalize, filter, and deduplicate raw review records
//! - Sentiment: lexicon-based compound polarity scoring and labeling
//! - Keywords: TF-IDF terms per product and sentiment bucket
//! - Aggregation: one comparison record per product

/// Metric aggregation into the comparison table
pub mod aggregator;
/// Review cleaning and normalization
pub mod cleaner;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Output file writing
pub mod file_writer;
/// TF-IDF keyword extraction
pub mod keywords;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Stage orchestration
pub mod pipeline;
/// Input file loading
pub mod repository;
/// Sentiment scoring
pub mod sentiment;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use aggregator::Aggregator;
pub use cleaner::Cleaner;
pub use config::AppConfig;
pub use keywords::{KeywordConfig, KeywordExtractor};
pub use models::{Bucket, ComparisonRecord, KeywordEntry, Product, Review, SentimentLabel};
pub use pipeline::Pipeline;
pub use sentiment::{LexiconScorer, SentimentScorer};
