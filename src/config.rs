//! Pipeline configuration
//!
//! Configuration is layered: defaults in code, optional `config/default`,
//! `config/local`, and `config` files (TOML/YAML/JSON as the `config` crate
//! resolves them), then `REVIEW_COMPARE_*` environment overrides. Sentiment
//! thresholds are deliberately absent here; they are fixed constants in the
//! sentiment module.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cleaning: CleaningConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding raw review CSVs (reviews*.csv)
    pub raw_dir: String,
    /// Product reference table CSV
    pub products_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for pipeline outputs
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Minimum normalized review text length to keep
    pub min_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    /// Minimum document frequency for a keyword term
    pub min_df: usize,
    /// Keywords retained per (product, bucket)
    pub top_k: usize,
    /// Domain noise terms dropped in addition to standard stopwords
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            cleaning: CleaningConfig::default(),
            keywords: KeywordsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            raw_dir: "data/raw".to_string(),
            products_file: "data/raw/products.csv".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "data/outputs".to_string(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self { min_length: 20 }
    }
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            min_df: 2,
            top_k: 20,
            // Commerce noise that dominates review vocab without describing
            // the product itself.
            extra_stopwords: ["like", "buy", "bought", "purchase", "product", "brand"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment with precedence.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("REVIEW_COMPARE").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.cleaning.min_length == 0 {
            return Err(anyhow::anyhow!("cleaning.min_length must be greater than 0"));
        }

        if self.keywords.min_df == 0 {
            return Err(anyhow::anyhow!("keywords.min_df must be greater than 0"));
        }
        if self.keywords.top_k == 0 {
            return Err(anyhow::anyhow!("keywords.top_k must be greater than 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if self.input.raw_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("input.raw_dir cannot be empty"));
        }
        if self.input.products_file.trim().is_empty() {
            return Err(anyhow::anyhow!("input.products_file cannot be empty"));
        }
        if self.output.dir.trim().is_empty() {
            return Err(anyhow::anyhow!("output.dir cannot be empty"));
        }

        Ok(())
    }

    /// Get log level from environment or config.
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
