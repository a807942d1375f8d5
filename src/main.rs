use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use review_compare::config::AppConfig;
use review_compare::logging::init_logging;
use review_compare::pipeline::Pipeline;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory with raw reviews*.csv files
    #[arg(long, global = true)]
    raw_dir: Option<String>,

    /// Product reference table CSV
    #[arg(long, global = true)]
    products: Option<String>,

    /// Output directory for pipeline artifacts
    #[arg(short, long, global = true)]
    output_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean raw review CSVs into the canonical form
    Clean {
        /// Minimum review text length to keep
        #[arg(long)]
        min_length: Option<usize>,
    },
    /// Attach sentiment scores and labels to cleaned reviews
    Sentiment,
    /// Extract TF-IDF keywords per product and sentiment bucket
    Keywords {
        /// Minimum document frequency for a keyword term
        #[arg(long)]
        min_df: Option<usize>,

        /// Keywords retained per (product, bucket)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Aggregate the per-product comparison table
    Aggregate,
    /// Run all pipeline stages end to end
    Run {
        /// Minimum review text length to keep
        #[arg(long)]
        min_length: Option<usize>,

        /// Minimum document frequency for a keyword term
        #[arg(long)]
        min_df: Option<usize>,

        /// Keywords retained per (product, bucket)
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn main() -> Result<()> {
    let mut config = AppConfig::load()?;
    let _guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;

    info!("Starting review-compare");

    let cli = Cli::parse();

    // CLI flags override file/environment configuration
    if let Some(raw_dir) = cli.raw_dir {
        config.input.raw_dir = raw_dir;
    }
    if let Some(products) = cli.products {
        config.input.products_file = products;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output.dir = output_dir;
    }

    match &cli.command {
        Commands::Clean { min_length } => {
            if let Some(min_length) = min_length {
                config.cleaning.min_length = *min_length;
            }
            config.validate()?;
            let pipeline = Pipeline::new(config)?;
            let reviews = pipeline.run_clean()?;
            info!(kept = reviews.len(), "clean stage complete");
        }
        Commands::Sentiment => {
            config.validate()?;
            let pipeline = Pipeline::new(config)?;
            let reviews = pipeline.run_sentiment()?;
            info!(scored = reviews.len(), "sentiment stage complete");
        }
        Commands::Keywords { min_df, top_k } => {
            if let Some(min_df) = min_df {
                config.keywords.min_df = *min_df;
            }
            if let Some(top_k) = top_k {
                config.keywords.top_k = *top_k;
            }
            config.validate()?;
            let pipeline = Pipeline::new(config)?;
            let entries = pipeline.run_keywords()?;
            info!(entries = entries.len(), "keywords stage complete");
        }
        Commands::Aggregate => {
            config.validate()?;
            let pipeline = Pipeline::new(config)?;
            pipeline.run_aggregate()?;
            info!("aggregate stage complete");
        }
        Commands::Run {
            min_length,
            min_df,
            top_k,
        } => {
            if let Some(min_length) = min_length {
                config.cleaning.min_length = *min_length;
            }
            if let Some(min_df) = min_df {
                config.keywords.min_df = *min_df;
            }
            if let Some(top_k) = top_k {
                config.keywords.top_k = *top_k;
            }
            config.validate()?;
            let pipeline = Pipeline::new(config)?;
            pipeline.run_all()?;
            info!("pipeline complete");
        }
    }

    Ok(())
}
