use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand};
use hr_attrition::server::{AppState, serve};
use hr_attrition::utils::logging::log_request_failure;
use hr_attrition::{AttritionConfig, PredictionPipeline, preview, read_table};
use log::info;

/// Rows of the raw upload shown before the results
const PREVIEW_ROWS: usize = 5;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[derive(Debug, Parser)]
#[command(name = "hr-attrition", version, about = "Predict voluntary employee attrition")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a CSV or Parquet file of employee records
    Predict {
        /// Model artifact (JSON)
        #[arg(long)]
        model: PathBuf,
        /// Employee records to score
        #[arg(long)]
        input: PathBuf,
        /// Where to write the scored table
        #[arg(long)]
        output: Option<PathBuf>,
        /// Optional JSON configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Serve the upload-and-predict HTTP API
    Serve {
        /// Model artifact (JSON)
        #[arg(long)]
        model: PathBuf,
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
        /// Optional JSON configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the feature list the model must be trained on
    Features {
        /// Optional JSON configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AttritionConfig> {
    match path {
        Some(path) => AttritionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AttritionConfig::default()),
    }
}

fn load_pipeline(config: AttritionConfig, model: &Path) -> anyhow::Result<PredictionPipeline> {
    let pipeline = PredictionPipeline::load(config, model).context("Scoring is unavailable")?;
    info!("Loaded model from {}", pipeline.predictor().source().display());
    Ok(pipeline)
}

fn predict(pipeline: &PredictionPipeline, input: &Path, output: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    let raw = read_table(input, pipeline.config())
        .inspect_err(log_request_failure)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!(
        "Uploaded data (first {} of {} rows):\n{}",
        PREVIEW_ROWS.min(raw.num_rows()),
        raw.num_rows(),
        pretty_format_batches(&[preview(&raw, PREVIEW_ROWS)])?
    );

    let scored = pipeline
        .score(&raw)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let report = scored.report();
    info!(
        "Alignment dropped {} columns, generated {} indicators, zero-filled {} features",
        report.dropped.len(),
        report.generated.len(),
        report.zero_filled.len()
    );

    match scored.display_batch() {
        Ok(view) => println!("{}", pretty_format_batches(&[view])?),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    let csv = scored.to_csv(pipeline.config().delimiter_byte())?;
    std::fs::write(output, csv)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Scored {} employees from {} into {} in {:?}",
        scored.table().num_rows(),
        input.display(),
        output.display(),
        start.elapsed()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Predict {
            model,
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let output = output.unwrap_or_else(|| config.output_path.clone());
            let pipeline = load_pipeline(config, &model)?;
            predict(&pipeline, &input, &output)
        }
        Command::Serve {
            model,
            addr,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let pipeline = load_pipeline(config, &model)?;
            serve(&addr, Arc::new(AppState::new(pipeline))).await?;
            Ok(())
        }
        Command::Features { config } => {
            let config = load_config(config.as_deref())?;
            for feature in &config.expected_features {
                println!("{feature}");
            }
            Ok(())
        }
    }
}
