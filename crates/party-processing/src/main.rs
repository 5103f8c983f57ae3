//! CLI entry point for the party dataset preprocessing pipeline.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use party_processing::utils::is_all_missing;
use party_processing::{
    ColumnSelector, DataCleaner, Pipeline, PreprocessingConfig, RawDataset, ReportGenerator,
    RunReport, ZeroVariancePolicy,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI-compatible zero-variance policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliZeroVariance {
    /// Center constant columns to 0.0
    Center,
    /// Fail the run on a constant column
    Error,
}

impl From<CliZeroVariance> for ZeroVariancePolicy {
    fn from(cli: CliZeroVariance) -> Self {
        match cli {
            CliZeroVariance::Center => ZeroVariancePolicy::Center,
            CliZeroVariance::Error => ZeroVariancePolicy::Error,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Preprocessing pipeline for political party survey datasets",
    long_about = "Deduplicates, indexes, imputes and standardizes a party-level dataset.\n\n\
                  EXAMPLES:\n  \
                  # Process the default dataset (data/CHES2019V3.csv)\n  \
                  party-processing\n\n  \
                  # Drop bookkeeping columns and use a two-column key\n  \
                  party-processing -i ches.parquet --non-feature year --index party_id --index party\n\n  \
                  # Preview without writing anything\n  \
                  party-processing --dry-run"
)]
struct Args {
    /// Path to the dataset (CSV or Parquet)
    ///
    /// Defaults to data/CHES2019V3.csv
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for results
    ///
    /// Defaults to "output"
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses the input file stem
    #[arg(long)]
    output_name: Option<String>,

    /// Index (row key) column; repeat for a composite key
    ///
    /// Defaults to party_id, party, country
    #[arg(long = "index")]
    index: Vec<String>,

    /// Column to drop before indexing; repeatable
    #[arg(long = "non-feature")]
    non_feature: Vec<String>,

    /// What to do with constant feature columns
    #[arg(long, value_enum)]
    zero_variance: Option<CliZeroVariance>,

    /// JSON configuration file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preview what the pipeline will do without processing
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON report to stdout instead of a human-readable summary
    ///
    /// Disables all logs. Useful for piping: `... --json | jq .summary`
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = build_pipeline(&args, config)?;

    let raw = pipeline.load()?;
    info!("Dataset loaded successfully: {:?}", raw.frame().shape());

    if args.dry_run {
        return run_dry_run(pipeline.config(), &raw);
    }

    run_pipeline(&pipeline, &args, &raw)
}

/// Merge the optional config file with explicit flags.
fn build_config(args: &Args) -> Result<PreprocessingConfig> {
    let mut config = match &args.config {
        Some(path) => PreprocessingConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?,
        None => PreprocessingConfig::default(),
    };

    if let Some(input) = &args.input {
        config.data_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(name) = &args.output_name {
        config.output_name = Some(name.clone());
    }
    if !args.index.is_empty() {
        config.index_columns = args.index.clone();
    }
    if !args.non_feature.is_empty() {
        config.non_feature_columns = args.non_feature.clone();
    }
    if let Some(policy) = args.zero_variance {
        config.zero_variance_policy = policy.into();
    }

    config.validate()?;
    Ok(config)
}

fn build_pipeline(args: &Args, config: PreprocessingConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Run dry-run mode - show what would happen without processing
///
/// Uses `println!` for user-facing output so it is visible at any log level.
fn run_dry_run(config: &PreprocessingConfig, raw: &RawDataset) -> Result<()> {
    let df = raw.frame();

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of preprocessing actions");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", config.data_path.display());
    println!("  Rows: {}", df.height());
    println!("  Columns: {}", df.width());
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!("{:<24} {:<12} {:<10}", "Column", "Type", "Missing");
    println!("{}", "-".repeat(48));
    for column in df.get_columns() {
        println!(
            "{:<24} {:<12} {:<10}",
            truncate_str(column.name(), 23),
            column.dtype().to_string(),
            column.null_count()
        );
    }
    println!();

    println!("PROPOSED ACTIONS");
    println!("{}", "-".repeat(40));
    let duplicates = df.height() - DataCleaner::remove_duplicates(df)?.height();
    println!("  1. Remove {} duplicate rows", duplicates);
    if config.non_feature_columns.is_empty() {
        println!("  2. Keep all columns; index on {:?}", config.index_columns);
    } else {
        println!(
            "  2. Drop {:?}; index on {:?}",
            config.non_feature_columns, config.index_columns
        );
    }
    match ColumnSelector::select(
        df,
        config.non_feature_columns.as_slice(),
        config.index_columns.as_slice(),
    ) {
        Ok(table) => {
            let mut all_missing: Vec<&str> = Vec::new();
            for column in table.features().get_columns() {
                if is_all_missing(column.as_materialized_series())? {
                    all_missing.push(column.name().as_str());
                }
            }
            if all_missing.is_empty() {
                println!("  3. Fill missing values with column means");
            } else {
                println!(
                    "  3. Drop all-missing columns {:?}; fill the rest with column means",
                    all_missing
                );
            }
            println!(
                "  4. Standardize {} feature columns ({:?} for constant columns)",
                table.features().width() - all_missing.len(),
                config.zero_variance_policy
            );
        }
        Err(e) => println!("  WARNING: column selection would fail: {}", e),
    }
    println!();

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    let name = output_name(config);
    println!("  - {}", config.output_dir.join(format!("{}.csv", name)).display());
    println!("  - {}", config.output_dir.join(format!("{}_report.json", name)).display());
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute this preprocessing, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Run the pipeline, write outputs and print results.
fn run_pipeline(pipeline: &Pipeline, args: &Args, raw: &RawDataset) -> Result<()> {
    let config = pipeline.config();
    let result = match pipeline.run(raw) {
        Ok(result) => result,
        Err(e) => {
            // Already logged by the pipeline; JSON mode has no logs, so emit it here
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            std::process::exit(1);
        }
    };

    let name = output_name(config);
    let generator = ReportGenerator::new(&config.output_dir);
    let table_path = generator.save_table(&result.scaled, &name)?;

    let report = ReportGenerator::build_report(raw.source(), Some(table_path.as_path()), &result);
    generator.write_report_to_file(&report, &name)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report);
    Ok(())
}

/// Output base name: the configured name or the input file stem.
fn output_name(config: &PreprocessingConfig) -> String {
    config
        .output_name
        .clone()
        .unwrap_or_else(|| extract_file_stem(&config.data_path))
}

fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn print_human_readable_summary(report: &RunReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    if let Some(input) = &report.input_file {
        println!(
            "Input:  {} ({} rows x {} columns)",
            input, summary.rows_before, summary.columns_before
        );
    }
    if let Some(output) = &report.output_file {
        println!(
            "Output: {} ({} rows x {} features)",
            output, summary.rows_after, summary.feature_columns_after
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!("  Duplicates removed: {}", summary.duplicates_removed);
    println!("  Index: {}", summary.index_columns.join(", "));
    if !summary.non_feature_columns_removed.is_empty() {
        println!(
            "  Non-feature columns dropped: {}",
            summary.non_feature_columns_removed.join(", ")
        );
    }
    if !summary.all_missing_columns_dropped.is_empty() {
        println!(
            "  All-missing columns dropped: {}",
            summary.all_missing_columns_dropped.join(", ")
        );
    }
    println!("  Values imputed: {}", summary.values_imputed);
    println!();

    if !summary.zero_variance_columns.is_empty() {
        println!("Warnings:");
        for column in &summary.zero_variance_columns {
            println!("  ! '{}' is constant and was centered only", column);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
