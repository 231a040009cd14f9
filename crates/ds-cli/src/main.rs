//! DemoStat CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

use ds_core::types::{CategoryCount, PopulationWeights};
use ds_inference::proportion::{proportion_test, RoundingMode};
use ds_inference::regression::simple_ols;
use ds_inference::tabulate::count_by_category;

#[derive(Parser)]
#[command(name = "demostat")]
#[command(about = "DemoStat - demographic incidence statistics")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chi-squared goodness-of-fit of observed counts against population share
    ProportionTest {
        /// Observed counts CSV with `category,count` columns
        #[arg(long)]
        observed: PathBuf,

        /// Population reference JSON (object of category -> population)
        #[arg(long)]
        population: PathBuf,

        /// Round expected counts and contributions to integers (legacy
        /// report arithmetic). Default is full floating-point precision.
        #[arg(long)]
        report_rounding: bool,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count rows per distinct value of one CSV column
    Tabulate {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the column to group by
        #[arg(short, long)]
        column: String,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Univariate OLS trend fit over an `x,y` CSV
    Trend {
        /// Input CSV with `x,y` columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::ProportionTest { observed, population, report_rounding, output } => {
            cmd_proportion_test(&observed, &population, report_rounding, output.as_ref())
        }
        Commands::Tabulate { input, column, output } => {
            cmd_tabulate(&input, &column, output.as_ref())
        }
        Commands::Trend { input, output } => cmd_trend(&input, output.as_ref()),
    }
}

// ---------------------------------------------------------------------------
// proportion-test
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ObservedRow {
    category: String,
    count: u64,
}

fn cmd_proportion_test(
    observed_path: &PathBuf,
    population_path: &PathBuf,
    report_rounding: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let observed = read_observed_csv(observed_path)?;
    tracing::info!(categories = observed.len(), path = %observed_path.display(), "observed counts loaded");

    let raw = std::fs::read_to_string(population_path)
        .with_context(|| format!("reading {}", population_path.display()))?;
    let weights: PopulationWeights = serde_json::from_str(&raw)
        .with_context(|| format!("parsing population reference {}", population_path.display()))?;

    let mode = if report_rounding { RoundingMode::ReportParity } else { RoundingMode::Exact };
    let result = proportion_test(&observed, &weights, mode)?;
    tracing::info!(
        statistic = result.statistic,
        p_value = result.p_value,
        "proportion test complete"
    );

    write_json(output, serde_json::to_value(&result)?)
}

fn read_observed_csv(path: &PathBuf) -> Result<Vec<CategoryCount>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for row in rdr.deserialize::<ObservedRow>() {
        let row = row.with_context(|| format!("reading {}", path.display()))?;
        out.push(CategoryCount::new(row.category, row.count));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// tabulate
// ---------------------------------------------------------------------------

fn cmd_tabulate(input: &PathBuf, column: &str, output: Option<&PathBuf>) -> Result<()> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(input)
        .with_context(|| format!("opening {}", input.display()))?;

    let headers = rdr.headers().with_context(|| format!("reading {}", input.display()))?;
    let idx = headers
        .iter()
        .position(|h| h == column)
        .with_context(|| format!("column '{column}' not found in {}", input.display()))?;

    let mut labels = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("reading {}", input.display()))?;
        let value = record
            .get(idx)
            .with_context(|| format!("row missing column '{column}' in {}", input.display()))?;
        labels.push(value.to_string());
    }

    let counts = count_by_category(&labels);
    tracing::info!(rows = labels.len(), categories = counts.len(), "tabulation complete");

    write_json(
        output,
        serde_json::json!({
            "column": column,
            "total_rows": labels.len(),
            "counts": counts,
        }),
    )
}

// ---------------------------------------------------------------------------
// trend
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct XyRow {
    x: f64,
    y: f64,
}

fn cmd_trend(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(input)
        .with_context(|| format!("opening {}", input.display()))?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for row in rdr.deserialize::<XyRow>() {
        let row = row.with_context(|| format!("reading {}", input.display()))?;
        xs.push(row.x);
        ys.push(row.y);
    }

    let fit = simple_ols(&xs, &ys)?;
    tracing::info!(slope = fit.slope, r_squared = fit.r_squared, "trend fit complete");

    write_json(output, serde_json::to_value(&fit)?)
}

// ---------------------------------------------------------------------------
// shared
// ---------------------------------------------------------------------------

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
