//! Command-line parsing for the churn insights tool.
//!
//! The goal of this module is to keep **argument parsing** separate from data
//! loading and scoring; `app` turns a parsed `Cli` into a `RunConfig` and
//! dispatches.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dashboard::Section;
use crate::data::sample::DEFAULT_SEED;
use crate::domain::{ExportFormat, RiskFilter, StatusFilter};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "churn", version, about = "Credit card churn risk insights")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Customer CSV source (file path or http(s) URL). Repeat to give fallbacks.
    ///
    /// Overrides `CHURN_DATA_SOURCES`.
    #[arg(long = "source", value_name = "PATH|URL", global = true)]
    pub sources: Vec<String>,

    /// Analytics JSON with the pre-aggregated dashboard numbers.
    ///
    /// Overrides `CHURN_ANALYSIS_JSON`.
    #[arg(long, value_name = "JSON", global = true)]
    pub analysis: Option<PathBuf>,

    /// Use N synthetic customers instead of loading sources.
    #[arg(long, value_name = "N", global = true)]
    pub sample: Option<usize>,

    /// Random seed for `--sample`.
    #[arg(long, default_value_t = DEFAULT_SEED, global = true)]
    pub seed: u64,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search, filter and page through scored customers.
    Customers(CustomersArgs),
    /// Show one customer's fields, risk and segment labels.
    Show(ShowArgs),
    /// Print KPI cards and segment breakdowns from the analytics JSON.
    Kpis(KpisArgs),
    /// Print key insights and top churn drivers.
    Insights(InsightsArgs),
    /// Export scored customers to CSV or JSON.
    Export(ExportArgs),
    /// Search and page through model predictions with their explanations.
    Predictions(PredictionsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CustomersArgs {
    /// Match against CLIENTNUM, income category or education level.
    #[arg(short = 'q', long, default_value = "")]
    pub search: String,

    #[arg(short, long, value_enum, default_value_t = RiskFilter::All)]
    pub risk: RiskFilter,

    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// 1-based page number.
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = 10)]
    pub per_page: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// CLIENTNUM of the customer.
    pub id: String,
}

#[derive(Debug, Args, Clone)]
pub struct KpisArgs {
    /// Only print this breakdown (default: all).
    #[arg(long, value_enum)]
    pub section: Option<Section>,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct InsightsArgs {
    /// Number of churn drivers to list.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    #[arg(short, long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct PredictionsArgs {
    /// Match against the predicted label, action, top reasons or comment.
    #[arg(short = 'q', long, default_value = "")]
    pub search: String,

    /// Prediction CSV source (file path or http(s) URL). Repeat to give fallbacks.
    ///
    /// Overrides `CHURN_PREDICTION_SOURCES`.
    #[arg(long = "predictions", value_name = "PATH|URL")]
    pub sources: Vec<String>,

    /// 1-based page number.
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = 10)]
    pub per_page: usize,
}
