//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments and resolves a `RunConfig`
//! - loads customers (sources or synthetic sample), predictions and the analytics export
//! - prints reports and writes exports

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CustomersArgs, ExportArgs, InsightsArgs, KpisArgs, PredictionsArgs, ShowArgs};
use crate::customers::{self, CustomerQuery, ScoredCustomer};
use crate::dashboard::{DashboardData, Section};
use crate::data::generate_customers;
use crate::domain::{DataSource, RunConfig};
use crate::error::AppError;
use crate::io::{SourceLoader, parse_source_list};
use crate::metrics::label_record;
use crate::predictions::{parse_predictions, search_predictions};
use crate::report;

pub const ENV_DATA_SOURCES: &str = "CHURN_DATA_SOURCES";
pub const ENV_ANALYSIS_JSON: &str = "CHURN_ANALYSIS_JSON";
pub const ENV_PREDICTION_SOURCES: &str = "CHURN_PREDICTION_SOURCES";

pub const DEFAULT_DATA_SOURCE: &str = "data/bank_churn_cleaned.csv";
pub const DEFAULT_ANALYSIS_JSON: &str = "data/churn_analysis.json";
/// Prediction exports, in lookup order.
pub const DEFAULT_PREDICTION_SOURCES: [&str; 2] = [
    "data/predictions_with_reasons.csv",
    "outputs/explanations/predictions_with_reasons.csv",
];

const DEFAULT_LOG_FILTER: &str = "warn,churn_insights=info";
const VERBOSE_LOG_FILTER: &str = "warn,churn_insights=debug";

/// Entry point for the `churn` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli, |key| std::env::var(key).ok());
    debug!(?config, "resolved run configuration");

    match &cli.command {
        Command::Customers(args) => handle_customers(&config, args),
        Command::Show(args) => handle_show(&config, args),
        Command::Kpis(args) => handle_kpis(&config, args),
        Command::Insights(args) => handle_insights(&config, args),
        Command::Export(args) => handle_export(&config, args),
        Command::Predictions(args) => handle_predictions(&config, args),
    }
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Layer CLI flags over environment defaults.
pub fn resolve_config<F>(cli: &Cli, env: F) -> RunConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut sources: Vec<DataSource> = cli.sources.iter().filter_map(|s| DataSource::parse(s)).collect();
    if sources.is_empty() {
        sources = env(ENV_DATA_SOURCES)
            .map(|raw| parse_source_list(&raw))
            .unwrap_or_default();
    }
    if sources.is_empty() {
        sources.push(DataSource::File(PathBuf::from(DEFAULT_DATA_SOURCE)));
    }

    let analysis_json = cli.analysis.clone().or_else(|| {
        env(ENV_ANALYSIS_JSON)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| PathBuf::from(raw.trim()))
    });

    let prediction_flags: &[String] = match &cli.command {
        Command::Predictions(args) => &args.sources,
        _ => &[],
    };
    let mut prediction_sources: Vec<DataSource> =
        prediction_flags.iter().filter_map(|s| DataSource::parse(s)).collect();
    if prediction_sources.is_empty() {
        prediction_sources = env(ENV_PREDICTION_SOURCES)
            .map(|raw| parse_source_list(&raw))
            .unwrap_or_default();
    }
    if prediction_sources.is_empty() {
        prediction_sources = DEFAULT_PREDICTION_SOURCES
            .iter()
            .map(|p| DataSource::File(PathBuf::from(p)))
            .collect();
    }

    RunConfig {
        sources,
        analysis_json,
        sample: cli.sample,
        seed: cli.seed,
        prediction_sources,
    }
}

fn load_customers(config: &RunConfig) -> Vec<ScoredCustomer> {
    let records = match config.sample {
        Some(count) => {
            info!(count, seed = config.seed, "using synthetic customer sample");
            generate_customers(count, config.seed)
        }
        None => SourceLoader::new().load_first(&config.sources).data.records,
    };
    customers::score_all(&records)
}

/// An explicitly configured export must load; the default location may be absent.
fn load_dashboard(config: &RunConfig) -> Result<DashboardData, AppError> {
    if let Some(path) = &config.analysis_json {
        return DashboardData::from_path(path);
    }
    let default = Path::new(DEFAULT_ANALYSIS_JSON);
    if default.is_file() {
        return DashboardData::from_path(default);
    }
    warn!(path = DEFAULT_ANALYSIS_JSON, "analytics export not found; using built-in headline data");
    Ok(DashboardData::fallback())
}

fn handle_customers(config: &RunConfig, args: &CustomersArgs) -> Result<(), AppError> {
    let all = load_customers(config);
    let query = CustomerQuery {
        term: args.search.clone(),
        risk: args.risk,
        status: args.status,
    };
    let matched = customers::search(&all, &query);
    let page = customers::paginate(&matched, args.page, args.per_page);

    println!("{}", report::format_customer_table(page.items));
    println!("{}", report::format_page_footer(&page));
    println!();
    println!("{}", report::format_customer_stats(&customers::stats(matched.iter().copied())));
    println!("{}", report::format_level_counts(&customers::level_counts(&all)));
    Ok(())
}

fn handle_show(config: &RunConfig, args: &ShowArgs) -> Result<(), AppError> {
    let all = load_customers(config);
    let customer = customers::find_by_id(&all, &args.id)
        .ok_or_else(|| AppError::no_data(format!("No customer with CLIENTNUM '{}'.", args.id.trim())))?;
    let labels = label_record(&customer.record);
    println!("{}", report::format_customer_detail(customer, &labels));
    Ok(())
}

fn handle_kpis(config: &RunConfig, args: &KpisArgs) -> Result<(), AppError> {
    let data = load_dashboard(config)?;
    println!("{}", report::format_kpis(&data.kpis()));

    let sections: Vec<Section> = match args.section {
        Some(section) => vec![section],
        None => Section::ALL.to_vec(),
    };
    for section in sections {
        let rows = data.breakdown(section);
        if rows.is_empty() && args.section.is_none() {
            continue;
        }
        println!();
        println!("{}", report::format_breakdown(section.title(), &rows, args.width));
    }
    Ok(())
}

fn handle_insights(config: &RunConfig, args: &InsightsArgs) -> Result<(), AppError> {
    let data = load_dashboard(config)?;
    println!("{}", report::format_insights(&data.insights_summary()));
    let drivers = data.top_drivers(args.top);
    if !drivers.is_empty() {
        println!();
        println!("{}", report::format_drivers(&drivers));
    }
    Ok(())
}

fn handle_export(config: &RunConfig, args: &ExportArgs) -> Result<(), AppError> {
    let all = load_customers(config);
    crate::io::export::write_customers(&args.out, args.format, &all)?;
    info!(path = %args.out.display(), count = all.len(), "wrote export");
    Ok(())
}

fn handle_predictions(config: &RunConfig, args: &PredictionsArgs) -> Result<(), AppError> {
    let Some((source, text)) = SourceLoader::new().first_text(&config.prediction_sources) else {
        return Err(AppError::no_data(
            "No prediction export found. Run the explanation step or pass --predictions.",
        ));
    };
    let all = parse_predictions(&text);
    info!(%source, records = all.len(), "loaded predictions");

    let matched = search_predictions(&all, &args.search);
    if matched.is_empty() {
        println!("No predictions match the current search.");
        return Ok(());
    }
    let page = customers::paginate(&matched, args.page, args.per_page);
    println!("{}", report::format_prediction_table(page.items));
    println!("{}", report::format_page_footer(&page));
    Ok(())
}
