//! Export scored customers to CSV or JSON.
//!
//! The CSV export is meant to be easy to consume in spreadsheets: one column per
//! record field (first-seen order across the batch) followed by `risk_score`
//! and `risk_level`. The JSON export wraps the same rows with run metadata.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::customers::ScoredCustomer;
use crate::domain::ExportFormat;
use crate::error::AppError;

pub const RISK_SCORE_COLUMN: &str = "risk_score";
pub const RISK_LEVEL_COLUMN: &str = "risk_level";

#[derive(Debug, Serialize)]
struct ExportFile<'a> {
    tool: &'static str,
    generated_at: DateTime<Utc>,
    count: usize,
    customers: &'a [ScoredCustomer],
}

/// Write customers to `path` in the requested format.
pub fn write_customers(path: &Path, format: ExportFormat, customers: &[ScoredCustomer]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to create export '{}': {e}", path.display())))?;
    match format {
        ExportFormat::Csv => write_customers_csv(file, customers),
        ExportFormat::Json => write_customers_json(file, customers),
    }
}

pub fn write_customers_csv<W: Write>(out: W, customers: &[ScoredCustomer]) -> Result<(), AppError> {
    let columns = export_columns(customers);
    let mut wtr = csv::Writer::from_writer(out);

    let header = columns
        .iter()
        .map(String::as_str)
        .chain([RISK_SCORE_COLUMN, RISK_LEVEL_COLUMN]);
    wtr.write_record(header)
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV header: {e}")))?;

    for c in customers {
        let mut row: Vec<String> = columns.iter().map(|k| c.record.cell(k)).collect();
        row.push(c.risk.score.to_string());
        row.push(c.risk.level.to_string());
        wtr.write_record(&row)
            .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::invalid_input(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

pub fn write_customers_json<W: Write>(out: W, customers: &[ScoredCustomer]) -> Result<(), AppError> {
    let file = ExportFile {
        tool: "churn",
        generated_at: Utc::now(),
        count: customers.len(),
        customers,
    };
    serde_json::to_writer_pretty(out, &file)
        .map_err(|e| AppError::invalid_input(format!("Failed to write export JSON: {e}")))
}

/// Union of record keys, in the order they are first seen.
fn export_columns(customers: &[ScoredCustomer]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for c in customers {
        for key in c.record.keys() {
            if !columns.iter().any(|k| k == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}
