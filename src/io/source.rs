//! CSV acquisition for customer and prediction exports.
//!
//! Sources are tried in order; the first one that returns CSV text wins. A
//! source "fails" when it cannot be read, returns a non-success status, or
//! serves an HTML page (a dev server's fallback route) instead of CSV.
//!
//! When every source fails the result is an empty batch, not an error: the
//! parser never sees input, so the dashboard simply has no rows.

use std::fs;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::domain::DataSource;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, parse_customers};

/// How many leading bytes are inspected for an HTML document marker.
const HTML_SNIFF_LEN: usize = 200;

/// Outcome of trying an ordered list of sources.
#[derive(Debug, Clone, Default)]
pub struct LoadedCustomers {
    /// The source that produced the data (`None` when all failed).
    pub source: Option<DataSource>,
    pub data: IngestedData,
}

impl LoadedCustomers {
    pub fn is_empty(&self) -> bool {
        self.data.records.is_empty()
    }
}

pub struct SourceLoader {
    client: Client,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Read raw text from a single source.
    pub fn fetch_text(&self, source: &DataSource) -> Result<String, AppError> {
        match source {
            DataSource::File(path) => fs::read_to_string(path).map_err(|e| {
                AppError::invalid_input(format!("Failed to read '{}': {e}", path.display()))
            }),
            DataSource::Url(url) => {
                let resp = self
                    .client
                    .get(url)
                    .send()
                    .map_err(|e| AppError::external(format!("Request to {url} failed: {e}")))?;
                if !resp.status().is_success() {
                    return Err(AppError::external(format!(
                        "Request to {url} failed with status {}.",
                        resp.status()
                    )));
                }
                resp.text()
                    .map_err(|e| AppError::external(format!("Failed to read body from {url}: {e}")))
            }
        }
    }

    /// Try `sources` in order and parse the first usable one.
    pub fn load_first(&self, sources: &[DataSource]) -> LoadedCustomers {
        load_first_with(sources, |source| self.fetch_text(source))
    }

    /// Raw text of the first usable source, whatever it holds.
    pub fn first_text(&self, sources: &[DataSource]) -> Option<(DataSource, String)> {
        first_text_with(sources, |source| self.fetch_text(source))
    }
}

/// Ordered fallback over any fetch function.
pub fn load_first_with<F>(sources: &[DataSource], fetch: F) -> LoadedCustomers
where
    F: FnMut(&DataSource) -> Result<String, AppError>,
{
    let Some((source, text)) = first_text_with(sources, fetch) else {
        return LoadedCustomers::default();
    };
    let data = parse_customers(&text);
    info!(%source, records = data.records.len(), "loaded customers");
    LoadedCustomers {
        source: Some(source),
        data,
    }
}

/// First source whose text is non-blank and not an HTML page.
pub fn first_text_with<F>(sources: &[DataSource], mut fetch: F) -> Option<(DataSource, String)>
where
    F: FnMut(&DataSource) -> Result<String, AppError>,
{
    for source in sources {
        let text = match fetch(source) {
            Ok(text) => text,
            Err(err) => {
                warn!(%source, error = %err, "source unavailable");
                continue;
            }
        };

        if text.trim().is_empty() {
            warn!(%source, "source is empty");
            continue;
        }
        if looks_like_html(&text) {
            warn!(%source, "source served HTML instead of CSV");
            continue;
        }
        return Some((source.clone(), text));
    }

    if !sources.is_empty() {
        warn!(tried = sources.len(), "no source produced data");
    }
    None
}

/// True when the text starts like an HTML document.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text.chars().take(HTML_SNIFF_LEN).collect::<String>().to_ascii_lowercase();
    head.contains("<html") || head.contains("<!doctype")
}

/// Split a comma-separated source list (e.g. from `CHURN_DATA_SOURCES`).
pub fn parse_source_list(raw: &str) -> Vec<DataSource> {
    raw.split(',').filter_map(DataSource::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> DataSource {
        DataSource::File(PathBuf::from(name))
    }

    #[test]
    fn first_successful_source_wins() {
        let sources = vec![file("missing.csv"), file("good.csv"), file("never.csv")];
        let mut calls = Vec::new();
        let loaded = load_first_with(&sources, |source| {
            calls.push(source.to_string());
            match source.to_string().as_str() {
                "good.csv" => Ok("CLIENTNUM,Customer_Age\n1,40\n".to_string()),
                _ => Err(AppError::invalid_input("nope")),
            }
        });
        assert_eq!(loaded.source, Some(file("good.csv")));
        assert_eq!(loaded.data.records.len(), 1);
        assert_eq!(calls, vec!["missing.csv", "good.csv"]);
    }

    #[test]
    fn html_fallback_page_is_skipped() {
        let sources = vec![
            DataSource::Url("http://localhost:3000/data/bank_churn_cleaned.csv".to_string()),
            file("local.csv"),
        ];
        let loaded = load_first_with(&sources, |source| match source {
            DataSource::Url(_) => Ok("<!DOCTYPE html><html><body>app</body></html>".to_string()),
            DataSource::File(_) => Ok("Customer_Age\n33\n".to_string()),
        });
        assert_eq!(loaded.source, Some(file("local.csv")));
        assert_eq!(loaded.data.records.len(), 1);
    }

    #[test]
    fn all_failures_yield_empty_batch() {
        let loaded = load_first_with(&[file("a.csv"), file("b.csv")], |_| {
            Err(AppError::external("offline"))
        });
        assert!(loaded.source.is_none());
        assert!(loaded.is_empty());
    }

    #[test]
    fn first_text_skips_blank_sources_and_returns_raw_text() {
        let sources = vec![file("blank.csv"), file("predictions.csv")];
        let found = first_text_with(&sources, |source| match source.to_string().as_str() {
            "blank.csv" => Ok(" \r\n".to_string()),
            _ => Ok("Churn_Probability\n0.4\n".to_string()),
        });
        assert_eq!(
            found,
            Some((file("predictions.csv"), "Churn_Probability\n0.4\n".to_string()))
        );
        assert_eq!(first_text_with(&[], |_| Ok("x".to_string())), None);
    }

    #[test]
    fn html_sniffing_is_case_insensitive() {
        assert!(looks_like_html("  <HTML lang=\"en\">"));
        assert!(!looks_like_html("CLIENTNUM,Customer_Age\n1,2"));
    }

    #[test]
    fn source_list_splits_urls_and_paths() {
        let sources = parse_source_list(" data/a.csv, https://example.org/b.csv ,,");
        assert_eq!(
            sources,
            vec![
                file("data/a.csv"),
                DataSource::Url("https://example.org/b.csv".to_string()),
            ]
        );
    }
}
