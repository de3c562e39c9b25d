//! Model prediction exports (`predictions_with_reasons.csv`).
//!
//! Each row carries a churn probability, a 0/1 predicted label and the
//! explanation text produced alongside it. Rows are numbered from 1 in file
//! order after blank rows are dropped.

use std::fmt;

use serde::Serialize;

use crate::io::ingest::{coerce_number, ingest};

pub const CHURN_PROBABILITY: &str = "Churn_Probability";
pub const PREDICTED_LABEL: &str = "Predicted_Label";
pub const RECOMMENDED_ACTION: &str = "Recommended_Action";
pub const TOP_REASONS: &str = "Top_Reasons";
pub const REASON_COMMENT: &str = "Reason_Comment";

/// Placeholder for a missing probability or text column.
pub const MISSING: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictedLabel {
    Churn,
    NoChurn,
}

impl PredictedLabel {
    /// `"1"` is churn; anything else (including a missing column) is not.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("1") => PredictedLabel::Churn,
            _ => PredictedLabel::NoChurn,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PredictedLabel::Churn => "Churn",
            PredictedLabel::NoChurn => "No Churn",
        }
    }
}

impl fmt::Display for PredictedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// 1-based row number.
    pub id: usize,
    pub probability: Option<f64>,
    pub label: PredictedLabel,
    pub action: Option<String>,
    pub top_reasons: Option<String>,
    pub reason_comment: Option<String>,
}

impl Prediction {
    /// Probability as a one-decimal percent, e.g. `83.4%`.
    pub fn probability_label(&self) -> String {
        self.probability
            .map(|p| format!("{:.1}%", p * 100.0))
            .unwrap_or_else(|| MISSING.to_string())
    }

    /// Case-insensitive containment over label, action, reasons and comment.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&term);
        hit(self.label.display_name())
            || [&self.action, &self.top_reasons, &self.reason_comment]
                .into_iter()
                .flatten()
                .any(|s| hit(s.as_str()))
    }
}

pub fn parse_predictions(text: &str) -> Vec<Prediction> {
    ingest(text)
        .records
        .into_iter()
        .enumerate()
        .map(|(idx, r)| Prediction {
            id: idx + 1,
            probability: r.text(CHURN_PROBABILITY).and_then(|raw| coerce_number(raw).as_number()),
            label: PredictedLabel::from_raw(r.text(PREDICTED_LABEL)),
            action: non_empty(r.text(RECOMMENDED_ACTION)),
            top_reasons: non_empty(r.text(TOP_REASONS)),
            reason_comment: non_empty(r.text(REASON_COMMENT)),
        })
        .collect()
}

pub fn search_predictions<'a>(predictions: &'a [Prediction], term: &str) -> Vec<&'a Prediction> {
    predictions.iter().filter(|p| p.matches(term)).collect()
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
