//! Per-record derived metrics.
//!
//! - churn-risk score + level (`risk`)
//! - age-group / tenure-bucket labels (`segments`)

pub mod risk;
pub mod segments;

pub use risk::{assess, churn_risk_score, risk_level};
pub use segments::{SegmentLabels, label_record};
