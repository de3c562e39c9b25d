//! Read-only access to the pre-aggregated churn analytics export.
//!
//! `DashboardData` is built once by the caller (from a file, a string, or the
//! built-in fallback) and passed to whatever renders it. It never changes after
//! construction and holds no global state.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::AppError;

/// Headline numbers used when no analytics export is available.
const FALLBACK_JSON: &str = r#"{
  "summary_kpis": {
    "kpi_metrics": {
      "total_customers": 10127,
      "churned_customers": 1627,
      "overall_churn_rate": 0.1607,
      "retention_rate": 0.8393,
      "avg_customer_age": 46.33,
      "avg_tenure_months": 35.93,
      "avg_credit_limit": 8631.95,
      "avg_transaction_amount": 4404.09
    },
    "risk_segments": {
      "high_risk_customers": 2532,
      "medium_risk_customers": 3795,
      "low_risk_customers": 3800
    }
  },
  "churn_overview": {
    "churn_by_age": {
      "<30": {"Total_Customers": 265, "Churned_Count": 32, "Churn_Rate": 0.121},
      "30-40": {"Total_Customers": 2132, "Churned_Count": 310, "Churn_Rate": 0.145},
      "40-50": {"Total_Customers": 4652, "Churned_Count": 779, "Churn_Rate": 0.167},
      "50-60": {"Total_Customers": 2673, "Churned_Count": 448, "Churn_Rate": 0.168},
      "60+": {"Total_Customers": 405, "Churned_Count": 58, "Churn_Rate": 0.143}
    },
    "churn_by_income": {
      "$120K +": {"Total_Customers": 727, "Churned_Count": 126, "Churn_Rate": 0.173},
      "$40K - $60K": {"Total_Customers": 1790, "Churned_Count": 271, "Churn_Rate": 0.151},
      "$60K - $80K": {"Total_Customers": 1402, "Churned_Count": 189, "Churn_Rate": 0.135},
      "$80K - $120K": {"Total_Customers": 1535, "Churned_Count": 242, "Churn_Rate": 0.158},
      "Less than $40K": {"Total_Customers": 3561, "Churned_Count": 612, "Churn_Rate": 0.172},
      "Unknown Income": {"Total_Customers": 1112, "Churned_Count": 187, "Churn_Rate": 0.168}
    }
  },
  "churn_drivers": {
    "key_insights": [
      {
        "category": "Inactivity Risk",
        "insight": "Customers inactive for 3+ months have 22.0% churn rate",
        "risk_level": "Medium"
      },
      {
        "category": "Service Issues",
        "insight": "Customers with 4+ service contacts have 26.4% churn rate",
        "risk_level": "High"
      }
    ]
  }
}"#;

/// One `{Total_Customers, Churned_Count, Churn_Rate}` cell of a breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmentSource {
    // Counts may come through as floats (or null) from the aggregation step.
    #[serde(rename = "Total_Customers")]
    pub total_customers: Option<f64>,
    #[serde(rename = "Churned_Count")]
    pub churned_count: Option<f64>,
    #[serde(rename = "Churn_Rate")]
    pub churn_rate: Option<f64>,
}

/// Breakdown rows keyed by label, in file order.
pub type Breakdown = IndexMap<String, SegmentSource>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct KpiSource {
    total_customers: Option<f64>,
    churned_customers: Option<f64>,
    overall_churn_rate: Option<f64>,
    retention_rate: Option<f64>,
    avg_customer_age: Option<f64>,
    avg_tenure_months: Option<f64>,
    avg_credit_limit: Option<f64>,
    avg_transaction_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RiskSegmentSource {
    high_risk_customers: Option<f64>,
    medium_risk_customers: Option<f64>,
    low_risk_customers: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SummaryKpis {
    kpi_metrics: KpiSource,
    risk_segments: RiskSegmentSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ChurnOverview {
    churn_by_age: Breakdown,
    churn_by_income: Breakdown,
    churn_by_card_type: Breakdown,
    churn_by_tenure: Breakdown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CustomerActivity {
    churn_by_months_inactive: Breakdown,
    churn_by_service_contacts: Breakdown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FinancialBehavior {
    churn_by_utilization: Breakdown,
    churn_by_credit_limit: Breakdown,
}

/// A narrative insight from the analytics export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Insight {
    pub category: String,
    pub insight: String,
    pub risk_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ChurnDrivers {
    key_insights: Vec<Insight>,
    top_numerical_drivers: IndexMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct AnalysisFile {
    summary_kpis: SummaryKpis,
    churn_overview: ChurnOverview,
    customer_activity: CustomerActivity,
    financial_behavior: FinancialBehavior,
    churn_drivers: ChurnDrivers,
}

/// Which breakdown to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Age,
    Income,
    CardType,
    Tenure,
    MonthsInactive,
    ServiceContacts,
    Utilization,
    CreditLimit,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Age,
        Section::Income,
        Section::CardType,
        Section::Tenure,
        Section::MonthsInactive,
        Section::ServiceContacts,
        Section::Utilization,
        Section::CreditLimit,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Age => "Churn by age group",
            Section::Income => "Churn by income category",
            Section::CardType => "Churn by card type",
            Section::Tenure => "Churn by tenure",
            Section::MonthsInactive => "Churn by months inactive",
            Section::ServiceContacts => "Churn by service contacts",
            Section::Utilization => "Churn by utilization",
            Section::CreditLimit => "Churn by credit limit",
        }
    }
}

/// KPI card values, already rounded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiMetrics {
    pub total_customers: u64,
    pub churned_customers: u64,
    pub churn_rate_pct: f64,
    pub retention_rate_pct: f64,
    pub avg_customer_age: i64,
    pub avg_tenure_months: i64,
    pub avg_credit_limit: i64,
    pub avg_transaction_amount: i64,
    pub high_risk_customers: u64,
    pub medium_risk_customers: u64,
    pub low_risk_customers: u64,
}

/// One chart row of a breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    pub label: String,
    pub total: u64,
    pub churned: u64,
    pub churn_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightsSummary {
    pub insights: Vec<Insight>,
    pub total: usize,
    pub high: usize,
    pub medium: usize,
}

/// A numerical churn driver (absolute correlation with churn).
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub feature: String,
    pub importance: f64,
}

impl Driver {
    /// Importance as a percent with one decimal, e.g. `37.1%`.
    pub fn importance_label(&self) -> String {
        format!("{:.1}%", self.importance * 100.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    analysis: AnalysisFile,
}

impl DashboardData {
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let analysis: AnalysisFile = serde_json::from_str(text)
            .map_err(|e| AppError::invalid_input(format!("Invalid analytics JSON: {e}")))?;
        Ok(Self { analysis })
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::invalid_input(format!("Failed to open analytics JSON '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Built-in headline dataset.
    pub fn fallback() -> Self {
        Self::from_json_str(FALLBACK_JSON).unwrap_or_default()
    }

    pub fn kpis(&self) -> KpiMetrics {
        let k = &self.analysis.summary_kpis.kpi_metrics;
        let r = &self.analysis.summary_kpis.risk_segments;
        KpiMetrics {
            total_customers: count(k.total_customers),
            churned_customers: count(k.churned_customers),
            churn_rate_pct: k.overall_churn_rate.map(pct_1dp).unwrap_or(0.0),
            retention_rate_pct: k.retention_rate.map(pct_1dp).unwrap_or(0.0),
            avg_customer_age: whole(k.avg_customer_age),
            avg_tenure_months: whole(k.avg_tenure_months),
            avg_credit_limit: whole(k.avg_credit_limit),
            avg_transaction_amount: whole(k.avg_transaction_amount),
            high_risk_customers: count(r.high_risk_customers),
            medium_risk_customers: count(r.medium_risk_customers),
            low_risk_customers: count(r.low_risk_customers),
        }
    }

    pub fn raw_breakdown(&self, section: Section) -> &Breakdown {
        let a = &self.analysis;
        match section {
            Section::Age => &a.churn_overview.churn_by_age,
            Section::Income => &a.churn_overview.churn_by_income,
            Section::CardType => &a.churn_overview.churn_by_card_type,
            Section::Tenure => &a.churn_overview.churn_by_tenure,
            Section::MonthsInactive => &a.customer_activity.churn_by_months_inactive,
            Section::ServiceContacts => &a.customer_activity.churn_by_service_contacts,
            Section::Utilization => &a.financial_behavior.churn_by_utilization,
            Section::CreditLimit => &a.financial_behavior.churn_by_credit_limit,
        }
    }

    /// Chart rows in file order. Empty tenure groups are skipped.
    pub fn breakdown(&self, section: Section) -> Vec<SegmentRow> {
        self.raw_breakdown(section)
            .iter()
            .filter(|(_, s)| section != Section::Tenure || count(s.total_customers) > 0)
            .map(|(label, s)| SegmentRow {
                label: label.to_string(),
                total: count(s.total_customers),
                churned: count(s.churned_count),
                churn_rate_pct: s.churn_rate.map(pct_1dp).unwrap_or(0.0),
            })
            .collect()
    }

    pub fn insights_summary(&self) -> InsightsSummary {
        let insights = self.analysis.churn_drivers.key_insights.clone();
        let level_count = |level: &str| insights.iter().filter(|i| i.risk_level == level).count();
        InsightsSummary {
            total: insights.len(),
            high: level_count("High"),
            medium: level_count("Medium"),
            insights,
        }
    }

    /// The `n` strongest numerical drivers, strongest first.
    pub fn top_drivers(&self, n: usize) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self
            .analysis
            .churn_drivers
            .top_numerical_drivers
            .iter()
            .filter_map(|(feature, importance)| {
                // The export writes NaN correlations (constant columns) as null.
                let importance = importance.filter(|v| v.is_finite())?;
                Some(Driver {
                    feature: feature.to_string(),
                    importance,
                })
            })
            .collect();
        drivers.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        drivers.truncate(n);
        drivers
    }
}

/// Fraction → percent rounded to one decimal (`0.16066` → `16.1`).
pub fn pct_1dp(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    (fraction * 1000.0).round() / 10.0
}

fn count(v: Option<f64>) -> u64 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

/// Null or non-finite averages display as 0.
fn whole(v: Option<f64>) -> i64 {
    v.filter(|v| v.is_finite()).map(|v| v.round() as i64).unwrap_or(0)
}
