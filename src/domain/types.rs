//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by ingest and scored in-memory
//! - exported to JSON/CSV
//! - printed by the report layer without further conversion

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const CLIENTNUM: &str = "CLIENTNUM";
pub const CUSTOMER_AGE: &str = "Customer_Age";
pub const DEPENDENT_COUNT: &str = "Dependent_count";
pub const MONTHS_ON_BOOK: &str = "Months_on_book";
pub const TOTAL_RELATIONSHIP_COUNT: &str = "Total_Relationship_Count";
pub const MONTHS_INACTIVE: &str = "Months_Inactive_12_mon";
pub const CONTACTS_COUNT: &str = "Contacts_Count_12_mon";
pub const CREDIT_LIMIT: &str = "Credit_Limit";
pub const TOTAL_REVOLVING_BAL: &str = "Total_Revolving_Bal";
pub const AVG_OPEN_TO_BUY: &str = "Avg_Open_To_Buy";
pub const TOTAL_TRANS_AMT: &str = "Total_Trans_Amt";
pub const TOTAL_TRANS_CT: &str = "Total_Trans_Ct";
pub const AVG_UTILIZATION_RATIO: &str = "Avg_Utilization_Ratio";

pub const GENDER: &str = "Gender";
pub const EDUCATION_LEVEL: &str = "Education_Level";
pub const MARITAL_STATUS: &str = "Marital_Status";
pub const INCOME_CATEGORY: &str = "Income_Category";
pub const CARD_CATEGORY: &str = "Card_Category";
pub const ATTRITION_FLAG: &str = "Attrition_Flag";

/// Columns coerced to numbers during ingest. Order matches the export schema.
pub const NUMERIC_FIELDS: [&str; 13] = [
    CLIENTNUM,
    CUSTOMER_AGE,
    DEPENDENT_COUNT,
    MONTHS_ON_BOOK,
    TOTAL_RELATIONSHIP_COUNT,
    MONTHS_INACTIVE,
    CONTACTS_COUNT,
    CREDIT_LIMIT,
    TOTAL_REVOLVING_BAL,
    AVG_OPEN_TO_BUY,
    TOTAL_TRANS_AMT,
    TOTAL_TRANS_CT,
    AVG_UTILIZATION_RATIO,
];

/// Lowest bracket of `Income_Category`.
pub const LOWEST_INCOME_BRACKET: &str = "Less than $40K";

pub const ATTRITED_CUSTOMER: &str = "Attrited Customer";
pub const EXISTING_CUSTOMER: &str = "Existing Customer";

pub fn is_numeric_field(name: &str) -> bool {
    NUMERIC_FIELDS.contains(&name)
}

/// A single field value after ingest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Cell rendering: numbers without a trailing `.0`, null as empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One parsed data row: column name → value, in header order.
///
/// A short row leaves its trailing non-numeric columns unset, so two records of
/// the same batch can differ in length.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(n),
        }
    }

    /// Insert or replace a field. New keys are appended; a replaced key keeps its slot.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Numeric view of a field; `None` for absent, null, or text values.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// Field rendered as a display cell (empty when absent or null).
    pub fn cell(&self, key: &str) -> String {
        self.get(key).map(Value::to_string).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Three-band classification of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn display_name(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

/// Score plus classification, recomputed on demand from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
}

/// Risk-band filter for customer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl RiskFilter {
    pub fn matches(self, level: RiskLevel) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::Low => level == RiskLevel::Low,
            RiskFilter::Medium => level == RiskLevel::Medium,
            RiskFilter::High => level == RiskLevel::High,
        }
    }
}

/// Attrition-status filter for customer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Existing,
    Attrited,
}

impl StatusFilter {
    /// Case-insensitive containment against `Attrition_Flag`.
    pub fn matches(self, attrition_flag: Option<&str>) -> bool {
        let needle = match self {
            StatusFilter::All => return true,
            StatusFilter::Existing => "existing",
            StatusFilter::Attrited => "attrited",
        };
        attrition_flag
            .map(|flag| flag.to_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

/// Where customer CSV text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` / `https://` prefixes select a URL; anything else is a path.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(DataSource::Url(raw.to_string()))
        } else {
            Some(DataSource::File(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

/// A resolved run configuration (env defaults + CLI overrides).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Ordered customer CSV sources; the first one that yields data wins.
    pub sources: Vec<DataSource>,
    /// Pre-aggregated analytics JSON.
    pub analysis_json: Option<PathBuf>,
    /// When set, use a synthetic batch of this many customers instead of `sources`.
    pub sample: Option<usize>,
    pub seed: u64,
    /// Ordered model prediction CSV sources, tried the same way as `sources`.
    pub prediction_sources: Vec<DataSource>,
}
