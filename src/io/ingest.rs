//! CSV ingest: raw text → records.
//!
//! Parsing never fails. Ragged rows, bad quoting, and non-numeric values in
//! numeric columns all degrade to partial records or `Value::Null`.

use tracing::debug;

use crate::domain::{CLIENTNUM, Record, Value, is_numeric_field};
use crate::io::csv_text::parse_rows;

/// Pseudo customer ids start here when a file has no `CLIENTNUM` column.
pub const SYNTHETIC_ID_BASE: f64 = 100_000.0;

/// Row accounting for a single parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Rows after the header, blank ones included.
    pub rows_read: usize,
    pub rows_blank: usize,
    pub records: usize,
}

/// Ingest output: header sequence + records + row accounting.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    pub stats: IngestStats,
}

impl IngestedData {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Parse CSV text into records keyed by the header row.
pub fn parse(text: &str) -> Vec<Record> {
    ingest(text).records
}

/// Parse CSV text and keep the header and row accounting alongside the records.
///
/// Leading blank rows are skipped, so the header is the first row carrying data.
pub fn ingest(text: &str) -> IngestedData {
    let mut rows = parse_rows(text)
        .into_iter()
        .skip_while(|row| is_blank(row));

    let Some(header_row) = rows.next() else {
        return IngestedData::default();
    };
    let headers = normalize_headers(header_row);

    let mut records = Vec::new();
    let mut stats = IngestStats::default();

    for row in rows {
        stats.rows_read += 1;
        if is_blank(&row) {
            stats.rows_blank += 1;
            continue;
        }
        records.push(build_record(&headers, row));
    }
    stats.records = records.len();

    debug!(
        columns = headers.len(),
        rows_read = stats.rows_read,
        rows_blank = stats.rows_blank,
        records = stats.records,
        "parsed customer csv"
    );

    IngestedData {
        headers,
        records,
        stats,
    }
}

/// Parse a customer export, synthesizing `CLIENTNUM` when the file has none.
///
/// Synthetic ids are `100000 + n` with `n` the 1-based record position, so they
/// are stable for a given file.
pub fn parse_customers(text: &str) -> IngestedData {
    let mut data = ingest(text);
    if !data.has_column(CLIENTNUM) {
        for (idx, record) in data.records.iter_mut().enumerate() {
            record.insert(CLIENTNUM, Value::Number(SYNTHETIC_ID_BASE + (idx + 1) as f64));
        }
    }
    data
}

/// Best-effort numeric conversion: empty, unparseable, or non-finite → `Null`.
pub fn coerce_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Value::Number(v),
        _ => Value::Null,
    }
}

fn build_record(headers: &[String], row: Vec<String>) -> Record {
    let mut values = row.into_iter();
    let mut record = Record::with_capacity(headers.len());
    for name in headers {
        match values.next() {
            Some(raw) if is_numeric_field(name) => record.insert(name.as_str(), coerce_number(&raw)),
            Some(raw) => record.insert(name.as_str(), Value::Text(raw)),
            // Short row: numeric columns still resolve (to null), text columns stay unset.
            None if is_numeric_field(name) => record.insert(name.as_str(), Value::Null),
            None => {}
        }
    }
    record
}

fn normalize_headers(row: Vec<String>) -> Vec<String> {
    row.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            // Spreadsheet exports sometimes prefix the first header with a BOM.
            let name = if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name
            };
            name.trim().to_string()
        })
        .collect()
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CUSTOMER_AGE, INCOME_CATEGORY};

    #[test]
    fn simple_rows_stay_strings_outside_numeric_set() {
        let records = parse("a,b,c\n1,2,3\n4,5,6");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("a"), Some("1"));
        assert_eq!(records[0].text("b"), Some("2"));
        assert_eq!(records[0].text("c"), Some("3"));
        assert_eq!(records[1].text("a"), Some("4"));
        assert_eq!(records[1].text("c"), Some("6"));
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn numeric_columns_are_coerced() {
        let records = parse("Customer_Age,Income_Category,Credit_Limit\n45,Less than $40K,12691.0\n");
        assert_eq!(records[0].number(CUSTOMER_AGE), Some(45.0));
        assert_eq!(records[0].text(INCOME_CATEGORY), Some("Less than $40K"));
        assert_eq!(records[0].number("Credit_Limit"), Some(12691.0));
    }

    #[test]
    fn bad_numeric_values_become_null() {
        let records = parse("Customer_Age,Total_Trans_Ct,Avg_Utilization_Ratio\nabc,,inf\n");
        let r = &records[0];
        assert_eq!(r.get(CUSTOMER_AGE), Some(&Value::Null));
        assert_eq!(r.get("Total_Trans_Ct"), Some(&Value::Null));
        assert_eq!(r.get("Avg_Utilization_Ratio"), Some(&Value::Null));
    }

    #[test]
    fn short_row_leaves_text_keys_unset() {
        let records = parse("name,note,Customer_Age\nJoe\n");
        let r = &records[0];
        assert_eq!(r.text("name"), Some("Joe"));
        assert!(!r.contains_key("note"));
        assert_eq!(r.get(CUSTOMER_AGE), Some(&Value::Null));
    }

    #[test]
    fn whitespace_only_rows_are_dropped() {
        let data = ingest("a,b\n1,2\n  ,\t\n3,4\n");
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.stats.rows_read, 3);
        assert_eq!(data.stats.rows_blank, 1);
        assert_eq!(data.stats.records, 2);
    }

    #[test]
    fn blank_rows_before_header_are_skipped() {
        let records = parse("\n  ,\nname\nJoe\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(records[0].text("name"), Some("Joe"));
    }

    #[test]
    fn header_only_input_has_no_records() {
        let data = ingest("a,b,c\n");
        assert_eq!(data.headers, vec!["a", "b", "c"]);
        assert!(data.records.is_empty());
    }

    #[test]
    fn bom_and_padding_are_stripped_from_headers() {
        let data = ingest("\u{feff}CLIENTNUM , Customer_Age\n1,2\n");
        assert_eq!(data.headers, vec!["CLIENTNUM", "Customer_Age"]);
        assert_eq!(data.records[0].number(CLIENTNUM), Some(1.0));
    }

    #[test]
    fn customer_ids_are_synthesized_when_missing() {
        let data = parse_customers("Customer_Age\n40\n\n50\n");
        assert_eq!(data.records[0].number(CLIENTNUM), Some(100_001.0));
        assert_eq!(data.records[1].number(CLIENTNUM), Some(100_002.0));
    }

    #[test]
    fn existing_customer_ids_are_kept() {
        let data = parse_customers("CLIENTNUM,Customer_Age\n768805383,45\n");
        assert_eq!(data.records[0].number(CLIENTNUM), Some(768_805_383.0));
    }

    #[test]
    fn coerce_number_accepts_padding_and_exponents() {
        assert_eq!(coerce_number(" 12 "), Value::Number(12.0));
        assert_eq!(coerce_number("1e3"), Value::Number(1000.0));
        assert_eq!(coerce_number("   "), Value::Null);
        assert_eq!(coerce_number("NaN"), Value::Null);
    }
}
