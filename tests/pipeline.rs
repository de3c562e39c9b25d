//! End-to-end checks over the public library API: parsing, scoring, loading
//! from disk, analytics reading and exports.

use std::fs;
use std::path::PathBuf;

use churn_insights::customers::{CustomerQuery, score_all, search};
use churn_insights::dashboard::{DashboardData, Section};
use churn_insights::domain::{
    CLIENTNUM, DataSource, ExportFormat, Record, RiskFilter, RiskLevel, StatusFilter, Value,
};
use churn_insights::io::{SourceLoader, parse, write_customers};
use churn_insights::metrics::{churn_risk_score, risk_level};
use churn_insights::predictions::{PredictedLabel, parse_predictions, search_predictions};
use churn_insights::report::format_currency;
use tempfile::TempDir;

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn record(fields: &[(&str, Value)]) -> Record {
    fields.iter().cloned().collect()
}

#[test]
fn simple_rows_become_string_records() {
    let records = parse("a,b,c\n1,2,3\n4,5,6");
    assert_eq!(
        records,
        vec![
            record(&[("a", text("1")), ("b", text("2")), ("c", text("3"))]),
            record(&[("a", text("4")), ("b", text("5")), ("c", text("6"))]),
        ]
    );
}

#[test]
fn quoted_comma_stays_in_field() {
    let records = parse("name,note\nJoe,\"hello, world\"");
    assert_eq!(records, vec![record(&[("name", text("Joe")), ("note", text("hello, world"))])]);
}

#[test]
fn doubled_quote_is_literal() {
    let records = parse("x\n\"she said \"\"hi\"\"\"");
    assert_eq!(records, vec![record(&[("x", text("she said \"hi\""))])]);
}

#[test]
fn crlf_and_lf_parse_identically() {
    let lf = "CLIENTNUM,Gender,Customer_Age\n1,M,45\n2,\"F\",61\n";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(lf), parse(&crlf));
    assert_eq!(parse(lf).len(), 2);
}

#[test]
fn blank_line_between_rows_is_dropped() {
    let records = parse("a,b\n1,2\n\n3,4\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("a"), Some(&text("3")));
}

#[test]
fn all_rules_clamp_to_one_hundred() {
    let records = parse(
        "Customer_Age,Months_Inactive_12_mon,Contacts_Count_12_mon,Avg_Utilization_Ratio,Total_Trans_Ct,Income_Category\n\
         25,4,5,0.8,10,Less than $40K\n",
    );
    let score = churn_risk_score(&records[0]);
    assert_eq!(score, 100);
    assert_eq!(risk_level(score), RiskLevel::High);
}

#[test]
fn band_boundaries() {
    let twenty = record(&[("Customer_Age", Value::Number(70.0)), ("Income_Category", text("Less than $40K"))]);
    assert_eq!(churn_risk_score(&twenty), 20);
    assert_eq!(risk_level(churn_risk_score(&twenty)), RiskLevel::Low);

    let fifty = record(&[
        ("Customer_Age", Value::Number(22.0)),
        ("Months_Inactive_12_mon", Value::Number(5.0)),
        ("Contacts_Count_12_mon", Value::Number(6.0)),
    ]);
    assert_eq!(churn_risk_score(&fifty), 50);
    assert_eq!(risk_level(churn_risk_score(&fifty)), RiskLevel::Medium);

    // Every rule weight is a multiple of five, so 21 and 51 only occur as bare scores.
    assert_eq!(risk_level(21), RiskLevel::Medium);
    assert_eq!(risk_level(51), RiskLevel::High);
}

#[test]
fn null_fields_score_zero() {
    let records = parse(
        "Customer_Age,Months_Inactive_12_mon,Contacts_Count_12_mon,Avg_Utilization_Ratio,Total_Trans_Ct\n\
         n/a,,unknown,,-\n",
    );
    assert_eq!(records.len(), 1);
    assert!(records[0].get("Customer_Age").is_some_and(Value::is_null));
    assert_eq!(churn_risk_score(&records[0]), 0);
    assert_eq!(risk_level(0), RiskLevel::Low);
    assert_eq!(churn_risk_score(&Record::new()), 0);
}

#[test]
fn currency_zero_and_thousands() {
    assert_eq!(format_currency(None), "$0");
    assert_eq!(format_currency(Some(0.0)), "$0");
    assert_eq!(format_currency(Some(12_000.0)), "$12,000");
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loader_skips_html_and_synthesizes_ids() {
    let dir = TempDir::new().unwrap();
    let html = write(&dir, "index.csv", "<!DOCTYPE html><html><body>app</body></html>");
    let csv = write(
        &dir,
        "customers.csv",
        "Customer_Age,Income_Category,Attrition_Flag\r\n65,Less than $40K,Attrited Customer\r\n40,$60K - $80K,Existing Customer\r\n",
    );

    let loaded = SourceLoader::new().load_first(&[
        DataSource::File(dir.path().join("missing.csv")),
        DataSource::File(html),
        DataSource::File(csv.clone()),
    ]);

    assert_eq!(loaded.source, Some(DataSource::File(csv)));
    let ids: Vec<f64> = loaded.data.records.iter().filter_map(|r| r.number(CLIENTNUM)).collect();
    assert_eq!(ids, vec![100_001.0, 100_002.0]);
}

#[test]
fn loader_with_no_usable_source_is_empty() {
    let dir = TempDir::new().unwrap();
    let empty = write(&dir, "empty.csv", "  \n");
    let loaded = SourceLoader::new().load_first(&[DataSource::File(empty)]);
    assert!(loaded.is_empty());
    assert_eq!(loaded.source, None);
}

#[test]
fn filtered_search_over_loaded_file() {
    let records = parse(
        "CLIENTNUM,Customer_Age,Total_Trans_Ct,Attrition_Flag\n\
         1,25,10,Attrited Customer\n\
         2,45,80,Existing Customer\n\
         3,70,15,Existing Customer\n",
    );
    let customers = score_all(&records);
    let query = CustomerQuery {
        term: String::new(),
        risk: RiskFilter::Medium,
        status: StatusFilter::Existing,
    };
    let hits: Vec<String> = search(&customers, &query).iter().map(|c| c.id()).collect();
    assert_eq!(hits, vec!["3"]);
}

#[test]
fn csv_export_reparses_with_scores() {
    let dir = TempDir::new().unwrap();
    let customers = score_all(&parse(
        "CLIENTNUM,Customer_Age,Income_Category\n7,65,Less than $40K\n8,45,\"$40K - $60K\"\n",
    ));
    let out = dir.path().join("scored.csv");
    write_customers(&out, ExportFormat::Csv, &customers).unwrap();

    let back = parse(&fs::read_to_string(&out).unwrap());
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].number(CLIENTNUM), Some(7.0));
    assert_eq!(back[0].text("risk_score"), Some("20"));
    assert_eq!(back[0].text("risk_level"), Some("Low"));
    assert_eq!(back[1].text("Income_Category"), Some("$40K - $60K"));
}

#[test]
fn json_export_counts_customers() {
    let dir = TempDir::new().unwrap();
    let customers = score_all(&parse("CLIENTNUM\n1\n2\n3\n"));
    let out = dir.path().join("scored.json");
    write_customers(&out, ExportFormat::Json, &customers).unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["count"], 3);
    assert_eq!(v["customers"].as_array().map(Vec::len), Some(3));
}

#[test]
fn export_to_missing_directory_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("no/such/dir/scored.csv");
    let err = write_customers(&out, ExportFormat::Csv, &[]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn analytics_file_keeps_breakdown_order() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "analysis.json",
        r#"{
          "churn_overview": {
            "churn_by_card_type": {
              "Silver": {"Total_Customers": 555, "Churned_Count": 82, "Churn_Rate": 0.1477},
              "Blue": {"Total_Customers": 9436.0, "Churned_Count": 1519.0, "Churn_Rate": 0.161},
              "Gold": {"Total_Customers": 116, "Churned_Count": 21, "Churn_Rate": 0.181}
            }
          }
        }"#,
    );
    let data = DashboardData::from_path(&path).unwrap();
    let rows = data.breakdown(Section::CardType);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Silver", "Blue", "Gold"]);
    assert_eq!(rows[1].total, 9436);
    assert_eq!(rows[2].churn_rate_pct, 18.1);
    assert!(data.breakdown(Section::Age).is_empty());
}

#[test]
fn prediction_export_loads_from_fallback_and_searches() {
    let dir = TempDir::new().unwrap();
    let csv = write(
        &dir,
        "predictions_with_reasons.csv",
        "Churn_Probability,Predicted_Label,Recommended_Action,Top_Reasons,Reason_Comment\n\
         0.87,1,Offer fee waiver,\"Total_Trans_Ct (-), Total_Revolving_Bal (-)\",Spending dropped\n\
         0.05,0,,Total_Trans_Amt (+),\n\
         \n\
         0.64,1,Retention call,Contacts_Count_12_mon (+),\"Called \"\"twice\"\"\"\n",
    );

    let found = SourceLoader::new().first_text(&[
        DataSource::File(dir.path().join("data/predictions_with_reasons.csv")),
        DataSource::File(csv.clone()),
    ]);
    let (source, text) = found.unwrap();
    assert_eq!(source, DataSource::File(csv));

    let all = parse_predictions(&text);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].id, 3);
    assert_eq!(all[2].reason_comment.as_deref(), Some("Called \"twice\""));

    let churners: Vec<usize> = search_predictions(&all, "churn")
        .iter()
        .filter(|p| p.label == PredictedLabel::Churn)
        .map(|p| p.id)
        .collect();
    assert_eq!(churners, vec![1, 3]);
    let revolving: Vec<usize> = search_predictions(&all, "REVOLVING").iter().map(|p| p.id).collect();
    assert_eq!(revolving, vec![1]);
}
