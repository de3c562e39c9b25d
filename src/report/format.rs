//! Formatted terminal output: currency, tables, KPI cards, bar charts.
//!
//! We keep formatting code in one place so:
//! - the scoring/query code stays clean and testable
//! - output changes are localized (important for snapshot-style tests)

use crate::customers::{CustomerStats, Page, ScoredCustomer};
use crate::dashboard::{Driver, InsightsSummary, KpiMetrics, SegmentRow};
use crate::domain::{
    ATTRITION_FLAG, AVG_UTILIZATION_RATIO, CARD_CATEGORY, CREDIT_LIMIT, CUSTOMER_AGE,
    INCOME_CATEGORY, RiskLevel,
};
use crate::metrics::SegmentLabels;
use crate::predictions::{MISSING, Prediction};

/// Whole-dollar en-US currency: `$12,000`, `-$1,250`. Missing or non-finite → `$0`.
pub fn format_currency(amount: Option<f64>) -> String {
    let v = amount.filter(|v| v.is_finite()).unwrap_or(0.0).round();
    let digits = group_digits(&format!("{:.0}", v.abs()));
    if v < 0.0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A percent value (already ×100) with one decimal: `16.1%`.
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}

/// Customer list table.
pub fn format_customer_table(rows: &[&ScoredCustomer]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:>4} {:<16} {:<9} {:>13} {:>6} {:>6} {:<7} {:<18}",
            "id", "age", "income", "card", "credit_limit", "util", "score", "risk", "status"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<4} {:-<16} {:-<9} {:-<13} {:-<6} {:-<6} {:-<7} {:-<18}",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for c in rows {
        let r = &c.record;
        let util = r
            .number(AVG_UTILIZATION_RATIO)
            .map(|u| format!("{u:.2}"))
            .unwrap_or_default();
        let credit = r
            .number(CREDIT_LIMIT)
            .map(|v| format_currency(Some(v)))
            .unwrap_or_default();
        out.push_str(
            format!(
                "{:<12} {:>4} {:<16} {:<9} {:>13} {:>6} {:>6} {:<7} {:<18}",
                truncate(&c.id(), 12),
                r.cell(CUSTOMER_AGE),
                truncate(&r.cell(INCOME_CATEGORY), 16),
                truncate(&r.cell(CARD_CATEGORY), 9),
                credit,
                util,
                c.risk.score,
                c.risk.level,
                truncate(&r.cell(ATTRITION_FLAG), 18),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// "Showing X to Y of Z results" line under a customer page.
pub fn format_page_footer<T>(page: &Page<'_, T>) -> String {
    if page.total_items == 0 {
        return "No customers match the current filters.".to_string();
    }
    if page.items.is_empty() {
        return format!(
            "Page {} is past the end ({} pages, {} results).",
            page.page,
            page.total_pages,
            group_thousands(page.total_items as u64)
        );
    }
    format!(
        "Showing {} to {} of {} results (page {}/{})",
        page.first,
        page.last,
        group_thousands(page.total_items as u64),
        page.page,
        page.total_pages
    )
}

pub fn format_customer_stats(stats: &CustomerStats) -> String {
    format!(
        "Customers: {} | Attrited: {} | High risk: {} | Avg credit limit: {} | Churn rate: {}",
        group_thousands(stats.total as u64),
        group_thousands(stats.attrited as u64),
        group_thousands(stats.high_risk as u64),
        format_currency(stats.avg_credit_limit),
        format_pct(stats.churn_rate_pct),
    )
}

pub fn format_level_counts(counts: &[(RiskLevel, usize)]) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(level, n)| format!("{level}: {}", group_thousands(*n as u64)))
        .collect();
    format!("Risk levels: {}", parts.join(" | "))
}

/// All fields of one customer plus its score and segment labels.
pub fn format_customer_detail(customer: &ScoredCustomer, labels: &SegmentLabels) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Customer {} ===\n", customer.id()));

    let width = customer.record.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in customer.record.iter() {
        let shown = if value.is_null() { "-".to_string() } else { value.to_string() };
        out.push_str(&format!("{key:<width$}  {shown}\n"));
    }

    out.push('\n');
    out.push_str(&format!(
        "Churn risk: {} ({})\n",
        customer.risk.score, customer.risk.level
    ));
    out.push_str(&format!("Age group: {}\n", labels.age_group.unwrap_or("-")));
    out.push_str(&format!("Tenure: {}\n", labels.tenure_bucket.unwrap_or("-")));
    out
}

/// KPI cards from the analytics export.
pub fn format_kpis(k: &KpiMetrics) -> String {
    let mut out = String::new();
    out.push_str("=== Customer churn overview ===\n");
    out.push_str(&format!(
        "Total customers: {} | Churned: {} | Churn rate: {} | Retention: {}\n",
        group_thousands(k.total_customers),
        group_thousands(k.churned_customers),
        format_pct(k.churn_rate_pct),
        format_pct(k.retention_rate_pct),
    ));
    out.push_str(&format!(
        "Avg age: {} | Avg tenure: {} months | Avg credit limit: {} | Avg transactions: {}\n",
        k.avg_customer_age,
        k.avg_tenure_months,
        format_currency(Some(k.avg_credit_limit as f64)),
        format_currency(Some(k.avg_transaction_amount as f64)),
    ));
    out.push_str(&format!(
        "Risk segments: High {} | Medium {} | Low {}\n",
        group_thousands(k.high_risk_customers),
        group_thousands(k.medium_risk_customers),
        group_thousands(k.low_risk_customers),
    ));
    out
}

/// Horizontal bar chart of churn rate per segment.
///
/// Bars are scaled so the highest churn rate spans `bar_width` cells.
pub fn format_breakdown(title: &str, rows: &[SegmentRow], bar_width: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str(":\n");
    if rows.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let max_rate = rows.iter().map(|r| r.churn_rate_pct).fold(0.0, f64::max);

    for r in rows {
        let filled = if max_rate > 0.0 {
            ((r.churn_rate_pct / max_rate) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = format!("{}{}", "#".repeat(filled), " ".repeat(bar_width.saturating_sub(filled)));
        out.push_str(&format!(
            "  {:<label_width$} |{bar}| {:>6} (n={})\n",
            r.label,
            format_pct(r.churn_rate_pct),
            group_thousands(r.total),
        ));
    }
    out
}

pub fn format_insights(summary: &InsightsSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Key insights: {} ({} high, {} medium)\n",
        summary.total, summary.high, summary.medium
    ));
    for i in &summary.insights {
        out.push_str(&format!("- [{}] {}: {}\n", i.risk_level, i.category, i.insight));
    }
    out
}

pub fn format_drivers(drivers: &[Driver]) -> String {
    let mut out = String::new();
    out.push_str("Top churn drivers (|correlation|):\n");
    if drivers.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let width = drivers.iter().map(|d| d.feature.len()).max().unwrap_or(0);
    for (rank, d) in drivers.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<width$} {:>6}\n",
            rank + 1,
            d.feature,
            d.importance_label()
        ));
    }
    out
}

/// Model predictions table: row number, probability, label, action and reasons.
pub fn format_prediction_table(rows: &[&Prediction]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>5} {:>7} {:<9} {:<24} {:<36} {}",
            "#", "prob", "predicted", "action", "top_reasons", "comment"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<5} {:-<7} {:-<9} {:-<24} {:-<36} {:-<7}",
        "", "", "", "", "", ""
    ));
    out.push('\n');

    let text = |s: &Option<String>, max: usize| truncate(s.as_deref().unwrap_or(MISSING), max);
    for p in rows {
        out.push_str(
            format!(
                "{:>5} {:>7} {:<9} {:<24} {:<36} {}",
                p.id,
                p.probability_label(),
                p.label,
                text(&p.action, 24),
                text(&p.top_reasons, 36),
                text(&p.reason_comment, 48),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
