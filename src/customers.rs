//! Customer list queries: scoring, search/filter, pagination, summary stats.
//!
//! Everything here works on an already-loaded batch; nothing is cached between
//! calls; risk is recomputed from the record each time a batch is scored.

use serde::Serialize;

use crate::domain::{
    ATTRITED_CUSTOMER, ATTRITION_FLAG, CLIENTNUM, CREDIT_LIMIT, EDUCATION_LEVEL, INCOME_CATEGORY,
    Record, RiskAssessment, RiskFilter, RiskLevel, StatusFilter,
};
use crate::metrics::assess;

/// A record paired with its risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCustomer {
    pub record: Record,
    pub risk: RiskAssessment,
}

impl ScoredCustomer {
    pub fn new(record: Record) -> Self {
        let risk = assess(&record);
        Self { record, risk }
    }

    /// Display form of `CLIENTNUM` (empty when missing).
    pub fn id(&self) -> String {
        self.record.cell(CLIENTNUM)
    }

    pub fn is_attrited(&self) -> bool {
        self.record.text(ATTRITION_FLAG) == Some(ATTRITED_CUSTOMER)
    }
}

/// Score every record, preserving order.
pub fn score_all(records: &[Record]) -> Vec<ScoredCustomer> {
    records.iter().cloned().map(ScoredCustomer::new).collect()
}

/// Search + filter parameters for the customer list.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub term: String,
    pub risk: RiskFilter,
    pub status: StatusFilter,
}

impl CustomerQuery {
    pub fn matches(&self, customer: &ScoredCustomer) -> bool {
        self.matches_term(customer)
            && self.risk.matches(customer.risk.level)
            && self.status.matches(customer.record.text(ATTRITION_FLAG))
    }

    fn matches_term(&self, customer: &ScoredCustomer) -> bool {
        let term = self.term.trim();
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        let contains = |key: &str| {
            customer
                .record
                .text(key)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };
        customer.id().contains(term) || contains(INCOME_CATEGORY) || contains(EDUCATION_LEVEL)
    }
}

/// Customers matching `query`, in input order.
pub fn search<'a>(customers: &'a [ScoredCustomer], query: &CustomerQuery) -> Vec<&'a ScoredCustomer> {
    customers.iter().filter(|c| query.matches(c)).collect()
}

/// One page of a result list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number that was requested.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first item shown (0 when the page is empty).
    pub first: usize,
    /// 1-based index of the last item shown (0 when the page is empty).
    pub last: usize,
}

/// Slice out a 1-based page. Page `0` is treated as page `1`; `per_page` of `0` as `1`.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);
    let slice = &items[start..end];

    let (first, last) = if slice.is_empty() { (0, 0) } else { (start + 1, end) };

    Page {
        items: slice,
        page,
        total_pages,
        total_items,
        first,
        last,
    }
}

/// Summary statistics for a (filtered) customer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total: usize,
    pub attrited: usize,
    pub high_risk: usize,
    /// Mean `Credit_Limit` over customers that have one.
    pub avg_credit_limit: Option<f64>,
    /// `attrited / total * 100`.
    pub churn_rate_pct: f64,
}

pub fn stats<'a, I>(customers: I) -> CustomerStats
where
    I: IntoIterator<Item = &'a ScoredCustomer>,
{
    let mut total = 0usize;
    let mut attrited = 0usize;
    let mut high_risk = 0usize;
    let mut limit_sum = 0.0;
    let mut limit_n = 0usize;

    for c in customers {
        total += 1;
        if c.is_attrited() {
            attrited += 1;
        }
        if c.risk.level == RiskLevel::High {
            high_risk += 1;
        }
        if let Some(limit) = c.record.number(CREDIT_LIMIT) {
            limit_sum += limit;
            limit_n += 1;
        }
    }

    CustomerStats {
        total,
        attrited,
        high_risk,
        avg_credit_limit: (limit_n > 0).then(|| limit_sum / limit_n as f64),
        churn_rate_pct: if total == 0 {
            0.0
        } else {
            attrited as f64 / total as f64 * 100.0
        },
    }
}

/// Count of customers per risk level, in `Low, Medium, High` order.
pub fn level_counts(customers: &[ScoredCustomer]) -> [(RiskLevel, usize); 3] {
    RiskLevel::ALL.map(|level| {
        let n = customers.iter().filter(|c| c.risk.level == level).count();
        (level, n)
    })
}

/// Find a customer by its displayed `CLIENTNUM`.
pub fn find_by_id<'a>(customers: &'a [ScoredCustomer], id: &str) -> Option<&'a ScoredCustomer> {
    let id = id.trim();
    customers.iter().find(|c| c.id() == id)
}
