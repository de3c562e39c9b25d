//! Heuristic churn-risk scoring.
//!
//! Weighted rules over a single record. Each rule adds fixed points when its
//! condition holds; the sum is clamped to `[0, 100]`. A null or absent field
//! never satisfies a condition.
//!
//! | condition                               | points |
//! |-----------------------------------------|--------|
//! | age > 60 (else age < 30)                | 10 (15)|
//! | months inactive > 3                     | 20     |
//! | service contacts > 4                    | 15     |
//! | utilization > 0.7 (else < 0.1)          | 25 (10)|
//! | transaction count < 20                  | 20     |
//! | income is the lowest bracket            | 10     |

use crate::domain::{
    AVG_UTILIZATION_RATIO, CONTACTS_COUNT, CUSTOMER_AGE, INCOME_CATEGORY, LOWEST_INCOME_BRACKET,
    MONTHS_INACTIVE, Record, RiskAssessment, RiskLevel, TOTAL_TRANS_CT,
};

pub const MAX_SCORE: u32 = 100;

/// Upper bound (inclusive) of the `Low` band.
pub const LOW_MAX: u8 = 20;
/// Upper bound (inclusive) of the `Medium` band.
pub const MEDIUM_MAX: u8 = 50;

/// Sum of rule points before clamping.
pub fn raw_score(record: &Record) -> u32 {
    let mut score = 0;

    if let Some(age) = record.number(CUSTOMER_AGE) {
        if age > 60.0 {
            score += 10;
        } else if age < 30.0 {
            score += 15;
        }
    }

    if record.number(MONTHS_INACTIVE).is_some_and(|m| m > 3.0) {
        score += 20;
    }

    if record.number(CONTACTS_COUNT).is_some_and(|c| c > 4.0) {
        score += 15;
    }

    if let Some(util) = record.number(AVG_UTILIZATION_RATIO) {
        if util > 0.7 {
            score += 25;
        } else if util < 0.1 {
            score += 10;
        }
    }

    if record.number(TOTAL_TRANS_CT).is_some_and(|t| t < 20.0) {
        score += 20;
    }

    if record.text(INCOME_CATEGORY) == Some(LOWEST_INCOME_BRACKET) {
        score += 10;
    }

    score
}

/// Churn-risk score in `[0, 100]`.
pub fn churn_risk_score(record: &Record) -> u8 {
    // Clamped to 100 above, so the narrowing cannot truncate.
    raw_score(record).min(MAX_SCORE) as u8
}

/// `<= 20` Low, `<= 50` Medium, otherwise High.
pub fn risk_level(score: u8) -> RiskLevel {
    if score <= LOW_MAX {
        RiskLevel::Low
    } else if score <= MEDIUM_MAX {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn assess(record: &Record) -> RiskAssessment {
    let score = churn_risk_score(record);
    RiskAssessment {
        score,
        level: risk_level(score),
    }
}
