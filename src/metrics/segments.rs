//! Age-group and tenure-bucket labels.
//!
//! Bins match the pre-aggregated analytics export so a customer's label lines
//! up with the breakdown rows on the KPI screen. Bins are right-inclusive:
//! `(lo, hi]`.

use crate::domain::{CUSTOMER_AGE, MONTHS_ON_BOOK, Record};

const AGE_BINS: [(f64, f64, &str); 5] = [
    (0.0, 30.0, "<30"),
    (30.0, 40.0, "30-40"),
    (40.0, 50.0, "40-50"),
    (50.0, 60.0, "50-60"),
    (60.0, 100.0, "60+"),
];

const TENURE_BINS: [(f64, f64, &str); 5] = [
    (0.0, 12.0, "New (0-12m)"),
    (12.0, 24.0, "Early Stage (13-24m)"),
    (24.0, 36.0, "Mid Stage (25-36m)"),
    (36.0, 48.0, "Established (37-48m)"),
    (48.0, 100.0, "Long-term (49m+)"),
];

pub fn age_group(age: f64) -> Option<&'static str> {
    bin(&AGE_BINS, age)
}

pub fn tenure_bucket(months_on_book: f64) -> Option<&'static str> {
    bin(&TENURE_BINS, months_on_book)
}

/// Segment labels of a record; `None` where the source field is null or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentLabels {
    pub age_group: Option<&'static str>,
    pub tenure_bucket: Option<&'static str>,
}

pub fn label_record(record: &Record) -> SegmentLabels {
    SegmentLabels {
        age_group: record.number(CUSTOMER_AGE).and_then(age_group),
        tenure_bucket: record.number(MONTHS_ON_BOOK).and_then(tenure_bucket),
    }
}

fn bin(bins: &[(f64, f64, &'static str)], value: f64) -> Option<&'static str> {
    bins.iter()
        .find(|(lo, hi, _)| value > *lo && value <= *hi)
        .map(|(_, _, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;

    #[test]
    fn age_bins_are_right_inclusive() {
        assert_eq!(age_group(30.0), Some("<30"));
        assert_eq!(age_group(30.5), Some("30-40"));
        assert_eq!(age_group(60.0), Some("50-60"));
        assert_eq!(age_group(61.0), Some("60+"));
    }

    #[test]
    fn tenure_bins_cover_the_book() {
        assert_eq!(tenure_bucket(1.0), Some("New (0-12m)"));
        assert_eq!(tenure_bucket(12.0), Some("New (0-12m)"));
        assert_eq!(tenure_bucket(13.0), Some("Early Stage (13-24m)"));
        assert_eq!(tenure_bucket(36.0), Some("Mid Stage (25-36m)"));
        assert_eq!(tenure_bucket(56.0), Some("Long-term (49m+)"));
    }

    #[test]
    fn out_of_range_values_have_no_label() {
        assert_eq!(age_group(0.0), None);
        assert_eq!(age_group(-3.0), None);
        assert_eq!(tenure_bucket(101.0), None);
    }

    #[test]
    fn record_labels_skip_nulls() {
        let record: Record = [
            (CUSTOMER_AGE, Value::Number(45.0)),
            (MONTHS_ON_BOOK, Value::Null),
        ]
        .into_iter()
        .collect();
        let labels = label_record(&record);
        assert_eq!(labels.age_group, Some("40-50"));
        assert_eq!(labels.tenure_bucket, None);
    }
}
