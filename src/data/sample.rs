//! Synthetic customer batch generation.
//!
//! Used for demos and tests when no customer export is reachable. The batch is
//! fully determined by `(count, seed)`.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{
    ATTRITED_CUSTOMER, ATTRITION_FLAG, AVG_OPEN_TO_BUY, AVG_UTILIZATION_RATIO, CARD_CATEGORY, CLIENTNUM,
    CONTACTS_COUNT, CREDIT_LIMIT, CUSTOMER_AGE, DEPENDENT_COUNT, EDUCATION_LEVEL, EXISTING_CUSTOMER,
    GENDER, INCOME_CATEGORY, MARITAL_STATUS, MONTHS_INACTIVE, MONTHS_ON_BOOK, Record,
    TOTAL_RELATIONSHIP_COUNT, TOTAL_REVOLVING_BAL, TOTAL_TRANS_AMT, TOTAL_TRANS_CT, Value,
};

pub const DEFAULT_SEED: u64 = 42;
pub const FIRST_ID: u64 = 100_000;

/// Share of attrited customers in a generated batch.
const ATTRITION_PROB: f64 = 0.16;

const GENDERS: [&str; 2] = ["M", "F"];
const EDUCATION: [&str; 4] = ["High School", "Graduate", "College", "Post-Graduate"];
const MARITAL: [&str; 3] = ["Single", "Married", "Divorced"];
const INCOME: [&str; 5] = [
    "Less than $40K",
    "$40K - $60K",
    "$60K - $80K",
    "$80K - $120K",
    "$120K +",
];
const CARDS: [&str; 4] = ["Blue", "Gold", "Silver", "Platinum"];

pub fn generate_customers(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| generate_one(&mut rng, FIRST_ID + i as u64))
        .collect()
}

fn generate_one(rng: &mut StdRng, id: u64) -> Record {
    let attrited = rng.gen_bool(ATTRITION_PROB);
    let credit_limit = round_to(rng.gen_range(1_000.0..35_000.0), 1);
    // Open-to-buy and utilization follow from the limit and the balance.
    let revolving = revolving_balance(rng.gen_range(0.0..2_500.0), credit_limit);
    let open_to_buy = round_to(credit_limit - revolving, 1);
    let utilization = round_to(revolving / credit_limit, 3);

    let mut r = Record::new();
    r.insert(CLIENTNUM, num(id as f64));
    r.insert(
        ATTRITION_FLAG,
        text(if attrited { ATTRITED_CUSTOMER } else { EXISTING_CUSTOMER }),
    );
    r.insert(CUSTOMER_AGE, num(rng.gen_range(20..80) as f64));
    r.insert(GENDER, text(pick(rng, &GENDERS)));
    r.insert(DEPENDENT_COUNT, num(rng.gen_range(0..6) as f64));
    r.insert(EDUCATION_LEVEL, text(pick(rng, &EDUCATION)));
    r.insert(MARITAL_STATUS, text(pick(rng, &MARITAL)));
    r.insert(INCOME_CATEGORY, text(pick(rng, &INCOME)));
    r.insert(CARD_CATEGORY, text(pick(rng, &CARDS)));
    r.insert(MONTHS_ON_BOOK, num(rng.gen_range(12..60) as f64));
    r.insert(TOTAL_RELATIONSHIP_COUNT, num(rng.gen_range(1..7) as f64));
    r.insert(MONTHS_INACTIVE, num(rng.gen_range(0..6) as f64));
    r.insert(CONTACTS_COUNT, num(rng.gen_range(0..7) as f64));
    r.insert(CREDIT_LIMIT, num(credit_limit));
    r.insert(TOTAL_REVOLVING_BAL, num(revolving));
    r.insert(AVG_OPEN_TO_BUY, num(open_to_buy));
    r.insert(TOTAL_TRANS_AMT, num(rng.gen_range(500..20_000) as f64));
    r.insert(TOTAL_TRANS_CT, num(rng.gen_range(10..150) as f64));
    r.insert(AVG_UTILIZATION_RATIO, num(utilization));
    r
}

/// Whole-dollar balance that never exceeds the limit.
fn revolving_balance(raw: f64, credit_limit: f64) -> f64 {
    raw.round().min(credit_limit.floor())
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn num(v: f64) -> Value {
    Value::Number(v)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
