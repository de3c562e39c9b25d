//! Terminal reporting: currency/percent formatting, customer tables, KPI cards
//! and bar charts.

pub mod format;

pub use format::*;
