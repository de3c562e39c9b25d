//! `churn-insights` library crate.
//!
//! The binary (`churn`) is a thin wrapper around this library so that:
//!
//! - parsing and scoring are testable without spawning processes
//! - the analytics reader can be reused by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod customers;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod predictions;
pub mod report;
