//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the parsed record model (`Value`, `Record`) and the known column names
//! - risk classification (`RiskLevel`, `RiskAssessment`)
//! - query/config enums shared by the CLI and the library (`RiskFilter`, `StatusFilter`, `RunConfig`)

pub mod types;

pub use types::*;
