//! Input/output helpers.
//!
//! - quoted CSV tokenizing (`csv_text`)
//! - header mapping + numeric coercion (`ingest`)
//! - ordered file/URL source loading (`source`)
//! - scored customer exports (CSV/JSON) (`export`)

pub mod csv_text;
pub mod export;
pub mod ingest;
pub mod source;

pub use export::*;
pub use ingest::*;
pub use source::*;
