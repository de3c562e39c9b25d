//! Built-in data: the synthetic customer generator.

pub mod sample;

pub use sample::generate_customers;
