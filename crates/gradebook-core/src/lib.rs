//! gradebook-core: grade calculation engine for weighted course schemes.
//!
//! This crate holds the data model, the per-scheme evaluator, scheme
//! selection, the required-average solver and term/cumulative aggregation
//! that the gradebook CLI builds on.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod scheme;
pub mod selector;
pub mod solver;
pub mod statistics;
pub mod term;
pub mod traits;
