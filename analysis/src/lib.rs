//! Aggregation of repart-kv benchmark results.
//!
//! Every benchmark run leaves a csv file named after its configuration, e.g.,
//! `ycsb_a__1__engine__1__tkrzw_tree__1__0(1).csv`. This crate averages the runs over their
//! repetitions and writes one csv per workload and engine (or per chart for the timeline).

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod run_id;
pub mod writer;

#[cfg(test)]
mod aggregate_test;
#[cfg(test)]
mod run_id_test;

pub use config::{AnalysisConfig, ConfigErrors, Settings};
pub use pipeline::{AnalysisError, Pipeline, Report, Variant};
