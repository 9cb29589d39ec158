//! Workload Module
//!
//! Exercises a cache end to end with a fixed operation sequence, on one
//! thread or many, and summarizes the run in a serializable report.

mod report;
mod runner;

pub use report::WorkloadReport;
pub use runner::{run_locked, run_sequence, run_single, SequenceOutcome, Violation};
