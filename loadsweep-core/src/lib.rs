#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core types shared by the loadsweep crates: workload configuration, per-worker and aggregate
//! results, the error taxonomy, and the latency statistics every report is built from.

mod config;
mod constants;
mod data;
mod error;
mod metrics;
pub mod stats;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use error::*;
pub use metrics::*;
pub use stats::LatencyStats;
