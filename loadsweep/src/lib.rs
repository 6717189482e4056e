#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod aggregator;
pub mod report;
pub mod run;
pub mod sweep;
pub mod target;
pub mod worker;

#[cfg(test)]
pub(crate) mod mock;

pub use aggregator::ResultAggregator;
pub use report::ReportSink;
pub use run::WorkloadRun;
pub use sweep::Sweep;
pub use target::{LocalTarget, Target, TargetFactory};
pub use worker::Worker;

pub mod prelude {
    pub use crate::{ReportSink, Sweep, Target, TargetFactory, WorkloadRun};

    pub use loadsweep_core::{
        AggregateResult, ConstructionError, RunReport, SweepConfig, TargetError, TargetKind,
        TargetParams, TargetSpec, WorkerResult, WorkerStatus, WorkloadConfig,
    };
}
