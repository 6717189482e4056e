//! Ready-made [`loadsweep::Target`]s.
//!
//! - `point_lookup`, `pattern_scan`, `transaction`, `bulk_update` and `batch_insert` run
//!   against anything speaking the PostgreSQL protocol, with one connection per worker.
//! - `local_scan` greps a delimited file on local disk.
//! - `local_update` and `local_append` write scratch files on local disk.
//! - `simulated` only sleeps.
use loadsweep_core::{ConstructionError, KeyRange, TargetSpec, DEFAULT_KEY_RANGE};

mod factory;
pub mod local_scan;
pub mod local_write;
pub mod postgres;
pub mod simulated;

pub use factory::{AnyTarget, DefaultTargetFactory};
pub use local_scan::LocalScanTarget;
pub use local_write::LocalWriteTarget;
pub use postgres::PostgresTarget;
pub use simulated::SimulatedTarget;

pub(crate) fn key_range(spec: &TargetSpec) -> Result<KeyRange, ConstructionError> {
    let range = spec.params.key_range.unwrap_or(DEFAULT_KEY_RANGE);
    if range.is_empty() {
        return Err(ConstructionError::InvalidParam {
            target: spec.name.clone(),
            param: "key_range",
            reason: format!("{}..={} is empty", range.start, range.end),
        });
    }
    Ok(range)
}
