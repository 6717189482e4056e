use crate::local_scan::LocalScanTarget;
use crate::local_write::LocalWriteTarget;
use crate::postgres::PostgresTarget;
use crate::simulated::SimulatedTarget;
use loadsweep::{Target, TargetFactory};
use loadsweep_core::{ConstructionError, TargetError, TargetKind, TargetSpec};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Every target this crate knows how to build.
pub enum AnyTarget {
    Postgres(PostgresTarget),
    LocalScan(LocalScanTarget),
    LocalWrite(LocalWriteTarget),
    Simulated(SimulatedTarget),
}

impl Target for AnyTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        match self {
            AnyTarget::Postgres(t) => t.execute().await,
            AnyTarget::LocalScan(t) => t.execute().await,
            AnyTarget::LocalWrite(t) => t.execute().await,
            AnyTarget::Simulated(t) => t.execute().await,
        }
    }
}

/// Picks the adapter from [`TargetSpec::kind`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTargetFactory;

impl TargetFactory for DefaultTargetFactory {
    type Target = AnyTarget;

    async fn build(&self, spec: &TargetSpec, worker_id: usize) -> Result<AnyTarget, ConstructionError> {
        trace!("Building {} target for worker {worker_id}", spec.kind);
        match spec.kind {
            kind if kind.is_remote() => PostgresTarget::connect(spec, worker_id)
                .await
                .map(AnyTarget::Postgres),
            TargetKind::LocalScan => LocalScanTarget::open(spec).await.map(AnyTarget::LocalScan),
            TargetKind::LocalUpdate | TargetKind::LocalAppend => {
                LocalWriteTarget::open(spec, worker_id)
                    .await
                    .map(AnyTarget::LocalWrite)
            }
            TargetKind::Simulated => SimulatedTarget::new(spec).map(AnyTarget::Simulated),
            kind => Err(ConstructionError::Unsupported(kind)),
        }
    }
}
