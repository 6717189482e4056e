//! The thing under measurement.
use loadsweep_core::{ConstructionError, TargetError, TargetSpec};
use std::future::Future;

/// One unit of work against a measured system.
///
/// A target is owned by exactly one worker for the whole run and is never shared, so
/// implementations are free to hold a dedicated connection or file handle. The worker times
/// every call; implementations only report whether it succeeded.
///
/// Retries, if any, belong inside `execute`. The worker never retries.
#[trait_variant::make(Target: Send)]
pub trait LocalTarget {
    /// Perform one operation.
    ///
    /// Return [`TargetError::Operation`] when the operation failed but the target can keep
    /// going, and [`TargetError::Connection`] when it cannot.
    async fn execute(&mut self) -> Result<(), TargetError>;
}

/// Builds a fresh target for each worker of a run.
///
/// Shared by every worker of a run behind an `Arc`.
pub trait TargetFactory: Send + Sync + 'static {
    type Target: Target + 'static;

    fn build(
        &self,
        spec: &TargetSpec,
        worker_id: usize,
    ) -> impl Future<Output = Result<Self::Target, ConstructionError>> + Send;
}
