/// Metric names emitted for every timed operation.
#[derive(Copy, Clone, Debug)]
pub struct OperationLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

pub const OPERATION_LABELS: OperationLabels = OperationLabels {
    success: "loadsweep_operation_success",
    error: "loadsweep_operation_error",
    latency: "loadsweep_operation_latency",
};

/// Label key carrying the target name on every operation metric.
pub const TARGET_LABEL: &str = "target";
