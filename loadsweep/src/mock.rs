use crate::target::{Target, TargetFactory};
use loadsweep_core::{ConstructionError, TargetError, TargetSpec};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) enum Step {
    Ok(Duration),
    OperationError,
    ConnectionError,
    Panic,
}

/// Plays back a fixed script, then succeeds instantly once the script runs out.
pub(crate) struct ScriptedTarget {
    steps: VecDeque<Step>,
}

impl ScriptedTarget {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    pub fn latencies_ms(latencies: &[u64]) -> Self {
        Self::new(
            latencies
                .iter()
                .map(|ms| Step::Ok(Duration::from_millis(*ms)))
                .collect(),
        )
    }
}

impl Target for ScriptedTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        match self.steps.pop_front() {
            Some(Step::Ok(latency)) => {
                tokio::time::sleep(latency).await;
                Ok(())
            }
            Some(Step::OperationError) => Err(TargetError::operation("scripted failure")),
            Some(Step::ConnectionError) => Err(TargetError::connection("scripted disconnect")),
            Some(Step::Panic) => panic!("scripted panic"),
            None => Ok(()),
        }
    }
}

/// Hands worker `n` the `n-1`th script; `None` makes construction fail for that worker.
pub(crate) struct ScriptedFactory {
    scripts: Vec<Option<Vec<Step>>>,
}

impl ScriptedFactory {
    pub fn new(scripts: Vec<Option<Vec<Step>>>) -> Self {
        Self { scripts }
    }

    pub fn uniform(workers: usize, script: Vec<Step>) -> Self {
        Self::new(vec![Some(script); workers])
    }
}

impl TargetFactory for ScriptedFactory {
    type Target = ScriptedTarget;

    async fn build(
        &self,
        spec: &TargetSpec,
        worker_id: usize,
    ) -> Result<ScriptedTarget, ConstructionError> {
        match self.scripts.get(worker_id - 1) {
            Some(Some(script)) => Ok(ScriptedTarget::new(script.clone())),
            _ => Err(ConstructionError::Connect {
                target: spec.name.clone(),
                reason: "scripted construction failure".into(),
            }),
        }
    }
}

pub(crate) fn ms(latency: u64) -> Step {
    Step::Ok(Duration::from_millis(latency))
}
