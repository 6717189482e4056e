//! Synthetic latency for dry runs that need no external resource.
use loadsweep::Target;
use loadsweep_core::{ConstructionError, TargetError, TargetSpec};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, SkewNormal};
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

pub const DEFAULT_LATENCY_MEAN: Duration = Duration::from_millis(10);
pub const DEFAULT_LATENCY_STD_DEV: Duration = Duration::from_millis(2);

/// Right-skewed, like most real service latencies.
const SKEW_SHAPE: f64 = 20.;

enum Latency {
    Fixed(Duration),
    Skewed(SkewNormal<f64>),
}

/// Sleeps for a sampled latency, then fails with probability `error_rate`.
pub struct SimulatedTarget {
    latency: Latency,
    error_rate: f64,
    rng: SmallRng,
}

impl SimulatedTarget {
    pub fn new(spec: &TargetSpec) -> Result<Self, ConstructionError> {
        let params = &spec.params;
        let mean = params.latency_mean.unwrap_or(DEFAULT_LATENCY_MEAN);
        let std_dev = params.latency_std_dev.unwrap_or(DEFAULT_LATENCY_STD_DEV);

        let latency = if std_dev.is_zero() {
            Latency::Fixed(mean)
        } else {
            let (location, scale) = skew_normal_params(mean, std_dev);
            SkewNormal::new(location, scale, SKEW_SHAPE)
                .map(Latency::Skewed)
                .map_err(|err| ConstructionError::InvalidParam {
                    target: spec.name.clone(),
                    param: "latency_std_dev_ms",
                    reason: err.to_string(),
                })?
        };

        let error_rate = params.error_rate.unwrap_or(0.);
        if !(0. ..=1.).contains(&error_rate) {
            return Err(ConstructionError::InvalidParam {
                target: spec.name.clone(),
                param: "error_rate",
                reason: format!("{error_rate} is not within [0, 1]"),
            });
        }

        Ok(Self {
            latency,
            error_rate,
            rng: SmallRng::from_entropy(),
        })
    }

    fn sample(&mut self) -> Duration {
        match &self.latency {
            Latency::Fixed(latency) => *latency,
            Latency::Skewed(dist) => {
                let secs: f64 = dist.sample(&mut self.rng).max(0.);
                Duration::from_secs_f64(secs)
            }
        }
    }
}

/// Location and scale (in seconds) of the skew normal whose mean and standard deviation
/// are the configured ones.
fn skew_normal_params(mean: Duration, std_dev: Duration) -> (f64, f64) {
    use std::f64::consts::PI;
    let delta = SKEW_SHAPE / (1. + SKEW_SHAPE * SKEW_SHAPE).sqrt();
    let scale = std_dev.as_secs_f64() / (1. - 2. * delta * delta / PI).sqrt();
    let location = mean.as_secs_f64() - scale * delta * (2. / PI).sqrt();
    (location, scale)
}

impl Target for SimulatedTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        let latency = self.sample();
        let fail = self.rng.gen_bool(self.error_rate);
        tokio::time::sleep(latency).await;
        if fail {
            Err(TargetError::operation("simulated failure"))
        } else {
            Ok(())
        }
    }
}
