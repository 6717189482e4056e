//! Loading a [`SweepConfig`] from YAML and folding in command line overrides.
use crate::args::Args;
use loadsweep_core::{SweepConfig, TargetParams};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sweep configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("the sweep has no targets")]
    NoTargets,

    #[error("the sweep has no concurrency levels")]
    NoConcurrency,

    #[error("target `{target}` has an unknown key `{key}`")]
    UnknownKey { target: String, key: String },
}

/// Read and validate the sweep, then apply whatever the command line overrides.
pub fn load(args: &Args) -> Result<SweepConfig, ConfigError> {
    let config = read(&args.config)?;
    let config = apply_overrides(config, args);
    validate(&config)?;
    Ok(config)
}

pub fn read(path: &Path) -> Result<SweepConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&raw)?;
    debug!("Loaded {} targets from {}", config.targets.len(), path.display());
    Ok(config)
}

pub fn parse(raw: &str) -> Result<SweepConfig, ConfigError> {
    let config = serde_yaml::from_str(raw)?;
    reject_unknown_keys(&serde_yaml::from_str(raw)?)?;
    Ok(config)
}

/// Flattened target params let serde skip keys it does not know, so check them here.
fn reject_unknown_keys(raw: &Value) -> Result<(), ConfigError> {
    let known = serde_yaml::to_value(TargetParams::default())?;
    let known = known.as_mapping();
    let targets = raw
        .get("targets")
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten();

    for target in targets.filter_map(Value::as_mapping) {
        for key in target.keys() {
            let is_known = matches!(key.as_str(), Some("name" | "kind"))
                || known.is_some_and(|known| known.contains_key(key));
            if !is_known {
                return Err(ConfigError::UnknownKey {
                    target: target
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    key: key
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{key:?}")),
                });
            }
        }
    }
    Ok(())
}

pub fn apply_overrides(mut config: SweepConfig, args: &Args) -> SweepConfig {
    if !args.concurrency.is_empty() {
        config = config.concurrency(&args.concurrency);
    }
    if let Some(operations) = args.operations {
        config = config.operations_per_worker(operations);
    }
    config
}

pub fn validate(config: &SweepConfig) -> Result<(), ConfigError> {
    if config.targets.is_empty() {
        return Err(ConfigError::NoTargets);
    }
    if config.concurrency.is_empty() {
        return Err(ConfigError::NoConcurrency);
    }
    Ok(())
}
