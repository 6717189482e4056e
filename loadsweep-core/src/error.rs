use crate::TargetKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single operation against a target.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// The operation failed but the underlying resource is still usable.
    #[error("operation failed: {0}")]
    Operation(String),

    /// The underlying resource is gone; no further operations can succeed.
    #[error("connection lost: {0}")]
    Connection(String),
}

impl TargetError {
    pub fn operation(msg: impl ToString) -> Self {
        Self::Operation(msg.to_string())
    }

    pub fn connection(msg: impl ToString) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Whether a worker must stop issuing operations after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TargetError::Connection(_))
    }
}

/// A target could not be built for a worker.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("target `{target}` is missing required parameter `{param}`")]
    MissingParam {
        target: String,
        param: &'static str,
    },

    #[error("target `{target}` has an invalid `{param}`: {reason}")]
    InvalidParam {
        target: String,
        param: &'static str,
        reason: String,
    },

    #[error("unable to connect target `{target}`: {reason}")]
    Connect { target: String, reason: String },

    #[error("unable to open `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target kind `{0}` is not supported")]
    Unsupported(TargetKind),
}
