//! Keyword scan over a local delimited file, the no-network baseline for pattern scans.
use loadsweep::Target;
use loadsweep_core::{
    ConstructionError, TargetError, TargetSpec, DEFAULT_DELIMITER, DEFAULT_KEYWORD,
    DEFAULT_SCAN_COLUMN,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Reads the whole file once per operation and counts the rows whose `column` contains the
/// keyword, ignoring case. `column` is zero-based; rows without that many fields never match.
pub struct LocalScanTarget {
    path: PathBuf,
    delimiter: char,
    column: usize,
    keyword: String,
    last_matches: usize,
}

impl LocalScanTarget {
    pub async fn open(spec: &TargetSpec) -> Result<Self, ConstructionError> {
        let params = &spec.params;
        let path = require_file(spec).await?;

        let keyword = params.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD);
        if keyword.is_empty() {
            return Err(ConstructionError::InvalidParam {
                target: spec.name.clone(),
                param: "keyword",
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            path,
            delimiter: params.delimiter.unwrap_or(DEFAULT_DELIMITER),
            column: params.column.unwrap_or(DEFAULT_SCAN_COLUMN),
            keyword: keyword.to_lowercase(),
            last_matches: 0,
        })
    }

    /// Matches found by the most recent successful scan.
    pub fn last_matches(&self) -> usize {
        self.last_matches
    }

    async fn scan(&self) -> std::io::Result<usize> {
        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut matches = 0;
        while let Some(line) = lines.next_line().await? {
            let hit = line
                .split(self.delimiter)
                .nth(self.column)
                .is_some_and(|field| field.to_lowercase().contains(&self.keyword));
            if hit {
                matches += 1;
            }
        }
        Ok(matches)
    }
}

impl Target for LocalScanTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        match self.scan().await {
            Ok(matches) => {
                trace!("{matches} rows matched");
                self.last_matches = matches;
                Ok(())
            }
            Err(err) => Err(classify(err)),
        }
    }
}

/// The `path` param, checked to name a regular file.
pub(crate) async fn require_file(spec: &TargetSpec) -> Result<PathBuf, ConstructionError> {
    let path = spec
        .params
        .path
        .clone()
        .ok_or_else(|| ConstructionError::MissingParam {
            target: spec.name.clone(),
            param: "path",
        })?;

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|source| ConstructionError::Io {
            path: path.clone(),
            source,
        })?;
    if !meta.is_file() {
        return Err(ConstructionError::InvalidParam {
            target: spec.name.clone(),
            param: "path",
            reason: format!("{} is not a file", path.display()),
        });
    }
    Ok(path)
}

/// A line that is not valid UTF-8 spoils one scan; anything else means the file is gone.
pub(crate) fn classify(err: std::io::Error) -> TargetError {
    match err.kind() {
        ErrorKind::InvalidData => TargetError::operation(err),
        _ => TargetError::connection(err),
    }
}
