//! Local-disk baselines for the write workloads: rewriting a file with a string replaced,
//! and appending rows to a scratch file.
//!
//! Each worker writes its own scratch file under `output_dir` (the system temp dir by
//! default), named after the kind, the process and the worker. The file is removed when the
//! target is dropped.
use crate::local_scan::{classify, require_file};
use loadsweep::Target;
use loadsweep_core::{
    ConstructionError, TargetError, TargetKind, TargetSpec, DEFAULT_INSERT_ROWS,
    DEFAULT_REPLACE_FROM, DEFAULT_REPLACE_TO,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

enum WriteOp {
    /// Copy `source` line by line with every `from` replaced by `to`.
    Rewrite {
        source: PathBuf,
        from: String,
        to: String,
    },
    /// Write `rows` lines of `name_<i>,<i>`.
    Append { rows: u32 },
}

/// Every operation starts its scratch file over, so the file never grows past one
/// operation's worth of output.
pub struct LocalWriteTarget {
    op: WriteOp,
    output: PathBuf,
    last_lines: usize,
}

impl LocalWriteTarget {
    pub async fn open(spec: &TargetSpec, worker_id: usize) -> Result<Self, ConstructionError> {
        let params = &spec.params;
        let op = match spec.kind {
            TargetKind::LocalUpdate => {
                let source = require_file(spec).await?;
                let from = params.replace_from.as_deref().unwrap_or(DEFAULT_REPLACE_FROM);
                if from.is_empty() {
                    return Err(ConstructionError::InvalidParam {
                        target: spec.name.clone(),
                        param: "replace_from",
                        reason: "must not be empty".into(),
                    });
                }
                WriteOp::Rewrite {
                    source,
                    from: from.to_string(),
                    to: params
                        .replace_to
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REPLACE_TO.to_string()),
                }
            }
            TargetKind::LocalAppend => {
                let rows = params.rows.unwrap_or(DEFAULT_INSERT_ROWS);
                if rows == 0 {
                    return Err(ConstructionError::InvalidParam {
                        target: spec.name.clone(),
                        param: "rows",
                        reason: "must be at least 1".into(),
                    });
                }
                WriteOp::Append { rows }
            }
            kind => return Err(ConstructionError::Unsupported(kind)),
        };

        let dir = params.output_dir.clone().unwrap_or_else(std::env::temp_dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ConstructionError::Io {
                path: dir.clone(),
                source,
            })?;
        let output = dir.join(format!(
            "loadsweep-{}-{}-{worker_id}.txt",
            spec.kind,
            std::process::id()
        ));
        debug!("Worker {worker_id} writes to {}", output.display());

        Ok(Self {
            op,
            output,
            last_lines: 0,
        })
    }

    /// Scratch file this target writes to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Lines written by the most recent successful operation.
    pub fn last_lines(&self) -> usize {
        self.last_lines
    }
}

impl Target for LocalWriteTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        let res = match &self.op {
            WriteOp::Rewrite { source, from, to } => {
                rewrite(source, &self.output, from, to).await
            }
            WriteOp::Append { rows } => append(&self.output, *rows).await,
        };
        match res {
            Ok(lines) => {
                trace!("{lines} lines written");
                self.last_lines = lines;
                Ok(())
            }
            Err(err) => Err(classify(err)),
        }
    }
}

impl Drop for LocalWriteTarget {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.output) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!("Unable to remove {}: {err}", self.output.display()),
        }
    }
}

async fn rewrite(source: &Path, output: &Path, from: &str, to: &str) -> std::io::Result<usize> {
    let mut lines = BufReader::new(File::open(source).await?).lines();
    let mut out = BufWriter::new(File::create(output).await?);
    let mut written = 0;
    while let Some(line) = lines.next_line().await? {
        out.write_all(line.replace(from, to).as_bytes()).await?;
        out.write_all(b"\n").await?;
        written += 1;
    }
    out.flush().await?;
    Ok(written)
}

async fn append(output: &Path, rows: u32) -> std::io::Result<usize> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output)
        .await?;
    let mut out = BufWriter::new(file);
    for i in 1..=rows {
        out.write_all(format!("name_{i},{i}\n").as_bytes()).await?;
    }
    out.flush().await?;
    Ok(rows as usize)
}
