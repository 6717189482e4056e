//! Remote targets over a dedicated PostgreSQL connection.
//!
//! Anything that speaks the PostgreSQL wire protocol works here, so several named endpoints
//! (PostgreSQL, openGauss, ...) can be measured in the same sweep.
//!
//! Bulk updates and batch inserts always roll back, so the database looks the same after
//! every operation and the next one does the same amount of work.
use crate::key_range;
use loadsweep::Target;
use loadsweep_core::{
    ConstructionError, KeyRange, TargetError, TargetKind, TargetSpec, DEFAULT_INSERT_BATCH_SIZE,
    DEFAULT_INSERT_ROWS, DEFAULT_INSERT_TABLE, DEFAULT_KEYWORD, DEFAULT_REPLACE_FROM,
    DEFAULT_REPLACE_TO,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

pub const POINT_LOOKUP_QUERY: &str = "SELECT movieid FROM movies WHERE movieid = $1";
pub const PATTERN_SCAN_QUERY: &str = "SELECT * FROM movies WHERE LOWER(title) LIKE LOWER($1)";
pub const TRANSACTION_QUERY: &str =
    "UPDATE people SET first_name = first_name WHERE peopleid = $1";
pub const BULK_UPDATE_QUERY: &str = "UPDATE people SET first_name = REPLACE(first_name, $1, $2)";

/// Every bind costs one of the 65535 parameters a statement may carry.
const MAX_BATCH_SIZE: u32 = u16::MAX as u32 / 2;

enum Operation {
    PointLookup { keys: KeyRange },
    PatternScan { pattern: String },
    Transaction { keys: KeyRange },
    BulkUpdate { from: String, to: String },
    BatchInsert { rows: i32, batch_size: usize },
}

/// One connection, one kind of statement.
pub struct PostgresTarget {
    conn: PgConnection,
    op: Operation,
    query: String,
    rng: SmallRng,
}

impl PostgresTarget {
    #[instrument(name = "connect", skip_all, fields(target = %spec.name, worker_id = worker_id))]
    pub async fn connect(spec: &TargetSpec, worker_id: usize) -> Result<Self, ConstructionError> {
        let params = &spec.params;
        let url = params
            .database_url
            .as_deref()
            .ok_or_else(|| ConstructionError::MissingParam {
                target: spec.name.clone(),
                param: "database_url",
            })?;

        let (op, default_query) = match spec.kind {
            TargetKind::PointLookup => (
                Operation::PointLookup {
                    keys: key_range(spec)?,
                },
                POINT_LOOKUP_QUERY.to_string(),
            ),
            TargetKind::PatternScan => {
                let keyword = params.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD);
                (
                    Operation::PatternScan {
                        pattern: format!("%{keyword}%"),
                    },
                    PATTERN_SCAN_QUERY.to_string(),
                )
            }
            TargetKind::Transaction => (
                Operation::Transaction {
                    keys: key_range(spec)?,
                },
                TRANSACTION_QUERY.to_string(),
            ),
            TargetKind::BulkUpdate => (
                Operation::BulkUpdate {
                    from: params
                        .replace_from
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REPLACE_FROM.to_string()),
                    to: params
                        .replace_to
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REPLACE_TO.to_string()),
                },
                BULK_UPDATE_QUERY.to_string(),
            ),
            TargetKind::BatchInsert => batch_insert_op(spec)?,
            kind => return Err(ConstructionError::Unsupported(kind)),
        };

        let conn = PgConnection::connect(url)
            .await
            .map_err(|err| ConstructionError::Connect {
                target: spec.name.clone(),
                reason: err.to_string(),
            })?;
        debug!("Worker {worker_id} connected");

        Ok(Self {
            conn,
            op,
            query: params.query.clone().unwrap_or(default_query),
            rng: SmallRng::from_entropy(),
        })
    }
}

/// The statement of a batch insert is its `INSERT INTO .. (..)` head; the rows are
/// appended as one `VALUES` list per batch.
fn batch_insert_op(spec: &TargetSpec) -> Result<(Operation, String), ConstructionError> {
    let params = &spec.params;
    let invalid = |param: &'static str, reason: String| ConstructionError::InvalidParam {
        target: spec.name.clone(),
        param,
        reason,
    };

    let table = params.table.as_deref().unwrap_or(DEFAULT_INSERT_TABLE);
    let is_identifier = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !is_identifier {
        return Err(invalid("table", format!("`{table}` is not a table name")));
    }

    let rows = params.rows.unwrap_or(DEFAULT_INSERT_ROWS);
    let rows = match i32::try_from(rows) {
        Ok(rows) if rows > 0 => rows,
        _ => return Err(invalid("rows", format!("{rows} is not within 1..={}", i32::MAX))),
    };

    let batch_size = params.batch_size.unwrap_or(DEFAULT_INSERT_BATCH_SIZE);
    if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
        return Err(invalid(
            "batch_size",
            format!("{batch_size} is not within 1..={MAX_BATCH_SIZE}"),
        ));
    }

    Ok((
        Operation::BatchInsert {
            rows,
            batch_size: batch_size as usize,
        },
        format!("INSERT INTO {table} (col1, col2) "),
    ))
}

impl Target for PostgresTarget {
    async fn execute(&mut self) -> Result<(), TargetError> {
        let Self {
            conn,
            op,
            query,
            rng,
        } = self;
        let res = match op {
            Operation::PointLookup { keys } => {
                point_lookup(conn, query, rng.gen_range(keys.start..=keys.end)).await
            }
            Operation::PatternScan { pattern } => pattern_scan(conn, query, pattern).await,
            Operation::Transaction { keys } => {
                transaction(conn, query, rng.gen_range(keys.start..=keys.end)).await
            }
            Operation::BulkUpdate { from, to } => bulk_update(conn, query, from, to).await,
            Operation::BatchInsert { rows, batch_size } => {
                batch_insert(conn, query, *rows, *batch_size).await
            }
        };
        res.map_err(classify)
    }
}

async fn point_lookup(conn: &mut PgConnection, query: &str, key: i32) -> Result<(), sqlx::Error> {
    let row = sqlx::query(query).bind(key).fetch_optional(conn).await?;
    trace!("Key {key} found: {}", row.is_some());
    Ok(())
}

async fn pattern_scan(
    conn: &mut PgConnection,
    query: &str,
    pattern: &str,
) -> Result<(), sqlx::Error> {
    let rows = sqlx::query(query).bind(pattern).fetch_all(conn).await?;
    trace!("{} rows matched", rows.len());
    Ok(())
}

async fn transaction(conn: &mut PgConnection, query: &str, key: i32) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;
    match sqlx::query(query).bind(key).execute(&mut *tx).await {
        Ok(_) => tx.commit().await,
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                warn!("Rollback failed: {rollback}");
            }
            Err(err)
        }
    }
}

async fn bulk_update(
    conn: &mut PgConnection,
    query: &str,
    from: &str,
    to: &str,
) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;
    let res = sqlx::query(query).bind(from).bind(to).execute(&mut *tx).await;
    if let Ok(done) = &res {
        trace!("{} rows updated", done.rows_affected());
    }
    let rolled_back = tx.rollback().await;
    res.map(|_| ()).and(rolled_back)
}

async fn batch_insert(
    conn: &mut PgConnection,
    insert: &str,
    rows: i32,
    batch_size: usize,
) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;
    let res = insert_batches(&mut tx, insert, rows, batch_size).await;
    let rolled_back = tx.rollback().await;
    res.and(rolled_back)
}

async fn insert_batches(
    conn: &mut PgConnection,
    insert: &str,
    rows: i32,
    batch_size: usize,
) -> Result<(), sqlx::Error> {
    for first in (1..=rows).step_by(batch_size) {
        let last = rows.min(first.saturating_add(batch_size as i32 - 1));
        let mut builder = QueryBuilder::<Postgres>::new(insert);
        builder.push_values(first..=last, |mut row, i| {
            row.push_bind(format!("name_{i}")).push_bind(i);
        });
        builder.build().execute(&mut *conn).await?;
    }
    trace!("{rows} rows inserted");
    Ok(())
}

/// Errors the server reported about the statement leave the connection usable; anything
/// below the statement level does not.
pub fn classify(err: sqlx::Error) -> TargetError {
    match err {
        sqlx::Error::Database(_)
        | sqlx::Error::RowNotFound
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => TargetError::operation(err),
        err => TargetError::connection(err),
    }
}
