use crate::KeyRange;
use std::num::{NonZeroU64, NonZeroUsize};

/// Operations each worker executes when the configuration does not say otherwise.
pub const DEFAULT_OPERATIONS_PER_WORKER: NonZeroU64 = unsafe { NonZeroU64::new_unchecked(200) };

/// Concurrency levels swept when the configuration does not list any.
pub const DEFAULT_CONCURRENCY_LEVELS: [NonZeroUsize; 4] = unsafe {
    [
        NonZeroUsize::new_unchecked(1),
        NonZeroUsize::new_unchecked(8),
        NonZeroUsize::new_unchecked(16),
        NonZeroUsize::new_unchecked(32),
    ]
};

pub const DEFAULT_KEY_RANGE: KeyRange = KeyRange {
    start: 1,
    end: 10_000,
};

pub const DEFAULT_KEYWORD: &str = "war";

pub const DEFAULT_DELIMITER: char = ';';

/// Zero-based column matched by local scans (the title column of `movies.txt`).
pub const DEFAULT_SCAN_COLUMN: usize = 1;

/// Replacement performed by bulk updates and local updates.
pub const DEFAULT_REPLACE_FROM: &str = " To ";
pub const DEFAULT_REPLACE_TO: &str = " TTOO ";

pub const DEFAULT_INSERT_TABLE: &str = "perf_test_insert";
pub const DEFAULT_INSERT_ROWS: u32 = 1000;
pub const DEFAULT_INSERT_BATCH_SIZE: u32 = 100;
