use cohort_core::DailyRecord;
use serde::Serialize;
use std::io;

/// Ingest summary returned after scanning the import directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub rows_upserted: usize,
    pub rows_skipped: usize,
    pub bytes_read: u64,
    pub issues: Vec<IngestIssue>,
}

/// Non-fatal issues encountered during ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestIssue {
    pub file_path: String,
    pub message: String,
}

/// Rows read from one file, plus how many were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub records: Vec<DailyRecord>,
    pub skipped: usize,
}

/// Errors emitted by the ingest pipeline.
#[derive(Debug)]
pub enum IngestError {
    Io(io::Error),
    Db(cohort_db::DbError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Db(err) => write!(f, "db error: {}", err),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<cohort_db::DbError> for IngestError {
    fn from(err: cohort_db::DbError) -> Self {
        Self::Db(err)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
