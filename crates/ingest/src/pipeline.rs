use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Utc};
use cohort_db::{Db, IngestCursor};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::parser::{records_from_json, records_from_lines};
use crate::types::{IngestIssue, IngestStats, ParsedRows, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Document,
    Lines,
}

fn file_format(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|value| value.to_str()) {
        Some("json") => Some(FileFormat::Document),
        Some("jsonl") | Some("ndjson") => Some(FileFormat::Lines),
        _ => None,
    }
}

struct FileTask {
    path: PathBuf,
    file_path: String,
    format: FileFormat,
    byte_len: u64,
    mtime: Option<String>,
}

struct ParsedFile {
    file_path: String,
    byte_len: u64,
    mtime: Option<String>,
    bytes_read: u64,
    rows: ParsedRows,
    issue: Option<IngestIssue>,
    parse_duration: StdDuration,
}

fn parse_file(task: FileTask) -> ParsedFile {
    let file_start = Instant::now();
    let mut parsed = ParsedFile {
        file_path: task.file_path,
        byte_len: task.byte_len,
        mtime: task.mtime,
        bytes_read: 0,
        rows: ParsedRows::default(),
        issue: None,
        parse_duration: StdDuration::ZERO,
    };

    let text = match fs::read_to_string(&task.path) {
        Ok(text) => text,
        Err(err) => {
            parsed.issue = Some(IngestIssue {
                file_path: parsed.file_path.clone(),
                message: err.to_string(),
            });
            parsed.parse_duration = file_start.elapsed();
            return parsed;
        }
    };
    parsed.bytes_read = text.len() as u64;

    match task.format {
        FileFormat::Lines => parsed.rows = records_from_lines(&text),
        FileFormat::Document => match records_from_json(&text) {
            Ok(rows) => parsed.rows = rows,
            Err(err) => {
                parsed.issue = Some(IngestIssue {
                    file_path: parsed.file_path.clone(),
                    message: format!("invalid json: {err}"),
                });
            }
        },
    }
    parsed.parse_duration = file_start.elapsed();
    debug!(
        file = %parsed.file_path,
        read_ms = parsed.parse_duration.as_millis() as u64,
        rows = parsed.rows.records.len(),
        skipped = parsed.rows.skipped,
        bytes = parsed.bytes_read,
        "ingest file"
    );
    parsed
}

/// Loads every `.json`, `.jsonl` and `.ndjson` file under `import_dir` into the
/// daily store. Files unchanged since the last run (same length and mtime) are
/// skipped. A missing directory is not an error.
pub fn ingest_directory(db: &mut Db, import_dir: &Path) -> Result<IngestStats> {
    let mut stats = IngestStats::default();
    let ingest_start = Instant::now();
    match fs::metadata(import_dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(stats),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(stats),
        Err(err) => return Err(err.into()),
    }

    let mut tasks = Vec::new();
    for entry in WalkDir::new(import_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let file_path = err
                    .path()
                    .map(|path| path.to_string_lossy().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                stats.issues.push(IngestIssue {
                    file_path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(format) = file_format(path) else {
            continue;
        };
        stats.files_scanned += 1;
        let file_path = path.to_string_lossy().to_string();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                stats.files_skipped += 1;
                stats.issues.push(IngestIssue {
                    file_path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        let byte_len = metadata.len();
        let mtime = metadata
            .modified()
            .ok()
            .map(|time| DateTime::<Utc>::from(time).to_rfc3339());
        if let Some(cursor) = db.get_cursor(&file_path)?
            && cursor.matches(byte_len, mtime.as_deref())
        {
            stats.files_skipped += 1;
            continue;
        }
        tasks.push(FileTask {
            path: path.to_path_buf(),
            file_path,
            format,
            byte_len,
            mtime,
        });
    }

    let parsed_files = tasks
        .into_par_iter()
        .map(parse_file)
        .collect::<Vec<_>>();

    let mut parse_total = StdDuration::ZERO;
    let db_start = Instant::now();
    for parsed in parsed_files {
        parse_total += parsed.parse_duration;
        stats.bytes_read += parsed.bytes_read;
        if let Some(issue) = parsed.issue {
            warn!(file = %issue.file_path, message = %issue.message, "ingest file skipped");
            stats.files_skipped += 1;
            stats.issues.push(issue);
            continue;
        }
        stats.rows_skipped += parsed.rows.skipped;
        stats.rows_upserted +=
            db.upsert_daily_records(&parsed.rows.records, Some(&parsed.file_path))?;
        db.upsert_cursor(&IngestCursor {
            file_path: parsed.file_path,
            byte_len: parsed.byte_len,
            mtime: parsed.mtime,
            rows_seen: (parsed.rows.records.len() + parsed.rows.skipped) as u64,
            updated_at: Utc::now().to_rfc3339(),
        })?;
    }

    info!(
        scanned = stats.files_scanned,
        skipped = stats.files_skipped,
        rows = stats.rows_upserted,
        rows_skipped = stats.rows_skipped,
        read_ms = parse_total.as_millis() as u64,
        db_ms = db_start.elapsed().as_millis() as u64,
        total_ms = ingest_start.elapsed().as_millis() as u64,
        "ingest complete"
    );
    Ok(stats)
}
