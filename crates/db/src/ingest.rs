use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::types::IngestCursor;

impl Db {
    pub fn get_cursor(&self, file_path: &str) -> Result<Option<IngestCursor>> {
        self.conn
            .query_row(
                r#"
                SELECT file_path, byte_len, mtime, rows_seen, updated_at
                FROM ingest_cursor
                WHERE file_path = ?1
                "#,
                params![file_path],
                |row| {
                    Ok(IngestCursor {
                        file_path: row.get(0)?,
                        byte_len: row.get::<_, i64>(1)? as u64,
                        mtime: row.get(2)?,
                        rows_seen: row.get::<_, i64>(3)? as u64,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn upsert_cursor(&self, cursor: &IngestCursor) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO ingest_cursor (
              file_path, byte_len, mtime, rows_seen, updated_at
            ) VALUES (
              ?1, ?2, ?3, ?4, ?5
            )
            ON CONFLICT(file_path) DO UPDATE SET
              byte_len = excluded.byte_len,
              mtime = excluded.mtime,
              rows_seen = excluded.rows_seen,
              updated_at = excluded.updated_at
            "#,
            params![
                cursor.file_path,
                cursor.byte_len as i64,
                cursor.mtime,
                cursor.rows_seen as i64,
                cursor.updated_at
            ],
        )?;
        Ok(())
    }
}
