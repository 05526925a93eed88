mod daily;
mod error;
mod facts;
mod helpers;
mod ingest;
mod migrations;
mod settings;
mod types;

use std::path::Path;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use migrations::MIGRATIONS;
pub use settings::{DEFAULT_CAMPAIGN_FILTER, DEFAULT_LOOKBACK_DAYS};
pub use types::IngestCursor;

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        Ok(Self { conn })
    }
}
