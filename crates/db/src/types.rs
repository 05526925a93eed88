/// Fingerprint of an import file as of the last ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestCursor {
    pub file_path: String,
    pub byte_len: u64,
    pub mtime: Option<String>,
    pub rows_seen: u64,
    pub updated_at: String,
}

impl IngestCursor {
    pub fn matches(&self, byte_len: u64, mtime: Option<&str>) -> bool {
        self.byte_len == byte_len && self.mtime.as_deref() == mtime
    }
}
