use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use cohort_db::Db;
use ingest::IngestStats;

#[derive(Clone)]
pub struct IngestService {
    config: SharedConfig,
}

impl IngestService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn run(&self) -> Result<IngestStats> {
        let mut db = self.db()?;
        Ok(ingest::ingest_directory(&mut db, &self.config.import_dir)?)
    }
}
