use std::path::PathBuf;

use cohort_core::CohortPolicy;
use cohort_db::Db;
use ingest::IngestStats;

use crate::error::{AppError, Result};
use crate::services::AppServices;

/// Paths and policy needed to run the local tracker.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub import_dir: PathBuf,
    pub policy: CohortPolicy,
}

/// Application state shared by frontend backends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    /// Migrates the store and ingests whatever is waiting in the import dir.
    pub fn initialize(&self) -> Result<IngestStats> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        self.refresh_data()
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }

    pub fn refresh_data(&self) -> Result<IngestStats> {
        self.services.ingest.run()
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
