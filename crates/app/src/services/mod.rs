mod cohorts;
mod ingest;
mod settings;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use cohort_db::Db;

pub use cohorts::CohortService;
pub use ingest::IngestService;
pub use settings::{SettingsService, SettingsSnapshot, SettingsUpdate};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub cohorts: CohortService,
    pub ingest: IngestService,
    pub settings: SettingsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            cohorts: CohortService::new(shared.clone()),
            ingest: IngestService::new(shared.clone()),
            settings: SettingsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
