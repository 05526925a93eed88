use std::path::PathBuf;

use crate::Result;

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub db_path: PathBuf,
    pub import_dir: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let db_path = app_data_dir.join("cohort-tracker.sqlite");
        let import_dir = app_data_dir.join("imports");
        Self {
            app_data_dir,
            db_path,
            import_dir,
        }
    }

    pub fn with_import_dir(mut self, import_dir: Option<PathBuf>) -> Self {
        if let Some(import_dir) = import_dir {
            self.import_dir = import_dir;
        }
        self
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.app_data_dir)?;
    std::fs::create_dir_all(&paths.import_dir)?;
    Ok(())
}
