pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::RangeParams;
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, SettingsSnapshot, SettingsUpdate};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::time::{
    MAX_LOOKBACK_DAYS, parse_iso_date, resolve_date_range, resolve_date_range_at,
};
