use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "cohort-tracker";

fn home_dir() -> Result<PathBuf, String> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|err| format!("resolve HOME: {}", err))
}

/// `$XDG_<kind>_HOME/cohort-tracker`, falling back to `~/<fallback>/cohort-tracker`.
fn xdg_dir(var: &str, fallback: &str) -> Result<PathBuf, String> {
    let base = match std::env::var_os(var).filter(|value| !value.is_empty()) {
        Some(value) => PathBuf::from(value),
        None => home_dir()?.join(fallback),
    };
    Ok(base.join(APP_DIR_NAME))
}

pub fn config_dir() -> Result<PathBuf, String> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

pub fn resolve_data_dir(overridden: Option<&Path>) -> Result<PathBuf, String> {
    match overridden {
        Some(path) => Ok(expand_home_path(path)),
        None => xdg_dir("XDG_DATA_HOME", ".local/share"),
    }
}

/// Expands a leading `~` the way a shell would; other paths are returned as is.
pub fn expand_home_path(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match home_dir() {
        Ok(home) if rest.as_os_str().is_empty() => home,
        Ok(home) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
