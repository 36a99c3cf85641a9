use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};
use crate::models::Settings;

const ENV_SETTINGS_PATH: &str = "PATTERNFLOW_SETTINGS";
const ENV_CANVAS_WIDTH: &str = "PATTERNFLOW_CANVAS_WIDTH";
const ENV_CANVAS_HEIGHT: &str = "PATTERNFLOW_CANVAS_HEIGHT";
const ENV_REFRESH_SECS: &str = "PATTERNFLOW_REFRESH_SECS";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn settings_path_from_env() -> Option<PathBuf> {
    env_value(ENV_SETTINGS_PATH).map(PathBuf::from)
}

/// Reads settings from `path` (or defaults when there is no file), applies
/// environment overrides, then validates.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;
            serde_json::from_str::<Settings>(&content)?
        }
        Some(path) => {
            log::warn!("[Config] settings file {} not found, using defaults", path.display());
            Settings::default()
        }
        None => Settings::default(),
    };
    apply_env_defaults(&mut settings);
    settings.validate()?;
    Ok(settings)
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if let Some(width) = env_value(ENV_CANVAS_WIDTH).and_then(|v| v.parse().ok()) {
        settings.canvas.width = width;
    }
    if let Some(height) = env_value(ENV_CANVAS_HEIGHT).and_then(|v| v.parse().ok()) {
        settings.canvas.height = height;
    }
    if let Some(secs) = env_value(ENV_REFRESH_SECS).and_then(|v| v.parse().ok()) {
        settings.refresh.interval_secs = secs;
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
