use std::fs;
use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use iced::Theme;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::screens::settings::theme_to_str;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

const LOG_DIR: &str = "logs";
const LOG_FILE_BASENAME: &str = "roster";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

// Dropping the handle would shut logging down, so it lives for the whole process.
static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub theme_name: String,
    pub api_base_url: String,
}

pub fn load_config() -> Option<Config> {
    read_config(Path::new(CONFIG_FILE))
}

pub fn save_config(theme: &Theme, api_base_url: &str) -> std::io::Result<()> {
    write_config(Path::new(CONFIG_FILE), theme, api_base_url)
}

fn read_config(path: &Path) -> Option<Config> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_config(path: &Path, theme: &Theme, api_base_url: &str) -> std::io::Result<()> {
    let config = Config {
        theme_name: theme_to_str(theme).to_string(),
        api_base_url: api_base_url.to_string(),
    };
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

/// Starts the rolling file logger once; later calls are no-ops.
pub fn init_logging() -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let logger = Logger::try_with_env_or_str("info")
        .map_err(|err| format!("invalid log spec: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(LOG_DIR)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    let _ = LOGGER.set(logger);
    Ok(())
}
