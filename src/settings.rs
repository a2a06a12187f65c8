use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::calendar::{MonthLocale, MonthNames};
use crate::error::{ReportError, Result};
use crate::levels::{default_levels, Level};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub institution_name: String,
    #[serde(default = "default_currency_format")]
    pub currency_format: String,
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
    #[serde(default)]
    pub month_locale: MonthLocale,
    #[serde(default = "default_levels")]
    pub levels: Vec<Level>,
}

fn default_currency_format() -> String {
    "\"$\"#,##0.00_-".to_string()
}

fn default_currency_label() -> String {
    "ARS".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            institution_name: String::new(),
            currency_format: default_currency_format(),
            currency_label: default_currency_label(),
            month_locale: MonthLocale::default(),
            levels: default_levels(),
        }
    }
}

impl Settings {
    pub fn month_names(&self) -> MonthNames {
        MonthNames::for_locale(self.month_locale)
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("edubalance.db")
    }

    pub fn exports_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("exports")
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("edubalance")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("edubalance")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ReportError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
