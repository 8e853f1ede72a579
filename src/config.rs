use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::Preset;

pub(crate) const CONFIG_FILE: &str = "config.json";

/// User settings persisted as `config.json`.
///
/// Values are kept as the text the user wrote; the accessors interpret them
/// and fall back to the defaults when a value makes no sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) week_start: String,
    pub(crate) default_filter: String,
    pub(crate) currency_symbol: String,
    pub(crate) log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: "monday".into(),
            default_filter: Preset::ThisMonth.key().into(),
            currency_symbol: "$".into(),
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Read the config at `path`; a missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write config: {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace config: {}", path.display()))?;
        Ok(())
    }

    pub(crate) fn week_start(&self) -> Weekday {
        match self.week_start.trim().parse::<Weekday>() {
            Ok(day) => day,
            Err(_) => {
                tracing::warn!(value = %self.week_start, "unknown week_start, using monday");
                Weekday::Mon
            }
        }
    }

    pub(crate) fn default_preset(&self) -> Preset {
        Preset::parse(&self.default_filter).unwrap_or_else(|| {
            tracing::warn!(value = %self.default_filter, "unknown default_filter, using this-month");
            Preset::ThisMonth
        })
    }

    pub(crate) fn currency_symbol(&self) -> &str {
        if self.currency_symbol.is_empty() {
            "$"
        } else {
            &self.currency_symbol
        }
    }
}

/// Where the app keeps its files.
#[derive(Debug, Clone)]
pub(crate) struct Paths {
    pub(crate) config_file: PathBuf,
    pub(crate) data_dir: PathBuf,
}

impl Paths {
    pub(crate) fn resolve() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            config_file: proj_dirs.config_dir().join(CONFIG_FILE),
            data_dir,
        })
    }

    pub(crate) fn database(&self) -> PathBuf {
        self.data_dir.join("expensetui.db")
    }

    pub(crate) fn log_file(&self) -> PathBuf {
        self.data_dir.join("expensetui.log")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.week_start(), Weekday::Mon);
        assert_eq!(cfg.default_preset(), Preset::ThisMonth);
        assert_eq!(cfg.currency_symbol(), "$");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let cfg = Config {
            week_start: "sunday".into(),
            default_filter: "last-90-days".into(),
            currency_symbol: "€".into(),
            log_level: "debug".into(),
        };
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.week_start(), Weekday::Sun);
        assert_eq!(loaded.default_preset(), Preset::Last90Days);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "week_start": "sat" }"#).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.week_start(), Weekday::Sat);
        assert_eq!(cfg.default_filter, "this-month");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = Config {
            week_start: "funday".into(),
            default_filter: "next-year".into(),
            currency_symbol: String::new(),
            log_level: "info".into(),
        };
        assert_eq!(cfg.week_start(), Weekday::Mon);
        assert_eq!(cfg.default_preset(), Preset::ThisMonth);
        assert_eq!(cfg.currency_symbol(), "$");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
