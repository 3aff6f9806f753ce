use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;

use crate::admin::DEFAULT_ADMIN_SECRET;
use crate::model::entry::NewEntry;
use crate::model::registry::UserRegistry;
use crate::time::{YearMonth, DEFAULT_FIRST_MONTH};

const CONFIG_DIR_NAME: &str = ".evmeter";
const CONFIG_FILE_NAME: &str = "config.json";

const DEMO_SESSIONS: [(&str, &str, f64); 6] = [
    ("Gal", "2025-06-25", 2.5),
    ("Guy", "2025-06-24", 1.5),
    ("Other", "2025-06-23", 3.0),
    ("Gal", "2025-06-20", 2.0),
    ("Guy", "2025-05-28", 1.8),
    ("Other", "2025-05-25", 2.2),
];

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub users: Vec<String>,
    pub admin_secret: String,
    pub first_month: YearMonth,
    pub last_year: i32,
    pub seed_demo_data: bool,
    pub return_delay_ms: u64,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users: vec!["Gal".to_string(), "Guy".to_string(), "Other".to_string()],
            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),
            first_month: DEFAULT_FIRST_MONTH,
            last_year: 2030,
            seed_demo_data: true,
            return_delay_ms: 2500,
            export_dir: None,
        }
    }
}

impl Config {
    /// `~/.evmeter`, also where the interactive session writes its log file.
    pub fn data_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Reads `path`, or the default location. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.registry()?;
        if self.first_month.year() > self.last_year {
            bail!(
                "first_month {} is after the last selectable year {}",
                self.first_month,
                self.last_year
            );
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<UserRegistry> {
        UserRegistry::new(self.users.iter().cloned()).context("Invalid user list in config")
    }

    /// Demo sessions, limited to configured users.
    pub fn seed_entries(&self) -> Result<Vec<NewEntry>> {
        if !self.seed_demo_data {
            return Ok(Vec::new());
        }
        let mut seed = Vec::new();
        for (user, date, hours) in DEMO_SESSIONS {
            if self.users.iter().any(|u| u == user) {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
                seed.push(NewEntry::new(user, date, hours));
            }
        }
        Ok(seed)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.admin_secret, "DBreset18");
        assert_eq!(config.first_month.to_string(), "2025-06");
        assert_eq!(config.seed_entries().unwrap().len(), 6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "users": ["Dana", "Gal"], "first_month": "2026-01" }"#).unwrap();
        assert_eq!(config.users, vec!["Dana", "Gal"]);
        assert_eq!(config.first_month.to_string(), "2026-01");
        assert_eq!(config.last_year, 2030);
        // only Gal's demo sessions survive
        assert_eq!(config.seed_entries().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(Config::from_json(r#"{ "users": [] }"#).is_err());
        assert!(Config::from_json(r#"{ "users": ["A", "A"] }"#).is_err());
        assert!(Config::from_json(r#"{ "first_month": "2031-01" }"#).is_err());
        assert!(Config::from_json(r#"{ "first_month": "June" }"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("evmeter-config-that-does-not-exist.json");
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_seed_disabled() {
        let config = Config::from_json(r#"{ "seed_demo_data": false }"#).unwrap();
        assert!(config.seed_entries().unwrap().is_empty());
    }
}
