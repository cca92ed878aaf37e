//! Configuration management for dmv-office
//!
//! Config stored at: ~/.config/dmv-office/config.json

use dmv_domain::policy::{
    DEFAULT_BASE_FEE, DEFAULT_EV_SURCHARGE, DEFAULT_MIN_WRITTEN_TEST_AGE,
    DEFAULT_RENEWAL_AFTER_YEARS,
};
use dmv_domain::RulePolicy;
use dmv_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Registration fee for every vehicle
    #[serde(default = "default_base_fee")]
    pub base_fee: u64,

    /// Extra fee for electric vehicles
    #[serde(default = "default_ev_surcharge")]
    pub ev_surcharge: u64,

    /// Minimum age for the written test
    #[serde(default = "default_min_written_test_age")]
    pub min_written_test_age: u32,

    /// Years after which a vehicle registration is due for renewal
    #[serde(default = "default_renewal_after_years")]
    pub renewal_after_years: u32,
}

fn default_base_fee() -> u64 {
    DEFAULT_BASE_FEE
}

fn default_ev_surcharge() -> u64 {
    DEFAULT_EV_SURCHARGE
}

fn default_min_written_test_age() -> u32 {
    DEFAULT_MIN_WRITTEN_TEST_AGE
}

fn default_renewal_after_years() -> u32 {
    DEFAULT_RENEWAL_AFTER_YEARS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Table,
            base_fee: default_base_fee(),
            ev_surcharge: default_ev_surcharge(),
            min_written_test_age: default_min_written_test_age(),
            renewal_after_years: default_renewal_after_years(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("dmv-office");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The electric vehicle fee (base fee plus surcharge) must fit in a `u64`
    pub fn validate(&self) -> Result<()> {
        match self.base_fee.checked_add(self.ev_surcharge) {
            Some(_) => Ok(()),
            None => Err(ConfigError::InvalidValue(format!(
                "base fee {} plus EV surcharge {} is too large",
                self.base_fee, self.ev_surcharge
            ))
            .into()),
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Rule parameters handed to every facility
    pub fn policy(&self) -> RulePolicy {
        RulePolicy {
            base_fee: self.base_fee,
            ev_surcharge: self.ev_surcharge,
            min_written_test_age: self.min_written_test_age,
            renewal_after_years: self.renewal_after_years,
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DMV Office Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(f, "Output format:        {}", self.output_format)?;
        writeln!(f, "Base fee:             {}", self.base_fee)?;
        writeln!(f, "EV surcharge:         {}", self.ev_surcharge)?;
        writeln!(f, "Written test min age: {}", self.min_written_test_age)?;
        writeln!(f, "Renewal after years:  {}", self.renewal_after_years)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:          {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_policy_matches_domain_default() {
        assert_eq!(Config::default().policy(), RulePolicy::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"output_format":"json","ev_surcharge":50}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.ev_surcharge, 50);
        assert_eq!(config.base_fee, 100);
        assert_eq!(config.min_written_test_age, 16);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config { base_fee: 90, ..Config::default() };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(dmv_types::Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_fee_overflow_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config { base_fee: u64::MAX, ev_surcharge: 1, ..Config::default() };
        assert!(matches!(
            config.save_to(&path),
            Err(dmv_types::Error::Config(ConfigError::InvalidValue(_)))
        ));
        assert!(!path.exists());

        std::fs::write(&path, format!(r#"{{"base_fee":{},"ev_surcharge":1}}"#, u64::MAX)).unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(dmv_types::Error::Config(ConfigError::InvalidValue(_)))
        ));
    }
}
