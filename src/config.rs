//! User configuration loaded from `config.toml`.

use crate::calculator::{AngleMode, BitWidth, NumberBase};
use crate::keypad::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Startup settings for a calculator session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub angle_mode: AngleMode,
    pub number_base: NumberBase,
    pub bit_width: BitWidth,
    /// Skip Saturdays and Sundays when counting working days.
    pub exclude_weekends: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            angle_mode: AngleMode::default(),
            number_base: NumberBase::default(),
            bit_width: BitWidth::default(),
            exclude_weekends: true,
        }
    }
}

/// Default location: `$XDG_CONFIG_HOME/switchcalc/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("switchcalc").join("config.toml"))
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load an explicitly requested config file. Missing files are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load the config from `path`, or from the default location when no
    /// path is given. A missing or broken default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Ok(Self::load_from(&path).unwrap_or_else(|err| {
                tracing::warn!("{err:#}, using defaults");
                Self::default()
            })),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bit_width, BitWidth::Bits32);
        assert!(config.exclude_weekends);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            mode = "programmer"
            angle_mode = "radians"
            number_base = "hexadecimal"
            bit_width = 16
            exclude_weekends = false
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Programmer);
        assert_eq!(config.angle_mode, AngleMode::Radians);
        assert_eq!(config.number_base, NumberBase::Hexadecimal);
        assert_eq!(config.bit_width, BitWidth::Bits16);
        assert!(!config.exclude_weekends);
    }

    #[test]
    fn test_bad_width_rejected() {
        assert!(Config::from_toml("bit_width = 12").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("switchcalc-does-not-exist.toml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
