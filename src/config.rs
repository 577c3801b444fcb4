//! Tax configuration
//!
//! The configuration is assembled once at startup from layers (built-in
//! defaults, an optional TOML file, environment variables, explicit
//! parameters) and is immutable afterwards. The engine receives it by value.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_TAX_RATE: &str = "CAPITAL_GAIN_TAX_RATE";
pub const ENV_EXEMPTION_LIMIT: &str = "CAPITAL_GAIN_EXEMPTION_LIMIT";

const CONFIG_DIR_NAME: &str = "capital-gain";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("{0} out of range: {1}")]
    OutOfRange(String, String),
    #[error("failed to load config file {0}: {1}")]
    File(String, String),
}

/// Tax rate and exemption limit applied to every batch of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxConfig {
    tax_rate: Decimal,
    exemption_limit: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(20, 2),
            exemption_limit: Decimal::from(20_000),
        }
    }
}

impl TaxConfig {
    /// Configuration for a run. Layers, lowest to highest precedence: built-in
    /// defaults, the config file (`config_file`, or the user config file when
    /// it exists), the process environment, then `explicit`.
    pub fn load(
        config_file: Option<&Path>,
        explicit: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::from_layers(
            ConfigOverrides::discover(config_file)?,
            ConfigOverrides::from_env()?,
            explicit,
        )
    }

    /// Stack already-loaded layers over the defaults and validate the result.
    pub fn from_layers(
        file: ConfigOverrides,
        env: ConfigOverrides,
        explicit: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::default()
            .with_overrides(file)
            .with_overrides(env)
            .with_overrides(explicit)
            .validated()
    }

    /// Fraction of the taxable gain owed as tax (0.20 = 20%)
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Sale proceeds at or below this value are exempt from tax
    pub fn exemption_limit(&self) -> Decimal {
        self.exemption_limit
    }

    /// Apply one configuration layer; unset fields keep their current value.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            tax_rate: overrides.tax_rate.unwrap_or(self.tax_rate),
            exemption_limit: overrides.exemption_limit.unwrap_or(self.exemption_limit),
        }
    }

    /// Reject rates outside [0, 1] and negative exemption limits.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ConfigError::OutOfRange(
                "tax_rate".to_string(),
                format!("must be between 0 and 1, got {}", self.tax_rate),
            ));
        }
        if self.exemption_limit < Decimal::ZERO {
            return Err(ConfigError::OutOfRange(
                "exemption_limit".to_string(),
                format!("must not be negative, got {}", self.exemption_limit),
            ));
        }
        Ok(self)
    }
}

impl fmt::Display for TaxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tax rate {}%, exemption limit {}",
            (self.tax_rate * Decimal::ONE_HUNDRED).normalize(),
            self.exemption_limit.normalize()
        )
    }
}

/// One configuration layer. Also the schema of the TOML config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub tax_rate: Option<Decimal>,
    pub exemption_limit: Option<Decimal>,
}

impl ConfigOverrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(&std::env::vars().collect())
    }

    pub fn from_env_map(env_map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            tax_rate: parse_env_decimal(env_map, ENV_TAX_RATE)?,
            exemption_limit: parse_env_decimal(env_map, ENV_EXEMPTION_LIMIT)?,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&content)
            .map_err(|e| ConfigError::File(path.display().to_string(), e.to_string()))
    }

    /// Load the explicit config file if one is given, otherwise the default
    /// user config file if it exists. A missing default file is not an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::info!("Loading tax configuration from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/capital-gain/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

fn parse_env_decimal(
    env_map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    match env_map.get(key).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => Decimal::from_str(raw).map(Some).map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("'{}' is not a decimal", raw))
        }),
    }
}
