//! Optional TOML configuration.
//!
//! Every table and key is optional; anything left out keeps its built-in
//! default.
//!
//! ```toml
//! [fees]
//! visa_fee_per_person = 766
//! priority_fee_per_person = 500
//! adult_surcharge_per_year = 1035
//! child_surcharge_per_year = 776
//!
//! [display]
//! base_currency_code = "GBP"
//! base_currency_symbol = "£"
//! default_currency_symbol = "$"
//!
//! [preferences]
//! backend = "sqlite"
//! location = "preferences.db"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use visa_core::prefs::StoreConfig;
use visa_core::{FeeSchedule, FeeScheduleError};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "VISA_ESTIMATOR_CONFIG";

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "visa-estimator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid fee schedule: {0}")]
    Fees(#[from] FeeScheduleError),
}

/// How amounts are labelled when displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Code of the currency the fees are published in.
    pub base_currency_code: String,
    /// Symbol printed in front of base-currency amounts.
    pub base_currency_symbol: String,
    /// Symbol used for the converted total when the user gives none.
    pub default_currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            base_currency_code: "GBP".to_string(),
            base_currency_symbol: "£".to_string(),
            default_currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fees: FeeSchedule,
    pub display: DisplayConfig,
    pub preferences: StoreConfig,
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// Uses `path` when given, else [`DEFAULT_CONFIG_FILE`] in the working
    /// directory if it exists, else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(path) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents, path)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parses and validates TOML text. `origin` is only used in errors.
    pub fn from_toml_str(
        contents: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.fees.validate()?;
        Ok(config)
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let cwd_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    cwd_config.is_file().then_some(cwd_config)
}
