//! Optional user configuration, read from TOML.
//!
//! ```toml
//! precision = "UNC 2"
//! history_file = "/home/me/.errprop_history"
//! data_file = "incline.dat"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use crate::error::{Error, Result};
use crate::parser::parse_precision;
use physics_core::Precision;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rounding, in the same form as the PRECISION command: `4`, `SIG 3`, `UNC 2`.
    pub precision: Option<String>,
    pub history_file: Option<PathBuf>,
    /// Data file loaded at start-up.
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// `<config dir>/errprop/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("errprop").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.precision()?;
        Ok(config)
    }

    /// Loads `explicit` when given (it must exist), otherwise the default
    /// location if a file is there.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn precision(&self) -> Result<Option<Precision>> {
        match &self.precision {
            Some(text) => {
                let args: Vec<&str> = text.split_whitespace().collect();
                parse_precision(&args)
                    .map(Some)
                    .map_err(|e| Error::Config(format!("precision: {}", e)))
            }
            None => Ok(None),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".errprop_history"))
    }
}
