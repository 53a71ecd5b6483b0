use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::corrections::LATEST_VERSION;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub normalize: NormalizeConfig,
    pub print: PrintConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub table_version: u32,
    pub extra_corrections: Vec<Correction>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            table_version: LATEST_VERSION,
            extra_corrections: Vec::new(),
        }
    }
}

/// A literal repair: every occurrence of `from` becomes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Correction {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub page_break_before_repeat_sections: bool,
    pub page_numbers: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            page_break_before_repeat_sections: true,
            page_numbers: false,
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects a malformed default file, so this only falls back
        // to the derived defaults if the two ever drift apart.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::warn!("Built-in config did not parse, using derived defaults: {e}");
            Self::default()
        })
    }

    /// Load config from a TOML file, or return the compiled defaults if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
