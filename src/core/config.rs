//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! nodetend needs exactly one piece of configuration: where the content
//! repository lives. The repository root is resolved in this order (later
//! never overrides earlier):
//!
//! 1. The `--repo` CLI flag
//! 2. `$NODETEND_REPO`
//! 3. The `repository` key of the global config file
//! 4. The current working directory
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$NODETEND_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/nodetend/config.toml`
//! 3. `~/.nodetend/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use nodetend::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! let root = config.repository_root(None).unwrap();
//! println!("Repository: {}", root.display());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("cannot determine current directory: {0}")]
    NoCurrentDir(std::io::Error),
}

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// repository = "/srv/content"
/// quiet = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default content repository root
    pub repository: Option<PathBuf>,

    /// Default quiet mode
    pub quiet: Option<bool>,
}

/// Loaded configuration plus its origin.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration values.
    pub global: GlobalConfig,
    /// Path to the config file that was loaded (if any).
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Missing config files are not an error (defaults are used).
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // 1. Check $NODETEND_CONFIG
        if let Ok(path) = std::env::var("NODETEND_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::read_file(&path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/nodetend/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("nodetend/config.toml");
            if path.exists() {
                return Self::read_file(&path);
            }
        }

        // 3. Check ~/.nodetend/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".nodetend/config.toml");
            if path.exists() {
                return Self::read_file(&path);
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Path of the config file this configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolve the content repository root.
    ///
    /// Precedence: `flag` (from `--repo`) over `$NODETEND_REPO` over the
    /// config file's `repository` key over the current working directory.
    pub fn repository_root(&self, flag: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("NODETEND_REPO") {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = &self.global.repository {
            return Ok(path.clone());
        }
        std::env::current_dir().map_err(ConfigError::NoCurrentDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config: GlobalConfig = toml::from_str(
            r#"
            repository = "/srv/content"
            quiet = true
            "#,
        )
        .unwrap();
        assert_eq!(config.repository, Some(PathBuf::from("/srv/content")));
        assert_eq!(config.quiet, Some(true));
    }

    #[test]
    fn parse_empty_config() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("no_such_key = 1");
        assert!(result.is_err());
    }

    #[test]
    fn flag_takes_precedence() {
        let config = Config {
            global: GlobalConfig {
                repository: Some(PathBuf::from("/from-config")),
                quiet: None,
            },
            path: None,
        };
        let root = config
            .repository_root(Some(Path::new("/from-flag")))
            .unwrap();
        assert_eq!(root, PathBuf::from("/from-flag"));
    }

    #[test]
    fn config_value_used_without_flag() {
        let config = Config {
            global: GlobalConfig {
                repository: Some(PathBuf::from("/from-config")),
                quiet: None,
            },
            path: None,
        };
        // Only meaningful when $NODETEND_REPO is unset; the test environment
        // does not set it.
        if std::env::var("NODETEND_REPO").is_err() {
            let root = config.repository_root(None).unwrap();
            assert_eq!(root, PathBuf::from("/from-config"));
        }
    }
}
