//! core::config
//!
//! Engine configuration schema and loading.
//!
//! One scope, one TOML file. Callers decide where the file lives; the
//! loader only reads, parses, and validates. Every field is optional and
//! has an accessor that applies the default.
//!
//! # Example
//!
//! ```toml
//! base_dir = "/srv/repos"
//!
//! [tool]
//! binary = "mygit"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default subprocess timeout when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

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

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Engine configuration.
///
/// # Example
///
/// ```
/// use refscope::core::config::EngineConfig;
///
/// let config: EngineConfig = toml::from_str(
///     "base_dir = \"/srv/repos\"\n[tool]\ntimeout_secs = 5\n",
/// ).unwrap();
/// assert_eq!(config.timeout().as_secs(), 5);
/// assert_eq!(config.tool_binary(), "mygit");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory under which repositories live.
    pub base_dir: Option<PathBuf>,

    /// Subprocess settings.
    pub tool: ToolConfig,
}

/// Subprocess settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Tool binary to invoke (default: `mygit`, resolved via PATH).
    pub binary: Option<String>,

    /// Wall-clock timeout per invocation, in seconds (default: 30).
    pub timeout_secs: Option<u64>,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file cannot be read, does not parse,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(binary) = &self.tool.binary {
            if binary.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "tool.binary cannot be empty".to_string(),
                ));
            }
        }
        if self.tool.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "tool.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Tool binary name, defaulted.
    pub fn tool_binary(&self) -> &str {
        self.tool.binary.as_deref().unwrap_or(crate::tool::TOOL_BIN)
    }

    /// Subprocess timeout, defaulted.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.tool.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_on_empty_config() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.tool_binary(), "mygit");
        assert!(config.base_dir.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config: EngineConfig = toml::from_str(
            r#"
            base_dir = "/srv/repos"

            [tool]
            binary = "mygit-next"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(Path::new("/srv/repos")));
        assert_eq!(config.tool_binary(), "mygit-next");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<EngineConfig>("base_path = \"/x\"").is_err());
        assert!(toml::from_str::<EngineConfig>("[tool]\ntimeout = 5").is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config: EngineConfig = toml::from_str("[tool]\ntimeout_secs = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_binary_rejected() {
        let config: EngineConfig = toml::from_str("[tool]\nbinary = \"\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/refscope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
